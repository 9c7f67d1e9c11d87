use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::health::health))
        .nest("/auth", auth_routes())
        .nest("/pets", pet_routes(config.storage.max_image_size))
        .nest("/vaccinations", vaccination_routes())
        .nest("/events", event_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn pet_routes(max_image_size: u64) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::pet::list_pets, handlers::pet::create_pet))
        .routes(routes!(
            handlers::pet::get_pet,
            handlers::pet::update_pet,
            handlers::pet::delete_pet
        ))
        .routes(routes!(handlers::pet::upload_image))
        .routes(routes!(
            handlers::vaccination::list_vaccinations,
            handlers::vaccination::create_vaccination
        ))
        .routes(routes!(
            handlers::event::list_events,
            handlers::event::create_event
        ))
        .layer(handlers::pet::image_body_limit(max_image_size))
}

fn vaccination_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::vaccination::update_vaccination,
        handlers::vaccination::delete_vaccination
    ))
}

fn event_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::event::upcoming_events))
        .routes(routes!(
            handlers::event::update_event,
            handlers::event::delete_event
        ))
}
