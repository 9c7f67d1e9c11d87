use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::extractors::query::AppQuery;
use crate::models::event::*;
use crate::models::shared::MessageResponse;
use crate::services::event::EventService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{id}/events",
    tag = "Events",
    operation_id = "listEvents",
    summary = "List a pet's events",
    params(("id" = i32, Path, description = "Pet ID")),
    responses(
        (status = 200, description = "Events of the pet", body = Vec<EventResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Pet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_events(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(pet_id): AppPath<i32>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let events = EventService::new(&state.db)
        .list(auth_user.user_id, pet_id)
        .await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/{id}/events",
    tag = "Events",
    operation_id = "createEvent",
    summary = "Add a calendar event for a pet",
    params(("id" = i32, Path, description = "Pet ID")),
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Pet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn create_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(pet_id): AppPath<i32>,
    AppJson(payload): AppJson<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = payload.normalized()?;
    let event = EventService::new(&state.db)
        .create(auth_user.user_id, pet_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Events",
    operation_id = "updateEvent",
    summary = "Partially update an event",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Updated event", body = EventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn update_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    let payload = payload.normalized()?;
    let event = EventService::new(&state.db)
        .update(auth_user.user_id, id, payload)
        .await?;
    Ok(Json(event.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Events",
    operation_id = "deleteEvent",
    summary = "Delete an event",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn delete_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    EventService::new(&state.db)
        .delete(auth_user.user_id, id)
        .await?;
    Ok(Json(MessageResponse::new("Event deleted")))
}

#[utoipa::path(
    get,
    path = "/upcoming",
    tag = "Events",
    operation_id = "upcomingEvents",
    summary = "Upcoming events across all of the caller's pets",
    description = "Events dated today (UTC) or later, soonest first, with the pet's name and image.",
    params(UpcomingQuery),
    responses(
        (status = 200, description = "Upcoming events", body = Vec<UpcomingEventItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn upcoming_events(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<UpcomingQuery>,
) -> Result<Json<Vec<UpcomingEventItem>>, AppError> {
    let limit = query.effective_limit(state.config.events.upcoming_limit);
    let today = Utc::now().date_naive();
    let rows = EventService::new(&state.db)
        .upcoming(auth_user.user_id, today, limit)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
