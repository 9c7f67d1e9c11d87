use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::shared::MessageResponse;
use crate::models::vaccination::*;
use crate::services::vaccination::VaccinationService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{id}/vaccinations",
    tag = "Vaccinations",
    operation_id = "listVaccinations",
    summary = "List a pet's vaccinations",
    params(("id" = i32, Path, description = "Pet ID")),
    responses(
        (status = 200, description = "Vaccinations of the pet", body = Vec<VaccinationResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Pet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_vaccinations(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(pet_id): AppPath<i32>,
) -> Result<Json<Vec<VaccinationResponse>>, AppError> {
    let records = VaccinationService::new(&state.db)
        .list(auth_user.user_id, pet_id)
        .await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/{id}/vaccinations",
    tag = "Vaccinations",
    operation_id = "createVaccination",
    summary = "Record a vaccination for a pet",
    params(("id" = i32, Path, description = "Pet ID")),
    request_body = CreateVaccinationRequest,
    responses(
        (status = 201, description = "Vaccination created", body = VaccinationResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Pet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn create_vaccination(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(pet_id): AppPath<i32>,
    AppJson(payload): AppJson<CreateVaccinationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = payload.normalized()?;
    let record = VaccinationService::new(&state.db)
        .create(auth_user.user_id, pet_id, payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(VaccinationResponse::from(record)),
    ))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Vaccinations",
    operation_id = "updateVaccination",
    summary = "Partially update a vaccination",
    params(("id" = i32, Path, description = "Vaccination ID")),
    request_body = UpdateVaccinationRequest,
    responses(
        (status = 200, description = "Updated vaccination", body = VaccinationResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Vaccination not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn update_vaccination(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateVaccinationRequest>,
) -> Result<Json<VaccinationResponse>, AppError> {
    let payload = payload.normalized()?;
    let record = VaccinationService::new(&state.db)
        .update(auth_user.user_id, id, payload)
        .await?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Vaccinations",
    operation_id = "deleteVaccination",
    summary = "Delete a vaccination",
    params(("id" = i32, Path, description = "Vaccination ID")),
    responses(
        (status = 200, description = "Vaccination deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Vaccination not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn delete_vaccination(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    VaccinationService::new(&state.db)
        .delete(auth_user.user_id, id)
        .await?;
    Ok(Json(MessageResponse::new("Vaccination deleted")))
}
