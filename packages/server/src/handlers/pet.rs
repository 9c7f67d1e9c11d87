use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::TransactionTrait;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::path::AppPath;
use crate::extractors::pet_form::{PetForm, read_multipart};
use crate::models::pet::*;
use crate::models::shared::MessageResponse;
use crate::services::pet::{ImageUpdate, PetService, PetUpdate};
use crate::state::AppState;
use crate::utils::image::{ImageUpload, store_image};

/// Headroom on top of the image size for the other multipart fields.
const FORM_OVERHEAD: usize = 1024 * 1024;

/// Body limit for routes that may carry a pet photo.
pub fn image_body_limit(max_image_size: u64) -> DefaultBodyLimit {
    let limit = usize::try_from(max_image_size)
        .unwrap_or(usize::MAX)
        .saturating_add(FORM_OVERHEAD);
    DefaultBodyLimit::max(limit)
}

/// Pick the image mode: a freshly uploaded file wins over a passed reference.
async fn resolve_image(
    state: &AppState,
    upload: Option<ImageUpload>,
    fields: &PetFields,
) -> Result<ImageUpdate, AppError> {
    if let Some(upload) = upload {
        return Ok(ImageUpdate::Uploaded(store_image(state, upload).await?));
    }
    Ok(match fields.image_reference()? {
        Some(url) => ImageUpdate::Passthrough(url),
        None => ImageUpdate::Keep,
    })
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Pets",
    operation_id = "createPet",
    summary = "Register a pet",
    description = "Accepts `multipart/form-data` with an `image` file, or JSON with an `image_url` obtained from the upload endpoint. `name`, `birth_date` and an image are required.",
    request_body(content_type = "multipart/form-data", description = "Pet fields plus an `image` file"),
    responses(
        (status = 201, description = "Pet created", body = CreatePetResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, form), fields(user_id = auth_user.user_id))]
pub async fn create_pet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    form: PetForm,
) -> Result<impl IntoResponse, AppError> {
    let PetForm { fields, image } = form;
    let image_ref = fields.image_reference()?;
    let new_pet = fields.into_new_pet()?;

    let image_url = match (image, image_ref) {
        (Some(upload), _) => store_image(&state, upload).await?,
        (None, Some(url)) => url,
        (None, None) => return Err(AppError::Validation("Image is required".into())),
    };

    let pet = PetService::new(&state.db)
        .create(auth_user.user_id, new_pet, image_url)
        .await?;

    tracing::info!(pet_id = pet.id, "pet created");

    Ok((
        StatusCode::CREATED,
        Json(CreatePetResponse {
            pet_id: pet.id,
            image_url: pet.image,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Pets",
    operation_id = "listPets",
    summary = "List the caller's pets",
    responses(
        (status = 200, description = "Pets owned by the caller", body = Vec<PetSummary>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_pets(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<PetSummary>>, AppError> {
    let pets = PetService::new(&state.db).list(auth_user.user_id).await?;
    Ok(Json(pets.into_iter().map(PetSummary::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Pets",
    operation_id = "getPet",
    summary = "Get one of the caller's pets",
    params(("id" = i32, Path, description = "Pet ID")),
    responses(
        (status = 200, description = "Pet detail", body = PetResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Pet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_pet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<PetResponse>, AppError> {
    let pet = PetService::new(&state.db)
        .find(auth_user.user_id, id)
        .await?;
    Ok(Json(pet.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Pets",
    operation_id = "updatePet",
    summary = "Partially update a pet",
    description = "Only supplied fields are written. The image changes only when a new `image` file or a non-empty `image_url` is supplied.",
    params(("id" = i32, Path, description = "Pet ID")),
    request_body(content_type = "multipart/form-data", description = "Any subset of pet fields, optional `image` file"),
    responses(
        (status = 200, description = "Updated pet", body = PetResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Pet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, form), fields(user_id = auth_user.user_id))]
pub async fn update_pet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    form: PetForm,
) -> Result<Json<PetResponse>, AppError> {
    let PetForm { fields, image } = form;
    let image = resolve_image(&state, image, &fields).await?;
    let changes = fields.into_changes()?;

    let pet = PetService::new(&state.db)
        .update(auth_user.user_id, id, PetUpdate { changes, image })
        .await?;
    Ok(Json(pet.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Pets",
    operation_id = "deletePet",
    summary = "Delete a pet",
    description = "Deletes the pet together with its vaccinations and events.",
    params(("id" = i32, Path, description = "Pet ID")),
    responses(
        (status = 200, description = "Pet deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Pet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn delete_pet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    let txn = state.db.begin().await?;
    PetService::new(&txn).delete(auth_user.user_id, id).await?;
    txn.commit().await?;

    tracing::info!(pet_id = id, "pet deleted");
    Ok(Json(MessageResponse::new("Pet deleted")))
}

#[utoipa::path(
    post,
    path = "/upload-image",
    tag = "Pets",
    operation_id = "uploadPetImage",
    summary = "Upload a pet photo ahead of time",
    description = "Stores the `image` file and returns its URL for later use as `image_url`.",
    request_body(content_type = "multipart/form-data", description = "An `image` file"),
    responses(
        (status = 200, description = "Image stored", body = UploadImageResponse),
        (status = 400, description = "Missing or unsupported image (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = auth_user.user_id))]
pub async fn upload_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadImageResponse>, AppError> {
    let multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
    let upload = read_multipart(multipart, |_, _| Ok(()))
        .await?
        .ok_or_else(|| AppError::Validation("No image file provided".into()))?;
    let image_url = store_image(&state, upload).await?;
    Ok(Json(UploadImageResponse { image_url }))
}
