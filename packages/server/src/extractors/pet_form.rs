use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{HeaderMap, header::CONTENT_TYPE};

use crate::error::AppError;
use crate::extractors::json::AppJson;
use crate::models::pet::PetFields;
use crate::state::AppState;
use crate::utils::image::ImageUpload;

/// Multipart field carrying the pet photo.
const IMAGE_FIELD: &str = "image";

/// Pet create/update payload.
///
/// Accepts `multipart/form-data` (text fields plus an optional `image` file)
/// or a JSON body of [`PetFields`] (no file, `image_url` passthrough only).
pub struct PetForm {
    pub fields: PetFields,
    pub image: Option<ImageUpload>,
}

pub fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| {
            ct.trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
}

/// Read the single `image` file out of a multipart stream, feeding every other
/// field to `on_text`. A file part with no bytes counts as no file.
pub async fn read_multipart<F>(
    mut multipart: Multipart,
    mut on_text: F,
) -> Result<Option<ImageUpload>, AppError>
where
    F: FnMut(&str, &str) -> Result<(), AppError>,
{
    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == IMAGE_FIELD {
            let file_name = field.file_name().map(str::to_owned);
            let content_type = field.content_type().map(str::to_owned);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read image: {e}")))?;
            if !bytes.is_empty() {
                image = Some(ImageUpload {
                    bytes,
                    file_name,
                    content_type,
                });
            }
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read field {name}: {e}")))?;
            on_text(&name, &text)?;
        }
    }
    Ok(image)
}

impl FromRequest<AppState> for PetForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        if !is_multipart(req.headers()) {
            let AppJson(fields) = AppJson::<PetFields>::from_request(req, state).await?;
            return Ok(PetForm {
                fields,
                image: None,
            });
        }

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let mut fields = PetFields::default();
        let image = read_multipart(multipart, |name, value| {
            fields.apply_text_field(name, value)
        })
        .await?;

        Ok(PetForm { fields, image })
    }
}
