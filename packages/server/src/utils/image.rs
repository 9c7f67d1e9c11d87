use axum::body::Bytes;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

/// File extensions accepted for pet photos.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "heic"];

/// An image file pulled out of a multipart body, not yet stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// Resolve the stored extension for an upload.
///
/// The client's file name wins; the declared content type is the fallback
/// (some mobile pickers send `blob` or no name at all).
pub fn image_extension(
    file_name: Option<&str>,
    content_type: Option<&str>,
) -> Result<&'static str, AppError> {
    let from_name = file_name
        .and_then(|name| name.trim().rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .and_then(|ext| ALLOWED_EXTENSIONS.iter().copied().find(|a| *a == ext));
    if let Some(ext) = from_name {
        return Ok(ext);
    }

    let from_mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .filter(|ct| ct.starts_with("image/"))
        .and_then(|ct| {
            if ct == "image/heic" {
                return Some("heic");
            }
            mime_guess::get_mime_extensions_str(&ct).and_then(|exts| {
                exts.iter()
                    .find_map(|e| ALLOWED_EXTENSIONS.iter().copied().find(|a| a == e))
            })
        });

    from_mime.ok_or_else(|| {
        AppError::Validation(format!(
            "Image must be one of: {}",
            ALLOWED_EXTENSIONS.join(", ")
        ))
    })
}

/// Persist an uploaded image and return its public URL.
pub async fn store_image(state: &AppState, upload: ImageUpload) -> Result<String, AppError> {
    let extension = image_extension(upload.file_name.as_deref(), upload.content_type.as_deref())?;
    let stored = state.images.put(&upload.bytes, extension).await?;
    info!(name = %stored.name, size = stored.size, "image stored");
    Ok(state.config.image_url(&stored.name))
}
