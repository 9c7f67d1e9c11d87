use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::error::StorageError;
use super::hash::ContentHash;
use super::traits::{ImageStore, StoredImage};

/// Filesystem-backed image store.
///
/// Images are written flat into `root` as `{sha256 hex}.{extension}`, so
/// re-uploading the same picture resolves to the same file. Partial writes
/// go to a sibling scratch directory (`.{root name}.tmp`), so `root` only
/// ever holds finished images and can be served as-is.
pub struct FilesystemImageStore {
    root: PathBuf,
    scratch: PathBuf,
    max_size: u64,
}

impl FilesystemImageStore {
    /// Create the store, making sure the root and its scratch directory exist.
    pub async fn new(root: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        let scratch = scratch_dir(&fs::canonicalize(&root).await?);
        fs::create_dir_all(&scratch).await?;
        Ok(Self {
            root,
            scratch,
            max_size,
        })
    }

    fn image_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.scratch.join(uuid::Uuid::new_v4().to_string())
    }
}

/// Scratch directory beside an absolute `root`, on the same filesystem so
/// the final rename stays atomic.
fn scratch_dir(root: &Path) -> PathBuf {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "uploads".into());
    root.with_file_name(format!(".{name}.tmp"))
}

fn validate_extension(extension: &str) -> Result<(), StorageError> {
    if extension.is_empty()
        || extension.len() > 8
        || !extension
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(StorageError::InvalidExtension(extension.to_string()));
    }
    Ok(())
}

#[async_trait]
impl ImageStore for FilesystemImageStore {
    async fn put(&self, data: &[u8], extension: &str) -> Result<StoredImage, StorageError> {
        validate_extension(extension)?;

        let size = data.len() as u64;
        if size == 0 {
            return Err(StorageError::Empty);
        }
        if size > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: size,
                limit: self.max_size,
            });
        }

        let name = format!("{}.{extension}", ContentHash::compute(data));
        let image_path = self.image_path(&name);

        if fs::try_exists(&image_path).await? {
            debug!(%name, "image already stored");
            return Ok(StoredImage { name, size });
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &image_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(StoredImage { name, size })
    }

    fn root(&self) -> &Path {
        &self.root
    }
}
