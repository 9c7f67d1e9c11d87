use std::path::Path;

use async_trait::async_trait;

use super::error::StorageError;

/// An image persisted by an [`ImageStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// File name relative to the store root, e.g. `3f9a...c1.png`.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

/// Receives uploaded images and hands back a stable name for them.
///
/// Names are opaque to callers; the HTTP layer turns them into public URLs.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `data` with the given lowercase file extension (without the dot).
    async fn put(&self, data: &[u8], extension: &str) -> Result<StoredImage, StorageError>;

    /// Directory the stored images live in, for static serving.
    fn root(&self) -> &Path;
}
