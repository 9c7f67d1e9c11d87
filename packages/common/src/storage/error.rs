/// Errors that can occur while persisting uploaded images.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The upload carried no bytes.
    #[error("image is empty")]
    Empty,
    /// The image exceeds the configured size limit.
    #[error("image exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
    /// The file extension is not a plain alphanumeric suffix.
    #[error("invalid image extension: {0}")]
    InvalidExtension(String),
}
