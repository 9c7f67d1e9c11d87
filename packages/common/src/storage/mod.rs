mod error;
mod hash;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use hash::ContentHash;
pub use traits::{ImageStore, StoredImage};
