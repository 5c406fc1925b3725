//! Cover image storage port.

use async_trait::async_trait;

/// Content types accepted for post covers.
pub const ALLOWED_COVER_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Storage for post cover images. Implementations return the public URL of the stored file.
#[async_trait]
pub trait CoverStorage: Send + Sync {
    async fn store(
        &self,
        original_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError>;
}

pub fn is_allowed_cover_type(content_type: &str) -> bool {
    ALLOWED_COVER_TYPES.contains(&content_type)
}

/// Cover storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Empty upload")]
    Empty,

    #[error("Storage backend error: {0}")]
    Backend(String),
}
