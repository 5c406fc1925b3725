//! Local filesystem cover storage.
//!
//! Files land under `{root}/covers/` and are linked as `{public_base_url}/covers/...`,
//! so `public_base_url` must be wherever `{root}` is served from (`COVER_DIR` and
//! `BASE_URL`).

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::ports::{CoverStorage, StorageError, is_allowed_cover_type};

/// Sub-directory of the storage root, and URL segment, holding stored covers.
pub const COVER_PREFIX: &str = "covers";

/// Stores uploaded covers on the local disk.
pub struct LocalCoverStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalCoverStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

/// Keep the last path component and replace anything outside `[A-Za-z0-9._-]`.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "cover".to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl CoverStorage for LocalCoverStorage {
    async fn store(
        &self,
        original_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        if !is_allowed_cover_type(content_type) {
            return Err(StorageError::UnsupportedType(content_type.to_string()));
        }
        if bytes.is_empty() {
            return Err(StorageError::Empty);
        }

        let key = format!(
            "{COVER_PREFIX}/{}-{}",
            Uuid::new_v4(),
            sanitize_file_name(original_name)
        );
        let path = self.root.join(&key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Backend(e.to_string()))?;
        }
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        tracing::info!(key = %key, size = bytes.len(), "Stored cover image");

        Ok(format!("{}/{key}", self.public_base_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> (LocalCoverStorage, PathBuf) {
        let root = std::env::temp_dir().join(format!("quill-covers-{}", Uuid::new_v4()));
        (
            LocalCoverStorage::new(root.clone(), "https://cdn.example.com/"),
            root,
        )
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("photo.png"), "photo.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\pics\\my cat.jpg"), "my-cat.jpg");
        assert_eq!(sanitize_file_name(".."), "cover");
        assert_eq!(sanitize_file_name(""), "cover");
    }

    #[tokio::test]
    async fn test_store_writes_file_and_returns_url() {
        let (storage, root) = temp_storage();

        let url = storage
            .store("cat.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();

        assert!(url.starts_with("https://cdn.example.com/covers/"));
        assert!(url.ends_with("-cat.png"));

        let key = url.trim_start_matches("https://cdn.example.com/");
        let written = tokio::fs::read(root.join(key)).await.unwrap();
        assert_eq!(written, vec![1, 2, 3]);

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_store_rejects_unsupported_type() {
        let (storage, root) = temp_storage();

        let result = storage.store("doc.pdf", "application/pdf", vec![1]).await;

        assert!(matches!(result, Err(StorageError::UnsupportedType(_))));
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn test_store_rejects_empty_upload() {
        let (storage, _root) = temp_storage();

        let result = storage.store("cat.webp", "image/webp", Vec::new()).await;

        assert!(matches!(result, Err(StorageError::Empty)));
    }
}
