//! Blob storage for uploaded assets (avatars)

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{error, info};

use crate::errors::{BiolinkError, Result};

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key` and return the public URL.
    async fn upload(&self, key: &str, bytes: &[u8]) -> Result<String>;
}

/// Writes blobs into a local directory served at `public_base_url`.
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config() -> Self {
        let config = crate::config::get_config();
        Self::new(&config.blob.root, &config.blob.public_base_url)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    /// Read a stored blob back. Unknown keys are `NotFound`.
    pub async fn read(&self, key: &str) -> Result<Vec<u8>> {
        Self::validate_key(key)?;

        match tokio::fs::read(self.root.join(key)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BiolinkError::not_found(format!("Blob '{}' not found", key)))
            }
            Err(e) => {
                error!("Failed to read blob '{}': {}", key, e);
                Err(BiolinkError::backend_unavailable(format!(
                    "Cannot read blob '{}': {}",
                    key, e
                )))
            }
        }
    }

    fn validate_key(key: &str) -> Result<()> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if valid {
            Ok(())
        } else {
            Err(BiolinkError::validation(format!("Invalid blob key '{}'", key)))
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(&self, key: &str, bytes: &[u8]) -> Result<String> {
        Self::validate_key(key)?;

        let write = async {
            tokio::fs::create_dir_all(&self.root).await?;
            tokio::fs::write(self.root.join(key), bytes).await
        };
        write.await.map_err(|e| {
            error!("Failed to store blob '{}': {}", key, e);
            BiolinkError::backend_unavailable(format!("Cannot store blob '{}': {}", key, e))
        })?;

        info!("Blob stored: {} ({} bytes)", key, bytes.len());
        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().join("avatars"), "https://cdn.example.com/");

        let url = store.upload("alice-1700000000000.png", b"png").await.unwrap();

        assert_eq!(url, "https://cdn.example.com/alice-1700000000000.png");
        let written = std::fs::read(dir.path().join("avatars/alice-1700000000000.png")).unwrap();
        assert_eq!(written, b"png");
    }

    #[tokio::test]
    async fn test_read_returns_stored_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "/uploads");
        store.upload("bob-1.jpg", b"jpeg").await.unwrap();

        assert_eq!(store.read("bob-1.jpg").await.unwrap(), b"jpeg");
        assert!(store.read("missing.png").await.unwrap_err().is_not_found());
        assert!(matches!(
            store.read("../bob-1.jpg").await,
            Err(BiolinkError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "/uploads");

        for key in ["../escape.png", "a/b.png", "", ".hidden"] {
            assert!(matches!(
                store.upload(key, b"x").await,
                Err(BiolinkError::Validation(_))
            ));
        }
    }
}
