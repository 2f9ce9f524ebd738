//! Local filesystem storage provider.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use directory_core::error::{AppError, ErrorKind};
use directory_core::result::AppResult;
use directory_core::traits::storage::StorageProvider;

use super::join_url;

/// Local filesystem storage provider.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Root directory for all stored objects.
    root: PathBuf,
    /// URL prefix under which `root` is served.
    public_base_url: String,
}

impl LocalStorageProvider {
    /// Create a new local storage provider rooted at the given path.
    pub async fn new(root_path: &str, public_base_url: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            public_base_url: public_base_url.to_string(),
        })
    }

    /// Resolve a relative object path inside the root.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let clean = Path::new(path.trim_start_matches('/'));
        if clean
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::validation(format!("Invalid object path: {path}")));
        }
        Ok(self.root.join(clean))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn write(&self, path: &str, data: Bytes, _content_type: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write file: {path}"),
                e,
            )
        })?;

        debug!(path, bytes = data.len(), "Wrote file");
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(path, "Deleted file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {path}"),
                e,
            )),
        }
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        fs::try_exists(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to stat file: {path}"),
                e,
            )
        })
    }

    fn public_url(&self, path: &str) -> String {
        join_url(&self.public_base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn provider() -> (tempfile::TempDir, LocalStorageProvider) {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(
            dir.path().to_str().unwrap(),
            "http://localhost:3000/static/",
        )
        .await
        .unwrap();
        (dir, provider)
    }

    #[tokio::test]
    async fn test_write_creates_nested_directories() {
        let (dir, provider) = provider().await;
        provider
            .write("qr-codes/shop-x.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();

        assert!(provider.exists("qr-codes/shop-x.png").await.unwrap());
        let on_disk = std::fs::read(dir.path().join("qr-codes/shop-x.png")).unwrap();
        assert_eq!(on_disk, b"png");
    }

    #[tokio::test]
    async fn test_delete_missing_object_is_ok() {
        let (_dir, provider) = provider().await;
        provider.delete("qr-codes/nothing.png").await.unwrap();
        assert!(!provider.exists("qr-codes/nothing.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_parent_traversal_is_rejected() {
        let (_dir, provider) = provider().await;
        let err = provider
            .write("../escape.png", Bytes::new(), "image/png")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_public_url_joins_with_single_slash() {
        let (_dir, provider) = provider().await;
        assert_eq!(
            provider.public_url("/qr-codes/shop-x.png"),
            "http://localhost:3000/static/qr-codes/shop-x.png"
        );
        assert!(provider.health_check().await.unwrap());
    }
}
