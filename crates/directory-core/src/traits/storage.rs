//! Object storage trait for persisting generated assets.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for object storage backends.
///
/// Implemented for the local filesystem and S3 in `directory-storage`.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Provider type name (e.g. "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store an object, replacing any existing object at `path`.
    async fn write(&self, path: &str, data: Bytes, content_type: &str) -> AppResult<()>;

    /// Remove an object. Missing objects are not an error.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Whether an object exists at `path`.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Public URL under which the object at `path` is served.
    fn public_url(&self, path: &str) -> String;
}
