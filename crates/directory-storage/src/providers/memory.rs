//! In-memory storage provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_core::traits::storage::StorageProvider;

use super::join_url;

/// A stored object.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Object bytes.
    pub data: Bytes,
    /// MIME type given at write time.
    pub content_type: String,
}

/// Storage provider that keeps objects in a map. Used by tests.
#[derive(Debug, Clone)]
pub struct MemoryStorageProvider {
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
    public_base_url: String,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorageProvider {
    /// Create an empty provider serving objects under `public_base_url`.
    pub fn new(public_base_url: &str) -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            public_base_url: public_base_url.to_string(),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Fetch a stored object.
    pub async fn get(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(path).cloned()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Make subsequent writes fail with a storage error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn write(&self, path: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::storage(format!("Failed to write object: {path}")));
        }
        self.objects.write().await.insert(
            path.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.objects.write().await.remove(path);
        Ok(())
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.objects.read().await.contains_key(path))
    }

    fn public_url(&self, path: &str) -> String {
        join_url(&self.public_base_url, path)
    }
}
