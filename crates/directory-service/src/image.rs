//! Uploaded business images.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_core::traits::storage::StorageProvider;
use directory_database::{BusinessImageStore, BusinessStore};
use directory_entity::image::{
    BusinessImage, ImageKind, NewBusinessImage, check_upload, storage_key,
};

/// An image received from a client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Profile or gallery.
    pub kind: ImageKind,
    /// Business to attach the image to.
    pub business_id: Option<Uuid>,
    /// Name the client gave the file.
    pub file_name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// File contents.
    pub data: Bytes,
}

/// Business image service.
#[derive(Debug, Clone)]
pub struct BusinessImageService {
    images: Arc<dyn BusinessImageStore>,
    businesses: Arc<dyn BusinessStore>,
    storage: Arc<dyn StorageProvider>,
}

impl BusinessImageService {
    /// Create a new image service.
    pub fn new(
        images: Arc<dyn BusinessImageStore>,
        businesses: Arc<dyn BusinessStore>,
        storage: Arc<dyn StorageProvider>,
    ) -> Self {
        Self {
            images,
            businesses,
            storage,
        }
    }

    /// Store the file and record it.
    ///
    /// The object is removed again if the row cannot be written.
    pub async fn upload(&self, upload: ImageUpload) -> AppResult<BusinessImage> {
        check_upload(&upload.mime_type, upload.data.len())?;
        if let Some(business_id) = upload.business_id {
            if self.businesses.find_by_id(business_id).await?.is_none() {
                return Err(AppError::not_found(format!(
                    "Business with ID {business_id} not found"
                )));
            }
        }

        let key = storage_key(upload.kind, &upload.file_name, Utc::now());
        if self.storage.exists(&key).await? {
            return Err(AppError::conflict(format!(
                "An image is already stored at {key}"
            )));
        }
        let size = upload.data.len() as i64;
        self.storage
            .write(&key, upload.data, &upload.mime_type)
            .await?;

        let new = NewBusinessImage {
            business_id: upload.business_id,
            file_name: upload.file_name,
            file_url: self.storage.public_url(&key),
            mime_type: upload.mime_type,
            size,
            storage_key: key.clone(),
            is_private: upload.kind.is_private(),
        };
        let image = match self.images.insert(&new).await {
            Ok(image) => image,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&key).await {
                    warn!(storage_key = %key, error = %cleanup, "Failed to remove orphaned image");
                }
                return Err(e);
            }
        };
        info!(
            image_id = %image.id,
            business_id = ?image.business_id,
            storage_key = %image.storage_key,
            size = image.size,
            "Business image uploaded"
        );
        Ok(image)
    }

    /// Get an image by id.
    pub async fn get(&self, id: Uuid) -> AppResult<BusinessImage> {
        self.images
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Image with ID {id} not found")))
    }

    /// Images of one business, newest first.
    pub async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<BusinessImage>> {
        self.images.list_by_business(business_id).await
    }

    /// Re-issue the serving URL of a private image.
    pub async fn refresh_url(&self, id: Uuid) -> AppResult<BusinessImage> {
        let image = match self.images.find_by_id(id).await? {
            Some(image) if image.is_private => image,
            _ => {
                return Err(AppError::not_found(
                    "Image not found or not a profile image",
                ));
            }
        };
        let refreshed = BusinessImage {
            file_url: self.storage.public_url(&image.storage_key),
            updated_at: Utc::now(),
            ..image
        };
        let saved = self.images.save(&refreshed).await?;
        info!(image_id = %saved.id, "Image URL refreshed");
        Ok(saved)
    }

    /// Remove the stored object and its row.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let image = self.get(id).await?;
        self.storage.delete(&image.storage_key).await?;
        if !self.images.delete(id).await? {
            return Err(AppError::not_found(format!("Image with ID {id} not found")));
        }
        info!(image_id = %id, storage_key = %image.storage_key, "Business image deleted");
        Ok(())
    }
}
