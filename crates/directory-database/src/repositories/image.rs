//! Business image repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use directory_core::result::AppResult;
use directory_entity::image::{BusinessImage, NewBusinessImage};

use super::map_db_error;
use crate::store::BusinessImageStore;

/// Repository for uploaded business images.
#[derive(Debug, Clone)]
pub struct BusinessImageRepository {
    pool: PgPool,
}

impl BusinessImageRepository {
    /// Create a new business image repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusinessImageStore for BusinessImageRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BusinessImage>> {
        sqlx::query_as::<_, BusinessImage>("SELECT * FROM business_images WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to find business image by id"))
    }

    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<BusinessImage>> {
        sqlx::query_as::<_, BusinessImage>(
            "SELECT * FROM business_images WHERE business_id = $1 ORDER BY created_at DESC",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to list business images"))
    }

    async fn insert(&self, new: &NewBusinessImage) -> AppResult<BusinessImage> {
        sqlx::query_as::<_, BusinessImage>(
            r#"INSERT INTO business_images
                (business_id, file_name, file_url, mime_type, size, storage_key, is_private)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING *"#,
        )
        .bind(new.business_id)
        .bind(&new.file_name)
        .bind(&new.file_url)
        .bind(&new.mime_type)
        .bind(new.size)
        .bind(&new.storage_key)
        .bind(new.is_private)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to record business image"))
    }

    async fn save(&self, image: &BusinessImage) -> AppResult<BusinessImage> {
        sqlx::query_as::<_, BusinessImage>(
            r#"UPDATE business_images SET
                business_id = $2, file_url = $3, updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(image.id)
        .bind(image.business_id)
        .bind(&image.file_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to update business image"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM business_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to delete business image"))?;
        Ok(result.rows_affected() > 0)
    }
}
