//! Social media link repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use directory_core::result::AppResult;
use directory_entity::social::{NewSocialLink, SocialLink, SocialPlatform};

use super::map_db_error;
use crate::store::SocialLinkStore;

/// Repository for business social media links.
#[derive(Debug, Clone)]
pub struct SocialLinkRepository {
    pool: PgPool,
}

impl SocialLinkRepository {
    /// Create a new social link repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SocialLinkStore for SocialLinkRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SocialLink>> {
        sqlx::query_as::<_, SocialLink>(
            "SELECT * FROM social_links WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to find social link by id"))
    }

    async fn list(&self) -> AppResult<Vec<SocialLink>> {
        sqlx::query_as::<_, SocialLink>(
            "SELECT * FROM social_links WHERE deleted_at IS NULL ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to list social links"))
    }

    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<SocialLink>> {
        sqlx::query_as::<_, SocialLink>(
            r#"SELECT * FROM social_links
               WHERE business_id = $1 AND deleted_at IS NULL
               ORDER BY platform::text ASC"#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to list social links"))
    }

    async fn platform_taken(
        &self,
        business_id: Uuid,
        platform: SocialPlatform,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM social_links WHERE business_id = $1 AND platform = $2)",
        )
        .bind(business_id)
        .bind(platform)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to check social link platform"))
    }

    async fn insert(&self, new: &NewSocialLink) -> AppResult<SocialLink> {
        sqlx::query_as::<_, SocialLink>(
            r#"INSERT INTO social_links (business_id, platform, url, username, is_active)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(new.business_id)
        .bind(new.platform)
        .bind(&new.url)
        .bind(&new.username)
        .bind(new.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to create social link"))
    }

    async fn save(&self, link: &SocialLink) -> AppResult<SocialLink> {
        sqlx::query_as::<_, SocialLink>(
            r#"UPDATE social_links SET
                url = $2, username = $3, is_active = $4, followers = $5,
                last_synced = $6, updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(link.id)
        .bind(&link.url)
        .bind(&link.username)
        .bind(link.is_active)
        .bind(link.followers)
        .bind(link.last_synced)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to update social link"))
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE social_links SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to delete social link"))?;
        Ok(result.rows_affected() > 0)
    }
}
