//! User repository implementation.

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use directory_core::result::AppResult;
use directory_core::types::{PageRequest, PageResponse};
use directory_entity::user::{NewUser, User};

use super::map_db_error;
use crate::store::UserStore;

/// Repository for user CRUD and query operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn fetch_by_external_id<'e, E: PgExecutor<'e>>(
        executor: E,
        external_id: &str,
    ) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE external_id = $1 AND deleted_at IS NULL",
        )
        .bind(external_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_db_error(e, "Failed to find user by external id"))
    }

    pub(crate) async fn insert_with<'e, E: PgExecutor<'e>>(
        executor: E,
        new: &NewUser,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (external_id, email, first_name, last_name, role, status, profile_image_url)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING *"#,
        )
        .bind(&new.external_id)
        .bind(&new.email)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(new.role)
        .bind(new.status)
        .bind(&new.profile_image_url)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, "Failed to create user"))
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to find user by id"))
    }

    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<User>> {
        Self::fetch_by_external_id(&self.pool, external_id).await
    }

    async fn list(&self, page: PageRequest) -> AppResult<PageResponse<User>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to count users"))?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE deleted_at IS NULL ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to list users"))?;

        Ok(PageResponse::new(users, page, total.max(0) as u64))
    }

    async fn insert(&self, new: &NewUser) -> AppResult<User> {
        Self::insert_with(&self.pool, new).await
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"UPDATE users SET
                email = $2, first_name = $3, last_name = $4, role = $5, status = $6,
                profile_image_url = $7, notifications_enabled = $8, email_notifications = $9,
                updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role)
        .bind(user.status)
        .bind(&user.profile_image_url)
        .bind(user.notifications_enabled)
        .bind(user.email_notifications)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to update user"))
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to delete user"))?;
        Ok(result.rows_affected() > 0)
    }
}
