//! Notification repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use directory_core::result::AppResult;
use directory_entity::notification::{NewNotification, Notification};

use super::map_db_error;
use crate::store::NotificationStore;

/// Repository for user notifications.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to find notification by id"))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            r#"SELECT * FROM notifications
               WHERE user_id = $1 AND deleted_at IS NULL
               ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to list notifications"))
    }

    async fn insert(&self, new: &NewNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            r#"INSERT INTO notifications (user_id, kind, title, message, related_id, metadata)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(new.user_id)
        .bind(new.kind)
        .bind(&new.title)
        .bind(&new.message)
        .bind(new.related_id)
        .bind(&new.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to create notification"))
    }

    async fn save(&self, notification: &Notification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            r#"UPDATE notifications SET
                title = $2, message = $3, is_read = $4, related_id = $5,
                metadata = $6, updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(notification.id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.is_read)
        .bind(notification.related_id)
        .bind(&notification.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to update notification"))
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to delete notification"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            r#"UPDATE notifications SET is_read = TRUE, updated_at = NOW()
               WHERE user_id = $1 AND NOT is_read AND deleted_at IS NULL"#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to mark notifications read"))?;
        Ok(result.rows_affected())
    }

    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM notifications
               WHERE user_id = $1 AND NOT is_read AND deleted_at IS NULL"#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to count unread notifications"))
    }
}
