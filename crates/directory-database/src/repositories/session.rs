//! Session repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use directory_core::result::AppResult;
use directory_entity::session::{NewSession, Session};

use super::map_db_error;
use crate::store::SessionStore;

/// Repository for mirrored identity-provider sessions.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE external_session_id = $1")
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to find session by external id"))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to list sessions"))
    }

    async fn insert(&self, new: &NewSession) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            r#"INSERT INTO sessions (external_session_id, user_id, metadata, last_activity_at)
               VALUES ($1, $2, $3, NOW())
               RETURNING *"#,
        )
        .bind(&new.external_session_id)
        .bind(new.user_id)
        .bind(&new.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to create session"))
    }

    async fn save(&self, session: &Session) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            r#"UPDATE sessions SET
                status = $2, metadata = $3, last_activity_at = $4, ended_at = $5,
                updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(session.id)
        .bind(session.status)
        .bind(&session.metadata)
        .bind(session.last_activity_at)
        .bind(session.ended_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to update session"))
    }
}
