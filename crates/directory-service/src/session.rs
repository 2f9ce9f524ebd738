//! Provider sessions mirrored locally for auditing.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_database::{SessionStore, UserStore};
use directory_entity::session::{NewSession, Session, SessionStatus};

/// Session lifecycle service.
#[derive(Debug, Clone)]
pub struct SessionService {
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
}

impl SessionService {
    /// Create a new session service.
    pub fn new(sessions: Arc<dyn SessionStore>, users: Arc<dyn UserStore>) -> Self {
        Self { sessions, users }
    }

    /// Record a new ACTIVE session for a provider user.
    ///
    /// A session id that is already recorded is returned unchanged.
    pub async fn record(
        &self,
        external_session_id: &str,
        external_user_id: &str,
        metadata: Option<Value>,
    ) -> AppResult<Session> {
        if let Some(existing) = self.sessions.find_by_external_id(external_session_id).await? {
            return Ok(existing);
        }
        let user = self
            .users
            .find_by_external_id(external_user_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "User with provider ID {external_user_id} not found"
                ))
            })?;

        let session = self
            .sessions
            .insert(&NewSession {
                external_session_id: external_session_id.to_string(),
                user_id: user.id,
                metadata,
            })
            .await?;
        info!(session_id = %session.id, user_id = %user.id, "Session recorded");
        Ok(session)
    }

    /// Get a session by provider id.
    pub async fn get_by_external_id(&self, external_session_id: &str) -> AppResult<Session> {
        self.sessions
            .find_by_external_id(external_session_id)
            .await?
            .ok_or_else(|| AppError::not_found("Session not found"))
    }

    /// End an ACTIVE session.
    pub async fn end(&self, external_session_id: &str) -> AppResult<Session> {
        let session = self.get_by_external_id(external_session_id).await?;
        let saved = self.sessions.save(&session.end(Utc::now())?).await?;
        info!(session_id = %saved.id, "Session ended");
        Ok(saved)
    }

    /// Revoke a session that is not already revoked.
    pub async fn revoke(&self, external_session_id: &str) -> AppResult<Session> {
        let session = self.get_by_external_id(external_session_id).await?;
        let saved = self.sessions.save(&session.revoke(Utc::now())?).await?;
        info!(session_id = %saved.id, "Session revoked");
        Ok(saved)
    }

    /// A user's sessions, newest first.
    pub async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found(format!("User with ID {user_id} not found")));
        }
        self.sessions.list_by_user(user_id).await
    }

    /// Revoke every ACTIVE session of a user. Returns how many changed.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> AppResult<usize> {
        let now = Utc::now();
        let mut revoked = 0;
        for session in self.list_by_user(user_id).await? {
            if session.status == SessionStatus::Active {
                self.sessions.save(&session.revoke(now)?).await?;
                revoked += 1;
            }
        }
        info!(%user_id, revoked, "Revoked user sessions");
        Ok(revoked)
    }
}
