//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use directory_core::{AppError, AppResult};

use super::status::SessionStatus;

/// A local record of an identity-provider session, fed by webhooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Internal identifier.
    pub id: Uuid,
    /// Identity provider session id (`sess_...`). Unique.
    pub external_session_id: String,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// Current state.
    pub status: SessionStatus,
    /// Raw provider payload fields worth keeping (client, device).
    pub metadata: Option<serde_json::Value>,
    /// Last observed activity.
    pub last_activity_at: Option<DateTime<Utc>>,
    /// When the session ended or was revoked.
    pub ended_at: Option<DateTime<Utc>>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Return the ended form of this session.
    pub fn end(self, now: DateTime<Utc>) -> AppResult<Self> {
        if self.status != SessionStatus::Active {
            return Err(AppError::validation("Session is not active"));
        }
        Ok(Self {
            status: SessionStatus::Ended,
            ended_at: Some(now),
            updated_at: now,
            ..self
        })
    }

    /// Return the revoked form of this session.
    pub fn revoke(self, now: DateTime<Utc>) -> AppResult<Self> {
        if self.status == SessionStatus::Revoked {
            return Err(AppError::validation("Session is already revoked"));
        }
        Ok(Self {
            status: SessionStatus::Revoked,
            ended_at: self.ended_at.or(Some(now)),
            updated_at: now,
            ..self
        })
    }
}

/// Data required to record a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
    /// Identity provider session id.
    pub external_session_id: String,
    /// Owning user.
    pub user_id: Uuid,
    /// Provider payload fields worth keeping.
    pub metadata: Option<serde_json::Value>,
}
