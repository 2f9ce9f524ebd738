//! Notification model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use directory_core::{AppError, AppResult};

use super::kind::NotificationKind;

/// A message shown in a user's notification inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Internal identifier.
    pub id: Uuid,
    /// Recipient.
    pub user_id: Uuid,
    /// Topic.
    pub kind: NotificationKind,
    /// Headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Whether the recipient has seen it.
    pub is_read: bool,
    /// Entity the notification refers to, e.g. a deal.
    pub related_id: Option<Uuid>,
    /// Free-form details for the client.
    pub metadata: Option<Value>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Return this notification with the given fields replaced.
    pub fn with_update(self, update: &UpdateNotification, now: DateTime<Utc>) -> AppResult<Self> {
        let next = Self {
            title: update.title.clone().unwrap_or(self.title),
            message: update.message.clone().unwrap_or(self.message),
            is_read: update.is_read.unwrap_or(self.is_read),
            related_id: update.related_id.or(self.related_id),
            metadata: update.metadata.clone().or(self.metadata),
            updated_at: now,
            ..self
        };
        check_text(&next.title, &next.message)?;
        Ok(next)
    }

    /// Return this notification marked read.
    pub fn read(self, now: DateTime<Utc>) -> Self {
        Self {
            is_read: true,
            updated_at: now,
            ..self
        }
    }
}

fn check_text(title: &str, message: &str) -> AppResult<()> {
    if title.trim().chars().count() < 3 {
        return Err(AppError::validation("Title must be at least 3 characters"));
    }
    if message.trim().chars().count() < 5 {
        return Err(AppError::validation("Message must be at least 5 characters"));
    }
    Ok(())
}

/// Data required to create a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    /// Recipient.
    pub user_id: Uuid,
    /// Topic.
    pub kind: NotificationKind,
    /// Headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Referenced entity.
    pub related_id: Option<Uuid>,
    /// Free-form details.
    pub metadata: Option<Value>,
}

impl NewNotification {
    /// Check field rules.
    pub fn validate(&self) -> AppResult<()> {
        check_text(&self.title, &self.message)
    }
}

/// Explicit field list for notification updates. Recipient and kind are fixed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNotification {
    /// New headline.
    pub title: Option<String>,
    /// New body.
    pub message: Option<String>,
    /// Read flag.
    pub is_read: Option<bool>,
    /// New referenced entity.
    pub related_id: Option<Uuid>,
    /// Replacement details.
    pub metadata: Option<Value>,
}
