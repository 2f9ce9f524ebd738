//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;
use super::status::UserStatus;

/// A local mirror of an identity-provider user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Internal identifier.
    pub id: Uuid,
    /// Identity provider user id (`user_...`). Unique.
    pub external_id: String,
    /// Primary email address.
    pub email: String,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Assigned role.
    pub role: UserRole,
    /// Account status.
    pub status: UserStatus,
    /// Avatar URL.
    pub profile_image_url: Option<String>,
    /// Receive in-app notifications.
    pub notifications_enabled: bool,
    /// Receive email notifications.
    pub email_notifications: bool,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the user has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Return this user with the profile fields replaced.
    pub fn with_update(self, update: &UpdateUser, now: DateTime<Utc>) -> Self {
        Self {
            email: update.email.clone().unwrap_or(self.email),
            first_name: update.first_name.clone().or(self.first_name),
            last_name: update.last_name.clone().or(self.last_name),
            role: update.role.unwrap_or(self.role),
            status: update.status.unwrap_or(self.status),
            profile_image_url: update.profile_image_url.clone().or(self.profile_image_url),
            notifications_enabled: update
                .notifications_enabled
                .unwrap_or(self.notifications_enabled),
            email_notifications: update
                .email_notifications
                .unwrap_or(self.email_notifications),
            updated_at: now,
            ..self
        }
    }
}

/// Data required to create a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Identity provider user id.
    pub external_id: String,
    /// Primary email address.
    pub email: String,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Assigned role.
    pub role: UserRole,
    /// Initial status.
    pub status: UserStatus,
    /// Avatar URL.
    pub profile_image_url: Option<String>,
}

/// Explicit field list for profile updates. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New email address.
    pub email: Option<String>,
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
    /// New status.
    pub status: Option<UserStatus>,
    /// New avatar URL.
    pub profile_image_url: Option<String>,
    /// In-app notification preference.
    pub notifications_enabled: Option<bool>,
    /// Email notification preference.
    pub email_notifications: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            external_id: "user_1".into(),
            email: "old@example.com".into(),
            first_name: Some("Ana".into()),
            last_name: None,
            role: UserRole::User,
            status: UserStatus::Active,
            profile_image_url: None,
            notifications_enabled: true,
            email_notifications: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_with_update_only_touches_given_fields() {
        let original = user();
        let update = UpdateUser {
            last_name: Some("Garza".into()),
            email_notifications: Some(false),
            ..UpdateUser::default()
        };
        let updated = original.clone().with_update(&update, Utc::now());
        assert_eq!(updated.email, original.email);
        assert_eq!(updated.first_name.as_deref(), Some("Ana"));
        assert_eq!(updated.last_name.as_deref(), Some("Garza"));
        assert!(!updated.email_notifications);
        assert!(updated.notifications_enabled);
    }
}
