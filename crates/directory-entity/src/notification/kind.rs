//! Notification kind enumeration.

use serde::{Deserialize, Serialize};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A deal was published or is about to end.
    Deal,
    /// Something changed on a business the user owns.
    Business,
    /// Subscription billing and renewals.
    Subscription,
    /// Platform announcements.
    System,
}
