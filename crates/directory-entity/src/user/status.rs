//! User account status enumeration.

use serde::{Deserialize, Serialize};

/// Account status for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account is usable.
    Active,
    /// Deactivated by an admin.
    Inactive,
    /// Suspended for policy reasons.
    Suspended,
}
