//! Session status enumeration.

use serde::{Deserialize, Serialize};

/// State of an identity-provider session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Signed in.
    Active,
    /// Signed out normally.
    Ended,
    /// Terminated by the provider or an administrator.
    Revoked,
}
