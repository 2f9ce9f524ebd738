//! Business listing status.

use serde::{Deserialize, Serialize};

/// Publication state of a business listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "business_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BusinessStatus {
    /// Provisioned by an invitation; no owner yet.
    Pending,
    /// Claimed and publicly listed.
    Active,
    /// Hidden by its owner.
    Inactive,
    /// Hidden by an administrator.
    Suspended,
}
