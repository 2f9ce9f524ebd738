//! Deal status enumeration.

use serde::{Deserialize, Serialize};

/// Publication state of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "deal_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    /// Being prepared; not visible.
    Draft,
    /// Visible and redeemable within its date window.
    Active,
    /// Temporarily hidden.
    Paused,
    /// Past its end date.
    Expired,
}
