//! Subscription plan and status enumerations.

use serde::{Deserialize, Serialize};

/// Billing tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_plan", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    /// Basic listing.
    Free,
    /// Listing plus deals.
    Basic,
    /// Featured placement.
    Premium,
}

/// Subscription lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Created but not yet paid.
    Pending,
    /// In force.
    Active,
    /// Ran past its end date.
    Expired,
    /// Cancelled before its end date.
    Cancelled,
}
