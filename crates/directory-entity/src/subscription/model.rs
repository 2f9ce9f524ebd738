//! Subscription entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use directory_core::{AppError, AppResult};

use super::status::{SubscriptionPlan, SubscriptionStatus};

const SECONDS_PER_DAY: i64 = 86_400;

/// A business's plan for a period of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    /// Internal identifier.
    pub id: Uuid,
    /// Subscribed business.
    pub business_id: Uuid,
    /// Billing tier.
    pub plan: SubscriptionPlan,
    /// Lifecycle state.
    pub status: SubscriptionStatus,
    /// Start of the paid period.
    pub start_date: DateTime<Utc>,
    /// End of the paid period.
    pub end_date: DateTime<Utc>,
    /// Price for the period.
    pub price: f64,
    /// When the subscription was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Active means status ACTIVE and an end date still in the future.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active && self.end_date > now
    }

    /// Whole days left, rounded up; zero when not active.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        if !self.is_active(now) {
            return 0;
        }
        let seconds = (self.end_date - now).num_seconds();
        (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
    }

    /// Return the cancelled form of this subscription.
    pub fn cancel(self, now: DateTime<Utc>) -> AppResult<Self> {
        if self.status != SubscriptionStatus::Active {
            return Err(AppError::validation(
                "Only active subscriptions can be cancelled",
            ));
        }
        Ok(Self {
            status: SubscriptionStatus::Cancelled,
            cancelled_at: Some(now),
            updated_at: now,
            ..self
        })
    }
}

/// Data required to create a subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubscription {
    /// Subscribed business.
    pub business_id: Uuid,
    /// Billing tier.
    pub plan: SubscriptionPlan,
    /// Initial state.
    pub status: SubscriptionStatus,
    /// Start of the paid period.
    pub start_date: DateTime<Utc>,
    /// End of the paid period.
    pub end_date: DateTime<Utc>,
    /// Price for the period.
    pub price: f64,
}

impl NewSubscription {
    /// Check cross-field rules.
    pub fn validate(&self) -> AppResult<()> {
        if self.end_date <= self.start_date {
            return Err(AppError::validation("End date must be after start date"));
        }
        if self.price < 0.0 {
            return Err(AppError::validation("Price cannot be negative"));
        }
        Ok(())
    }
}

/// Explicit field list for subscription updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSubscription {
    /// New plan.
    pub plan: Option<SubscriptionPlan>,
    /// New status.
    pub status: Option<SubscriptionStatus>,
    /// New end date.
    pub end_date: Option<DateTime<Utc>>,
    /// New price.
    pub price: Option<f64>,
}

impl Subscription {
    /// Return this subscription with the given fields replaced.
    pub fn with_update(self, update: &UpdateSubscription, now: DateTime<Utc>) -> AppResult<Self> {
        if self.status == SubscriptionStatus::Cancelled {
            return Err(AppError::validation("Cannot update cancelled subscription"));
        }
        let next = Self {
            plan: update.plan.unwrap_or(self.plan),
            status: update.status.unwrap_or(self.status),
            end_date: update.end_date.unwrap_or(self.end_date),
            price: update.price.unwrap_or(self.price),
            updated_at: now,
            ..self
        };
        if next.end_date <= next.start_date {
            return Err(AppError::validation("End date must be after start date"));
        }
        if next.price < 0.0 {
            return Err(AppError::validation("Price cannot be negative"));
        }
        Ok(next)
    }
}
