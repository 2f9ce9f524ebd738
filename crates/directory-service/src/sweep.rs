//! Periodic expiration of deals and subscriptions.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use directory_core::result::AppResult;
use directory_database::{DealStore, SubscriptionStore};

/// The two expiration sweeps run by the worker.
#[derive(Debug, Clone)]
pub struct ExpirationSweeps {
    deals: Arc<dyn DealStore>,
    subscriptions: Arc<dyn SubscriptionStore>,
}

impl ExpirationSweeps {
    /// Create the sweeps.
    pub fn new(deals: Arc<dyn DealStore>, subscriptions: Arc<dyn SubscriptionStore>) -> Self {
        Self {
            deals,
            subscriptions,
        }
    }

    /// Move ACTIVE deals past their end date to EXPIRED.
    pub async fn expire_deals(&self) -> AppResult<u64> {
        let expired = self.deals.expire_ended(Utc::now()).await?;
        info!(expired, "Deal expiration sweep finished");
        Ok(expired)
    }

    /// Move ACTIVE subscriptions past their end date to EXPIRED.
    pub async fn expire_subscriptions(&self) -> AppResult<u64> {
        let expired = self.subscriptions.expire_ended(Utc::now()).await?;
        info!(expired, "Subscription expiration sweep finished");
        Ok(expired)
    }
}
