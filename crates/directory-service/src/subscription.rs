//! Business subscriptions.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_database::{BusinessStore, SubscriptionStore};
use directory_entity::subscription::{
    NewSubscription, Subscription, SubscriptionStatus, UpdateSubscription,
};

/// Subscription management service.
#[derive(Debug, Clone)]
pub struct SubscriptionService {
    subscriptions: Arc<dyn SubscriptionStore>,
    businesses: Arc<dyn BusinessStore>,
}

impl SubscriptionService {
    /// Create a new subscription service.
    pub fn new(
        subscriptions: Arc<dyn SubscriptionStore>,
        businesses: Arc<dyn BusinessStore>,
    ) -> Self {
        Self {
            subscriptions,
            businesses,
        }
    }

    /// Create a subscription. A business has at most one active at a time.
    pub async fn create(&self, new: &NewSubscription) -> AppResult<Subscription> {
        new.validate()?;
        if self.businesses.find_by_id(new.business_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Business with ID {} not found",
                new.business_id
            )));
        }
        if new.status == SubscriptionStatus::Active
            && self
                .subscriptions
                .find_active(new.business_id, Utc::now())
                .await?
                .is_some()
        {
            return Err(AppError::conflict(
                "Business already has an active subscription",
            ));
        }

        let created = self.subscriptions.insert(new).await?;
        info!(
            subscription_id = %created.id,
            business_id = %created.business_id,
            plan = ?created.plan,
            "Subscription created"
        );
        Ok(created)
    }

    /// Get a subscription by id.
    pub async fn get(&self, id: Uuid) -> AppResult<Subscription> {
        self.subscriptions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Subscription with ID {id} not found")))
    }

    /// The subscription active for a business right now.
    pub async fn active_for(&self, business_id: Uuid) -> AppResult<Subscription> {
        self.subscriptions
            .find_active(business_id, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found("No active subscription found"))
    }

    /// Every subscription of a business, newest first.
    pub async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<Subscription>> {
        self.subscriptions.list_by_business(business_id).await
    }

    /// Apply an explicit field update.
    pub async fn update(&self, id: Uuid, update: &UpdateSubscription) -> AppResult<Subscription> {
        let current = self.get(id).await?;
        let saved = self
            .subscriptions
            .save(&current.with_update(update, Utc::now())?)
            .await?;
        info!(subscription_id = %saved.id, "Subscription updated");
        Ok(saved)
    }

    /// Cancel an active subscription.
    pub async fn cancel(&self, id: Uuid) -> AppResult<Subscription> {
        let current = self.get(id).await?;
        let saved = self.subscriptions.save(&current.cancel(Utc::now())?).await?;
        info!(subscription_id = %saved.id, "Subscription cancelled");
        Ok(saved)
    }
}
