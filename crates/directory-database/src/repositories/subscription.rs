//! Subscription repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use directory_core::result::AppResult;
use directory_entity::subscription::{NewSubscription, Subscription};

use super::map_db_error;
use crate::store::SubscriptionStore;

/// Repository for business subscriptions.
#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionStore for SubscriptionRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to find subscription"))
    }

    async fn find_active(
        &self,
        business_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Subscription>> {
        sqlx::query_as::<_, Subscription>(
            r#"SELECT * FROM subscriptions
               WHERE business_id = $1 AND status = 'active' AND end_date > $2
               ORDER BY end_date DESC
               LIMIT 1"#,
        )
        .bind(business_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to find active subscription"))
    }

    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<Subscription>> {
        sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions WHERE business_id = $1 ORDER BY created_at DESC",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to list subscriptions"))
    }

    async fn insert(&self, new: &NewSubscription) -> AppResult<Subscription> {
        sqlx::query_as::<_, Subscription>(
            r#"INSERT INTO subscriptions (business_id, plan, status, start_date, end_date, price)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(new.business_id)
        .bind(new.plan)
        .bind(new.status)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to create subscription"))
    }

    async fn save(&self, subscription: &Subscription) -> AppResult<Subscription> {
        sqlx::query_as::<_, Subscription>(
            r#"UPDATE subscriptions SET
                plan = $2, status = $3, start_date = $4, end_date = $5, price = $6,
                cancelled_at = $7, updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(subscription.id)
        .bind(subscription.plan)
        .bind(subscription.status)
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .bind(subscription.price)
        .bind(subscription.cancelled_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to update subscription"))
    }

    async fn expire_ended(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            r#"UPDATE subscriptions SET status = 'expired', updated_at = NOW()
               WHERE status = 'active' AND end_date <= $1"#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to expire subscriptions"))?;
        Ok(result.rows_affected())
    }
}
