//! Deal repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_entity::deal::{Deal, NewDeal};

use super::map_db_error;
use crate::store::DealStore;

/// Repository for promotional deals.
#[derive(Debug, Clone)]
pub struct DealRepository {
    pool: PgPool,
}

impl DealRepository {
    /// Create a new deal repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DealStore for DealRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Deal>> {
        sqlx::query_as::<_, Deal>("SELECT * FROM deals WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to find deal by id"))
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Deal>> {
        sqlx::query_as::<_, Deal>("SELECT * FROM deals WHERE code = $1 AND deleted_at IS NULL")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to find deal by code"))
    }

    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<Deal>> {
        sqlx::query_as::<_, Deal>(
            "SELECT * FROM deals WHERE business_id = $1 AND deleted_at IS NULL ORDER BY created_at DESC",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to list deals"))
    }

    async fn list_active(&self, now: DateTime<Utc>) -> AppResult<Vec<Deal>> {
        sqlx::query_as::<_, Deal>(
            r#"SELECT * FROM deals
               WHERE status = 'active' AND deleted_at IS NULL
                 AND start_date <= $1 AND end_date >= $1
               ORDER BY end_date ASC"#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to list active deals"))
    }

    async fn insert(&self, new: &NewDeal) -> AppResult<Deal> {
        sqlx::query_as::<_, Deal>(
            r#"INSERT INTO deals
                (business_id, title, description, discount, original_price, discounted_price,
                 code, start_date, end_date, terms, status, max_redemptions)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
               RETURNING *"#,
        )
        .bind(new.business_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.discount)
        .bind(new.original_price)
        .bind(new.discounted_price)
        .bind(&new.code)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(&new.terms)
        .bind(new.status)
        .bind(new.max_redemptions)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to create deal"))
    }

    async fn save(&self, deal: &Deal) -> AppResult<Deal> {
        sqlx::query_as::<_, Deal>(
            r#"UPDATE deals SET
                title = $2, description = $3, discount = $4, original_price = $5,
                discounted_price = $6, start_date = $7, end_date = $8, terms = $9,
                status = $10, max_redemptions = $11, updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(deal.id)
        .bind(&deal.title)
        .bind(&deal.description)
        .bind(&deal.discount)
        .bind(deal.original_price)
        .bind(deal.discounted_price)
        .bind(deal.start_date)
        .bind(deal.end_date)
        .bind(&deal.terms)
        .bind(deal.status)
        .bind(deal.max_redemptions)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to update deal"))
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE deals SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to delete deal"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn redeem(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Deal> {
        let redeemed = sqlx::query_as::<_, Deal>(
            r#"UPDATE deals SET redemption_count = redemption_count + 1, updated_at = NOW()
               WHERE id = $1 AND deleted_at IS NULL AND status = 'active' AND end_date >= $2
                 AND (max_redemptions IS NULL OR redemption_count < max_redemptions)
               RETURNING *"#,
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to redeem deal"))?;

        if let Some(deal) = redeemed {
            return Ok(deal);
        }
        // Nothing updated: report why.
        let deal = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Deal {id} not found")))?;
        deal.check_redeemable(now)?;
        Err(AppError::conflict("Deal could not be redeemed, try again"))
    }

    async fn expire_ended(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            r#"UPDATE deals SET status = 'expired', updated_at = NOW()
               WHERE status = 'active' AND end_date < $1 AND deleted_at IS NULL"#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to expire deals"))?;
        Ok(result.rows_affected())
    }
}
