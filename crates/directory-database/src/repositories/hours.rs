//! Business hours repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use directory_core::result::AppResult;
use directory_entity::hours::{BusinessHours, NewBusinessHours};

use super::map_db_error;
use crate::store::BusinessHoursStore;

/// Repository for weekly opening hours.
#[derive(Debug, Clone)]
pub struct BusinessHoursRepository {
    pool: PgPool,
}

impl BusinessHoursRepository {
    /// Create a new hours repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusinessHoursStore for BusinessHoursRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BusinessHours>> {
        sqlx::query_as::<_, BusinessHours>("SELECT * FROM business_hours WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to find business hours"))
    }

    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<BusinessHours>> {
        sqlx::query_as::<_, BusinessHours>(
            "SELECT * FROM business_hours WHERE business_id = $1 ORDER BY day_of_week",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to list business hours"))
    }

    async fn insert(&self, new: &NewBusinessHours) -> AppResult<BusinessHours> {
        sqlx::query_as::<_, BusinessHours>(
            r#"INSERT INTO business_hours
                (business_id, day_of_week, open_time, close_time, is_closed, is_holiday, note)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING *"#,
        )
        .bind(new.business_id)
        .bind(new.day_of_week)
        .bind(new.open_time)
        .bind(new.close_time)
        .bind(new.is_closed)
        .bind(new.is_holiday)
        .bind(&new.note)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to create business hours"))
    }

    async fn save(&self, hours: &BusinessHours) -> AppResult<BusinessHours> {
        sqlx::query_as::<_, BusinessHours>(
            r#"UPDATE business_hours SET
                open_time = $2, close_time = $3, is_closed = $4, is_holiday = $5, note = $6,
                updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(hours.id)
        .bind(hours.open_time)
        .bind(hours.close_time)
        .bind(hours.is_closed)
        .bind(hours.is_holiday)
        .bind(&hours.note)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to update business hours"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM business_hours WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to delete business hours"))?;
        Ok(result.rows_affected() > 0)
    }
}
