//! Business repository implementation.

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use directory_core::result::AppResult;
use directory_core::types::{PageRequest, PageResponse};
use directory_entity::business::{Business, BusinessFilter, NewBusiness};
use directory_entity::location::Location;

use super::map_db_error;
use crate::store::BusinessStore;

const LIST_PREDICATE: &str = r#"deleted_at IS NULL
    AND ($1::location_id IS NULL OR location_id = $1)
    AND ($2::business_status IS NULL OR status = $2)
    AND ($3::text IS NULL OR category = $3)
    AND ($4::text IS NULL OR name ILIKE '%' || $4 || '%')
    AND ($5::uuid IS NULL OR user_id = $5)"#;

/// Repository for business persistence.
#[derive(Debug, Clone)]
pub struct BusinessRepository {
    pool: PgPool,
}

impl BusinessRepository {
    /// Create a new business repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn fetch_for_update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
    ) -> AppResult<Option<Business>> {
        sqlx::query_as::<_, Business>(
            "SELECT * FROM businesses WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_db_error(e, "Failed to lock business"))
    }

    pub(crate) async fn slug_exists<'e, E: PgExecutor<'e>>(
        executor: E,
        slug: &str,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM businesses WHERE slug = $1)")
            .bind(slug)
            .fetch_one(executor)
            .await
            .map_err(|e| map_db_error(e, "Failed to check business slug"))
    }

    pub(crate) async fn name_exists<'e, E: PgExecutor<'e>>(
        executor: E,
        name: &str,
        location: Location,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM businesses WHERE name = $1 AND location_id = $2)",
        )
        .bind(name)
        .bind(location)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, "Failed to check business name"))
    }

    pub(crate) async fn insert_with<'e, E: PgExecutor<'e>>(
        executor: E,
        new: &NewBusiness,
    ) -> AppResult<Business> {
        sqlx::query_as::<_, Business>(
            r#"INSERT INTO businesses
                (name, slug, description, category, contact_first_name, contact_last_name,
                 email, phone, status, location_id, user_id, qr_code_url, qr_code_generated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
               RETURNING *"#,
        )
        .bind(&new.name)
        .bind(&new.slug)
        .bind(&new.description)
        .bind(&new.category)
        .bind(&new.contact_first_name)
        .bind(&new.contact_last_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(new.status)
        .bind(new.location_id)
        .bind(new.user_id)
        .bind(&new.qr_code_url)
        .bind(new.qr_code_generated_at)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, "Failed to create business"))
    }

    pub(crate) async fn save_with<'e, E: PgExecutor<'e>>(
        executor: E,
        business: &Business,
    ) -> AppResult<Business> {
        sqlx::query_as::<_, Business>(
            r#"UPDATE businesses SET
                name = $2, description = $3, category = $4, contact_first_name = $5,
                contact_last_name = $6, email = $7, phone = $8, website = $9, status = $10,
                location_id = $11, user_id = $12, rating = $13, review_count = $14,
                featured = $15, qr_code_url = $16, qr_code_generated_at = $17,
                updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(business.id)
        .bind(&business.name)
        .bind(&business.description)
        .bind(&business.category)
        .bind(&business.contact_first_name)
        .bind(&business.contact_last_name)
        .bind(&business.email)
        .bind(&business.phone)
        .bind(&business.website)
        .bind(business.status)
        .bind(business.location_id)
        .bind(business.user_id)
        .bind(business.rating)
        .bind(business.review_count)
        .bind(business.featured)
        .bind(&business.qr_code_url)
        .bind(business.qr_code_generated_at)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, "Failed to update business"))
    }
}

#[async_trait]
impl BusinessStore for BusinessRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Business>> {
        sqlx::query_as::<_, Business>(
            "SELECT * FROM businesses WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to find business by id"))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Business>> {
        sqlx::query_as::<_, Business>(
            "SELECT * FROM businesses WHERE slug = $1 AND deleted_at IS NULL",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to find business by slug"))
    }

    async fn list(
        &self,
        filter: &BusinessFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Business>> {
        let count_sql = format!("SELECT COUNT(*) FROM businesses WHERE {LIST_PREDICATE}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.location_id)
            .bind(filter.status)
            .bind(&filter.category)
            .bind(&filter.search)
            .bind(filter.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to count businesses"))?;

        let list_sql = format!(
            "SELECT * FROM businesses WHERE {LIST_PREDICATE} \
             ORDER BY featured DESC, created_at DESC LIMIT $6 OFFSET $7"
        );
        let businesses = sqlx::query_as::<_, Business>(&list_sql)
            .bind(filter.location_id)
            .bind(filter.status)
            .bind(&filter.category)
            .bind(&filter.search)
            .bind(filter.user_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to list businesses"))?;

        Ok(PageResponse::new(businesses, page, total.max(0) as u64))
    }

    async fn save(&self, business: &Business) -> AppResult<Business> {
        Self::save_with(&self.pool, business).await
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE businesses SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to delete business"))?;
        Ok(result.rows_affected() > 0)
    }
}
