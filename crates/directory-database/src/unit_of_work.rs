//! Postgres-backed unit of work.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use directory_core::error::{AppError, ErrorKind};
use directory_core::result::AppResult;
use directory_entity::business::{Business, NewBusiness};
use directory_entity::invitation::{Invitation, NewInvitation};
use directory_entity::location::Location;
use directory_entity::user::{NewUser, User};

use crate::repositories::{BusinessRepository, InvitationRepository, UserRepository};
use crate::store::{TransactionalStore, UnitOfWork};

/// Opens Postgres transactions as units of work.
#[derive(Debug, Clone)]
pub struct PgTransactionalStore {
    pool: PgPool,
}

impl PgTransactionalStore {
    /// Create a store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionalStore for PgTransactionalStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// One open transaction. Dropped without commit, sqlx rolls it back.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn lock_invitation(&mut self, external_id: &str) -> AppResult<Option<Invitation>> {
        InvitationRepository::fetch_by_external_id(&mut *self.tx, external_id, true).await
    }

    async fn pending_invitation_for_email(
        &mut self,
        email: &str,
    ) -> AppResult<Option<Invitation>> {
        InvitationRepository::fetch_pending_by_email(&mut *self.tx, email).await
    }

    async fn insert_invitation(&mut self, new: &NewInvitation) -> AppResult<Invitation> {
        InvitationRepository::insert_with(&mut *self.tx, new).await
    }

    async fn save_invitation(&mut self, invitation: &Invitation) -> AppResult<Invitation> {
        InvitationRepository::save_with(&mut *self.tx, invitation).await
    }

    async fn user_by_external_id(&mut self, external_id: &str) -> AppResult<Option<User>> {
        UserRepository::fetch_by_external_id(&mut *self.tx, external_id).await
    }

    async fn insert_user(&mut self, new: &NewUser) -> AppResult<User> {
        UserRepository::insert_with(&mut *self.tx, new).await
    }

    async fn lock_business(&mut self, id: Uuid) -> AppResult<Option<Business>> {
        BusinessRepository::fetch_for_update(&mut *self.tx, id).await
    }

    async fn business_slug_exists(&mut self, slug: &str) -> AppResult<bool> {
        BusinessRepository::slug_exists(&mut *self.tx, slug).await
    }

    async fn business_name_exists(&mut self, name: &str, location: Location) -> AppResult<bool> {
        BusinessRepository::name_exists(&mut *self.tx, name, location).await
    }

    async fn insert_business(&mut self, new: &NewBusiness) -> AppResult<Business> {
        BusinessRepository::insert_with(&mut *self.tx, new).await
    }

    async fn save_business(&mut self, business: &Business) -> AppResult<Business> {
        BusinessRepository::save_with(&mut *self.tx, business).await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;
        debug!("Transaction committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use directory_entity::business::BusinessStatus;

    use super::*;
    use crate::repositories::{InvitationRepository, conflict_message};
    use crate::store::InvitationStore;

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPool::connect(&url).await.unwrap();
        crate::migration::run_migrations(&pool).await.unwrap();
        pool
    }

    fn shell(tag: &str) -> NewBusiness {
        NewBusiness {
            name: format!("Shop {tag}"),
            slug: format!("shop-{tag}"),
            description: None,
            category: None,
            contact_first_name: None,
            contact_last_name: None,
            email: None,
            phone: None,
            status: BusinessStatus::Pending,
            location_id: Location::McAllen,
            user_id: None,
            qr_code_url: None,
            qr_code_generated_at: None,
        }
    }

    fn invitation(tag: &str, business_id: Uuid) -> NewInvitation {
        NewInvitation {
            external_invitation_id: format!("inv_{tag}"),
            email: format!("{tag}@example.com"),
            business_name: format!("Shop {tag}"),
            phone: None,
            first_name: None,
            last_name: None,
            business_id: Some(business_id),
        }
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_dropped_unit_rolls_back() {
        let pool = pool().await;
        let store = PgTransactionalStore::new(pool.clone());
        let tag = Uuid::new_v4().simple().to_string();

        let mut unit = store.begin().await.unwrap();
        let business = unit.insert_business(&shell(&tag)).await.unwrap();
        unit.insert_invitation(&invitation(&tag, business.id))
            .await
            .unwrap();
        drop(unit);

        let repo = InvitationRepository::new(pool);
        let found = repo.find_by_external_id(&format!("inv_{tag}")).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_second_pending_invitation_for_email_conflicts() {
        let pool = pool().await;
        let store = PgTransactionalStore::new(pool);
        let tag = Uuid::new_v4().simple().to_string();

        let mut unit = store.begin().await.unwrap();
        let business = unit.insert_business(&shell(&tag)).await.unwrap();
        unit.insert_invitation(&invitation(&tag, business.id))
            .await
            .unwrap();
        unit.commit().await.unwrap();

        let mut unit = store.begin().await.unwrap();
        let duplicate = NewInvitation {
            external_invitation_id: format!("inv_{tag}_2"),
            email: format!("{}@EXAMPLE.com", tag.to_uppercase()),
            ..invitation(&tag, business.id)
        };
        let err = unit.insert_invitation(&duplicate).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(
            Some(err.message.as_str()),
            conflict_message("invitations_pending_email_idx")
        );
    }
}
