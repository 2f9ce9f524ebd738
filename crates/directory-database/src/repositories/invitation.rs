//! Invitation repository implementation.

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use directory_core::result::AppResult;
use directory_entity::invitation::{Invitation, InvitationFilter, NewInvitation};

use super::map_db_error;
use crate::store::InvitationStore;

/// Repository for invitation persistence.
#[derive(Debug, Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Create a new invitation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn fetch_by_external_id<'e, E: PgExecutor<'e>>(
        executor: E,
        external_id: &str,
        lock: bool,
    ) -> AppResult<Option<Invitation>> {
        let sql = if lock {
            "SELECT * FROM invitations WHERE external_invitation_id = $1 AND deleted_at IS NULL FOR UPDATE"
        } else {
            "SELECT * FROM invitations WHERE external_invitation_id = $1 AND deleted_at IS NULL"
        };
        sqlx::query_as::<_, Invitation>(sql)
            .bind(external_id)
            .fetch_optional(executor)
            .await
            .map_err(|e| map_db_error(e, "Failed to find invitation by external id"))
    }

    pub(crate) async fn fetch_pending_by_email<'e, E: PgExecutor<'e>>(
        executor: E,
        email: &str,
    ) -> AppResult<Option<Invitation>> {
        sqlx::query_as::<_, Invitation>(
            r#"SELECT * FROM invitations
               WHERE LOWER(email) = LOWER($1) AND status = 'pending' AND deleted_at IS NULL
               LIMIT 1"#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_db_error(e, "Failed to find pending invitation by email"))
    }

    pub(crate) async fn insert_with<'e, E: PgExecutor<'e>>(
        executor: E,
        new: &NewInvitation,
    ) -> AppResult<Invitation> {
        sqlx::query_as::<_, Invitation>(
            r#"INSERT INTO invitations
                (external_invitation_id, email, business_name, phone, first_name, last_name, business_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING *"#,
        )
        .bind(&new.external_invitation_id)
        .bind(&new.email)
        .bind(&new.business_name)
        .bind(&new.phone)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(new.business_id)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, "Failed to create invitation"))
    }

    pub(crate) async fn save_with<'e, E: PgExecutor<'e>>(
        executor: E,
        invitation: &Invitation,
    ) -> AppResult<Invitation> {
        sqlx::query_as::<_, Invitation>(
            r#"UPDATE invitations SET
                external_invitation_id = $2, status = $3, accepted_at = $4,
                accepted_by_user_id = $5, business_id = $6, updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(invitation.id)
        .bind(&invitation.external_invitation_id)
        .bind(invitation.status)
        .bind(invitation.accepted_at)
        .bind(invitation.accepted_by_user_id)
        .bind(invitation.business_id)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, "Failed to update invitation"))
    }
}

#[async_trait]
impl InvitationStore for InvitationRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Invitation>> {
        sqlx::query_as::<_, Invitation>(
            "SELECT * FROM invitations WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to find invitation by id"))
    }

    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<Invitation>> {
        Self::fetch_by_external_id(&self.pool, external_id, false).await
    }

    async fn find_pending_by_email(&self, email: &str) -> AppResult<Option<Invitation>> {
        Self::fetch_pending_by_email(&self.pool, email).await
    }

    async fn list(&self, filter: &InvitationFilter) -> AppResult<Vec<Invitation>> {
        sqlx::query_as::<_, Invitation>(
            r#"SELECT * FROM invitations
               WHERE deleted_at IS NULL
                 AND ($1::invitation_status IS NULL OR status = $1)
                 AND ($2::text IS NULL OR email ILIKE '%' || $2 || '%')
               ORDER BY created_at DESC"#,
        )
        .bind(filter.status)
        .bind(&filter.email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to list invitations"))
    }

    async fn insert(&self, new: &NewInvitation) -> AppResult<Invitation> {
        Self::insert_with(&self.pool, new).await
    }

    async fn save(&self, invitation: &Invitation) -> AppResult<Invitation> {
        Self::save_with(&self.pool, invitation).await
    }
}
