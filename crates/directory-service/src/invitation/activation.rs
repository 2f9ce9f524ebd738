//! Invitation acceptance: binds a user to an invitation and activates the
//! business it provisioned, all inside one unit of work.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_database::{InvitationStore, TransactionalStore};
use directory_entity::invitation::{Invitation, InvitationStatus};
use directory_entity::user::{NewUser, UserRole, UserStatus};

use super::ticket::TicketVerifier;

/// How a repeated acceptance is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Replay {
    /// Any non-pending invitation is rejected.
    Reject,
    /// Re-accepting by the user who already accepted is a no-op.
    AllowSameUser,
}

/// Runs the activation workflow.
#[derive(Debug, Clone)]
pub struct ActivationService {
    units: Arc<dyn TransactionalStore>,
    verifier: TicketVerifier,
}

impl ActivationService {
    /// Create an activation service.
    pub fn new(units: Arc<dyn TransactionalStore>, invitations: Arc<dyn InvitationStore>) -> Self {
        Self {
            units,
            verifier: TicketVerifier::new(invitations),
        }
    }

    /// Accept the invitation named by `ticket` on behalf of a provider user.
    ///
    /// The invitation row is locked for the whole unit, so of several
    /// concurrent calls exactly one sees it PENDING; the others fail with
    /// "Invitation is not pending" and write nothing.
    pub async fn accept(&self, external_user_id: &str, ticket: &str) -> AppResult<Invitation> {
        let external_user_id = external_user_id.trim();
        if external_user_id.is_empty() {
            return Err(AppError::validation("User id is required"));
        }
        let projection = self.verifier.verify(ticket).await?;
        self.activate(
            external_user_id,
            &projection.external_invitation_id,
            Replay::Reject,
        )
        .await
    }

    /// Accept by provider invitation id, as reported by the provider itself.
    pub async fn accept_external(
        &self,
        external_user_id: &str,
        external_invitation_id: &str,
    ) -> AppResult<Invitation> {
        self.activate(
            external_user_id,
            external_invitation_id,
            Replay::AllowSameUser,
        )
        .await
    }

    async fn activate(
        &self,
        external_user_id: &str,
        external_invitation_id: &str,
        replay: Replay,
    ) -> AppResult<Invitation> {
        let mut unit = self.units.begin().await?;

        let invitation = unit
            .lock_invitation(external_invitation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation not found"))?;

        let business = match invitation.business_id {
            Some(business_id) => {
                let business = unit.lock_business(business_id).await?;
                if business.is_none() {
                    warn!(
                        invitation_id = %invitation.id,
                        %business_id,
                        "Invitation references a missing business"
                    );
                }
                business
            }
            None => None,
        };

        let existing = unit.user_by_external_id(external_user_id).await?;
        if replay == Replay::AllowSameUser
            && invitation.status == InvitationStatus::Accepted
            && existing
                .as_ref()
                .is_some_and(|u| invitation.accepted_by_user_id == Some(u.id))
        {
            return Ok(invitation);
        }

        let user = match existing {
            Some(user) => user,
            None => {
                let first_name = business
                    .as_ref()
                    .and_then(|b| b.contact_first_name.clone())
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| invitation.business_name.clone());
                unit.insert_user(&NewUser {
                    external_id: external_user_id.to_string(),
                    email: invitation.email.clone(),
                    first_name: Some(first_name),
                    last_name: business
                        .as_ref()
                        .and_then(|b| b.contact_last_name.clone())
                        .filter(|name| !name.trim().is_empty()),
                    role: UserRole::BusinessOwner,
                    status: UserStatus::Active,
                    profile_image_url: None,
                })
                .await?
            }
        };

        let now = Utc::now();
        let accepted = unit
            .save_invitation(&invitation.accept(user.id, now)?)
            .await?;

        let business_id = match business {
            Some(business) => {
                let activated = business.activate(user.id, &accepted.business_name, now);
                Some(unit.save_business(&activated).await?.id)
            }
            None => None,
        };

        unit.commit().await?;

        info!(
            invitation_id = %accepted.id,
            user_id = %user.id,
            business_id = ?business_id,
            "Invitation accepted"
        );
        Ok(accepted)
    }
}
