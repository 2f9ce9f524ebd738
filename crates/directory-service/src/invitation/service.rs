//! Invitation lifecycle: issue, list, resend, cancel and status transitions.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_core::traits::identity::{IdentityGateway, InvitationRequest};
use directory_database::{InvitationStore, TransactionalStore, UnitOfWork};
use directory_entity::invitation::{Invitation, InvitationFilter, NewInvitation};
use directory_entity::location::Location;

use super::provisioning::{BusinessProvisioner, Compensation, ShellRequest};
use super::ticket::{TicketProjection, TicketVerifier};

/// Input for issuing an invitation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateInvitation {
    /// Invitee email.
    pub email: String,
    /// Name of the business to provision.
    pub business_name: String,
    /// Invitee phone.
    pub phone: Option<String>,
    /// Invitee first name.
    pub first_name: Option<String>,
    /// Invitee last name.
    pub last_name: Option<String>,
    /// City to list the business in; the configured default when absent.
    pub location_id: Option<Location>,
}

impl CreateInvitation {
    /// Trim every field, lowercase the email and turn blank optionals into `None`.
    pub fn normalized(self) -> AppResult<Self> {
        let email = self.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("A valid email address is required"));
        }
        Ok(Self {
            email,
            business_name: self.business_name.trim().to_string(),
            phone: blank_to_none(self.phone),
            first_name: blank_to_none(self.first_name),
            last_name: blank_to_none(self.last_name),
            location_id: self.location_id,
        })
    }

    fn gateway_request(&self) -> InvitationRequest {
        InvitationRequest {
            email: self.email.clone(),
            business_name: self.business_name.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Invitation records and the provider invitations paired with them.
#[derive(Debug, Clone)]
pub struct InvitationService {
    invitations: Arc<dyn InvitationStore>,
    units: Arc<dyn TransactionalStore>,
    gateway: Arc<dyn IdentityGateway>,
    provisioner: BusinessProvisioner,
    verifier: TicketVerifier,
}

impl InvitationService {
    /// Create a new invitation service.
    pub fn new(
        invitations: Arc<dyn InvitationStore>,
        units: Arc<dyn TransactionalStore>,
        gateway: Arc<dyn IdentityGateway>,
        provisioner: BusinessProvisioner,
    ) -> Self {
        let verifier = TicketVerifier::new(invitations.clone());
        Self {
            invitations,
            units,
            gateway,
            provisioner,
            verifier,
        }
    }

    /// Issue an invitation: provision a PENDING business with its QR code,
    /// create the provider invitation, and record both in one transaction.
    ///
    /// If anything fails the transaction is rolled back, the uploaded QR
    /// code is removed and the provider invitation is revoked.
    pub async fn create(&self, input: CreateInvitation) -> AppResult<Invitation> {
        let input = input.normalized()?;
        if input.business_name.is_empty() {
            return Err(AppError::validation("Business name is required"));
        }
        if self
            .invitations
            .find_pending_by_email(&input.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "A pending invitation already exists for this email",
            ));
        }

        let invitation = self.issue(&input, None).await?;
        info!(
            invitation_id = %invitation.id,
            external_invitation_id = %invitation.external_invitation_id,
            email = %invitation.email,
            "Invitation created"
        );
        Ok(invitation)
    }

    /// Record an invitation that was created directly at the provider.
    ///
    /// Known provider ids are returned unchanged. A business shell is
    /// provisioned when the provider metadata names one.
    pub async fn record_external(
        &self,
        external_invitation_id: &str,
        input: CreateInvitation,
    ) -> AppResult<Invitation> {
        if let Some(existing) = self
            .invitations
            .find_by_external_id(external_invitation_id)
            .await?
        {
            debug!(external_invitation_id, "Invitation already recorded");
            return Ok(existing);
        }

        let input = input.normalized()?;
        let invitation = self
            .issue(&input, Some(external_invitation_id.to_string()))
            .await?;
        info!(
            invitation_id = %invitation.id,
            external_invitation_id,
            "Recorded provider invitation"
        );
        Ok(invitation)
    }

    /// Invitations matching `filter`, newest first.
    pub async fn list(&self, filter: &InvitationFilter) -> AppResult<Vec<Invitation>> {
        self.invitations.list(filter).await
    }

    /// Get an invitation by internal id.
    pub async fn get(&self, id: Uuid) -> AppResult<Invitation> {
        self.invitations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invitation with ID {id} not found")))
    }

    /// Get an invitation by provider id.
    pub async fn get_by_external_id(&self, external_id: &str) -> AppResult<Invitation> {
        self.invitations
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Invitation with provider ID {external_id} not found"
                ))
            })
    }

    /// Resolve a ticket or a bare provider invitation id.
    ///
    /// Tickets go through [`TicketVerifier`]; anything else is looked up at
    /// the provider and then locally.
    pub async fn verify_token(&self, token: &str) -> AppResult<TicketProjection> {
        if TicketVerifier::invitation_id(token).is_ok() {
            return self.verifier.verify(token).await;
        }

        let invalid = || AppError::validation("Invalid or expired invitation token");
        let external = self.gateway.get_invitation(token).await.map_err(|e| {
            debug!(error = %e, "Provider lookup for invitation token failed");
            invalid()
        })?;
        let invitation = self
            .invitations
            .find_by_external_id(&external.id)
            .await?
            .ok_or_else(invalid)?;
        Ok(TicketProjection::from(&invitation))
    }

    /// Replace the provider invitation of a pending invitation.
    ///
    /// The provider calls happen first; the local switch to the new provider
    /// id re-checks the status under the row lock. If the invitation stopped
    /// being pending meanwhile, the new provider invitation is revoked again.
    pub async fn resend(&self, id: Uuid) -> AppResult<Invitation> {
        let invitation = self.get(id).await?;
        if !invitation.is_pending() {
            return Err(AppError::validation("Only pending invitations can be resent"));
        }
        let previous = invitation.external_invitation_id.clone();

        self.gateway.revoke_invitation(&previous).await?;
        let created = self
            .gateway
            .create_invitation(&InvitationRequest {
                email: invitation.email.clone(),
                business_name: invitation.business_name.clone(),
                first_name: invitation.first_name.clone(),
                last_name: invitation.last_name.clone(),
                phone: invitation.phone.clone(),
            })
            .await?;

        let reissued = self
            .transition(&previous, |current| {
                current.reissue(created.id.clone(), Utc::now())
            })
            .await;
        let saved = match reissued {
            Ok(saved) => saved,
            Err(e) => {
                if let Err(revoke_err) = self.gateway.revoke_invitation(&created.id).await {
                    warn!(
                        external_invitation_id = %created.id,
                        error = %revoke_err,
                        "Failed to revoke orphaned provider invitation"
                    );
                }
                return Err(e);
            }
        };
        info!(
            invitation_id = %saved.id,
            previous_external_id = %previous,
            external_invitation_id = %saved.external_invitation_id,
            "Invitation resent"
        );
        Ok(saved)
    }

    /// Revoke the provider invitation and mark the local one REVOKED.
    pub async fn cancel(&self, id: Uuid) -> AppResult<Invitation> {
        let invitation = self.get(id).await?;
        if !invitation.is_pending() {
            return Err(AppError::validation(
                "Only pending invitations can be cancelled",
            ));
        }

        self.gateway
            .revoke_invitation(&invitation.external_invitation_id)
            .await?;
        let saved = self
            .transition(&invitation.external_invitation_id, |current| {
                if !current.is_pending() {
                    return Err(AppError::validation(
                        "Only pending invitations can be cancelled",
                    ));
                }
                current.revoke(Utc::now())
            })
            .await?;
        info!(invitation_id = %saved.id, "Invitation cancelled");
        Ok(saved)
    }

    /// Mark a pending invitation accepted by `user_id`.
    pub async fn mark_accepted(&self, external_id: &str, user_id: Uuid) -> AppResult<Invitation> {
        let saved = self
            .transition(external_id, |current| current.accept(user_id, Utc::now()))
            .await?;
        info!(invitation_id = %saved.id, %user_id, "Invitation marked accepted");
        Ok(saved)
    }

    /// Mark an invitation revoked. Fails if it already is.
    pub async fn mark_revoked(&self, external_id: &str) -> AppResult<Invitation> {
        let saved = self
            .transition(external_id, |current| current.revoke(Utc::now()))
            .await?;
        info!(invitation_id = %saved.id, "Invitation marked revoked");
        Ok(saved)
    }

    /// Lock the invitation row, apply `change` to its current state and save it.
    async fn transition<F>(&self, external_id: &str, change: F) -> AppResult<Invitation>
    where
        F: FnOnce(Invitation) -> AppResult<Invitation> + Send,
    {
        let mut unit = self.units.begin().await?;
        let current = unit.lock_invitation(external_id).await?.ok_or_else(|| {
            AppError::not_found(format!(
                "Invitation with provider ID {external_id} not found"
            ))
        })?;
        let saved = unit.save_invitation(&change(current)?).await?;
        unit.commit().await?;
        Ok(saved)
    }

    async fn issue(
        &self,
        input: &CreateInvitation,
        external_id: Option<String>,
    ) -> AppResult<Invitation> {
        let location = match input.location_id {
            Some(location) => location,
            None => self.provisioner.default_location()?,
        };

        let mut compensation = Compensation::default();
        let mut unit = self.units.begin().await?;
        let issued = self
            .issue_in(unit.as_mut(), input, location, external_id, &mut compensation)
            .await;

        let result = match issued {
            Ok(invitation) => unit.commit().await.map(|()| invitation),
            Err(e) => {
                drop(unit);
                Err(e)
            }
        };
        if result.is_err() {
            self.provisioner
                .compensate(compensation, self.gateway.as_ref())
                .await;
        }
        result
    }

    async fn issue_in(
        &self,
        unit: &mut dyn UnitOfWork,
        input: &CreateInvitation,
        location: Location,
        external_id: Option<String>,
        compensation: &mut Compensation,
    ) -> AppResult<Invitation> {
        if unit
            .pending_invitation_for_email(&input.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "A pending invitation already exists for this email",
            ));
        }

        let business = if input.business_name.is_empty() {
            None
        } else {
            let shell = ShellRequest {
                name: input.business_name.clone(),
                location,
                contact_first_name: input.first_name.clone(),
                contact_last_name: input.last_name.clone(),
                email: Some(input.email.clone()),
                phone: input.phone.clone(),
            };
            Some(self.provisioner.provision(unit, &shell, compensation).await?)
        };

        let external_invitation_id = match external_id {
            Some(id) => id,
            None => {
                let created = self
                    .gateway
                    .create_invitation(&input.gateway_request())
                    .await?;
                compensation.invited(created.id.clone());
                created.id
            }
        };

        unit.insert_invitation(&NewInvitation {
            external_invitation_id,
            email: input.email.clone(),
            business_name: input.business_name.clone(),
            phone: input.phone.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            business_id: business.map(|b| b.id),
        })
        .await
    }
}
