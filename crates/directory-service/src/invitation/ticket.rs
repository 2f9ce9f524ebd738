//! Correlates invitation tickets with local pending invitations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_database::InvitationStore;
use directory_entity::invitation::Invitation;
use directory_identity::decode_ticket;

/// The part of an invitation an activation call needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketProjection {
    /// Provider invitation id.
    pub external_invitation_id: String,
    /// Invitee email.
    pub email: String,
    /// Business the invitee is claiming.
    pub business_name: String,
}

impl From<&Invitation> for TicketProjection {
    fn from(invitation: &Invitation) -> Self {
        Self {
            external_invitation_id: invitation.external_invitation_id.clone(),
            email: invitation.email.clone(),
            business_name: invitation.business_name.clone(),
        }
    }
}

/// Decodes tickets without checking their signature and looks the embedded
/// invitation id up locally.
///
/// The provider issued the ticket for an invitation this system created,
/// so a PENDING local row with that id is the acceptance criterion.
#[derive(Debug, Clone)]
pub struct TicketVerifier {
    invitations: Arc<dyn InvitationStore>,
}

impl TicketVerifier {
    /// Create a verifier over the invitation store.
    pub fn new(invitations: Arc<dyn InvitationStore>) -> Self {
        Self { invitations }
    }

    /// Recover the provider invitation id from a ticket.
    pub fn invitation_id(ticket: &str) -> AppResult<String> {
        let claims = decode_ticket(ticket)?;
        claims
            .invitation_id()
            .map(str::to_string)
            .ok_or_else(|| AppError::validation("Invalid ticket: no invitation id"))
    }

    /// Verify `ticket` against the local invitation records.
    pub async fn verify(&self, ticket: &str) -> AppResult<TicketProjection> {
        let external_id = Self::invitation_id(ticket)?;
        let invitation = self
            .invitations
            .find_by_external_id(&external_id)
            .await?
            .ok_or_else(|| AppError::validation("Invalid ticket: unknown invitation"))?;

        if !invitation.is_pending() {
            return Err(AppError::validation("Invitation is not pending"));
        }

        debug!(external_invitation_id = %external_id, "Ticket verified");
        Ok(TicketProjection::from(&invitation))
    }
}

#[cfg(test)]
mod tests {
    use directory_core::error::ErrorKind;
    use directory_database::MemoryStore;
    use directory_entity::invitation::NewInvitation;

    use super::*;
    use crate::testing::ticket_for;

    async fn store_with(external_id: &str) -> MemoryStore {
        let store = MemoryStore::new();
        InvitationStore::insert(
            &store,
            &NewInvitation {
                external_invitation_id: external_id.into(),
                email: "owner@shop.com".into(),
                business_name: "Shop X".into(),
                phone: None,
                first_name: None,
                last_name: None,
                business_id: None,
            },
        )
        .await
        .unwrap();
        store
    }

    #[tokio::test]
    async fn test_verify_returns_projection() {
        let store = store_with("inv_1").await;
        let verifier = TicketVerifier::new(Arc::new(store));

        let projection = verifier.verify(&ticket_for("inv_1")).await.unwrap();
        assert_eq!(
            projection,
            TicketProjection {
                external_invitation_id: "inv_1".into(),
                email: "owner@shop.com".into(),
                business_name: "Shop X".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_tickets_are_bad_requests() {
        let verifier = TicketVerifier::new(Arc::new(store_with("inv_1").await));

        let unknown = verifier.verify(&ticket_for("inv_2")).await.unwrap_err();
        assert_eq!(unknown.kind, ErrorKind::Validation);

        let garbage = verifier.verify("not-a-ticket").await.unwrap_err();
        assert_eq!(garbage.kind, ErrorKind::Validation);
    }
}
