//! Routes verified provider events to the services that own them.

use serde_json::json;
use tracing::{debug, info, warn};

use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_core::traits::identity::ExternalUser;
use directory_core::traits::webhook::{WebhookHeaders, WebhookVerifier};
use directory_entity::session::SessionStatus;
use directory_identity::UserPayload;

use super::events::{
    DeletedPayload, EventKind, InvitationPayload, SessionPayload, WebhookEvent,
};
use crate::invitation::{ActivationService, CreateInvitation, InvitationService};
use crate::session::SessionService;
use crate::user::UserService;

/// Stateless event router.
///
/// Every handler is safe to replay: the provider retries deliveries that
/// did not get a 2xx, so an event may arrive more than once.
#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    invitations: InvitationService,
    activation: ActivationService,
    users: UserService,
    sessions: SessionService,
}

impl WebhookDispatcher {
    /// Create a dispatcher over the services it forwards to.
    pub fn new(
        invitations: InvitationService,
        activation: ActivationService,
        users: UserService,
        sessions: SessionService,
    ) -> Self {
        Self {
            invitations,
            activation,
            users,
            sessions,
        }
    }

    /// Verify, parse and dispatch a raw delivery. Returns the event type.
    pub async fn receive(
        &self,
        payload: &[u8],
        headers: &WebhookHeaders,
        verifier: &dyn WebhookVerifier,
    ) -> AppResult<String> {
        verifier.verify(payload, headers)?;
        let event = WebhookEvent::from_slice(payload)?;
        self.dispatch(&event).await?;
        Ok(event.event_type)
    }

    /// Handle one event. Types without a handler are logged and ignored.
    pub async fn dispatch(&self, event: &WebhookEvent) -> AppResult<()> {
        let Some(kind) = EventKind::parse(&event.event_type) else {
            warn!(event_type = %event.event_type, "Unhandled webhook event type");
            return Ok(());
        };
        info!(event_type = %event.event_type, "Processing webhook event");

        let handled = match kind {
            EventKind::UserCreated | EventKind::UserUpdated => self.user_upserted(event).await,
            EventKind::UserDeleted => self.user_deleted(event).await,
            EventKind::SessionCreated => self.session_created(event).await,
            EventKind::SessionEnded => self.session_ended(event).await,
            EventKind::SessionRevoked => self.session_revoked(event).await,
            EventKind::InvitationCreated => self.invitation_created(event).await,
            EventKind::InvitationAccepted => self.invitation_accepted(event).await,
            EventKind::InvitationRevoked => self.invitation_revoked(event).await,
        };
        if let Err(ref e) = handled {
            warn!(event_type = %event.event_type, error = %e, "Webhook handler failed");
        }
        handled
    }

    async fn user_upserted(&self, event: &WebhookEvent) -> AppResult<()> {
        let payload: UserPayload = event.payload()?;
        self.users
            .sync_from_provider(&ExternalUser::from(payload))
            .await?;
        Ok(())
    }

    async fn user_deleted(&self, event: &WebhookEvent) -> AppResult<()> {
        let payload: DeletedPayload = event.payload()?;
        self.users.remove_by_external_id(&payload.id).await?;
        Ok(())
    }

    async fn session_created(&self, event: &WebhookEvent) -> AppResult<()> {
        let payload: SessionPayload = event.payload()?;
        let user_id = payload
            .user_id
            .as_deref()
            .ok_or_else(|| AppError::validation("Session event has no user id"))?;
        let metadata = payload.client_id.map(|client_id| json!({"clientId": client_id}));
        self.sessions.record(&payload.id, user_id, metadata).await?;
        Ok(())
    }

    async fn session_ended(&self, event: &WebhookEvent) -> AppResult<()> {
        let payload: SessionPayload = event.payload()?;
        let session = self.sessions.get_by_external_id(&payload.id).await?;
        if session.status != SessionStatus::Active {
            debug!(session_id = %session.id, status = ?session.status, "Session already closed");
            return Ok(());
        }
        self.sessions.end(&payload.id).await?;
        Ok(())
    }

    async fn session_revoked(&self, event: &WebhookEvent) -> AppResult<()> {
        let payload: SessionPayload = event.payload()?;
        let session = self.sessions.get_by_external_id(&payload.id).await?;
        if session.status == SessionStatus::Revoked {
            debug!(session_id = %session.id, "Session already revoked");
            return Ok(());
        }
        self.sessions.revoke(&payload.id).await?;
        Ok(())
    }

    async fn invitation_created(&self, event: &WebhookEvent) -> AppResult<()> {
        let payload: InvitationPayload = event.payload()?;
        let metadata = payload.public_metadata;
        let input = CreateInvitation {
            email: payload.email_address.unwrap_or_default(),
            business_name: metadata.business_name.unwrap_or_default(),
            phone: metadata.phone,
            first_name: metadata.first_name,
            last_name: metadata.last_name,
            location_id: None,
        };
        self.invitations.record_external(&payload.id, input).await?;
        Ok(())
    }

    async fn invitation_accepted(&self, event: &WebhookEvent) -> AppResult<()> {
        let payload: InvitationPayload = event.payload()?;
        let user_id = payload
            .user_id
            .as_deref()
            .ok_or_else(|| AppError::validation("Invitation event has no user id"))?;
        self.activation.accept_external(user_id, &payload.id).await?;
        Ok(())
    }

    async fn invitation_revoked(&self, event: &WebhookEvent) -> AppResult<()> {
        let payload: InvitationPayload = event.payload()?;
        let invitation = self.invitations.get_by_external_id(&payload.id).await?;
        if invitation.status.is_terminal() {
            debug!(
                invitation_id = %invitation.id,
                status = %invitation.status,
                "Ignoring revocation of a settled invitation"
            );
            return Ok(());
        }
        self.invitations.mark_revoked(&payload.id).await?;
        Ok(())
    }
}
