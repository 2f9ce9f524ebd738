//! Identity provider gateway.
//!
//! The hosted identity provider owns users, sessions and invitation
//! emails. This system only creates, revokes and reads invitations and
//! reads users through this narrow interface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::result::AppResult;

/// Parameters for a new provider-side invitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationRequest {
    /// Invitee email address.
    pub email: String,
    /// Business the invitee is being asked to claim.
    pub business_name: String,
    /// Invitee first name, if known.
    pub first_name: Option<String>,
    /// Invitee last name, if known.
    pub last_name: Option<String>,
    /// Invitee phone number, if known.
    pub phone: Option<String>,
}

/// Provider-side invitation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalInvitation {
    /// Provider invitation id (`inv_...`).
    pub id: String,
    /// Invitee email address.
    pub email_address: String,
    /// Provider status string (`pending`, `accepted`, `revoked`).
    #[serde(default)]
    pub status: String,
    /// Metadata attached at creation time.
    #[serde(default)]
    pub public_metadata: Value,
}

/// Provider-side user record, reduced to the fields this system stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalUser {
    /// Provider user id (`user_...`).
    pub id: String,
    /// Primary email address.
    pub email: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Profile image URL.
    pub image_url: Option<String>,
    /// Public metadata (carries the assigned role).
    #[serde(default)]
    pub public_metadata: Value,
}

/// Client for the identity provider's invitation and user APIs.
#[async_trait]
pub trait IdentityGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Create an invitation; the provider emails the invitee.
    async fn create_invitation(&self, request: &InvitationRequest)
    -> AppResult<ExternalInvitation>;

    /// Revoke a pending invitation.
    async fn revoke_invitation(&self, external_id: &str) -> AppResult<ExternalInvitation>;

    /// Fetch an invitation by its provider id.
    async fn get_invitation(&self, external_id: &str) -> AppResult<ExternalInvitation>;

    /// Fetch a user by its provider id.
    async fn get_user(&self, external_user_id: &str) -> AppResult<ExternalUser>;
}
