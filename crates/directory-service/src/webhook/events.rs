//! Webhook envelope and the payload shapes the dispatcher reads.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use directory_core::error::AppError;
use directory_core::result::AppResult;

/// The envelope every provider webhook arrives in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event type such as `user.created`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event payload; its shape depends on `event_type`.
    #[serde(default)]
    pub data: Value,
    /// Always `event`.
    #[serde(default)]
    pub object: String,
}

impl WebhookEvent {
    /// Parse a raw request body.
    pub fn from_slice(payload: &[u8]) -> AppResult<Self> {
        serde_json::from_slice(payload)
            .map_err(|e| AppError::validation(format!("Malformed webhook payload: {e}")))
    }

    /// Decode `data` into the payload shape of this event.
    pub fn payload<T: DeserializeOwned>(&self) -> AppResult<T> {
        T::deserialize(&self.data).map_err(|e| {
            AppError::validation(format!("Malformed {} payload: {e}", self.event_type))
        })
    }
}

/// The event types with a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    UserCreated,
    UserUpdated,
    UserDeleted,
    SessionCreated,
    SessionEnded,
    SessionRevoked,
    InvitationCreated,
    InvitationAccepted,
    InvitationRevoked,
}

impl EventKind {
    /// Map a provider event type; `None` for types without a handler.
    pub fn parse(event_type: &str) -> Option<Self> {
        let kind = match event_type {
            "user.created" => Self::UserCreated,
            "user.updated" => Self::UserUpdated,
            "user.deleted" => Self::UserDeleted,
            "session.created" => Self::SessionCreated,
            "session.ended" => Self::SessionEnded,
            "session.revoked" => Self::SessionRevoked,
            "organizationInvitation.created" => Self::InvitationCreated,
            "organizationInvitation.accepted" => Self::InvitationAccepted,
            "organizationInvitation.revoked" => Self::InvitationRevoked,
            _ => return None,
        };
        Some(kind)
    }
}

/// `data` of `session.*` events.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionPayload {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

/// `data` of `organizationInvitation.*` events.
#[derive(Debug, Clone, Deserialize)]
pub struct InvitationPayload {
    pub id: String,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub public_metadata: InvitationMetadata,
}

/// Metadata attached when the invitation was created at the provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationMetadata {
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// `data` of `user.deleted`; the provider sends only the id.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletedPayload {
    pub id: String,
}
