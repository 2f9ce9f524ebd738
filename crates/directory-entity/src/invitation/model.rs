//! Invitation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use directory_core::{AppError, AppResult};

use super::status::InvitationStatus;

/// An offer for a prospective owner to claim a provisioned business.
///
/// Each row is paired 1:1 with an invitation held by the identity
/// provider, referenced by `external_invitation_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Invitation {
    /// Internal identifier.
    pub id: Uuid,
    /// Identity provider invitation id. Unique.
    pub external_invitation_id: String,
    /// Invitee email address.
    pub email: String,
    /// Proposed business name.
    pub business_name: String,
    /// Invitee phone number.
    pub phone: Option<String>,
    /// Invitee first name, if provided at issue time.
    pub first_name: Option<String>,
    /// Invitee last name, if provided at issue time.
    pub last_name: Option<String>,
    /// Lifecycle state.
    pub status: InvitationStatus,
    /// When the invitation was accepted.
    pub accepted_at: Option<DateTime<Utc>>,
    /// The user who accepted it.
    pub accepted_by_user_id: Option<Uuid>,
    /// The business shell this invitation provisions.
    pub business_id: Option<Uuid>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Invitation {
    /// Whether the invitation is still awaiting acceptance.
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    /// Return the accepted form of this invitation.
    pub fn accept(self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<Self> {
        if !self.status.can_transition_to(InvitationStatus::Accepted) {
            return Err(AppError::validation("Invitation is not pending"));
        }
        Ok(Self {
            status: InvitationStatus::Accepted,
            accepted_at: Some(now),
            accepted_by_user_id: Some(user_id),
            updated_at: now,
            ..self
        })
    }

    /// Return the revoked form of this invitation.
    pub fn revoke(self, now: DateTime<Utc>) -> AppResult<Self> {
        if self.status == InvitationStatus::Revoked {
            return Err(AppError::validation("Invitation is already revoked"));
        }
        if !self.status.can_transition_to(InvitationStatus::Revoked) {
            return Err(AppError::validation(format!(
                "Cannot revoke an invitation that is {}",
                self.status
            )));
        }
        Ok(Self {
            status: InvitationStatus::Revoked,
            updated_at: now,
            ..self
        })
    }

    /// Return this invitation re-pointed at a freshly issued provider invitation.
    pub fn reissue(self, external_invitation_id: String, now: DateTime<Utc>) -> AppResult<Self> {
        if !self.is_pending() {
            return Err(AppError::validation("Only pending invitations can be resent"));
        }
        Ok(Self {
            external_invitation_id,
            updated_at: now,
            ..self
        })
    }
}

/// Data required to persist a new invitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInvitation {
    /// Identity provider invitation id.
    pub external_invitation_id: String,
    /// Invitee email address.
    pub email: String,
    /// Proposed business name.
    pub business_name: String,
    /// Invitee phone number.
    pub phone: Option<String>,
    /// Invitee first name.
    pub first_name: Option<String>,
    /// Invitee last name.
    pub last_name: Option<String>,
    /// The business shell this invitation provisions.
    pub business_id: Option<Uuid>,
}

/// Listing filters. Results are always newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvitationFilter {
    /// Only invitations in this state.
    pub status: Option<InvitationStatus>,
    /// Case-insensitive substring of the invitee email.
    pub email: Option<String>,
}

impl InvitationFilter {
    /// In-process evaluation of the filter, mirroring the SQL predicate.
    pub fn matches(&self, invitation: &Invitation) -> bool {
        if invitation.deleted_at.is_some() {
            return false;
        }
        if let Some(status) = self.status {
            if invitation.status != status {
                return false;
            }
        }
        match &self.email {
            Some(needle) => invitation
                .email
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        }
    }
}
