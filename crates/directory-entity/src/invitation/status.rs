//! Invitation status and its transition rules.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of an invitation.
///
/// `Pending` is the only state with outgoing transitions; the other three
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invitation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    /// Issued and awaiting acceptance.
    Pending,
    /// Accepted by an invitee.
    Accepted,
    /// Lapsed without acceptance.
    Expired,
    /// Cancelled by an admin.
    Revoked,
}

impl InvitationStatus {
    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether moving from `self` to `next` is allowed.
    pub fn can_transition_to(&self, next: InvitationStatus) -> bool {
        matches!(
            (self, next),
            (
                Self::Pending,
                Self::Accepted | Self::Revoked | Self::Expired
            )
        )
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pending_moves() {
        use InvitationStatus::*;
        for next in [Accepted, Revoked, Expired] {
            assert!(Pending.can_transition_to(next));
        }
        for from in [Accepted, Revoked, Expired] {
            assert!(from.is_terminal());
            for next in [Pending, Accepted, Revoked, Expired] {
                assert!(!from.can_transition_to(next), "{from} -> {next}");
            }
        }
        assert!(!Pending.can_transition_to(Pending));
    }
}
