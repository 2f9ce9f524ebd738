//! Claims carried in an invitation ticket.

use serde::{Deserialize, Serialize};

/// Payload of the ticket the identity provider appends to invitation links.
///
/// Only the claims this system reads are modelled; everything else is
/// ignored during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketClaims {
    /// Invitation id (`inv_...`).
    #[serde(default)]
    pub sid: Option<String>,
    /// Legacy invitation id claim.
    #[serde(default)]
    pub iid: Option<String>,
    /// Subject. Present on some ticket kinds.
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiration timestamp (seconds since epoch).
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TicketClaims {
    /// The embedded invitation id, preferring `sid` over `iid`.
    pub fn invitation_id(&self) -> Option<&str> {
        [self.sid.as_deref(), self.iid.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sid_wins_over_iid() {
        let claims = TicketClaims {
            sid: Some("inv_sid".into()),
            iid: Some("inv_iid".into()),
            ..TicketClaims::default()
        };
        assert_eq!(claims.invitation_id(), Some("inv_sid"));
    }

    #[test]
    fn test_blank_sid_falls_back_to_iid() {
        let claims = TicketClaims {
            sid: Some("  ".into()),
            iid: Some("inv_iid".into()),
            ..TicketClaims::default()
        };
        assert_eq!(claims.invitation_id(), Some("inv_iid"));
        assert_eq!(TicketClaims::default().invitation_id(), None);
    }
}
