//! Wire shapes of provider objects that need reshaping before use.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use directory_core::traits::identity::ExternalUser;

/// One email address attached to a provider user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Address id (`idn_...`).
    #[serde(default)]
    pub id: String,
    /// The address itself.
    pub email_address: String,
    /// Set on the primary address in webhook payloads.
    #[serde(default)]
    pub primary: bool,
}

/// A provider user as returned by the user API and carried in `user.*`
/// webhook events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    /// Provider user id.
    pub id: String,
    /// All email addresses.
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    /// Id of the primary entry in `email_addresses`.
    #[serde(default)]
    pub primary_email_address_id: Option<String>,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Public metadata.
    #[serde(default)]
    pub public_metadata: Value,
}

impl UserPayload {
    /// The primary email address, falling back to the first listed one.
    ///
    /// An entry flagged `primary` wins over `primary_email_address_id`.
    pub fn primary_email(&self) -> Option<&str> {
        let flagged = self
            .email_addresses
            .iter()
            .find(|e| e.primary)
            .map(|e| e.email_address.as_str());
        let by_id = || {
            self.primary_email_address_id.as_deref().and_then(|wanted| {
                self.email_addresses
                    .iter()
                    .find(|e| e.id == wanted)
                    .map(|e| e.email_address.as_str())
            })
        };
        flagged.or_else(by_id).or_else(|| {
            self.email_addresses
                .first()
                .map(|e| e.email_address.as_str())
        })
    }
}

impl From<UserPayload> for ExternalUser {
    fn from(payload: UserPayload) -> Self {
        let email = payload.primary_email().map(str::to_string);
        Self {
            id: payload.id,
            email,
            first_name: payload.first_name,
            last_name: payload.last_name,
            image_url: payload.image_url,
            public_metadata: payload.public_metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_email_is_selected_by_id() {
        let payload: UserPayload = serde_json::from_value(serde_json::json!({
            "id": "user_1",
            "email_addresses": [
                {"id": "idn_a", "email_address": "old@example.com"},
                {"id": "idn_b", "email_address": "new@example.com"}
            ],
            "primary_email_address_id": "idn_b"
        }))
        .unwrap();
        assert_eq!(payload.primary_email(), Some("new@example.com"));

        let user = ExternalUser::from(payload);
        assert_eq!(user.email.as_deref(), Some("new@example.com"));
    }

    #[test]
    fn test_primary_flag_wins() {
        let payload: UserPayload = serde_json::from_value(serde_json::json!({
            "id": "user_1",
            "email_addresses": [
                {"id": "idn_a", "email_address": "a@example.com"},
                {"id": "idn_b", "email_address": "b@example.com", "primary": true}
            ]
        }))
        .unwrap();
        assert_eq!(payload.primary_email(), Some("b@example.com"));
    }

    #[test]
    fn test_no_addresses_means_no_email() {
        let payload: UserPayload =
            serde_json::from_value(serde_json::json!({"id": "user_1"})).unwrap();
        assert_eq!(payload.primary_email(), None);
    }
}
