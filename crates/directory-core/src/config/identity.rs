//! Identity provider configuration.

use serde::{Deserialize, Serialize};

/// Settings for the hosted identity provider (Clerk-compatible API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Base URL of the provider's backend API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer secret for the backend API.
    #[serde(default)]
    pub secret_key: String,
    /// Webhook signing secret (`whsec_...`).
    #[serde(default)]
    pub webhook_secret: String,
    /// Verify webhook signatures before dispatch.
    #[serde(default = "default_true")]
    pub verify_webhooks: bool,
    /// Frontend origin that hosts the `/accept-invitation` page.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
    /// Timeout for provider API calls in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            secret_key: String::new(),
            webhook_secret: String::new(),
            verify_webhooks: default_true(),
            frontend_url: default_frontend_url(),
            request_timeout_seconds: default_timeout(),
        }
    }
}

impl IdentityConfig {
    /// The URL invitees are redirected to after following an invitation link.
    pub fn invitation_redirect_url(&self) -> String {
        format!("{}/accept-invitation", self.frontend_url.trim_end_matches('/'))
    }
}

fn default_api_url() -> String {
    "https://api.clerk.com/v1".to_string()
}

fn default_true() -> bool {
    true
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_timeout() -> u64 {
    15
}
