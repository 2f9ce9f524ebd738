//! Webhook signature verification.

use crate::result::AppResult;

/// The three signature headers sent with every provider webhook.
#[derive(Debug, Clone, Default)]
pub struct WebhookHeaders {
    /// Unique message id.
    pub id: String,
    /// Unix timestamp (seconds) at which the message was signed.
    pub timestamp: String,
    /// Space-separated list of versioned signatures.
    pub signature: String,
}

/// Verifies that a webhook payload was signed by the identity provider.
pub trait WebhookVerifier: Send + Sync + std::fmt::Debug + 'static {
    /// Return `Ok(())` when `payload` carries a valid signature.
    fn verify(&self, payload: &[u8], headers: &WebhookHeaders) -> AppResult<()>;
}
