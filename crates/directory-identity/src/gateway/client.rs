//! HTTP client for the provider's backend API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info};

use directory_core::config::IdentityConfig;
use directory_core::error::{AppError, ErrorKind};
use directory_core::result::AppResult;
use directory_core::traits::identity::{
    ExternalInvitation, ExternalUser, IdentityGateway, InvitationRequest,
};

use super::wire::UserPayload;

/// Role stamped into invitation metadata.
const INVITED_ROLE: &str = "business_owner";

/// Bearer-authenticated client for the Clerk backend API.
#[derive(Clone)]
pub struct ClerkClient {
    http: Client,
    api_url: String,
    secret_key: String,
    redirect_url: String,
}

impl std::fmt::Debug for ClerkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClerkClient")
            .field("api_url", &self.api_url)
            .field("redirect_url", &self.redirect_url)
            .finish()
    }
}

impl ClerkClient {
    /// Build a client from configuration.
    pub fn new(config: &IdentityConfig) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
            redirect_url: config.invitation_redirect_url(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, action: &str) -> AppResult<T> {
        let response = request
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Identity provider unreachable while trying to {action}"),
                    e,
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let details = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
            debug!(%status, action, "Identity provider rejected request");
            return Err(AppError::external(format!(
                "Identity provider failed to {action} (status {})",
                status.as_u16()
            ))
            .with_details(details));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Unexpected identity provider response while trying to {action}"),
                e,
            )
        })
    }
}

#[async_trait]
impl IdentityGateway for ClerkClient {
    async fn create_invitation(
        &self,
        request: &InvitationRequest,
    ) -> AppResult<ExternalInvitation> {
        let body = json!({
            "email_address": request.email,
            "redirect_url": self.redirect_url,
            "public_metadata": {
                "businessName": request.business_name,
                "role": INVITED_ROLE,
                "firstName": request.first_name,
                "lastName": request.last_name,
                "phone": request.phone,
            },
        });
        let invitation: ExternalInvitation = self
            .send(
                self.http.post(self.url("/invitations")).json(&body),
                "create invitation",
            )
            .await?;
        info!(external_id = %invitation.id, email = %request.email, "Created provider invitation");
        Ok(invitation)
    }

    async fn revoke_invitation(&self, external_id: &str) -> AppResult<ExternalInvitation> {
        let invitation: ExternalInvitation = self
            .send(
                self.http
                    .post(self.url(&format!("/invitations/{external_id}/revoke"))),
                "revoke invitation",
            )
            .await?;
        info!(external_id, "Revoked provider invitation");
        Ok(invitation)
    }

    async fn get_invitation(&self, external_id: &str) -> AppResult<ExternalInvitation> {
        self.send(
            self.http.get(self.url(&format!("/invitations/{external_id}"))),
            "fetch invitation",
        )
        .await
    }

    async fn get_user(&self, external_user_id: &str) -> AppResult<ExternalUser> {
        let payload: UserPayload = self
            .send(
                self.http.get(self.url(&format!("/users/{external_user_id}"))),
                "fetch user",
            )
            .await?;
        Ok(payload.into())
    }
}
