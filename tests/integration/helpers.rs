//! Shared test helpers for integration tests.
//!
//! The app runs over the in-memory store, an in-memory object store and a
//! fake identity provider, so no external services are needed.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use directory_api::{AppState, Backends, build_app};
use directory_core::config::AppConfig;
use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_core::traits::{
    ExternalInvitation, ExternalUser, IdentityGateway, InvitationRequest, WebhookVerifier,
};
use directory_database::MemoryStore;
use directory_identity::{NoVerification, SvixVerifier};
use directory_storage::MemoryStorageProvider;

/// Signing secret used by [`TestApp::with_signed_webhooks`].
pub const WEBHOOK_SECRET: &str = "whsec_aW50ZWdyYXRpb24tdGVzdC1zZWNyZXQ=";

const TEST_CONFIG: &str = r#"
[database]
url = "postgres://unused@localhost/unused"

[directory]
public_base_url = "https://directory.test"
"#;

/// Identity provider stand-in that hands out `inv_1`, `inv_2`, ...
#[derive(Debug, Default)]
pub struct FakeGateway {
    next_id: AtomicUsize,
    fail_creates: AtomicBool,
    revoked: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    pub fn revoked(&self) -> Vec<String> {
        self.revoked.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityGateway for FakeGateway {
    async fn create_invitation(
        &self,
        request: &InvitationRequest,
    ) -> AppResult<ExternalInvitation> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(
                AppError::external("Identity provider failed to create invitation (status 422)")
                    .with_details(json!({"errors": [{"code": "form_identifier_exists"}]})),
            );
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ExternalInvitation {
            id: format!("inv_{n}"),
            email_address: request.email.clone(),
            status: "pending".into(),
            public_metadata: json!({"businessName": request.business_name}),
        })
    }

    async fn revoke_invitation(&self, external_id: &str) -> AppResult<ExternalInvitation> {
        self.revoked.lock().unwrap().push(external_id.to_string());
        Ok(ExternalInvitation {
            id: external_id.to_string(),
            email_address: String::new(),
            status: "revoked".into(),
            public_metadata: json!({}),
        })
    }

    async fn get_invitation(&self, external_id: &str) -> AppResult<ExternalInvitation> {
        Err(AppError::external(format!(
            "Identity provider failed to fetch invitation {external_id} (status 404)"
        )))
    }

    async fn get_user(&self, external_user_id: &str) -> AppResult<ExternalUser> {
        Err(AppError::external(format!(
            "Identity provider failed to fetch user {external_user_id} (status 404)"
        )))
    }
}

/// A decoded test response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing tables, for assertions that bypass the API
    pub store: MemoryStore,
    /// Uploaded QR codes
    pub storage: Arc<MemoryStorageProvider>,
    /// Identity provider calls
    pub gateway: Arc<FakeGateway>,
    signer: Option<SvixVerifier>,
}

impl TestApp {
    /// App that accepts unsigned webhooks.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// App that requires valid webhook signatures.
    pub fn with_signed_webhooks() -> Self {
        Self::build(Some(
            SvixVerifier::new(WEBHOOK_SECRET).expect("valid test secret"),
        ))
    }

    fn build(signer: Option<SvixVerifier>) -> Self {
        let config = AppConfig::from_toml(TEST_CONFIG).expect("Failed to parse test config");
        let store = MemoryStore::new();
        let storage = Arc::new(MemoryStorageProvider::new("http://assets.test"));
        let gateway = Arc::new(FakeGateway::default());

        let verifier: Arc<dyn WebhookVerifier> = match &signer {
            Some(_) => Arc::new(SvixVerifier::new(WEBHOOK_SECRET).expect("valid test secret")),
            None => Arc::new(NoVerification),
        };

        let state = AppState::new(
            config,
            &Backends::memory(store.clone()),
            gateway.clone(),
            storage.clone(),
            verifier,
            None,
        );

        Self {
            router: build_app(state),
            store,
            storage,
            gateway,
            signer,
        }
    }

    /// Send a JSON request and decode the JSON response.
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Deliver a webhook, signed when the app verifies signatures.
    pub async fn webhook(&self, event: Value) -> TestResponse {
        let payload = event.to_string();
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/clerk/webhooks")
            .header("content-type", "application/json");

        if let Some(signer) = &self.signer {
            let timestamp = unix_now();
            let signature = signer
                .sign("msg_1", timestamp, payload.as_bytes())
                .unwrap();
            builder = builder
                .header("svix-id", "msg_1")
                .header("svix-timestamp", timestamp.to_string())
                .header("svix-signature", format!("v1,{}", STANDARD.encode(signature)));
        }

        self.send(builder.body(Body::from(payload)).unwrap()).await
    }

    /// Send a prepared request.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, body }
    }

    /// Upload `data` as the `file` field of a multipart form.
    pub async fn upload(
        &self,
        uri: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
        business_id: Option<&str>,
    ) -> TestResponse {
        const BOUNDARY: &str = "directory-test-boundary";
        let mut body = Vec::new();
        if let Some(id) = business_id {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"businessId\"\r\n\r\n{id}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Invite `email` to claim `business_name` and return the invitation.
    pub async fn invite(&self, email: &str, business_name: &str) -> Value {
        let response = self
            .request(
                "POST",
                "/api/invitations",
                Some(json!({"email": email, "businessName": business_name})),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.data().clone()
    }

    /// Invite and accept in one go; returns the accepted invitation.
    pub async fn onboard(&self, email: &str, business_name: &str, user_id: &str) -> Value {
        let invitation = self.invite(email, business_name).await;
        let ticket = ticket_for(invitation["clerkInvitationId"].as_str().unwrap());
        let response = self
            .request(
                "POST",
                "/api/invitations/accept",
                Some(json!({"userId": user_id, "ticket": ticket})),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.data().clone()
    }
}

/// An unsigned provider ticket naming `external_invitation_id`.
pub fn ticket_for(external_invitation_id: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let claims = URL_SAFE_NO_PAD.encode(
        json!({"sid": external_invitation_id, "exp": 4_102_444_800i64})
            .to_string()
            .as_bytes(),
    );
    format!("{header}.{claims}.signature")
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}
