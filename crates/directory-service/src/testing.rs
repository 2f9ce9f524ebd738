//! Shared fixtures for service tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;
use tokio::sync::Notify;
use uuid::Uuid;

use directory_core::config::DirectoryConfig;
use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_core::traits::identity::{
    ExternalInvitation, ExternalUser, IdentityGateway, InvitationRequest,
};
use directory_database::{BusinessStore, MemoryStore};
use directory_entity::business::Business;
use directory_storage::MemoryStorageProvider;

use crate::business::{BusinessService, HoursService};
use crate::deal::DealService;
use crate::image::BusinessImageService;
use crate::invitation::{
    ActivationService, BusinessProvisioner, CreateInvitation, InvitationService,
};
use crate::notification::NotificationService;
use crate::qr::QrRenderer;
use crate::session::SessionService;
use crate::social::SocialLinkService;
use crate::subscription::SubscriptionService;
use crate::sweep::ExpirationSweeps;
use crate::user::UserService;
use crate::webhook::WebhookDispatcher;

/// Pauses the next `revoke_invitation` call until released.
#[derive(Debug, Clone, Default)]
pub struct RevokeGate {
    /// Signalled once the held call has started.
    pub entered: Arc<Notify>,
    /// Signal to let the held call finish.
    pub release: Arc<Notify>,
}

/// Identity gateway that hands out `inv_1`, `inv_2`, ... and records calls.
#[derive(Debug, Default)]
pub struct FakeGateway {
    next_id: AtomicUsize,
    fail_creates: AtomicBool,
    created: Mutex<Vec<InvitationRequest>>,
    revoked: Mutex<Vec<String>>,
    revoke_gate: Mutex<Option<RevokeGate>>,
}

impl FakeGateway {
    /// Hold the next revoke call until `release` is notified.
    pub fn hold_next_revoke(&self) -> RevokeGate {
        let gate = RevokeGate::default();
        *self.revoke_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    pub fn created(&self) -> Vec<InvitationRequest> {
        self.created.lock().unwrap().clone()
    }

    pub fn revoked(&self) -> Vec<String> {
        self.revoked.lock().unwrap().clone()
    }

    fn issued(&self, id: &str) -> bool {
        id.strip_prefix("inv_")
            .and_then(|n| n.parse::<usize>().ok())
            .is_some_and(|n| n >= 1 && n <= self.next_id.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl IdentityGateway for FakeGateway {
    async fn create_invitation(
        &self,
        request: &InvitationRequest,
    ) -> AppResult<ExternalInvitation> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(AppError::external(
                "Identity provider failed to create invitation (status 422)",
            )
            .with_details(json!({"errors": [{"code": "form_identifier_exists"}]})));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.created.lock().unwrap().push(request.clone());
        Ok(ExternalInvitation {
            id: format!("inv_{n}"),
            email_address: request.email.clone(),
            status: "pending".into(),
            public_metadata: json!({"businessName": request.business_name}),
        })
    }

    async fn revoke_invitation(&self, external_id: &str) -> AppResult<ExternalInvitation> {
        let gate = self.revoke_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        self.revoked.lock().unwrap().push(external_id.to_string());
        Ok(ExternalInvitation {
            id: external_id.to_string(),
            email_address: String::new(),
            status: "revoked".into(),
            public_metadata: json!({}),
        })
    }

    async fn get_invitation(&self, external_id: &str) -> AppResult<ExternalInvitation> {
        if !self.issued(external_id) {
            return Err(AppError::external(
                "Identity provider failed to fetch invitation (status 404)",
            ));
        }
        Ok(ExternalInvitation {
            id: external_id.to_string(),
            email_address: String::new(),
            status: "pending".into(),
            public_metadata: json!({}),
        })
    }

    async fn get_user(&self, external_user_id: &str) -> AppResult<ExternalUser> {
        Err(AppError::external(format!(
            "Identity provider failed to fetch user {external_user_id} (status 404)"
        )))
    }
}

/// An unsigned ticket carrying `sid`.
pub fn ticket_for(external_invitation_id: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let claims = URL_SAFE_NO_PAD.encode(
        json!({"sid": external_invitation_id, "exp": 4_102_444_800i64})
            .to_string()
            .as_bytes(),
    );
    format!("{header}.{claims}.signature")
}

/// Invitation input with just an email and business name.
pub fn invite(email: &str, business_name: &str) -> CreateInvitation {
    CreateInvitation {
        email: email.into(),
        business_name: business_name.into(),
        ..CreateInvitation::default()
    }
}

/// Every service wired over one in-memory store.
pub struct Harness {
    pub store: MemoryStore,
    pub storage: Arc<MemoryStorageProvider>,
    pub gateway: Arc<FakeGateway>,
    pub invitations: InvitationService,
    pub activation: ActivationService,
    pub users: UserService,
    pub sessions: SessionService,
    pub businesses: BusinessService,
    pub hours: HoursService,
    pub deals: DealService,
    pub notifications: NotificationService,
    pub social: SocialLinkService,
    pub images: BusinessImageService,
    pub subscriptions: SubscriptionService,
    pub sweeps: ExpirationSweeps,
    pub webhooks: WebhookDispatcher,
}

impl Harness {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let shared = Arc::new(store.clone());
        let storage = Arc::new(MemoryStorageProvider::new("http://assets.test"));
        let gateway = Arc::new(FakeGateway::default());

        let directory = DirectoryConfig::default();
        let provisioner = BusinessProvisioner::new(
            storage.clone(),
            QrRenderer::from_config(&directory),
            directory,
        );

        let invitations = InvitationService::new(
            shared.clone(),
            shared.clone(),
            gateway.clone(),
            provisioner.clone(),
        );
        let activation = ActivationService::new(shared.clone(), shared.clone());
        let users = UserService::new(shared.clone());
        let sessions = SessionService::new(shared.clone(), shared.clone());
        let businesses = BusinessService::new(shared.clone(), provisioner);
        let hours = HoursService::new(shared.clone(), shared.clone());
        let notifications = NotificationService::new(shared.clone(), shared.clone());
        let deals = DealService::new(shared.clone(), shared.clone(), notifications.clone());
        let social = SocialLinkService::new(shared.clone(), shared.clone());
        let images = BusinessImageService::new(shared.clone(), shared.clone(), storage.clone());
        let subscriptions = SubscriptionService::new(shared.clone(), shared.clone());
        let sweeps = ExpirationSweeps::new(shared.clone(), shared.clone());
        let webhooks = WebhookDispatcher::new(
            invitations.clone(),
            activation.clone(),
            users.clone(),
            sessions.clone(),
        );

        Self {
            store,
            storage,
            gateway,
            invitations,
            activation,
            users,
            sessions,
            businesses,
            hours,
            deals,
            notifications,
            social,
            images,
            subscriptions,
            sweeps,
            webhooks,
        }
    }

    /// Read a live business straight from the store.
    pub async fn business(&self, id: Option<Uuid>) -> Business {
        BusinessStore::find_by_id(&self.store, id.expect("invitation has a business"))
            .await
            .unwrap()
            .expect("business exists")
    }
}
