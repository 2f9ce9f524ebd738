//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use directory_core::config::AppConfig;
use directory_core::traits::{IdentityGateway, StorageProvider, WebhookVerifier};
use directory_database::repositories::{
    BusinessHoursRepository, BusinessImageRepository, BusinessRepository, DealRepository,
    InvitationRepository, NotificationRepository, SessionRepository, SocialLinkRepository,
    SubscriptionRepository, UserRepository,
};
use directory_database::{
    BusinessHoursStore, BusinessImageStore, BusinessStore, DatabasePool, DealStore,
    InvitationStore, MemoryStore, NotificationStore, PgTransactionalStore, SessionStore,
    SocialLinkStore, SubscriptionStore, TransactionalStore, UserStore,
};
use directory_service::invitation::BusinessProvisioner;
use directory_service::{
    ActivationService, BusinessImageService, BusinessService, DealService, ExpirationSweeps,
    HoursService, InvitationService, NotificationService, QrRenderer, SessionService,
    SocialLinkService, SubscriptionService, UserService, WebhookDispatcher,
};

/// One store per aggregate plus the unit-of-work factory.
#[derive(Debug, Clone)]
pub struct Backends {
    /// Invitation store
    pub invitations: Arc<dyn InvitationStore>,
    /// User store
    pub users: Arc<dyn UserStore>,
    /// Business store
    pub businesses: Arc<dyn BusinessStore>,
    /// Session store
    pub sessions: Arc<dyn SessionStore>,
    /// Business hours store
    pub hours: Arc<dyn BusinessHoursStore>,
    /// Deal store
    pub deals: Arc<dyn DealStore>,
    /// Subscription store
    pub subscriptions: Arc<dyn SubscriptionStore>,
    /// Social media link store
    pub social_links: Arc<dyn SocialLinkStore>,
    /// Notification store
    pub notifications: Arc<dyn NotificationStore>,
    /// Uploaded image store
    pub images: Arc<dyn BusinessImageStore>,
    /// Multi-entity transactions
    pub units: Arc<dyn TransactionalStore>,
}

impl Backends {
    /// PostgreSQL repositories over one pool.
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            invitations: Arc::new(InvitationRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            businesses: Arc::new(BusinessRepository::new(pool.clone())),
            sessions: Arc::new(SessionRepository::new(pool.clone())),
            hours: Arc::new(BusinessHoursRepository::new(pool.clone())),
            deals: Arc::new(DealRepository::new(pool.clone())),
            subscriptions: Arc::new(SubscriptionRepository::new(pool.clone())),
            social_links: Arc::new(SocialLinkRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool.clone())),
            images: Arc::new(BusinessImageRepository::new(pool.clone())),
            units: Arc::new(PgTransactionalStore::new(pool.clone())),
        }
    }

    /// Every store backed by the same in-memory tables.
    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            invitations: store.clone(),
            users: store.clone(),
            businesses: store.clone(),
            sessions: store.clone(),
            hours: store.clone(),
            deals: store.clone(),
            subscriptions: store.clone(),
            social_links: store.clone(),
            notifications: store.clone(),
            images: store.clone(),
            units: store,
        }
    }

    /// Expiration sweeps over these stores, for the scheduler.
    pub fn sweeps(&self) -> ExpirationSweeps {
        ExpirationSweeps::new(self.deals.clone(), self.subscriptions.clone())
    }
}

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// Every field is cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL pool; absent when running over the in-memory store
    pub db: Option<DatabasePool>,
    /// Signature check for provider webhooks
    pub verifier: Arc<dyn WebhookVerifier>,

    // ── Services ─────────────────────────────────────────────
    /// Invitation lifecycle
    pub invitations: InvitationService,
    /// Invitation acceptance and business activation
    pub activation: ActivationService,
    /// Local user mirror
    pub users: UserService,
    /// Local session mirror
    pub sessions: SessionService,
    /// Business listings
    pub businesses: BusinessService,
    /// Opening hours
    pub hours: HoursService,
    /// Deals
    pub deals: DealService,
    /// Subscriptions
    pub subscriptions: SubscriptionService,
    /// Social media links
    pub social: SocialLinkService,
    /// User notifications
    pub notifications: NotificationService,
    /// Uploaded images
    pub images: BusinessImageService,
    /// Provider webhook handling
    pub webhooks: WebhookDispatcher,
}

impl AppState {
    /// Wire every service over `backends` and the external collaborators.
    pub fn new(
        config: AppConfig,
        backends: &Backends,
        gateway: Arc<dyn IdentityGateway>,
        storage: Arc<dyn StorageProvider>,
        verifier: Arc<dyn WebhookVerifier>,
        db: Option<DatabasePool>,
    ) -> Self {
        let provisioner = BusinessProvisioner::new(
            storage.clone(),
            QrRenderer::from_config(&config.directory),
            config.directory.clone(),
        );

        let invitations = InvitationService::new(
            backends.invitations.clone(),
            backends.units.clone(),
            gateway,
            provisioner.clone(),
        );
        let activation =
            ActivationService::new(backends.units.clone(), backends.invitations.clone());
        let users = UserService::new(backends.users.clone());
        let sessions = SessionService::new(backends.sessions.clone(), backends.users.clone());
        let businesses = BusinessService::new(backends.businesses.clone(), provisioner);
        let hours = HoursService::new(backends.hours.clone(), backends.businesses.clone());
        let notifications =
            NotificationService::new(backends.notifications.clone(), backends.users.clone());
        let deals = DealService::new(
            backends.deals.clone(),
            backends.businesses.clone(),
            notifications.clone(),
        );
        let social =
            SocialLinkService::new(backends.social_links.clone(), backends.businesses.clone());
        let images =
            BusinessImageService::new(backends.images.clone(), backends.businesses.clone(), storage);
        let subscriptions =
            SubscriptionService::new(backends.subscriptions.clone(), backends.businesses.clone());
        let webhooks = WebhookDispatcher::new(
            invitations.clone(),
            activation.clone(),
            users.clone(),
            sessions.clone(),
        );

        Self {
            config: Arc::new(config),
            db,
            verifier,
            invitations,
            activation,
            users,
            sessions,
            businesses,
            hours,
            deals,
            subscriptions,
            social,
            notifications,
            images,
            webhooks,
        }
    }
}
