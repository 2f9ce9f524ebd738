//! Persistence seams used by the service layer.
//!
//! Each trait is implemented by a Postgres repository and by
//! [`crate::memory::MemoryStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use directory_core::result::AppResult;
use directory_core::types::{PageRequest, PageResponse};
use directory_entity::business::{Business, BusinessFilter, NewBusiness};
use directory_entity::deal::{Deal, NewDeal};
use directory_entity::hours::{BusinessHours, NewBusinessHours};
use directory_entity::image::{BusinessImage, NewBusinessImage};
use directory_entity::invitation::{Invitation, InvitationFilter, NewInvitation};
use directory_entity::location::Location;
use directory_entity::notification::{NewNotification, Notification};
use directory_entity::session::{NewSession, Session};
use directory_entity::social::{NewSocialLink, SocialLink, SocialPlatform};
use directory_entity::subscription::{NewSubscription, Subscription};
use directory_entity::user::{NewUser, User};

/// Invitation reads and single-row writes outside a transaction.
#[async_trait]
pub trait InvitationStore: Send + Sync + std::fmt::Debug {
    /// Find a live invitation by internal id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Invitation>>;

    /// Find a live invitation by identity provider id.
    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<Invitation>>;

    /// Find the pending invitation for an email, compared case-insensitively.
    async fn find_pending_by_email(&self, email: &str) -> AppResult<Option<Invitation>>;

    /// List live invitations matching `filter`, newest first.
    async fn list(&self, filter: &InvitationFilter) -> AppResult<Vec<Invitation>>;

    /// Insert a pending invitation.
    async fn insert(&self, new: &NewInvitation) -> AppResult<Invitation>;

    /// Persist every mutable column of `invitation`.
    async fn save(&self, invitation: &Invitation) -> AppResult<Invitation>;
}

/// User reads and writes.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Find a live user by internal id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a live user by identity provider id.
    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<User>>;

    /// List live users, newest first.
    async fn list(&self, page: PageRequest) -> AppResult<PageResponse<User>>;

    /// Insert a user.
    async fn insert(&self, new: &NewUser) -> AppResult<User>;

    /// Persist every mutable column of `user`.
    async fn save(&self, user: &User) -> AppResult<User>;

    /// Mark one user deleted. Returns `false` if no live user matched.
    async fn soft_delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Business reads and writes outside the provisioning workflow.
#[async_trait]
pub trait BusinessStore: Send + Sync + std::fmt::Debug {
    /// Find a live business by internal id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Business>>;

    /// Find a live business by slug.
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Business>>;

    /// List live businesses matching `filter`; featured first, then newest.
    async fn list(
        &self,
        filter: &BusinessFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Business>>;

    /// Persist every mutable column of `business`.
    async fn save(&self, business: &Business) -> AppResult<Business>;

    /// Mark one business deleted. Returns `false` if no live business matched.
    async fn soft_delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Session reads and writes.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Find a session by identity provider id.
    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<Session>>;

    /// List a user's sessions, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>>;

    /// Insert an active session.
    async fn insert(&self, new: &NewSession) -> AppResult<Session>;

    /// Persist every mutable column of `session`.
    async fn save(&self, session: &Session) -> AppResult<Session>;
}

/// Weekly opening hours.
#[async_trait]
pub trait BusinessHoursStore: Send + Sync + std::fmt::Debug {
    /// Find one hours row by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BusinessHours>>;

    /// All rows for a business, ordered by day of week.
    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<BusinessHours>>;

    /// Insert a row. Fails with a conflict if the day already has one.
    async fn insert(&self, new: &NewBusinessHours) -> AppResult<BusinessHours>;

    /// Persist every mutable column of `hours`.
    async fn save(&self, hours: &BusinessHours) -> AppResult<BusinessHours>;

    /// Delete one row. Returns `false` if nothing matched.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Promotional deals.
#[async_trait]
pub trait DealStore: Send + Sync + std::fmt::Debug {
    /// Find a live deal by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Deal>>;

    /// Find a live deal by redemption code.
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Deal>>;

    /// Live deals of one business, newest first.
    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<Deal>>;

    /// Active deals whose window contains `now`, ending soonest first.
    async fn list_active(&self, now: DateTime<Utc>) -> AppResult<Vec<Deal>>;

    /// Insert a deal.
    async fn insert(&self, new: &NewDeal) -> AppResult<Deal>;

    /// Persist every mutable column of `deal`.
    async fn save(&self, deal: &Deal) -> AppResult<Deal>;

    /// Mark one deal deleted. Returns `false` if no live deal matched.
    async fn soft_delete(&self, id: Uuid) -> AppResult<bool>;

    /// Atomically count one redemption if the deal is still redeemable.
    async fn redeem(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Deal>;

    /// Move active deals whose end date has passed to expired.
    async fn expire_ended(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Business subscriptions.
#[async_trait]
pub trait SubscriptionStore: Send + Sync + std::fmt::Debug {
    /// Find a subscription by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>>;

    /// The subscription that is active for a business at `now`, if any.
    async fn find_active(
        &self,
        business_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Subscription>>;

    /// Every subscription of a business, newest first.
    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<Subscription>>;

    /// Insert a subscription.
    async fn insert(&self, new: &NewSubscription) -> AppResult<Subscription>;

    /// Persist every mutable column of `subscription`.
    async fn save(&self, subscription: &Subscription) -> AppResult<Subscription>;

    /// Move active subscriptions whose end date has passed to expired.
    async fn expire_ended(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Social media links of businesses.
#[async_trait]
pub trait SocialLinkStore: Send + Sync + std::fmt::Debug {
    /// Find a live link by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SocialLink>>;

    /// Every live link, newest first.
    async fn list(&self) -> AppResult<Vec<SocialLink>>;

    /// Live links of one business, ordered by platform.
    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<SocialLink>>;

    /// Whether the business has a link for `platform`, deleted or not.
    async fn platform_taken(&self, business_id: Uuid, platform: SocialPlatform)
    -> AppResult<bool>;

    /// Insert a link.
    async fn insert(&self, new: &NewSocialLink) -> AppResult<SocialLink>;

    /// Persist every mutable column of `link`.
    async fn save(&self, link: &SocialLink) -> AppResult<SocialLink>;

    /// Mark one link deleted. Returns `false` if no live link matched.
    async fn soft_delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Per-user notification inbox.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug {
    /// Find a live notification by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notification>>;

    /// Live notifications of one user, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>>;

    /// Insert a notification.
    async fn insert(&self, new: &NewNotification) -> AppResult<Notification>;

    /// Persist every mutable column of `notification`.
    async fn save(&self, notification: &Notification) -> AppResult<Notification>;

    /// Mark one notification deleted. Returns `false` if none matched.
    async fn soft_delete(&self, id: Uuid) -> AppResult<bool>;

    /// Mark every unread notification of a user read. Returns how many changed.
    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64>;

    /// Live unread notifications of a user.
    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64>;
}

/// Metadata rows for uploaded business images.
#[async_trait]
pub trait BusinessImageStore: Send + Sync + std::fmt::Debug {
    /// Find an image by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BusinessImage>>;

    /// Images of one business, newest first.
    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<BusinessImage>>;

    /// Insert an image row.
    async fn insert(&self, new: &NewBusinessImage) -> AppResult<BusinessImage>;

    /// Persist every mutable column of `image`.
    async fn save(&self, image: &BusinessImage) -> AppResult<BusinessImage>;

    /// Remove an image row. Returns `false` if none matched.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// One database transaction spanning invitations, users and businesses.
///
/// Nothing is visible to other callers until [`UnitOfWork::commit`].
/// Dropping the unit without committing rolls every write back.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Load an invitation by provider id and lock its row until the unit ends.
    async fn lock_invitation(&mut self, external_id: &str) -> AppResult<Option<Invitation>>;

    /// Find the pending invitation for an email.
    async fn pending_invitation_for_email(&mut self, email: &str)
    -> AppResult<Option<Invitation>>;

    /// Insert a pending invitation.
    async fn insert_invitation(&mut self, new: &NewInvitation) -> AppResult<Invitation>;

    /// Persist every mutable column of `invitation`.
    async fn save_invitation(&mut self, invitation: &Invitation) -> AppResult<Invitation>;

    /// Find a live user by identity provider id.
    async fn user_by_external_id(&mut self, external_id: &str) -> AppResult<Option<User>>;

    /// Insert a user.
    async fn insert_user(&mut self, new: &NewUser) -> AppResult<User>;

    /// Load a business and lock its row until the unit ends.
    async fn lock_business(&mut self, id: Uuid) -> AppResult<Option<Business>>;

    /// Whether any business (deleted or not) uses `slug`.
    async fn business_slug_exists(&mut self, slug: &str) -> AppResult<bool>;

    /// Whether any business (deleted or not) has `name` in `location`.
    async fn business_name_exists(&mut self, name: &str, location: Location) -> AppResult<bool>;

    /// Insert a business.
    async fn insert_business(&mut self, new: &NewBusiness) -> AppResult<Business>;

    /// Persist every mutable column of `business`.
    async fn save_business(&mut self, business: &Business) -> AppResult<Business>;

    /// Make every write in this unit durable and visible.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}

/// Opens units of work.
#[async_trait]
pub trait TransactionalStore: Send + Sync + std::fmt::Debug {
    /// Start a new unit of work.
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;
}
