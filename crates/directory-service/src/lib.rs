//! # directory-service
//!
//! Business logic for the local business directory. Each service
//! orchestrates the stores from `directory-database` and the external
//! collaborators (identity provider, object storage) to implement one
//! group of use cases.
//!
//! Services follow constructor injection: every dependency is handed over
//! at construction time as an `Arc` to a trait object, so the same code
//! runs against Postgres in production and the in-memory store in tests.

pub mod business;
pub mod deal;
pub mod image;
pub mod invitation;
pub mod notification;
pub mod qr;
pub mod session;
pub mod social;
pub mod subscription;
pub mod sweep;
pub mod user;
pub mod webhook;

#[cfg(test)]
pub(crate) mod testing;

pub use business::{BusinessService, HoursService, OpenStatus};
pub use deal::DealService;
pub use image::{BusinessImageService, ImageUpload};
pub use invitation::{
    ActivationService, CreateInvitation, InvitationService, TicketProjection, TicketVerifier,
};
pub use notification::NotificationService;
pub use qr::QrRenderer;
pub use session::SessionService;
pub use social::SocialLinkService;
pub use subscription::SubscriptionService;
pub use sweep::ExpirationSweeps;
pub use user::UserService;
pub use webhook::{WebhookDispatcher, WebhookEvent};
