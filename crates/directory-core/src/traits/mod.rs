//! Collaborator traits defined in `directory-core` and implemented by
//! the storage and identity crates.

pub mod identity;
pub mod storage;
pub mod webhook;

pub use identity::{ExternalInvitation, ExternalUser, IdentityGateway, InvitationRequest};
pub use storage::StorageProvider;
pub use webhook::{WebhookHeaders, WebhookVerifier};
