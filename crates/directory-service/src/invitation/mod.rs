//! Invitation workflow: issuing invitations with their business shells,
//! ticket verification, and activation on acceptance.

pub mod activation;
pub mod provisioning;
pub mod service;
pub mod slug;
pub mod ticket;

pub use activation::ActivationService;
pub use provisioning::{BusinessProvisioner, Compensation, ShellRequest};
pub use service::{CreateInvitation, InvitationService};
pub use slug::slugify;
pub use ticket::{TicketProjection, TicketVerifier};
