//! Invitation domain entities.

pub mod model;
pub mod status;

pub use model::{Invitation, InvitationFilter, NewInvitation};
pub use status::InvitationStatus;
