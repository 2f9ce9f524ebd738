//! # directory-identity
//!
//! Integration with the hosted identity provider.
//!
//! ## Modules
//!
//! - `gateway`: REST client for invitations and users
//! - `ticket`: invitation ticket decoding
//! - `webhook`: Svix-style webhook signature verification

pub mod gateway;
pub mod ticket;
pub mod webhook;

pub use gateway::{ClerkClient, UserPayload};
pub use ticket::{TicketClaims, decode_ticket};
pub use webhook::{NoVerification, SvixVerifier};
