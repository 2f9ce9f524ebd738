//! Webhook signature verification.

pub mod svix;

pub use svix::{NoVerification, SvixVerifier};
