//! Identity provider REST gateway.

pub mod client;
pub mod wire;

pub use client::ClerkClient;
pub use wire::{EmailAddress, UserPayload};
