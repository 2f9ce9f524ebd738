//! Job implementations run by the scheduler.

pub mod expiration;

pub use expiration::{ExpirationJob, SweepKind};
