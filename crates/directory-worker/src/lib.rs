//! Scheduled background work for the local business directory.
//!
//! This crate provides:
//! - A cron scheduler that fires the expiration sweeps
//! - The sweep jobs themselves, which log failures instead of propagating them

pub mod jobs;
pub mod scheduler;

pub use jobs::{ExpirationJob, SweepKind};
pub use scheduler::CronScheduler;
