//! Subscription domain entities.

pub mod model;
pub mod status;

pub use model::{NewSubscription, Subscription, UpdateSubscription};
pub use status::{SubscriptionPlan, SubscriptionStatus};
