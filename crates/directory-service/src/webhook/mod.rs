//! Inbound identity provider webhooks.

pub mod dispatcher;
pub mod events;

pub use dispatcher::WebhookDispatcher;
pub use events::{EventKind, WebhookEvent};
