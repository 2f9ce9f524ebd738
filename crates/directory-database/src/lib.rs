//! # directory-database
//!
//! PostgreSQL connection management, repository implementations, and the
//! unit of work used by multi-entity workflows. An in-memory store backs
//! the same traits for tests and local experimentation.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod unit_of_work;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{
    BusinessHoursStore, BusinessImageStore, BusinessStore, DealStore, InvitationStore,
    NotificationStore, SessionStore, SocialLinkStore, SubscriptionStore, TransactionalStore,
    UnitOfWork, UserStore,
};
pub use unit_of_work::PgTransactionalStore;
