//! # directory-api
//!
//! HTTP API layer for the local business directory built on Axum.
//!
//! Provides the REST endpoints, the identity provider webhook endpoint,
//! middleware (request logging, CORS, compression, timeouts), extractors,
//! DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::{AppState, Backends};
