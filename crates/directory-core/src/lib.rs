//! # directory-core
//!
//! Core crate for the local business directory backend. Holds the
//! configuration schema, the unified error type, pagination types, and the
//! traits through which the service layer reaches its external
//! collaborators (object storage, the identity provider, webhook signing).
//!
//! This crate has **no** internal dependencies on other directory crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
