//! # directory-entity
//!
//! Domain entity models for the local business directory. Every struct in
//! this crate represents a database row or a value object. Row structs
//! derive `sqlx::FromRow`; enums map to Postgres enum types.
//!
//! Mutations are expressed as methods that consume a record and return the
//! updated record, so callers persist complete values rather than patching
//! fields in place.

pub mod business;
pub mod deal;
pub mod hours;
pub mod image;
pub mod invitation;
pub mod location;
pub mod notification;
pub mod session;
pub mod social;
pub mod subscription;
pub mod user;
