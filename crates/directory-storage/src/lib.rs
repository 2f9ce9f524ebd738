//! # directory-storage
//!
//! Object storage providers for generated assets such as business QR codes.
//! Supports the local filesystem, S3-compatible object stores, and an
//! in-memory store for tests.

pub mod manager;
pub mod providers;

pub use manager::build_provider;
pub use providers::{LocalStorageProvider, MemoryStorageProvider};
