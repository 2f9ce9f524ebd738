//! Route handlers organized by domain.

pub mod business;
pub mod deal;
pub mod health;
pub mod hours;
pub mod image;
pub mod invitation;
pub mod location;
pub mod notification;
pub mod session;
pub mod social;
pub mod subscription;
pub mod user;
pub mod webhook;
