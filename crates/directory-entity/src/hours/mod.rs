//! Business opening hours.

pub mod model;

pub use model::{BusinessHours, NewBusinessHours, UpdateBusinessHours, weekday_index};
