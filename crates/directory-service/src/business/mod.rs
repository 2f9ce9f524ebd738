//! Business listings and their weekly hours.

pub mod hours;
pub mod service;

pub use hours::{HoursService, OpenStatus};
pub use service::BusinessService;
