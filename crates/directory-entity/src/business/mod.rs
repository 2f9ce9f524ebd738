//! Business domain entities.

pub mod model;
pub mod status;

pub use model::{Business, BusinessFilter, NewBusiness, UpdateBusiness};
pub use status::BusinessStatus;
