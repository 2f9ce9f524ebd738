//! Deal domain entities.

pub mod model;
pub mod status;

pub use model::{Deal, NewDeal, UpdateDeal};
pub use status::DealStatus;
