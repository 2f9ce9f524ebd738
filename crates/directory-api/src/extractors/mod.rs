//! Custom Axum extractors that reject with the API error body.

pub mod pagination;
pub mod path;
pub mod query;
pub mod validated;

pub use pagination::PaginationParams;
pub use path::IdPath;
pub use query::QueryParams;
pub use validated::ValidatedJson;
