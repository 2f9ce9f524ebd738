//! Location handlers.

use axum::Json;

use directory_entity::location::Location;

use crate::dto::response::{ApiResponse, LocationResponse};

/// GET /api/locations
pub async fn list_locations() -> Json<ApiResponse<Vec<LocationResponse>>> {
    Json(ApiResponse::ok(
        Location::ALL.into_iter().map(LocationResponse::from).collect(),
    ))
}
