//! Business hours handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::request::{CreateHoursRequest, UpdateHoursRequest};
use crate::dto::response::{ApiResponse, HoursResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{IdPath, ValidatedJson};
use crate::state::AppState;

/// POST /api/business-hours
pub async fn create_hours(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateHoursRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<HoursResponse>>)> {
    let hours = state.hours.create(&req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(hours.into()))))
}

/// GET /api/business-hours/business/{business_id}
pub async fn list_business_hours(
    State(state): State<AppState>,
    IdPath(business_id): IdPath,
) -> ApiResult<Json<ApiResponse<Vec<HoursResponse>>>> {
    let hours = state.hours.list(business_id).await?;
    Ok(Json(ApiResponse::ok(
        hours.into_iter().map(Into::into).collect(),
    )))
}

/// GET /api/business-hours/{id}
pub async fn get_hours(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<HoursResponse>>> {
    let hours = state.hours.get(id).await?;
    Ok(Json(ApiResponse::ok(hours.into())))
}

/// PATCH /api/business-hours/{id}
pub async fn update_hours(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateHoursRequest>,
) -> ApiResult<Json<ApiResponse<HoursResponse>>> {
    let hours = state.hours.update(id, &req.into()).await?;
    Ok(Json(ApiResponse::ok(hours.into())))
}

/// DELETE /api/business-hours/{id}
pub async fn delete_hours(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.hours.delete(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Business hours deleted",
    ))))
}
