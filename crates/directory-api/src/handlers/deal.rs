//! Deal handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;

use crate::dto::request::{CreateDealRequest, DealStatusRequest, UpdateDealRequest};
use crate::dto::response::{ApiResponse, DealResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{IdPath, ValidatedJson};
use crate::state::AppState;

fn many(deals: Vec<directory_entity::deal::Deal>) -> Vec<DealResponse> {
    deals.into_iter().map(Into::into).collect()
}

/// POST /api/deals
pub async fn create_deal(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateDealRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<DealResponse>>)> {
    let deal = state.deals.create(&req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(deal.into()))))
}

/// GET /api/deals/active
pub async fn list_active_deals(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<DealResponse>>>> {
    let deals = state.deals.list_active(Utc::now()).await?;
    Ok(Json(ApiResponse::ok(many(deals))))
}

/// GET /api/deals/business/{business_id}
pub async fn list_business_deals(
    State(state): State<AppState>,
    IdPath(business_id): IdPath,
) -> ApiResult<Json<ApiResponse<Vec<DealResponse>>>> {
    let deals = state.deals.list_by_business(business_id).await?;
    Ok(Json(ApiResponse::ok(many(deals))))
}

/// GET /api/deals/{id}
pub async fn get_deal(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<DealResponse>>> {
    let deal = state.deals.get(id).await?;
    Ok(Json(ApiResponse::ok(deal.into())))
}

/// GET /api/deals/code/{code}
pub async fn get_deal_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<ApiResponse<DealResponse>>> {
    let deal = state.deals.get_by_code(&code).await?;
    Ok(Json(ApiResponse::ok(deal.into())))
}

/// PATCH /api/deals/{id}
pub async fn update_deal(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateDealRequest>,
) -> ApiResult<Json<ApiResponse<DealResponse>>> {
    let deal = state.deals.update(id, &req.into()).await?;
    Ok(Json(ApiResponse::ok(deal.into())))
}

/// PATCH /api/deals/{id}/status
pub async fn set_deal_status(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Json(req): Json<DealStatusRequest>,
) -> ApiResult<Json<ApiResponse<DealResponse>>> {
    let deal = state.deals.set_status(id, req.status).await?;
    Ok(Json(ApiResponse::ok(deal.into())))
}

/// POST /api/deals/{id}/redeem
pub async fn redeem_deal(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<DealResponse>>> {
    let deal = state.deals.redeem(id).await?;
    Ok(Json(ApiResponse::ok(deal.into())))
}

/// DELETE /api/deals/{id}
pub async fn delete_deal(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.deals.delete(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Deal deleted"))))
}
