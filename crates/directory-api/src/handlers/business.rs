//! Business listing handlers.

use axum::Json;
use axum::extract::{Path, State};

use crate::dto::request::{BusinessListQuery, OpenQuery, UpdateBusinessRequest};
use crate::dto::response::{
    ApiResponse, BusinessResponse, MessageResponse, OpenStatusResponse, PaginatedResponse,
};
use crate::error::ApiResult;
use crate::extractors::{IdPath, PaginationParams, QueryParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/businesses
pub async fn list_businesses(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<BusinessListQuery>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<BusinessResponse>>>> {
    let (filter, page) = query.into_parts();
    let page = state.businesses.list(&filter, page).await?;
    Ok(Json(ApiResponse::ok(PaginatedResponse::from_page(page))))
}

/// GET /api/businesses/{id}
pub async fn get_business(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<BusinessResponse>>> {
    let business = state.businesses.get(id).await?;
    Ok(Json(ApiResponse::ok(business.into())))
}

/// GET /api/businesses/slug/{slug}
pub async fn get_business_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ApiResponse<BusinessResponse>>> {
    let business = state.businesses.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::ok(business.into())))
}

/// GET /api/businesses/user/{user_id}
pub async fn list_businesses_by_owner(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
    QueryParams(params): QueryParams<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<BusinessResponse>>>> {
    let page = state
        .businesses
        .list_by_owner(user_id, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(PaginatedResponse::from_page(page))))
}

/// PATCH /api/businesses/{id}
pub async fn update_business(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateBusinessRequest>,
) -> ApiResult<Json<ApiResponse<BusinessResponse>>> {
    let business = state.businesses.update(id, &req.into()).await?;
    Ok(Json(ApiResponse::ok(business.into())))
}

/// DELETE /api/businesses/{id}
pub async fn delete_business(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.businesses.delete(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Business deleted",
    ))))
}

/// POST /api/businesses/{id}/qr-code/generate
pub async fn regenerate_qr_code(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<BusinessResponse>>> {
    let business = state.businesses.regenerate_qr_code(id).await?;
    Ok(Json(ApiResponse::ok(business.into())))
}

/// GET /api/businesses/{id}/open?at=2026-03-02T09:30:00
pub async fn open_status(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    QueryParams(query): QueryParams<OpenQuery>,
) -> ApiResult<Json<ApiResponse<OpenStatusResponse>>> {
    let at = query
        .at
        .unwrap_or_else(|| chrono::Local::now().naive_local());
    let status = state.hours.open_status(id, at).await?;
    Ok(Json(ApiResponse::ok(status.into())))
}
