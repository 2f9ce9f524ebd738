//! User handlers.

use axum::Json;
use axum::extract::{Path, State};

use crate::dto::request::UpdateUserRequest;
use crate::dto::response::{
    ApiResponse, BusinessResponse, MessageResponse, PaginatedResponse, UserResponse,
};
use crate::error::ApiResult;
use crate::extractors::{IdPath, PaginationParams, QueryParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<UserResponse>>>> {
    let page = state.users.list(params.into_page_request()).await?;
    Ok(Json(ApiResponse::ok(PaginatedResponse::from_page(page))))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state.users.get(id).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// GET /api/users/clerk/{external_id}
pub async fn get_user_by_external_id(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state.users.get_by_external_id(&external_id).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PATCH /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state.users.update(id, &req.into()).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.users.delete(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("User deleted"))))
}

/// GET /api/users/{id}/businesses
pub async fn list_user_businesses(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    QueryParams(params): QueryParams<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<BusinessResponse>>>> {
    let user = state.users.get(id).await?;
    let page = state
        .businesses
        .list_by_owner(user.id, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(PaginatedResponse::from_page(page))))
}
