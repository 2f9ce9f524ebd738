//! Subscription handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;

use crate::dto::request::{CreateSubscriptionRequest, UpdateSubscriptionRequest};
use crate::dto::response::{ApiResponse, SubscriptionResponse};
use crate::error::ApiResult;
use crate::extractors::{IdPath, ValidatedJson};
use crate::state::AppState;

/// POST /api/subscriptions
pub async fn create_subscription(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateSubscriptionRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SubscriptionResponse>>)> {
    let subscription = state
        .subscriptions
        .create(&req.into_new(Utc::now()))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(subscription.into())),
    ))
}

/// GET /api/subscriptions/{id}
pub async fn get_subscription(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<SubscriptionResponse>>> {
    let subscription = state.subscriptions.get(id).await?;
    Ok(Json(ApiResponse::ok(subscription.into())))
}

/// GET /api/subscriptions/business/{business_id}
pub async fn list_business_subscriptions(
    State(state): State<AppState>,
    IdPath(business_id): IdPath,
) -> ApiResult<Json<ApiResponse<Vec<SubscriptionResponse>>>> {
    let subscriptions = state.subscriptions.list_by_business(business_id).await?;
    Ok(Json(ApiResponse::ok(
        subscriptions.into_iter().map(Into::into).collect(),
    )))
}

/// GET /api/subscriptions/business/{business_id}/active
pub async fn get_active_subscription(
    State(state): State<AppState>,
    IdPath(business_id): IdPath,
) -> ApiResult<Json<ApiResponse<SubscriptionResponse>>> {
    let subscription = state.subscriptions.active_for(business_id).await?;
    Ok(Json(ApiResponse::ok(subscription.into())))
}

/// PATCH /api/subscriptions/{id}
pub async fn update_subscription(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateSubscriptionRequest>,
) -> ApiResult<Json<ApiResponse<SubscriptionResponse>>> {
    let subscription = state.subscriptions.update(id, &req.into()).await?;
    Ok(Json(ApiResponse::ok(subscription.into())))
}

/// POST /api/subscriptions/{id}/cancel
pub async fn cancel_subscription(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<SubscriptionResponse>>> {
    let subscription = state.subscriptions.cancel(id).await?;
    Ok(Json(ApiResponse::ok(subscription.into())))
}
