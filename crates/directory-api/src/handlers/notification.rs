//! Notification inbox handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::request::{CreateNotificationRequest, UpdateNotificationRequest};
use crate::dto::response::{
    ApiResponse, CountResponse, MessageResponse, NotificationResponse, UnreadCountResponse,
};
use crate::error::ApiResult;
use crate::extractors::{IdPath, ValidatedJson};
use crate::state::AppState;

/// POST /api/notifications
pub async fn create_notification(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateNotificationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<NotificationResponse>>)> {
    let notification = state.notifications.create(&req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(notification.into()))))
}

/// GET /api/notifications/user/{user_id}
pub async fn list_user_notifications(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<ApiResponse<Vec<NotificationResponse>>>> {
    let notifications = state.notifications.list_by_user(user_id).await?;
    Ok(Json(ApiResponse::ok(
        notifications.into_iter().map(Into::into).collect(),
    )))
}

/// GET /api/notifications/user/{user_id}/unread/count
pub async fn unread_count(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<ApiResponse<UnreadCountResponse>>> {
    let count = state.notifications.unread_count(user_id).await?;
    Ok(Json(ApiResponse::ok(UnreadCountResponse { count })))
}

/// POST /api/notifications/user/{user_id}/read/all
pub async fn mark_all_read(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    let count = state.notifications.mark_all_read(user_id).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// GET /api/notifications/{id}
pub async fn get_notification(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<NotificationResponse>>> {
    let notification = state.notifications.get(id).await?;
    Ok(Json(ApiResponse::ok(notification.into())))
}

/// PATCH /api/notifications/{id}
pub async fn update_notification(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateNotificationRequest>,
) -> ApiResult<Json<ApiResponse<NotificationResponse>>> {
    let notification = state.notifications.update(id, &req.into()).await?;
    Ok(Json(ApiResponse::ok(notification.into())))
}

/// PATCH /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<NotificationResponse>>> {
    let notification = state.notifications.mark_read(id).await?;
    Ok(Json(ApiResponse::ok(notification.into())))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.notifications.delete(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Notification deleted",
    ))))
}
