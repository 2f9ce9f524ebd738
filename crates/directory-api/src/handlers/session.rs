//! Session handlers.

use axum::Json;
use axum::extract::{Path, State};

use crate::dto::response::{ApiResponse, CountResponse, SessionResponse};
use crate::error::ApiResult;
use crate::extractors::IdPath;
use crate::state::AppState;

/// GET /api/sessions/user/{user_id}
pub async fn list_user_sessions(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<ApiResponse<Vec<SessionResponse>>>> {
    let sessions = state.sessions.list_by_user(user_id).await?;
    Ok(Json(ApiResponse::ok(
        sessions.into_iter().map(Into::into).collect(),
    )))
}

/// GET /api/sessions/{session_id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<ApiResponse<SessionResponse>>> {
    let session = state.sessions.get_by_external_id(&session_id).await?;
    Ok(Json(ApiResponse::ok(session.into())))
}

/// POST /api/sessions/{session_id}/end
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<ApiResponse<SessionResponse>>> {
    let session = state.sessions.end(&session_id).await?;
    Ok(Json(ApiResponse::ok(session.into())))
}

/// POST /api/sessions/{session_id}/revoke
pub async fn revoke_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<ApiResponse<SessionResponse>>> {
    let session = state.sessions.revoke(&session_id).await?;
    Ok(Json(ApiResponse::ok(session.into())))
}

/// DELETE /api/sessions/user/{user_id}/all
pub async fn revoke_all_user_sessions(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    let count = state.sessions.revoke_all_for_user(user_id).await?;
    Ok(Json(ApiResponse::ok(CountResponse {
        count: count as u64,
    })))
}
