//! Social media link handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use directory_entity::social::SocialLink;

use crate::dto::request::{CreateSocialLinkRequest, SyncFollowersRequest, UpdateSocialLinkRequest};
use crate::dto::response::{ApiResponse, MessageResponse, SocialLinkResponse};
use crate::error::ApiResult;
use crate::extractors::{IdPath, ValidatedJson};
use crate::state::AppState;

fn many(links: Vec<SocialLink>) -> Vec<SocialLinkResponse> {
    links.into_iter().map(Into::into).collect()
}

/// POST /api/social-media
pub async fn create_social_link(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateSocialLinkRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SocialLinkResponse>>)> {
    let link = state.social.create(&req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(link.into()))))
}

/// GET /api/social-media
pub async fn list_social_links(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<SocialLinkResponse>>>> {
    let links = state.social.list().await?;
    Ok(Json(ApiResponse::ok(many(links))))
}

/// GET /api/social-media/business/{business_id}
pub async fn list_business_social_links(
    State(state): State<AppState>,
    IdPath(business_id): IdPath,
) -> ApiResult<Json<ApiResponse<Vec<SocialLinkResponse>>>> {
    let links = state.social.list_by_business(business_id).await?;
    Ok(Json(ApiResponse::ok(many(links))))
}

/// GET /api/social-media/{id}
pub async fn get_social_link(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<SocialLinkResponse>>> {
    let link = state.social.get(id).await?;
    Ok(Json(ApiResponse::ok(link.into())))
}

/// PATCH /api/social-media/{id}
pub async fn update_social_link(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateSocialLinkRequest>,
) -> ApiResult<Json<ApiResponse<SocialLinkResponse>>> {
    let link = state.social.update(id, &req.into()).await?;
    Ok(Json(ApiResponse::ok(link.into())))
}

/// PATCH /api/social-media/{id}/sync-followers
pub async fn sync_followers(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<SyncFollowersRequest>,
) -> ApiResult<Json<ApiResponse<SocialLinkResponse>>> {
    let link = state.social.sync_followers(id, req.followers).await?;
    Ok(Json(ApiResponse::ok(link.into())))
}

/// DELETE /api/social-media/{id}
pub async fn delete_social_link(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.social.delete(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Social media link deleted",
    ))))
}
