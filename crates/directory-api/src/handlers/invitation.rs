//! Invitation handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::dto::request::{AcceptInvitationRequest, CreateInvitationRequest, InvitationListQuery};
use crate::dto::response::{ApiResponse, InvitationResponse, TicketResponse};
use crate::error::ApiResult;
use crate::extractors::{IdPath, QueryParams, ValidatedJson};
use crate::state::AppState;

/// POST /api/invitations
pub async fn create_invitation(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateInvitationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<InvitationResponse>>)> {
    let invitation = state.invitations.create(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(invitation.into())),
    ))
}

/// GET /api/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<InvitationListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<InvitationResponse>>>> {
    let invitations = state.invitations.list(&query.into()).await?;
    Ok(Json(ApiResponse::ok(
        invitations.into_iter().map(Into::into).collect(),
    )))
}

/// GET /api/invitations/{id}
pub async fn get_invitation(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<InvitationResponse>>> {
    let invitation = state.invitations.get(id).await?;
    Ok(Json(ApiResponse::ok(invitation.into())))
}

/// GET /api/invitations/clerk/{external_id}
pub async fn get_invitation_by_external_id(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> ApiResult<Json<ApiResponse<InvitationResponse>>> {
    let invitation = state.invitations.get_by_external_id(&external_id).await?;
    Ok(Json(ApiResponse::ok(invitation.into())))
}

/// GET /api/invitations/verify/{token}
///
/// Public: the accept page calls this before the invitee has an account.
pub async fn verify_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<ApiResponse<TicketResponse>>> {
    let projection = state.invitations.verify_token(&token).await?;
    Ok(Json(ApiResponse::ok(projection.into())))
}

/// POST /api/invitations/accept
pub async fn accept_invitation(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AcceptInvitationRequest>,
) -> ApiResult<Json<ApiResponse<InvitationResponse>>> {
    let invitation = state.activation.accept(&req.user_id, &req.ticket).await?;
    Ok(Json(ApiResponse::ok(invitation.into())))
}

/// POST /api/invitations/{id}/resend
pub async fn resend_invitation(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<InvitationResponse>>> {
    let invitation = state.invitations.resend(id).await?;
    Ok(Json(ApiResponse::ok(invitation.into())))
}

/// POST /api/invitations/{id}/cancel
pub async fn cancel_invitation(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<InvitationResponse>>> {
    let invitation = state.invitations.cancel(id).await?;
    Ok(Json(ApiResponse::ok(invitation.into())))
}
