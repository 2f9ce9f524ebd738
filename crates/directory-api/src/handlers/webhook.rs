//! Identity provider webhook receiver.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use bytes::Bytes;

use directory_core::traits::WebhookHeaders;

use crate::dto::response::WebhookAck;
use crate::error::ApiResult;
use crate::state::AppState;

fn header(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// POST /api/clerk/webhooks
///
/// The body is taken raw because the signature covers the exact bytes.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookAck>> {
    let signature = WebhookHeaders {
        id: header(&headers, "svix-id"),
        timestamp: header(&headers, "svix-timestamp"),
        signature: header(&headers, "svix-signature"),
    };

    let event = state
        .webhooks
        .receive(&body, &signature, state.verifier.as_ref())
        .await?;

    Ok(Json(WebhookAck {
        success: true,
        event,
    }))
}
