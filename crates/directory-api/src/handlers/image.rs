//! Business image upload handlers.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use bytes::Bytes;
use uuid::Uuid;

use directory_core::error::AppError;
use directory_entity::image::ImageKind;
use directory_service::ImageUpload;

use crate::dto::response::{ApiResponse, BusinessImageResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::IdPath;
use crate::extractors::path::parse_uuid;
use crate::state::AppState;

/// POST /api/business-images/upload/{kind}
///
/// Multipart fields: `file` and an optional `businessId`.
pub async fn upload_image(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<BusinessImageResponse>>)> {
    let kind: ImageKind = kind.parse()?;
    let mut business_id: Option<Uuid> = None;
    let mut file: Option<(String, String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "businessId" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                if !text.trim().is_empty() {
                    business_id = Some(parse_uuid(text.trim())?);
                }
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                file = Some((file_name, mime_type, data));
            }
            _ => {}
        }
    }

    let (file_name, mime_type, data) =
        file.ok_or_else(|| AppError::validation("No file uploaded"))?;
    let image = state
        .images
        .upload(ImageUpload {
            kind,
            business_id,
            file_name,
            mime_type,
            data,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(image.into()))))
}

/// GET /api/business-images/business/{business_id}
pub async fn list_business_images(
    State(state): State<AppState>,
    IdPath(business_id): IdPath,
) -> ApiResult<Json<ApiResponse<Vec<BusinessImageResponse>>>> {
    let images = state.images.list_by_business(business_id).await?;
    Ok(Json(ApiResponse::ok(
        images.into_iter().map(Into::into).collect(),
    )))
}

/// GET /api/business-images/{id}
pub async fn get_image(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<BusinessImageResponse>>> {
    let image = state.images.get(id).await?;
    Ok(Json(ApiResponse::ok(image.into())))
}

/// POST /api/business-images/refresh-url/{id}
pub async fn refresh_image_url(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<BusinessImageResponse>>> {
    let image = state.images.refresh_url(id).await?;
    Ok(Json(ApiResponse::ok(image.into())))
}

/// DELETE /api/business-images/{id}
pub async fn delete_image(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.images.delete(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Image deleted"))))
}
