//! Business image model and upload rules.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use directory_core::{AppError, AppResult};

/// Largest accepted upload.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// MIME types accepted for uploads.
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// Where an uploaded image is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    /// Profile picture. Stored as a private object.
    Profile,
    /// Gallery image. Stored as a public object.
    Static,
}

impl ImageKind {
    /// Storage folder for this kind.
    pub fn folder(&self) -> &'static str {
        match self {
            Self::Profile => "profile-images",
            Self::Static => "static-images",
        }
    }

    /// Whether objects of this kind are private.
    pub fn is_private(&self) -> bool {
        matches!(self, Self::Profile)
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Profile => "profile",
            Self::Static => "static",
        })
    }
}

impl FromStr for ImageKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profile" => Ok(Self::Profile),
            "static" => Ok(Self::Static),
            other => Err(AppError::validation(format!(
                "Unknown image type '{other}', expected 'profile' or 'static'"
            ))),
        }
    }
}

/// An image uploaded for a business listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BusinessImage {
    /// Internal identifier.
    pub id: Uuid,
    /// Business the image belongs to, if attached yet.
    pub business_id: Option<Uuid>,
    /// Name the file was uploaded under.
    pub file_name: String,
    /// URL the image is served from.
    pub file_url: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Object key in storage.
    pub storage_key: String,
    /// Profile images are private.
    pub is_private: bool,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to record an uploaded image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBusinessImage {
    /// Owning business.
    pub business_id: Option<Uuid>,
    /// Original file name.
    pub file_name: String,
    /// Serving URL.
    pub file_url: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Object key in storage.
    pub storage_key: String,
    /// Private flag.
    pub is_private: bool,
}

/// Check an upload against the type and size limits.
pub fn check_upload(mime_type: &str, size: usize) -> AppResult<()> {
    if !ALLOWED_IMAGE_TYPES.contains(&mime_type) {
        return Err(AppError::validation(
            "Invalid file type. Only JPEG and PNG are allowed",
        ));
    }
    if size == 0 {
        return Err(AppError::validation("No file uploaded"));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(AppError::validation(
            "File size too large. Maximum size is 5MB",
        ));
    }
    Ok(())
}

/// Object key for an upload: `{folder}/{millis}-{name}` with the name
/// reduced to URL-safe characters.
pub fn storage_key(kind: ImageKind, file_name: &str, now: DateTime<Utc>) -> String {
    let name: String = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let name = if name.trim_matches(['.', '-']).is_empty() {
        "image".to_string()
    } else {
        name
    };
    format!("{}/{}-{name}", kind.folder(), now.timestamp_millis())
}
