//! Postgres repository implementations.
//!
//! Statements are written against a generic `PgExecutor` so the same SQL
//! runs on the pool and inside a transaction.

pub mod business;
pub mod deal;
pub mod hours;
pub mod image;
pub mod invitation;
pub mod notification;
pub mod session;
pub mod social;
pub mod subscription;
pub mod user;

pub use business::BusinessRepository;
pub use deal::DealRepository;
pub use hours::BusinessHoursRepository;
pub use image::BusinessImageRepository;
pub use invitation::InvitationRepository;
pub use notification::NotificationRepository;
pub use session::SessionRepository;
pub use social::SocialLinkRepository;
pub use subscription::SubscriptionRepository;
pub use user::UserRepository;

use directory_core::error::{AppError, ErrorKind};

/// Client-facing message for a violated unique constraint or index.
pub fn conflict_message(constraint: &str) -> Option<&'static str> {
    let message = match constraint {
        "users_external_id_key" => "A user with this external id already exists",
        "businesses_slug_key" => "A business with this slug already exists",
        "businesses_name_location_key" => {
            "A business with this name already exists in this location"
        }
        "invitations_external_invitation_id_key" => {
            "An invitation with this external id already exists"
        }
        "invitations_pending_email_idx" => "A pending invitation already exists for this email",
        "sessions_external_session_id_key" => "A session with this external id already exists",
        "business_hours_business_day_key" => "Business hours already exist for this day",
        "deals_code_key" => "A deal with this code already exists",
        "social_links_business_platform_key" => {
            "An account for this platform already exists for this business"
        }
        "business_images_storage_key_key" => "An image with this storage key already exists",
        _ => return None,
    };
    Some(message)
}

/// Map a sqlx error to an [`AppError`], turning known unique violations
/// into conflicts and check violations into validation errors.
pub(crate) fn map_db_error(err: sqlx::Error, context: &'static str) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if let Some(message) = db_err.constraint().and_then(conflict_message) {
            return AppError::conflict(message);
        }
        if db_err.is_check_violation() {
            return AppError::validation(format!("{context}: {}", db_err.message()));
        }
        if db_err.is_foreign_key_violation() {
            return AppError::not_found(format!("{context}: referenced row does not exist"));
        }
    }
    AppError::with_source(ErrorKind::Database, context, err)
}
