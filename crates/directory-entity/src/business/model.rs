//! Business entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use directory_core::{AppError, AppResult};

use super::status::BusinessStatus;
use crate::location::Location;

/// Highest allowed average rating.
pub const MAX_RATING: f64 = 5.0;

/// A listed business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Business {
    /// Internal identifier.
    pub id: Uuid,
    /// Display name. Unique per location.
    pub name: String,
    /// URL-safe identifier. Globally unique.
    pub slug: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Category label (e.g. "restaurant").
    pub category: Option<String>,
    /// Contact person first name.
    pub contact_first_name: Option<String>,
    /// Contact person last name.
    pub contact_last_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Listing state.
    pub status: BusinessStatus,
    /// City the business is listed in.
    pub location_id: Location,
    /// Owning user, once the invitation is accepted.
    pub user_id: Option<Uuid>,
    /// Average rating in `[0, 5]`.
    pub rating: f64,
    /// Number of reviews behind `rating`.
    pub review_count: i32,
    /// Promoted in listings.
    pub featured: bool,
    /// Public URL of the profile QR code image.
    pub qr_code_url: Option<String>,
    /// When the QR code was last rendered.
    pub qr_code_generated_at: Option<DateTime<Utc>>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Business {
    /// Return this business claimed by `owner_id` and promoted to active.
    ///
    /// Empty contact names are backfilled: the first name from
    /// `fallback_first_name`, the last name stays empty.
    pub fn activate(self, owner_id: Uuid, fallback_first_name: &str, now: DateTime<Utc>) -> Self {
        let contact_first_name = non_empty(self.contact_first_name)
            .or_else(|| Some(fallback_first_name.to_string()));
        Self {
            user_id: Some(owner_id),
            status: BusinessStatus::Active,
            contact_first_name,
            contact_last_name: non_empty(self.contact_last_name),
            updated_at: now,
            ..self
        }
    }

    /// Return this business with a freshly rendered QR code.
    pub fn with_qr_code(self, url: String, now: DateTime<Utc>) -> Self {
        Self {
            qr_code_url: Some(url),
            qr_code_generated_at: Some(now),
            updated_at: now,
            ..self
        }
    }

    /// Return this business with the given fields replaced.
    pub fn with_update(self, update: &UpdateBusiness, now: DateTime<Utc>) -> AppResult<Self> {
        update.validate()?;
        Ok(Self {
            name: update.name.clone().unwrap_or(self.name),
            description: update.description.clone().or(self.description),
            category: update.category.clone().or(self.category),
            contact_first_name: update.contact_first_name.clone().or(self.contact_first_name),
            contact_last_name: update.contact_last_name.clone().or(self.contact_last_name),
            email: update.email.clone().or(self.email),
            phone: update.phone.clone().or(self.phone),
            website: update.website.clone().or(self.website),
            status: update.status.unwrap_or(self.status),
            location_id: update.location_id.unwrap_or(self.location_id),
            rating: update.rating.unwrap_or(self.rating),
            review_count: update.review_count.unwrap_or(self.review_count),
            featured: update.featured.unwrap_or(self.featured),
            updated_at: now,
            ..self
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Data required to create a business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBusiness {
    /// Display name.
    pub name: String,
    /// URL-safe identifier.
    pub slug: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Category label.
    pub category: Option<String>,
    /// Contact person first name.
    pub contact_first_name: Option<String>,
    /// Contact person last name.
    pub contact_last_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Initial listing state.
    pub status: BusinessStatus,
    /// City the business is listed in.
    pub location_id: Location,
    /// Owning user, if already known.
    pub user_id: Option<Uuid>,
    /// Public URL of the QR code image.
    pub qr_code_url: Option<String>,
    /// When the QR code was rendered.
    pub qr_code_generated_at: Option<DateTime<Utc>>,
}

/// Explicit field list for business updates. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBusiness {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New contact first name.
    pub contact_first_name: Option<String>,
    /// New contact last name.
    pub contact_last_name: Option<String>,
    /// New contact email.
    pub email: Option<String>,
    /// New contact phone.
    pub phone: Option<String>,
    /// New website.
    pub website: Option<String>,
    /// New listing state.
    pub status: Option<BusinessStatus>,
    /// New location.
    pub location_id: Option<Location>,
    /// New average rating.
    pub rating: Option<f64>,
    /// New review count.
    pub review_count: Option<i32>,
    /// Promote or demote.
    pub featured: Option<bool>,
}

impl UpdateBusiness {
    /// Check field-level rules.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(rating) = self.rating {
            if !(0.0..=MAX_RATING).contains(&rating) {
                return Err(AppError::validation("Rating must be between 0 and 5"));
            }
        }
        if matches!(self.review_count, Some(n) if n < 0) {
            return Err(AppError::validation("Review count cannot be negative"));
        }
        if matches!(&self.name, Some(n) if n.trim().is_empty()) {
            return Err(AppError::validation("Business name cannot be empty"));
        }
        Ok(())
    }
}

/// Listing filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessFilter {
    /// Only businesses in this city.
    pub location_id: Option<Location>,
    /// Only businesses in this state.
    pub status: Option<BusinessStatus>,
    /// Exact category match.
    pub category: Option<String>,
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
    /// Only businesses owned by this user.
    pub user_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell() -> Business {
        let now = Utc::now();
        Business {
            id: Uuid::new_v4(),
            name: "Shop X".into(),
            slug: "shop-x".into(),
            description: None,
            category: None,
            contact_first_name: Some("  ".into()),
            contact_last_name: None,
            email: Some("owner@shop.com".into()),
            phone: None,
            website: None,
            status: BusinessStatus::Pending,
            location_id: Location::McAllen,
            user_id: None,
            rating: 0.0,
            review_count: 0,
            featured: false,
            qr_code_url: None,
            qr_code_generated_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_activate_assigns_owner_and_backfills_contact() {
        let owner = Uuid::new_v4();
        let active = shell().activate(owner, "Shop X", Utc::now());
        assert_eq!(active.status, BusinessStatus::Active);
        assert_eq!(active.user_id, Some(owner));
        assert_eq!(active.contact_first_name.as_deref(), Some("Shop X"));
        assert_eq!(active.contact_last_name, None);
    }

    #[test]
    fn test_activate_keeps_existing_contact() {
        let business = Business {
            contact_first_name: Some("Maria".into()),
            contact_last_name: Some("Lopez".into()),
            ..shell()
        };
        let active = business.activate(Uuid::new_v4(), "Shop X", Utc::now());
        assert_eq!(active.contact_first_name.as_deref(), Some("Maria"));
        assert_eq!(active.contact_last_name.as_deref(), Some("Lopez"));
    }

    #[test]
    fn test_rating_out_of_range_is_rejected() {
        let update = UpdateBusiness {
            rating: Some(5.5),
            ..UpdateBusiness::default()
        };
        assert!(shell().with_update(&update, Utc::now()).is_err());
    }
}
