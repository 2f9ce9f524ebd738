//! Deal entity model and redemption rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use directory_core::{AppError, AppResult};

use super::status::DealStatus;

/// A time-boxed offer published by a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Deal {
    /// Internal identifier.
    pub id: Uuid,
    /// Publishing business.
    pub business_id: Uuid,
    /// Headline.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Human-readable discount label (e.g. "20% off").
    pub discount: String,
    /// Regular price.
    pub original_price: f64,
    /// Price with the deal applied.
    pub discounted_price: f64,
    /// Redemption code. Unique.
    pub code: String,
    /// First moment the deal is valid.
    pub start_date: DateTime<Utc>,
    /// Last moment the deal is valid.
    pub end_date: DateTime<Utc>,
    /// Fine print.
    pub terms: Vec<String>,
    /// Current state.
    pub status: DealStatus,
    /// Redemptions so far.
    pub redemption_count: i32,
    /// Cap on redemptions; `None` means unlimited.
    pub max_redemptions: Option<i32>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Deal {
    /// Check whether one more redemption is allowed at `now`.
    pub fn check_redeemable(&self, now: DateTime<Utc>) -> AppResult<()> {
        if self.status != DealStatus::Active {
            return Err(AppError::validation("Deal is not active"));
        }
        if now > self.end_date {
            return Err(AppError::validation("Deal has expired"));
        }
        if let Some(max) = self.max_redemptions {
            if self.redemption_count >= max {
                return Err(AppError::validation(
                    "Deal has reached maximum redemptions",
                ));
            }
        }
        Ok(())
    }

    /// Whether the deal is active and `now` lies within its date window.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == DealStatus::Active && self.start_date <= now && now <= self.end_date
    }
}

/// Data required to create a deal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDeal {
    /// Publishing business.
    pub business_id: Uuid,
    /// Headline.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Discount label.
    pub discount: String,
    /// Regular price.
    pub original_price: f64,
    /// Price with the deal applied.
    pub discounted_price: f64,
    /// Redemption code.
    pub code: String,
    /// First valid moment.
    pub start_date: DateTime<Utc>,
    /// Last valid moment.
    pub end_date: DateTime<Utc>,
    /// Fine print.
    pub terms: Vec<String>,
    /// Initial state.
    pub status: DealStatus,
    /// Redemption cap.
    pub max_redemptions: Option<i32>,
}

impl NewDeal {
    /// Check cross-field rules.
    pub fn validate(&self) -> AppResult<()> {
        if self.discounted_price >= self.original_price {
            return Err(AppError::validation(
                "Discounted price must be lower than the original price",
            ));
        }
        if self.start_date >= self.end_date {
            return Err(AppError::validation("End date must be after start date"));
        }
        if matches!(self.max_redemptions, Some(n) if n < 1) {
            return Err(AppError::validation("Max redemptions must be at least 1"));
        }
        Ok(())
    }
}

/// Explicit field list for deal updates. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDeal {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New discount label.
    pub discount: Option<String>,
    /// New original price.
    pub original_price: Option<f64>,
    /// New discounted price.
    pub discounted_price: Option<f64>,
    /// New start of the redemption window.
    pub start_date: Option<DateTime<Utc>>,
    /// New end of the redemption window.
    pub end_date: Option<DateTime<Utc>>,
    /// New terms.
    pub terms: Option<Vec<String>>,
    /// New status.
    pub status: Option<DealStatus>,
    /// New redemption cap.
    pub max_redemptions: Option<i32>,
}

impl Deal {
    /// Return this deal with the given fields replaced, re-checking the
    /// price and date rules on the result.
    pub fn with_update(self, update: &UpdateDeal, now: DateTime<Utc>) -> AppResult<Self> {
        let next = Self {
            title: update.title.clone().unwrap_or(self.title),
            description: update.description.clone().unwrap_or(self.description),
            discount: update.discount.clone().unwrap_or(self.discount),
            original_price: update.original_price.unwrap_or(self.original_price),
            discounted_price: update.discounted_price.unwrap_or(self.discounted_price),
            start_date: update.start_date.unwrap_or(self.start_date),
            end_date: update.end_date.unwrap_or(self.end_date),
            terms: update.terms.clone().unwrap_or(self.terms),
            status: update.status.unwrap_or(self.status),
            max_redemptions: update.max_redemptions.or(self.max_redemptions),
            updated_at: now,
            ..self
        };
        if next.discounted_price >= next.original_price {
            return Err(AppError::validation(
                "Discounted price must be lower than the original price",
            ));
        }
        if next.start_date >= next.end_date {
            return Err(AppError::validation("End date must be after start date"));
        }
        if matches!(next.max_redemptions, Some(n) if n < next.redemption_count) {
            return Err(AppError::validation(
                "Max redemptions cannot be below the current redemption count",
            ));
        }
        Ok(next)
    }
}
