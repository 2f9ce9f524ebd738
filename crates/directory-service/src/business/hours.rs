//! Weekly opening hours and the open/closed check.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_database::{BusinessHoursStore, BusinessStore};
use directory_entity::hours::{
    BusinessHours, NewBusinessHours, UpdateBusinessHours, weekday_index,
};

/// Answer to "is this business open at `at`?".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenStatus {
    /// The business asked about.
    pub business_id: Uuid,
    /// Local time that was checked.
    pub at: NaiveDateTime,
    /// Whether the business is open then.
    pub is_open: bool,
    /// The hours row for that weekday, if one exists.
    pub hours: Option<BusinessHours>,
}

/// CRUD for business hours.
#[derive(Debug, Clone)]
pub struct HoursService {
    hours: Arc<dyn BusinessHoursStore>,
    businesses: Arc<dyn BusinessStore>,
}

impl HoursService {
    /// Create a new hours service.
    pub fn new(hours: Arc<dyn BusinessHoursStore>, businesses: Arc<dyn BusinessStore>) -> Self {
        Self { hours, businesses }
    }

    async fn require_business(&self, business_id: Uuid) -> AppResult<()> {
        match self.businesses.find_by_id(business_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found(format!(
                "Business with ID {business_id} not found"
            ))),
        }
    }

    /// All rows for a business, Sunday first.
    pub async fn list(&self, business_id: Uuid) -> AppResult<Vec<BusinessHours>> {
        self.require_business(business_id).await?;
        self.hours.list_by_business(business_id).await
    }

    /// Get one row.
    pub async fn get(&self, id: Uuid) -> AppResult<BusinessHours> {
        self.hours
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Business hours with ID {id} not found")))
    }

    /// Add hours for one weekday. A second row for the same day conflicts.
    pub async fn create(&self, new: &NewBusinessHours) -> AppResult<BusinessHours> {
        new.validate()?;
        self.require_business(new.business_id).await?;
        let created = self.hours.insert(new).await?;
        info!(
            hours_id = %created.id,
            business_id = %created.business_id,
            day_of_week = created.day_of_week,
            "Business hours created"
        );
        Ok(created)
    }

    /// Apply an explicit field update.
    pub async fn update(&self, id: Uuid, update: &UpdateBusinessHours) -> AppResult<BusinessHours> {
        let current = self.get(id).await?;
        let saved = self
            .hours
            .save(&current.with_update(update, Utc::now())?)
            .await?;
        info!(hours_id = %saved.id, "Business hours updated");
        Ok(saved)
    }

    /// Delete one row.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.hours.delete(id).await? {
            return Err(AppError::not_found(format!(
                "Business hours with ID {id} not found"
            )));
        }
        info!(hours_id = %id, "Business hours deleted");
        Ok(())
    }

    /// Whether the business is open at the local moment `at`.
    pub async fn open_status(&self, business_id: Uuid, at: NaiveDateTime) -> AppResult<OpenStatus> {
        let day = weekday_index(at);
        let hours = self
            .list(business_id)
            .await?
            .into_iter()
            .find(|h| h.day_of_week == day);
        Ok(OpenStatus {
            business_id,
            at,
            is_open: hours.as_ref().is_some_and(|h| h.covers(at)),
            hours,
        })
    }
}
