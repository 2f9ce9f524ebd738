//! Opening hours for a single weekday.

use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use directory_core::{AppError, AppResult};

/// Opening hours of one business on one weekday (0 = Sunday).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BusinessHours {
    /// Internal identifier.
    pub id: Uuid,
    /// Owning business.
    pub business_id: Uuid,
    /// Day of week, 0 = Sunday through 6 = Saturday.
    pub day_of_week: i16,
    /// Opening time (local).
    pub open_time: NaiveTime,
    /// Closing time (local).
    pub close_time: NaiveTime,
    /// Closed all day.
    pub is_closed: bool,
    /// Closed for a holiday.
    pub is_holiday: bool,
    /// Optional note shown next to the hours.
    pub note: Option<String>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl BusinessHours {
    /// Whether these hours cover the local moment `at`.
    ///
    /// Both ends of the window are inclusive.
    pub fn covers(&self, at: NaiveDateTime) -> bool {
        if self.is_closed || self.is_holiday {
            return false;
        }
        if weekday_index(at) != self.day_of_week {
            return false;
        }
        let time = at.time();
        self.open_time <= time && time <= self.close_time
    }

    /// Return these hours with the given fields replaced.
    pub fn with_update(self, update: &UpdateBusinessHours, now: DateTime<Utc>) -> AppResult<Self> {
        let next = Self {
            open_time: update.open_time.unwrap_or(self.open_time),
            close_time: update.close_time.unwrap_or(self.close_time),
            is_closed: update.is_closed.unwrap_or(self.is_closed),
            is_holiday: update.is_holiday.unwrap_or(self.is_holiday),
            note: update.note.clone().or(self.note),
            updated_at: now,
            ..self
        };
        check_window(next.is_closed, next.open_time, next.close_time)?;
        Ok(next)
    }
}

/// Day-of-week index used by [`BusinessHours::day_of_week`].
pub fn weekday_index(at: NaiveDateTime) -> i16 {
    // num_days_from_sunday is always in 0..=6
    at.weekday().num_days_from_sunday() as i16
}

fn check_window(is_closed: bool, open: NaiveTime, close: NaiveTime) -> AppResult<()> {
    if !is_closed && open >= close {
        return Err(AppError::validation(
            "Close time must be later than open time",
        ));
    }
    Ok(())
}

/// Data required to create hours for one weekday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBusinessHours {
    /// Owning business.
    pub business_id: Uuid,
    /// Day of week, 0 = Sunday.
    pub day_of_week: i16,
    /// Opening time.
    pub open_time: NaiveTime,
    /// Closing time.
    pub close_time: NaiveTime,
    /// Closed all day.
    pub is_closed: bool,
    /// Closed for a holiday.
    pub is_holiday: bool,
    /// Optional note.
    pub note: Option<String>,
}

impl NewBusinessHours {
    /// Check field-level rules.
    pub fn validate(&self) -> AppResult<()> {
        if !(0..=6).contains(&self.day_of_week) {
            return Err(AppError::validation("Day of week must be between 0 and 6"));
        }
        check_window(self.is_closed, self.open_time, self.close_time)
    }
}

/// Explicit field list for hour updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBusinessHours {
    /// New opening time.
    pub open_time: Option<NaiveTime>,
    /// New closing time.
    pub close_time: Option<NaiveTime>,
    /// Closed all day.
    pub is_closed: Option<bool>,
    /// Closed for a holiday.
    pub is_holiday: Option<bool>,
    /// New note.
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn hours(day: i16, open: (u32, u32), close: (u32, u32)) -> BusinessHours {
        let now = Utc::now();
        BusinessHours {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            day_of_week: day,
            open_time: NaiveTime::from_hms_opt(open.0, open.1, 0).unwrap(),
            close_time: NaiveTime::from_hms_opt(close.0, close.1, 0).unwrap(),
            is_closed: false,
            is_holiday: false,
            note: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_covers_inclusive_window_on_matching_day() {
        // 2026-10-13 is a Tuesday
        let tuesday = hours(2, (9, 0), (17, 0));
        assert!(tuesday.covers(at(2026, 10, 13, 9, 0)));
        assert!(tuesday.covers(at(2026, 10, 13, 17, 0)));
        assert!(!tuesday.covers(at(2026, 10, 13, 17, 1)));
        assert!(!tuesday.covers(at(2026, 10, 14, 12, 0)));
    }

    #[test]
    fn test_closed_or_holiday_never_covers() {
        let mut h = hours(2, (9, 0), (17, 0));
        h.is_holiday = true;
        assert!(!h.covers(at(2026, 10, 13, 12, 0)));
        h.is_holiday = false;
        h.is_closed = true;
        assert!(!h.covers(at(2026, 10, 13, 12, 0)));
    }

    #[test]
    fn test_update_rejects_inverted_window() {
        let h = hours(1, (9, 0), (17, 0));
        let update = UpdateBusinessHours {
            close_time: NaiveTime::from_hms_opt(8, 0, 0),
            ..UpdateBusinessHours::default()
        };
        let err = h.with_update(&update, Utc::now()).unwrap_err();
        assert_eq!(err.message, "Close time must be later than open time");
    }

    #[test]
    fn test_sunday_is_zero() {
        // 2026-10-18 is a Sunday
        assert_eq!(weekday_index(at(2026, 10, 18, 0, 0)), 0);
    }
}
