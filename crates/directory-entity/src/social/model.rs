//! Social media link model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use directory_core::{AppError, AppResult};

use super::platform::SocialPlatform;

/// A business profile on a social network. At most one per platform and
/// business, counting deleted links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SocialLink {
    /// Internal identifier.
    pub id: Uuid,
    /// Business the profile belongs to.
    pub business_id: Uuid,
    /// Network.
    pub platform: SocialPlatform,
    /// Profile URL.
    pub url: String,
    /// Handle on the network.
    pub username: Option<String>,
    /// Whether the link is shown on the listing.
    pub is_active: bool,
    /// Follower count from the last sync.
    pub followers: i32,
    /// When `followers` was last refreshed.
    pub last_synced: Option<DateTime<Utc>>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl SocialLink {
    /// Return this link with the given fields replaced.
    pub fn with_update(self, update: &UpdateSocialLink, now: DateTime<Utc>) -> AppResult<Self> {
        if let Some(username) = update.username.as_deref() {
            check_username(username)?;
        }
        Ok(Self {
            url: update.url.clone().unwrap_or(self.url),
            username: update.username.clone().or(self.username),
            is_active: update.is_active.unwrap_or(self.is_active),
            updated_at: now,
            ..self
        })
    }

    /// Return this link with a freshly synced follower count.
    pub fn with_followers(self, followers: i32, now: DateTime<Utc>) -> AppResult<Self> {
        if followers < 0 {
            return Err(AppError::validation("Followers cannot be negative"));
        }
        Ok(Self {
            followers,
            last_synced: Some(now),
            updated_at: now,
            ..self
        })
    }
}

/// Whether `username` only holds letters, digits, dots, underscores and hyphens.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn check_username(username: &str) -> AppResult<()> {
    if is_valid_username(username) {
        Ok(())
    } else {
        Err(AppError::validation(
            "Username can only contain letters, numbers, dots, underscores, and hyphens",
        ))
    }
}

/// Data required to create a social media link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSocialLink {
    /// Owning business.
    pub business_id: Uuid,
    /// Network.
    pub platform: SocialPlatform,
    /// Profile URL.
    pub url: String,
    /// Handle on the network.
    pub username: Option<String>,
    /// Whether the link is shown.
    pub is_active: bool,
}

impl NewSocialLink {
    /// Check field rules.
    pub fn validate(&self) -> AppResult<()> {
        if self.url.trim().is_empty() {
            return Err(AppError::validation("URL is required"));
        }
        if let Some(username) = self.username.as_deref() {
            check_username(username)?;
        }
        Ok(())
    }
}

/// Explicit field list for link updates. Business and platform are fixed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSocialLink {
    /// New profile URL.
    pub url: Option<String>,
    /// New handle.
    pub username: Option<String>,
    /// Show or hide the link.
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> SocialLink {
        let now = Utc::now();
        SocialLink {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            platform: SocialPlatform::Instagram,
            url: "https://instagram.com/tacos".into(),
            username: Some("tacos".into()),
            is_active: true,
            followers: 0,
            last_synced: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_username_charset() {
        assert!(is_valid_username("taco.palace_956-rgv"));
        assert!(!is_valid_username("taco palace"));
        assert!(!is_valid_username("@tacos"));
        assert!(!is_valid_username(""));
    }

    #[test]
    fn test_update_rejects_bad_username_and_keeps_platform() {
        let original = link();
        let err = original
            .clone()
            .with_update(
                &UpdateSocialLink {
                    username: Some("no spaces".into()),
                    ..UpdateSocialLink::default()
                },
                Utc::now(),
            )
            .unwrap_err();
        assert_eq!(err.kind, directory_core::error::ErrorKind::Validation);

        let updated = original
            .with_update(
                &UpdateSocialLink {
                    is_active: Some(false),
                    ..UpdateSocialLink::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.platform, SocialPlatform::Instagram);
        assert_eq!(updated.username.as_deref(), Some("tacos"));
    }

    #[test]
    fn test_follower_sync_stamps_time() {
        let now = Utc::now();
        let synced = link().with_followers(1200, now).unwrap();
        assert_eq!(synced.followers, 1200);
        assert_eq!(synced.last_synced, Some(now));
        assert!(link().with_followers(-1, now).is_err());
    }
}
