//! Social media links shown on business listings.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_database::{BusinessStore, SocialLinkStore};
use directory_entity::social::{NewSocialLink, SocialLink, UpdateSocialLink};

/// Social media link service.
#[derive(Debug, Clone)]
pub struct SocialLinkService {
    links: Arc<dyn SocialLinkStore>,
    businesses: Arc<dyn BusinessStore>,
}

impl SocialLinkService {
    /// Create a new social link service.
    pub fn new(links: Arc<dyn SocialLinkStore>, businesses: Arc<dyn BusinessStore>) -> Self {
        Self { links, businesses }
    }

    /// Add a link. A business has at most one link per platform, and a
    /// deleted link keeps its platform taken.
    pub async fn create(&self, new: &NewSocialLink) -> AppResult<SocialLink> {
        new.validate()?;
        if self.businesses.find_by_id(new.business_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Business with ID {} not found",
                new.business_id
            )));
        }
        if self.links.platform_taken(new.business_id, new.platform).await? {
            return Err(AppError::conflict(format!(
                "{} account already exists for this business",
                new.platform
            )));
        }
        let link = self.links.insert(new).await?;
        info!(
            social_link_id = %link.id,
            business_id = %link.business_id,
            platform = %link.platform,
            "Social link created"
        );
        Ok(link)
    }

    /// Every live link, newest first.
    pub async fn list(&self) -> AppResult<Vec<SocialLink>> {
        self.links.list().await
    }

    /// Links of one business, ordered by platform.
    pub async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<SocialLink>> {
        self.links.list_by_business(business_id).await
    }

    /// Get a link by id.
    pub async fn get(&self, id: Uuid) -> AppResult<SocialLink> {
        self.links
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Social media with ID {id} not found")))
    }

    /// Apply an explicit field update.
    pub async fn update(&self, id: Uuid, update: &UpdateSocialLink) -> AppResult<SocialLink> {
        let link = self.get(id).await?;
        let saved = self.links.save(&link.with_update(update, Utc::now())?).await?;
        info!(social_link_id = %saved.id, "Social link updated");
        Ok(saved)
    }

    /// Record a follower count pulled from the network.
    pub async fn sync_followers(&self, id: Uuid, followers: i32) -> AppResult<SocialLink> {
        let link = self.get(id).await?;
        let saved = self
            .links
            .save(&link.with_followers(followers, Utc::now())?)
            .await?;
        info!(social_link_id = %saved.id, followers, "Social link followers synced");
        Ok(saved)
    }

    /// Soft-delete a link.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.links.soft_delete(id).await? {
            return Err(AppError::not_found(format!(
                "Social media with ID {id} not found"
            )));
        }
        info!(social_link_id = %id, "Social link deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use directory_core::error::ErrorKind;
    use directory_entity::social::SocialPlatform;

    use super::*;
    use crate::testing::{Harness, invite};

    async fn business_id(h: &Harness) -> Uuid {
        h.invitations
            .create(invite("a@b.com", "Shop A"))
            .await
            .unwrap()
            .business_id
            .unwrap()
    }

    fn link(business_id: Uuid, platform: SocialPlatform) -> NewSocialLink {
        NewSocialLink {
            business_id,
            platform,
            url: format!("https://{platform}.com/shopa"),
            username: Some("shopa".into()),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_one_link_per_platform_even_after_delete() {
        let h = Harness::new();
        let business_id = business_id(&h).await;

        let first = h
            .social
            .create(&link(business_id, SocialPlatform::Instagram))
            .await
            .unwrap();
        let err = h
            .social
            .create(&link(business_id, SocialPlatform::Instagram))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "instagram account already exists for this business");

        h.social.delete(first.id).await.unwrap();
        let err = h
            .social
            .create(&link(business_id, SocialPlatform::Instagram))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        h.social
            .create(&link(business_id, SocialPlatform::Facebook))
            .await
            .unwrap();
        let listed = h.social.list_by_business(business_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].platform, SocialPlatform::Facebook);
    }

    #[tokio::test]
    async fn test_unknown_business_and_bad_username_are_rejected() {
        let h = Harness::new();
        let err = h
            .social
            .create(&link(Uuid::new_v4(), SocialPlatform::Yelp))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let business_id = business_id(&h).await;
        let mut bad = link(business_id, SocialPlatform::Yelp);
        bad.username = Some("shop a!".into());
        assert_eq!(
            h.social.create(&bad).await.unwrap_err().kind,
            ErrorKind::Validation
        );
    }

    #[tokio::test]
    async fn test_update_and_follower_sync() {
        let h = Harness::new();
        let business_id = business_id(&h).await;
        let created = h
            .social
            .create(&link(business_id, SocialPlatform::Tiktok))
            .await
            .unwrap();

        let updated = h
            .social
            .update(
                created.id,
                &UpdateSocialLink {
                    url: Some("https://tiktok.com/@shopa2".into()),
                    ..UpdateSocialLink::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.url, "https://tiktok.com/@shopa2");
        assert_eq!(updated.username.as_deref(), Some("shopa"));

        let synced = h.social.sync_followers(created.id, 512).await.unwrap();
        assert_eq!(synced.followers, 512);
        assert!(synced.last_synced.is_some());
        assert_eq!(
            h.social.sync_followers(created.id, -3).await.unwrap_err().kind,
            ErrorKind::Validation
        );
    }
}
