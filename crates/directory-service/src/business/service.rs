//! Business listing and maintenance outside the invitation workflow.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_core::types::{PageRequest, PageResponse};
use directory_database::BusinessStore;
use directory_entity::business::{Business, BusinessFilter, UpdateBusiness};

use crate::invitation::BusinessProvisioner;

/// Business read and update operations.
#[derive(Debug, Clone)]
pub struct BusinessService {
    businesses: Arc<dyn BusinessStore>,
    provisioner: BusinessProvisioner,
}

impl BusinessService {
    /// Create a new business service.
    pub fn new(businesses: Arc<dyn BusinessStore>, provisioner: BusinessProvisioner) -> Self {
        Self {
            businesses,
            provisioner,
        }
    }

    /// Live businesses matching `filter`; featured first, then newest.
    pub async fn list(
        &self,
        filter: &BusinessFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Business>> {
        self.businesses.list(filter, page.normalized()).await
    }

    /// Businesses owned by one user.
    pub async fn list_by_owner(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> AppResult<PageResponse<Business>> {
        let filter = BusinessFilter {
            user_id: Some(user_id),
            ..BusinessFilter::default()
        };
        self.list(&filter, page).await
    }

    /// Get a business by id.
    pub async fn get(&self, id: Uuid) -> AppResult<Business> {
        self.businesses
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Business with ID {id} not found")))
    }

    /// Get a business by slug.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<Business> {
        self.businesses
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Business with slug {slug} not found")))
    }

    /// Apply an explicit field update.
    pub async fn update(&self, id: Uuid, update: &UpdateBusiness) -> AppResult<Business> {
        let business = self.get(id).await?;
        let saved = self
            .businesses
            .save(&business.with_update(update, Utc::now())?)
            .await?;
        info!(business_id = %saved.id, "Business updated");
        Ok(saved)
    }

    /// Soft-delete a business.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.businesses.soft_delete(id).await? {
            return Err(AppError::not_found(format!("Business with ID {id} not found")));
        }
        info!(business_id = %id, "Business deleted");
        Ok(())
    }

    /// Re-render the QR code, overwriting the stored asset.
    pub async fn regenerate_qr_code(&self, id: Uuid) -> AppResult<Business> {
        let business = self.get(id).await?;
        let url = self.provisioner.publish_qr(&business.slug).await?;
        let saved = self
            .businesses
            .save(&business.with_qr_code(url, Utc::now()))
            .await?;
        info!(business_id = %saved.id, slug = %saved.slug, "QR code regenerated");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use directory_core::error::ErrorKind;
    use directory_entity::business::BusinessStatus;
    use directory_entity::location::Location;

    use super::*;
    use crate::testing::{Harness, invite, ticket_for};

    #[tokio::test]
    async fn test_list_filters_by_owner_and_location() {
        let h = Harness::new();
        let first = h.invitations.create(invite("a@b.com", "Shop A")).await.unwrap();
        h.invitations.create(invite("c@d.com", "Shop B")).await.unwrap();
        let accepted = h
            .activation
            .accept("user_1", &ticket_for(&first.external_invitation_id))
            .await
            .unwrap();

        let owned = h
            .businesses
            .list_by_owner(accepted.accepted_by_user_id.unwrap(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(owned.total, 1);
        assert_eq!(owned.items[0].name, "Shop A");

        let active = h
            .businesses
            .list(
                &BusinessFilter {
                    status: Some(BusinessStatus::Active),
                    location_id: Some(Location::McAllen),
                    ..BusinessFilter::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(active.total, 1);
    }

    #[tokio::test]
    async fn test_update_rejects_out_of_range_rating() {
        let h = Harness::new();
        let invitation = h.invitations.create(invite("a@b.com", "Shop A")).await.unwrap();
        let id = invitation.business_id.unwrap();

        let err = h
            .businesses
            .update(
                id,
                &UpdateBusiness {
                    rating: Some(5.5),
                    ..UpdateBusiness::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let updated = h
            .businesses
            .update(
                id,
                &UpdateBusiness {
                    rating: Some(4.5),
                    review_count: Some(12),
                    ..UpdateBusiness::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.rating, 4.5);
        assert_eq!(updated.slug, "shop-a");
    }

    #[tokio::test]
    async fn test_regenerate_qr_refreshes_timestamp() {
        let h = Harness::new();
        let invitation = h.invitations.create(invite("a@b.com", "Shop A")).await.unwrap();
        let before = h.business(invitation.business_id).await;

        let after = h.businesses.regenerate_qr_code(before.id).await.unwrap();
        assert_eq!(after.qr_code_url, before.qr_code_url);
        assert!(after.qr_code_generated_at >= before.qr_code_generated_at);
        assert_eq!(h.storage.len().await, 1);
    }

    #[tokio::test]
    async fn test_deleted_business_is_hidden() {
        let h = Harness::new();
        let invitation = h.invitations.create(invite("a@b.com", "Shop A")).await.unwrap();
        let id = invitation.business_id.unwrap();

        h.businesses.delete(id).await.unwrap();
        assert_eq!(h.businesses.get(id).await.unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(
            h.businesses.get_by_slug("shop-a").await.unwrap_err().kind,
            ErrorKind::NotFound
        );
    }
}
