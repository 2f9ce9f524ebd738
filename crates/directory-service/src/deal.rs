//! Promotional deals and redemption.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_database::{BusinessStore, DealStore};
use directory_entity::deal::{Deal, DealStatus, NewDeal, UpdateDeal};

use crate::notification::NotificationService;

/// Deal management service.
#[derive(Debug, Clone)]
pub struct DealService {
    deals: Arc<dyn DealStore>,
    businesses: Arc<dyn BusinessStore>,
    notifications: NotificationService,
}

impl DealService {
    /// Create a new deal service.
    pub fn new(
        deals: Arc<dyn DealStore>,
        businesses: Arc<dyn BusinessStore>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            deals,
            businesses,
            notifications,
        }
    }

    /// Create a deal for an existing business.
    pub async fn create(&self, new: &NewDeal) -> AppResult<Deal> {
        new.validate()?;
        if self.businesses.find_by_id(new.business_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Business with ID {} not found",
                new.business_id
            )));
        }
        let deal = self.deals.insert(new).await?;
        info!(deal_id = %deal.id, business_id = %deal.business_id, code = %deal.code, "Deal created");
        if deal.status == DealStatus::Active {
            self.announce(&deal).await;
        }
        Ok(deal)
    }

    /// Get a deal by id.
    pub async fn get(&self, id: Uuid) -> AppResult<Deal> {
        self.deals
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Deal with ID {id} not found")))
    }

    /// Get a deal by redemption code.
    pub async fn get_by_code(&self, code: &str) -> AppResult<Deal> {
        self.deals
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Deal with code {code} not found")))
    }

    /// Deals of one business, newest first.
    pub async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<Deal>> {
        self.deals.list_by_business(business_id).await
    }

    /// Deals redeemable at `now`, ending soonest first.
    pub async fn list_active(&self, now: DateTime<Utc>) -> AppResult<Vec<Deal>> {
        self.deals.list_active(now).await
    }

    /// Apply an explicit field update.
    pub async fn update(&self, id: Uuid, update: &UpdateDeal) -> AppResult<Deal> {
        let deal = self.get(id).await?;
        let was_active = deal.status == DealStatus::Active;
        let saved = self.deals.save(&deal.with_update(update, Utc::now())?).await?;
        info!(deal_id = %saved.id, status = ?saved.status, "Deal updated");
        if !was_active && saved.status == DealStatus::Active {
            self.announce(&saved).await;
        }
        Ok(saved)
    }

    /// Change only the status.
    pub async fn set_status(&self, id: Uuid, status: DealStatus) -> AppResult<Deal> {
        self.update(
            id,
            &UpdateDeal {
                status: Some(status),
                ..UpdateDeal::default()
            },
        )
        .await
    }

    /// Count one redemption. Concurrent redemptions never exceed the cap.
    pub async fn redeem(&self, id: Uuid) -> AppResult<Deal> {
        let deal = self.deals.redeem(id, Utc::now()).await?;
        info!(
            deal_id = %deal.id,
            redemption_count = deal.redemption_count,
            "Deal redeemed"
        );
        Ok(deal)
    }

    /// Soft-delete a deal.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.deals.soft_delete(id).await? {
            return Err(AppError::not_found(format!("Deal with ID {id} not found")));
        }
        info!(deal_id = %id, "Deal deleted");
        Ok(())
    }

    /// Notify the owner of the deal's business that it went live.
    /// Failures are logged; the deal itself is already saved.
    async fn announce(&self, deal: &Deal) {
        let business = match self.businesses.find_by_id(deal.business_id).await {
            Ok(Some(business)) => business,
            Ok(None) => return,
            Err(e) => {
                warn!(deal_id = %deal.id, error = %e, "Failed to load business for deal notice");
                return;
            }
        };
        let Some(owner_id) = business.user_id else {
            return;
        };
        if let Err(e) = self
            .notifications
            .deal_published(owner_id, deal, &business.name)
            .await
        {
            warn!(deal_id = %deal.id, user_id = %owner_id, error = %e, "Failed to send deal notice");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use directory_core::error::ErrorKind;

    use super::*;
    use crate::testing::{Harness, invite, ticket_for};

    async fn deal(h: &Harness, max_redemptions: Option<i32>) -> Deal {
        let business_id = h
            .invitations
            .create(invite("a@b.com", "Shop A"))
            .await
            .unwrap()
            .business_id
            .unwrap();
        let now = Utc::now();
        h.deals
            .create(&NewDeal {
                business_id,
                title: "Taco Tuesday".into(),
                description: "Two for one".into(),
                discount: "50%".into(),
                original_price: 10.0,
                discounted_price: 5.0,
                code: "TACO2X1".into(),
                start_date: now - Duration::days(1),
                end_date: now + Duration::days(1),
                terms: vec!["One per visit".into()],
                status: DealStatus::Active,
                max_redemptions,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_redeem_stops_at_cap() {
        let h = Harness::new();
        let deal = deal(&h, Some(2)).await;

        h.deals.redeem(deal.id).await.unwrap();
        let second = h.deals.redeem(deal.id).await.unwrap();
        assert_eq!(second.redemption_count, 2);

        let err = h.deals.redeem(deal.id).await.unwrap_err();
        assert_eq!(err.message, "Deal has reached maximum redemptions");
    }

    #[tokio::test]
    async fn test_concurrent_redemptions_respect_cap() {
        let h = Harness::new();
        let deal = deal(&h, Some(3)).await;

        let attempts = (0..10).map(|_| {
            let deals = h.deals.clone();
            tokio::spawn(async move { deals.redeem(deal.id).await })
        });
        let successes = futures::future::join_all(attempts)
            .await
            .into_iter()
            .filter(|r| matches!(r, Ok(Ok(_))))
            .count();
        assert_eq!(successes, 3);
        assert_eq!(h.deals.get(deal.id).await.unwrap().redemption_count, 3);
    }

    #[tokio::test]
    async fn test_paused_deal_is_not_redeemable_or_listed() {
        let h = Harness::new();
        let deal = deal(&h, None).await;
        assert_eq!(h.deals.list_active(Utc::now()).await.unwrap().len(), 1);

        h.deals.set_status(deal.id, DealStatus::Paused).await.unwrap();
        let err = h.deals.redeem(deal.id).await.unwrap_err();
        assert_eq!(err.message, "Deal is not active");
        assert!(h.deals.list_active(Utc::now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_rechecks_prices_and_duplicate_codes_conflict() {
        let h = Harness::new();
        let deal = deal(&h, None).await;

        let err = h
            .deals
            .update(
                deal.id,
                &UpdateDeal {
                    discounted_price: Some(20.0),
                    ..UpdateDeal::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let duplicate = NewDeal {
            business_id: deal.business_id,
            title: "Again".into(),
            description: String::new(),
            discount: "10%".into(),
            original_price: 10.0,
            discounted_price: 9.0,
            code: deal.code.clone(),
            start_date: deal.start_date,
            end_date: deal.end_date,
            terms: vec![],
            status: DealStatus::Draft,
            max_redemptions: None,
        };
        assert_eq!(
            h.deals.create(&duplicate).await.unwrap_err().kind,
            ErrorKind::Conflict
        );
    }

    #[tokio::test]
    async fn test_going_live_notifies_the_owner_once() {
        let h = Harness::new();
        let invitation = h
            .invitations
            .create(invite("owner@shop.com", "Shop A"))
            .await
            .unwrap();
        h.activation
            .accept("ext_user_1", &ticket_for(&invitation.external_invitation_id))
            .await
            .unwrap();
        let owner_id = h.business(invitation.business_id).await.user_id.unwrap();
        let now = Utc::now();
        let draft = h
            .deals
            .create(&NewDeal {
                business_id: invitation.business_id.unwrap(),
                title: "Taco Tuesday".into(),
                description: String::new(),
                discount: "50%".into(),
                original_price: 10.0,
                discounted_price: 5.0,
                code: "TACO2X1".into(),
                start_date: now - Duration::days(1),
                end_date: now + Duration::days(1),
                terms: vec![],
                status: DealStatus::Draft,
                max_redemptions: None,
            })
            .await
            .unwrap();
        assert!(h.notifications.list_by_user(owner_id).await.unwrap().is_empty());

        h.deals.set_status(draft.id, DealStatus::Active).await.unwrap();
        h.deals.set_status(draft.id, DealStatus::Active).await.unwrap();

        let inbox = h.notifications.list_by_user(owner_id).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].title, "New Deal Available!");
        assert_eq!(inbox[0].message, "Shop A has posted a new deal: Taco Tuesday");
        assert_eq!(inbox[0].related_id, Some(draft.id));
    }

    #[tokio::test]
    async fn test_deleted_deal_is_gone() {
        let h = Harness::new();
        let deal = deal(&h, None).await;
        h.deals.delete(deal.id).await.unwrap();
        assert_eq!(
            h.deals.get_by_code("TACO2X1").await.unwrap_err().kind,
            ErrorKind::NotFound
        );
    }
}
