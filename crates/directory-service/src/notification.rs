//! In-app notification inbox.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_database::{NotificationStore, UserStore};
use directory_entity::deal::Deal;
use directory_entity::notification::{
    NewNotification, Notification, NotificationKind, UpdateNotification,
};

/// Notification inbox service.
#[derive(Debug, Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationStore>,
    users: Arc<dyn UserStore>,
}

impl NotificationService {
    /// Create a new notification service.
    pub fn new(notifications: Arc<dyn NotificationStore>, users: Arc<dyn UserStore>) -> Self {
        Self {
            notifications,
            users,
        }
    }

    /// Deliver a notification to an existing user.
    pub async fn create(&self, new: &NewNotification) -> AppResult<Notification> {
        new.validate()?;
        if self.users.find_by_id(new.user_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "User with ID {} not found",
                new.user_id
            )));
        }
        let notification = self.notifications.insert(new).await?;
        info!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            kind = ?notification.kind,
            "Notification created"
        );
        Ok(notification)
    }

    /// Get a notification by id.
    pub async fn get(&self, id: Uuid) -> AppResult<Notification> {
        self.notifications
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Notification with ID {id} not found")))
    }

    /// A user's inbox, newest first.
    pub async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        self.notifications.list_by_user(user_id).await
    }

    /// Apply an explicit field update.
    pub async fn update(&self, id: Uuid, update: &UpdateNotification) -> AppResult<Notification> {
        let notification = self.get(id).await?;
        let saved = self
            .notifications
            .save(&notification.with_update(update, Utc::now())?)
            .await?;
        info!(notification_id = %saved.id, "Notification updated");
        Ok(saved)
    }

    /// Mark one notification read.
    pub async fn mark_read(&self, id: Uuid) -> AppResult<Notification> {
        let notification = self.get(id).await?;
        if notification.is_read {
            return Ok(notification);
        }
        self.notifications.save(&notification.read(Utc::now())).await
    }

    /// Mark a user's whole inbox read.
    pub async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let changed = self.notifications.mark_all_read(user_id).await?;
        info!(%user_id, changed, "Notifications marked read");
        Ok(changed)
    }

    /// Unread notifications in a user's inbox.
    pub async fn unread_count(&self, user_id: Uuid) -> AppResult<i64> {
        self.notifications.count_unread(user_id).await
    }

    /// Soft-delete a notification.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.notifications.soft_delete(id).await? {
            return Err(AppError::not_found(format!(
                "Notification with ID {id} not found"
            )));
        }
        info!(notification_id = %id, "Notification deleted");
        Ok(())
    }

    /// Tell `user_id` that `business_name` published `deal`.
    ///
    /// Returns `None` when the user has turned notifications off.
    pub async fn deal_published(
        &self,
        user_id: Uuid,
        deal: &Deal,
        business_name: &str,
    ) -> AppResult<Option<Notification>> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User with ID {user_id} not found")))?;
        if !user.notifications_enabled {
            debug!(%user_id, deal_id = %deal.id, "Notifications disabled, skipping deal notice");
            return Ok(None);
        }
        self.create(&NewNotification {
            user_id,
            kind: NotificationKind::Deal,
            title: "New Deal Available!".into(),
            message: format!("{business_name} has posted a new deal: {}", deal.title),
            related_id: Some(deal.id),
            metadata: Some(json!({"dealId": deal.id, "businessName": business_name})),
        })
        .await
        .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use directory_core::error::ErrorKind;
    use directory_entity::user::{NewUser, UpdateUser, User, UserRole, UserStatus};

    use super::*;
    use crate::testing::Harness;

    async fn user(h: &Harness) -> User {
        UserStore::insert(
            &h.store,
            &NewUser {
                external_id: "user_1".into(),
                email: "rosa@example.com".into(),
                first_name: Some("Rosa".into()),
                last_name: None,
                role: UserRole::User,
                status: UserStatus::Active,
                profile_image_url: None,
            },
        )
        .await
        .unwrap()
    }

    fn note(user_id: Uuid, title: &str) -> NewNotification {
        NewNotification {
            user_id,
            kind: NotificationKind::System,
            title: title.into(),
            message: "Something happened".into(),
            related_id: None,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn test_inbox_read_tracking() {
        let h = Harness::new();
        let user = user(&h).await;
        let first = h.notifications.create(&note(user.id, "First")).await.unwrap();
        h.notifications.create(&note(user.id, "Second")).await.unwrap();
        h.notifications.create(&note(user.id, "Third")).await.unwrap();
        assert_eq!(h.notifications.unread_count(user.id).await.unwrap(), 3);

        let read = h.notifications.mark_read(first.id).await.unwrap();
        assert!(read.is_read);
        assert_eq!(h.notifications.unread_count(user.id).await.unwrap(), 2);

        assert_eq!(h.notifications.mark_all_read(user.id).await.unwrap(), 2);
        assert_eq!(h.notifications.unread_count(user.id).await.unwrap(), 0);
        assert_eq!(h.notifications.mark_all_read(user.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_user_and_short_text_are_rejected() {
        let h = Harness::new();
        let err = h
            .notifications
            .create(&note(Uuid::new_v4(), "Hello"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let user = user(&h).await;
        let err = h.notifications.create(&note(user.id, "Hi")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_deleted_notification_leaves_the_inbox() {
        let h = Harness::new();
        let user = user(&h).await;
        let n = h.notifications.create(&note(user.id, "Gone soon")).await.unwrap();

        h.notifications.delete(n.id).await.unwrap();
        assert!(h.notifications.list_by_user(user.id).await.unwrap().is_empty());
        assert_eq!(h.notifications.unread_count(user.id).await.unwrap(), 0);
        assert_eq!(
            h.notifications.delete(n.id).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_deal_notice_respects_opt_out() {
        let h = Harness::new();
        let user = user(&h).await;
        h.users
            .update(
                user.id,
                &UpdateUser {
                    notifications_enabled: Some(false),
                    ..UpdateUser::default()
                },
            )
            .await
            .unwrap();

        let now = Utc::now();
        let deal = Deal {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            title: "Taco Tuesday".into(),
            description: String::new(),
            discount: "50%".into(),
            original_price: 10.0,
            discounted_price: 5.0,
            code: "TACO".into(),
            start_date: now,
            end_date: now,
            terms: vec![],
            status: directory_entity::deal::DealStatus::Active,
            redemption_count: 0,
            max_redemptions: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let skipped = h
            .notifications
            .deal_published(user.id, &deal, "Shop A")
            .await
            .unwrap();
        assert!(skipped.is_none());
        assert!(h.notifications.list_by_user(user.id).await.unwrap().is_empty());
    }
}
