//! Request DTOs with validation.

use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use directory_core::types::PageRequest;
use directory_entity::business::{BusinessFilter, BusinessStatus, UpdateBusiness};
use directory_entity::deal::{DealStatus, NewDeal, UpdateDeal};
use directory_entity::hours::{NewBusinessHours, UpdateBusinessHours};
use directory_entity::invitation::{InvitationFilter, InvitationStatus};
use directory_entity::location::Location;
use directory_entity::notification::{NewNotification, NotificationKind, UpdateNotification};
use directory_entity::social::{NewSocialLink, SocialPlatform, UpdateSocialLink};
use directory_entity::subscription::{
    NewSubscription, SubscriptionPlan, SubscriptionStatus, UpdateSubscription,
};
use directory_entity::user::UpdateUser;
use directory_service::CreateInvitation;

use crate::extractors::PaginationParams;

/// Create invitation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitationRequest {
    /// Invitee email.
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    /// Business to provision for the invitee.
    #[validate(length(min = 2, message = "Business name must be at least 2 characters long"))]
    pub business_name: String,
    /// Invitee phone.
    #[validate(length(min = 7, max = 32, message = "Phone number is invalid"))]
    pub phone: Option<String>,
    /// Invitee first name.
    #[validate(length(min = 2, message = "First name must be at least 2 characters long"))]
    pub first_name: Option<String>,
    /// Invitee last name.
    #[validate(length(min = 2, message = "Last name must be at least 2 characters long"))]
    pub last_name: Option<String>,
    /// City to list the business in.
    pub location_id: Option<Location>,
}

impl From<CreateInvitationRequest> for CreateInvitation {
    fn from(req: CreateInvitationRequest) -> Self {
        Self {
            email: req.email,
            business_name: req.business_name,
            phone: req.phone,
            first_name: req.first_name,
            last_name: req.last_name,
            location_id: req.location_id,
        }
    }
}

/// Accept invitation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInvitationRequest {
    /// Identity provider id of the accepting user.
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
    /// Ticket from the invitation link.
    #[validate(length(min = 1, message = "ticket is required"))]
    pub ticket: String,
}

/// Invitation list filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvitationListQuery {
    /// Only this status.
    pub status: Option<InvitationStatus>,
    /// Case-insensitive email substring.
    pub email: Option<String>,
}

impl From<InvitationListQuery> for InvitationFilter {
    fn from(query: InvitationListQuery) -> Self {
        Self {
            status: query.status,
            email: query.email.filter(|e| !e.trim().is_empty()),
        }
    }
}

/// Update user request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New email.
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// New first name.
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    /// New last name.
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    /// New avatar URL.
    #[validate(url)]
    pub profile_image_url: Option<String>,
    /// In-app notifications on or off.
    pub notifications_enabled: Option<bool>,
    /// Email notifications on or off.
    pub email_notifications: Option<bool>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            profile_image_url: req.profile_image_url,
            notifications_enabled: req.notifications_enabled,
            email_notifications: req.email_notifications,
            ..Self::default()
        }
    }
}

/// Business list filters plus pagination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessListQuery {
    /// Only businesses in this city.
    pub location_id: Option<Location>,
    /// Only businesses with this status.
    pub status: Option<BusinessStatus>,
    /// Only this category.
    pub category: Option<String>,
    /// Case-insensitive name substring.
    pub search: Option<String>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

impl BusinessListQuery {
    /// Split into the store filter and the page request.
    pub fn into_parts(self) -> (BusinessFilter, PageRequest) {
        let page = PaginationParams {
            page: self.page,
            limit: self.limit,
        }
        .into_page_request();
        let filter = BusinessFilter {
            location_id: self.location_id,
            status: self.status,
            category: self.category,
            search: self.search.filter(|s| !s.trim().is_empty()),
            user_id: None,
        };
        (filter, page)
    }
}

/// Update business request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessRequest {
    /// New display name. The slug does not change.
    #[validate(length(min = 2, max = 200))]
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
    #[validate(email)]
    pub email: Option<String>,
    /// New contact phone.
    pub phone: Option<String>,
    /// New website.
    #[validate(url)]
    pub website: Option<String>,
    /// New status.
    pub status: Option<BusinessStatus>,
    /// New city.
    pub location_id: Option<Location>,
    /// New rating.
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,
    /// New review count.
    #[validate(range(min = 0))]
    pub review_count: Option<i32>,
    /// Featured flag.
    pub featured: Option<bool>,
}

impl From<UpdateBusinessRequest> for UpdateBusiness {
    fn from(req: UpdateBusinessRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            category: req.category,
            contact_first_name: req.contact_first_name,
            contact_last_name: req.contact_last_name,
            email: req.email,
            phone: req.phone,
            website: req.website,
            status: req.status,
            location_id: req.location_id,
            rating: req.rating,
            review_count: req.review_count,
            featured: req.featured,
        }
    }
}

/// `?at=` for the open check; local wall-clock time of the business.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenQuery {
    /// Moment to check, e.g. `2026-03-02T09:30:00`. Defaults to now.
    pub at: Option<NaiveDateTime>,
}

/// Create business hours request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHoursRequest {
    /// Owning business.
    pub business_id: Uuid,
    /// 0 = Sunday through 6 = Saturday.
    #[validate(range(min = 0, max = 6, message = "Day of week must be between 0 and 6"))]
    pub day_of_week: i16,
    /// Opening time.
    pub open_time: NaiveTime,
    /// Closing time.
    pub close_time: NaiveTime,
    /// Closed all day.
    #[serde(default)]
    pub is_closed: bool,
    /// Closed for a holiday.
    #[serde(default)]
    pub is_holiday: bool,
    /// Free-form note.
    #[validate(length(max = 255))]
    pub note: Option<String>,
}

impl From<CreateHoursRequest> for NewBusinessHours {
    fn from(req: CreateHoursRequest) -> Self {
        Self {
            business_id: req.business_id,
            day_of_week: req.day_of_week,
            open_time: req.open_time,
            close_time: req.close_time,
            is_closed: req.is_closed,
            is_holiday: req.is_holiday,
            note: req.note,
        }
    }
}

/// Update business hours request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHoursRequest {
    /// New opening time.
    pub open_time: Option<NaiveTime>,
    /// New closing time.
    pub close_time: Option<NaiveTime>,
    /// Closed all day.
    pub is_closed: Option<bool>,
    /// Closed for a holiday.
    pub is_holiday: Option<bool>,
    /// New note.
    #[validate(length(max = 255))]
    pub note: Option<String>,
}

impl From<UpdateHoursRequest> for UpdateBusinessHours {
    fn from(req: UpdateHoursRequest) -> Self {
        Self {
            open_time: req.open_time,
            close_time: req.close_time,
            is_closed: req.is_closed,
            is_holiday: req.is_holiday,
            note: req.note,
        }
    }
}

/// Create deal request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDealRequest {
    /// Owning business.
    pub business_id: Uuid,
    /// Title.
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Discount label, e.g. `20%`.
    #[validate(length(min = 1, max = 50))]
    pub discount: String,
    /// Regular price.
    #[validate(range(min = 0.0))]
    pub original_price: f64,
    /// Price with the deal applied.
    #[validate(range(min = 0.0))]
    pub discounted_price: f64,
    /// Unique redemption code.
    #[validate(length(min = 3, max = 32, message = "Code must be 3 to 32 characters"))]
    pub code: String,
    /// Start of the redemption window.
    pub start_date: DateTime<Utc>,
    /// End of the redemption window.
    pub end_date: DateTime<Utc>,
    /// Terms and conditions.
    #[serde(default)]
    pub terms: Vec<String>,
    /// Initial status; draft when absent.
    pub status: Option<DealStatus>,
    /// Redemption cap.
    #[validate(range(min = 1, message = "Max redemptions must be at least 1"))]
    pub max_redemptions: Option<i32>,
}

impl From<CreateDealRequest> for NewDeal {
    fn from(req: CreateDealRequest) -> Self {
        Self {
            business_id: req.business_id,
            title: req.title,
            description: req.description,
            discount: req.discount,
            original_price: req.original_price,
            discounted_price: req.discounted_price,
            code: req.code,
            start_date: req.start_date,
            end_date: req.end_date,
            terms: req.terms,
            status: req.status.unwrap_or(DealStatus::Draft),
            max_redemptions: req.max_redemptions,
        }
    }
}

/// Update deal request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDealRequest {
    /// New title.
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New discount label.
    #[validate(length(min = 1, max = 50))]
    pub discount: Option<String>,
    /// New regular price.
    #[validate(range(min = 0.0))]
    pub original_price: Option<f64>,
    /// New discounted price.
    #[validate(range(min = 0.0))]
    pub discounted_price: Option<f64>,
    /// New window start.
    pub start_date: Option<DateTime<Utc>>,
    /// New window end.
    pub end_date: Option<DateTime<Utc>>,
    /// New terms.
    pub terms: Option<Vec<String>>,
    /// New status.
    pub status: Option<DealStatus>,
    /// New redemption cap.
    #[validate(range(min = 1))]
    pub max_redemptions: Option<i32>,
}

impl From<UpdateDealRequest> for UpdateDeal {
    fn from(req: UpdateDealRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            discount: req.discount,
            original_price: req.original_price,
            discounted_price: req.discounted_price,
            start_date: req.start_date,
            end_date: req.end_date,
            terms: req.terms,
            status: req.status,
            max_redemptions: req.max_redemptions,
        }
    }
}

/// Deal status change request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealStatusRequest {
    /// Target status.
    pub status: DealStatus,
}

/// Create social media link request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSocialLinkRequest {
    /// Owning business.
    pub business_id: Uuid,
    /// Platform.
    pub platform: SocialPlatform,
    /// Profile URL.
    #[validate(url(message = "Please provide a valid URL"))]
    pub url: String,
    /// Handle on the platform.
    #[validate(length(min = 1, max = 100))]
    pub username: Option<String>,
    /// Shown on the listing; true when absent.
    pub is_active: Option<bool>,
}

impl From<CreateSocialLinkRequest> for NewSocialLink {
    fn from(req: CreateSocialLinkRequest) -> Self {
        Self {
            business_id: req.business_id,
            platform: req.platform,
            url: req.url,
            username: req.username,
            is_active: req.is_active.unwrap_or(true),
        }
    }
}

/// Update social media link request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSocialLinkRequest {
    #[validate(url(message = "Please provide a valid URL"))]
    pub url: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub username: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateSocialLinkRequest> for UpdateSocialLink {
    fn from(req: UpdateSocialLinkRequest) -> Self {
        Self {
            url: req.url,
            username: req.username,
            is_active: req.is_active,
        }
    }
}

/// Follower count reported by a platform sync.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SyncFollowersRequest {
    #[validate(range(min = 0, message = "Followers cannot be negative"))]
    pub followers: i32,
}

/// Create notification request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    /// Recipient.
    pub user_id: Uuid,
    /// Category.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,
    #[validate(length(min = 5, message = "Message must be at least 5 characters"))]
    pub message: String,
    /// Deal, business or subscription this is about.
    pub related_id: Option<Uuid>,
    pub metadata: Option<serde_json::Value>,
}

impl From<CreateNotificationRequest> for NewNotification {
    fn from(req: CreateNotificationRequest) -> Self {
        Self {
            user_id: req.user_id,
            kind: req.kind,
            title: req.title,
            message: req.message,
            related_id: req.related_id,
            metadata: req.metadata,
        }
    }
}

/// Update notification request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 5, message = "Message must be at least 5 characters"))]
    pub message: Option<String>,
    pub is_read: Option<bool>,
    pub related_id: Option<Uuid>,
    pub metadata: Option<serde_json::Value>,
}

impl From<UpdateNotificationRequest> for UpdateNotification {
    fn from(req: UpdateNotificationRequest) -> Self {
        Self {
            title: req.title,
            message: req.message,
            is_read: req.is_read,
            related_id: req.related_id,
            metadata: req.metadata,
        }
    }
}

/// Create subscription request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    /// Subscribing business.
    pub business_id: Uuid,
    /// Plan.
    pub plan: SubscriptionPlan,
    /// Initial status; active when absent.
    pub status: Option<SubscriptionStatus>,
    /// Start; now when absent.
    pub start_date: Option<DateTime<Utc>>,
    /// End.
    pub end_date: DateTime<Utc>,
    /// Price per period.
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
}

impl CreateSubscriptionRequest {
    /// Fill defaults relative to `now`.
    pub fn into_new(self, now: DateTime<Utc>) -> NewSubscription {
        NewSubscription {
            business_id: self.business_id,
            plan: self.plan,
            status: self.status.unwrap_or(SubscriptionStatus::Active),
            start_date: self.start_date.unwrap_or(now),
            end_date: self.end_date,
            price: self.price,
        }
    }
}

/// Update subscription request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscriptionRequest {
    /// New plan.
    pub plan: Option<SubscriptionPlan>,
    /// New status.
    pub status: Option<SubscriptionStatus>,
    /// New end date.
    pub end_date: Option<DateTime<Utc>>,
    /// New price.
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
}

impl From<UpdateSubscriptionRequest> for UpdateSubscription {
    fn from(req: UpdateSubscriptionRequest) -> Self {
        Self {
            plan: req.plan,
            status: req.status,
            end_date: req.end_date,
            price: req.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_create_invitation_rules() {
        let req: CreateInvitationRequest = serde_json::from_value(json!({
            "email": "not-an-email",
            "businessName": "X"
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("business_name"));

        let req: CreateInvitationRequest = serde_json::from_value(json!({
            "email": "owner@shop.com",
            "businessName": "Corner Shop",
            "locationId": "pharr"
        }))
        .unwrap();
        req.validate().unwrap();
        assert_eq!(CreateInvitation::from(req).location_id, Some(Location::Pharr));
    }

    #[test]
    fn test_accept_body_uses_camel_case() {
        let req: AcceptInvitationRequest =
            serde_json::from_value(json!({"userId": "user_1", "ticket": "t"})).unwrap();
        assert_eq!(req.user_id, "user_1");
        assert!(
            serde_json::from_value::<AcceptInvitationRequest>(json!({"ticket": "t"})).is_err()
        );
    }

    #[test]
    fn test_deal_defaults_to_draft() {
        let now = Utc::now();
        let req = CreateDealRequest {
            business_id: Uuid::new_v4(),
            title: "Half off".into(),
            description: String::new(),
            discount: "50%".into(),
            original_price: 10.0,
            discounted_price: 5.0,
            code: "HALF50".into(),
            start_date: now,
            end_date: now + chrono::Duration::days(7),
            terms: vec![],
            status: None,
            max_redemptions: Some(0),
        };
        assert!(req.validate().is_err());

        let deal = NewDeal::from(req);
        assert_eq!(deal.code, "HALF50");
        assert_eq!(deal.status, DealStatus::Draft);
    }

    #[test]
    fn test_rating_range() {
        let req = UpdateBusinessRequest {
            rating: Some(7.0),
            ..UpdateBusinessRequest::default()
        };
        assert!(req.validate().is_err());
    }
}
