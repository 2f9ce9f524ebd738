//! Response DTOs.

use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use directory_core::types::PageResponse;
use directory_entity::business::{Business, BusinessStatus};
use directory_entity::deal::{Deal, DealStatus};
use directory_entity::hours::BusinessHours;
use directory_entity::image::BusinessImage;
use directory_entity::invitation::{Invitation, InvitationStatus};
use directory_entity::location::Location;
use directory_entity::notification::{Notification, NotificationKind};
use directory_entity::session::{Session, SessionStatus};
use directory_entity::social::{SocialLink, SocialPlatform};
use directory_entity::subscription::{Subscription, SubscriptionPlan, SubscriptionStatus};
use directory_entity::user::{User, UserRole, UserStatus};
use directory_service::{OpenStatus, TicketProjection};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T: Serialize> {
    /// Items in this page.
    pub items: Vec<T>,
    /// Total item count.
    pub total: u64,
    /// Current page.
    pub page: u32,
    /// Items per page.
    pub limit: u32,
    /// Total pages.
    pub total_pages: u32,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Convert a store page, mapping each item.
    pub fn from_page<E>(page: PageResponse<E>) -> Self
    where
        T: From<E>,
    {
        Self {
            items: page.items.into_iter().map(T::from).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
        }
    }
}

/// Invitation as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub id: Uuid,
    pub clerk_invitation_id: String,
    pub email: String,
    pub business_name: String,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub status: InvitationStatus,
    pub accepted_at: Option<DateTime<Utc>>,
    pub accepted_by_user_id: Option<Uuid>,
    pub business_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Invitation> for InvitationResponse {
    fn from(i: Invitation) -> Self {
        Self {
            id: i.id,
            clerk_invitation_id: i.external_invitation_id,
            email: i.email,
            business_name: i.business_name,
            phone: i.phone,
            first_name: i.first_name,
            last_name: i.last_name,
            status: i.status,
            accepted_at: i.accepted_at,
            accepted_by_user_id: i.accepted_by_user_id,
            business_id: i.business_id,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

/// What the accept page shows before the user signs up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    /// Always true; invalid tickets are errors.
    pub valid: bool,
    pub clerk_invitation_id: String,
    pub email: String,
    pub business_name: String,
}

impl From<TicketProjection> for TicketResponse {
    fn from(t: TicketProjection) -> Self {
        Self {
            valid: true,
            clerk_invitation_id: t.external_invitation_id,
            email: t.email,
            business_name: t.business_name,
        }
    }
}

/// User as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub clerk_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub profile_image_url: Option<String>,
    pub notifications_enabled: bool,
    pub email_notifications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            clerk_id: u.external_id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            role: u.role,
            status: u.status,
            profile_image_url: u.profile_image_url,
            notifications_enabled: u.notifications_enabled,
            email_notifications: u.email_notifications,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Session as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: Uuid,
    pub clerk_session_id: String,
    pub user_id: Uuid,
    pub status: SessionStatus,
    pub metadata: Option<serde_json::Value>,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
    fn from(s: Session) -> Self {
        Self {
            id: s.id,
            clerk_session_id: s.external_session_id,
            user_id: s.user_id,
            status: s.status,
            metadata: s.metadata,
            last_activity_at: s.last_activity_at,
            ended_at: s.ended_at,
            created_at: s.created_at,
        }
    }
}

/// Business as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub contact_first_name: Option<String>,
    pub contact_last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub status: BusinessStatus,
    pub location_id: Location,
    pub user_id: Option<Uuid>,
    pub rating: f64,
    pub review_count: i32,
    pub featured: bool,
    pub qr_code_url: Option<String>,
    pub qr_code_generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Business> for BusinessResponse {
    fn from(b: Business) -> Self {
        Self {
            id: b.id,
            name: b.name,
            slug: b.slug,
            description: b.description,
            category: b.category,
            contact_first_name: b.contact_first_name,
            contact_last_name: b.contact_last_name,
            email: b.email,
            phone: b.phone,
            website: b.website,
            status: b.status,
            location_id: b.location_id,
            user_id: b.user_id,
            rating: b.rating,
            review_count: b.review_count,
            featured: b.featured,
            qr_code_url: b.qr_code_url,
            qr_code_generated_at: b.qr_code_generated_at,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

/// One day's opening hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursResponse {
    pub id: Uuid,
    pub business_id: Uuid,
    pub day_of_week: i16,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub is_closed: bool,
    pub is_holiday: bool,
    pub note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<BusinessHours> for HoursResponse {
    fn from(h: BusinessHours) -> Self {
        Self {
            id: h.id,
            business_id: h.business_id,
            day_of_week: h.day_of_week,
            open_time: h.open_time,
            close_time: h.close_time,
            is_closed: h.is_closed,
            is_holiday: h.is_holiday,
            note: h.note,
            updated_at: h.updated_at,
        }
    }
}

/// Answer to "is this business open at ...".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenStatusResponse {
    pub business_id: Uuid,
    pub at: NaiveDateTime,
    pub is_open: bool,
    /// The hours row for that weekday, if any.
    pub hours: Option<HoursResponse>,
}

impl From<OpenStatus> for OpenStatusResponse {
    fn from(s: OpenStatus) -> Self {
        Self {
            business_id: s.business_id,
            at: s.at,
            is_open: s.is_open,
            hours: s.hours.map(HoursResponse::from),
        }
    }
}

/// Deal as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealResponse {
    pub id: Uuid,
    pub business_id: Uuid,
    pub title: String,
    pub description: String,
    pub discount: String,
    pub original_price: f64,
    pub discounted_price: f64,
    pub code: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub terms: Vec<String>,
    pub status: DealStatus,
    pub redemption_count: i32,
    pub max_redemptions: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Deal> for DealResponse {
    fn from(d: Deal) -> Self {
        Self {
            id: d.id,
            business_id: d.business_id,
            title: d.title,
            description: d.description,
            discount: d.discount,
            original_price: d.original_price,
            discounted_price: d.discounted_price,
            code: d.code,
            start_date: d.start_date,
            end_date: d.end_date,
            terms: d.terms,
            status: d.status,
            redemption_count: d.redemption_count,
            max_redemptions: d.max_redemptions,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

/// Subscription as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub business_id: Uuid,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub price: f64,
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Whole days left until `endDate`, never negative.
    pub days_remaining: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(s: Subscription) -> Self {
        let days_remaining = s.days_remaining(Utc::now());
        Self {
            id: s.id,
            business_id: s.business_id,
            plan: s.plan,
            status: s.status,
            start_date: s.start_date,
            end_date: s.end_date,
            price: s.price,
            cancelled_at: s.cancelled_at,
            days_remaining,
            created_at: s.created_at,
        }
    }
}

/// Social media link as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinkResponse {
    pub id: Uuid,
    pub business_id: Uuid,
    pub platform: SocialPlatform,
    pub url: String,
    pub username: Option<String>,
    pub is_active: bool,
    pub followers: i32,
    pub last_synced: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SocialLink> for SocialLinkResponse {
    fn from(l: SocialLink) -> Self {
        Self {
            id: l.id,
            business_id: l.business_id,
            platform: l.platform,
            url: l.url,
            username: l.username,
            is_active: l.is_active,
            followers: l.followers,
            last_synced: l.last_synced,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

/// Notification as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub related_id: Option<Uuid>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            kind: n.kind,
            title: n.title,
            message: n.message,
            is_read: n.is_read,
            related_id: n.related_id,
            metadata: n.metadata,
            created_at: n.created_at,
            updated_at: n.updated_at,
        }
    }
}

/// Uploaded image as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessImageResponse {
    pub id: Uuid,
    pub business_id: Option<Uuid>,
    pub file_name: String,
    pub file_url: String,
    pub mime_type: String,
    pub size: i64,
    pub storage_key: String,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
}

impl From<BusinessImage> for BusinessImageResponse {
    fn from(i: BusinessImage) -> Self {
        Self {
            id: i.id,
            business_id: i.business_id,
            file_name: i.file_name,
            file_url: i.file_url,
            mime_type: i.mime_type,
            size: i.size,
            storage_key: i.storage_key,
            is_private: i.is_private,
            created_at: i.created_at,
        }
    }
}

/// Number of unread notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

/// A city businesses can be listed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResponse {
    pub id: Location,
    pub name: String,
}

impl From<Location> for LocationResponse {
    fn from(location: Location) -> Self {
        Self {
            id: location,
            name: location.display_name().to_string(),
        }
    }
}

/// Acknowledgement sent back to the webhook sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub success: bool,
    /// Event type that was processed.
    pub event: String,
}

/// Count of rows touched by a bulk operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Liveness check body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Readiness check body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_response() {
        let json = serde_json::to_value(LocationResponse::from(Location::McAllen)).unwrap();
        assert_eq!(json["id"], "mcallen");
        assert_eq!(json["name"], "McAllen");
    }

    #[test]
    fn test_paginated_response_is_camel_case() {
        let page = PageResponse {
            items: vec![Location::Pharr],
            page: 1,
            limit: 20,
            total: 1,
            total_pages: 1,
        };
        let json =
            serde_json::to_value(PaginatedResponse::<LocationResponse>::from_page(page)).unwrap();
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["items"][0]["name"], "Pharr");
    }
}
