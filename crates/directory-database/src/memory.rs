//! In-memory implementation of every store trait.
//!
//! Enforces the same uniqueness rules as the Postgres schema and reports
//! violations with the same messages. A unit of work holds the store lock
//! for its whole life and writes to a staged copy of the tables, so units
//! are serialized and a dropped unit leaves no trace.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use directory_core::error::AppError;
use directory_core::result::AppResult;
use directory_core::types::{PageRequest, PageResponse};
use directory_entity::business::{Business, BusinessFilter, NewBusiness};
use directory_entity::deal::{Deal, DealStatus, NewDeal};
use directory_entity::hours::{BusinessHours, NewBusinessHours};
use directory_entity::image::{BusinessImage, NewBusinessImage};
use directory_entity::invitation::{Invitation, InvitationFilter, InvitationStatus, NewInvitation};
use directory_entity::location::Location;
use directory_entity::notification::{NewNotification, Notification};
use directory_entity::session::{NewSession, Session, SessionStatus};
use directory_entity::social::{NewSocialLink, SocialLink, SocialPlatform};
use directory_entity::subscription::{NewSubscription, Subscription, SubscriptionStatus};
use directory_entity::user::{NewUser, User};

use crate::repositories::conflict_message;
use crate::store::{
    BusinessHoursStore, BusinessImageStore, BusinessStore, DealStore, InvitationStore,
    NotificationStore, SessionStore, SocialLinkStore, SubscriptionStore, TransactionalStore,
    UnitOfWork, UserStore,
};

fn conflict(constraint: &str) -> AppError {
    AppError::conflict(conflict_message(constraint).unwrap_or("Duplicate value"))
}

fn missing(table: &str) -> AppError {
    AppError::not_found(format!("No {table} row with that id"))
}

#[derive(Debug, Clone, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    invitations: HashMap<Uuid, Invitation>,
    businesses: HashMap<Uuid, Business>,
    sessions: HashMap<Uuid, Session>,
    hours: HashMap<Uuid, BusinessHours>,
    deals: HashMap<Uuid, Deal>,
    subscriptions: HashMap<Uuid, Subscription>,
    social_links: HashMap<Uuid, SocialLink>,
    notifications: HashMap<Uuid, Notification>,
    images: HashMap<Uuid, BusinessImage>,
}

impl Tables {
    fn live_user_by_external_id(&self, external_id: &str) -> Option<User> {
        self.users
            .values()
            .find(|u| u.external_id == external_id && u.deleted_at.is_none())
            .cloned()
    }

    fn insert_user(&mut self, new: &NewUser) -> AppResult<User> {
        if self.users.values().any(|u| u.external_id == new.external_id) {
            return Err(conflict("users_external_id_key"));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            external_id: new.external_id.clone(),
            email: new.email.clone(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            role: new.role,
            status: new.status,
            profile_image_url: new.profile_image_url.clone(),
            notifications_enabled: true,
            email_notifications: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn live_invitation_by_external_id(&self, external_id: &str) -> Option<Invitation> {
        self.invitations
            .values()
            .find(|i| i.external_invitation_id == external_id && i.deleted_at.is_none())
            .cloned()
    }

    fn pending_invitation_for_email(&self, email: &str) -> Option<Invitation> {
        let wanted = email.to_lowercase();
        self.invitations
            .values()
            .find(|i| {
                i.status == InvitationStatus::Pending
                    && i.deleted_at.is_none()
                    && i.email.to_lowercase() == wanted
            })
            .cloned()
    }

    fn check_invitation_unique(&self, candidate: &Invitation) -> AppResult<()> {
        let email = candidate.email.to_lowercase();
        for other in self.invitations.values().filter(|i| i.id != candidate.id) {
            if other.external_invitation_id == candidate.external_invitation_id {
                return Err(conflict("invitations_external_invitation_id_key"));
            }
            if candidate.status == InvitationStatus::Pending
                && candidate.deleted_at.is_none()
                && other.status == InvitationStatus::Pending
                && other.deleted_at.is_none()
                && other.email.to_lowercase() == email
            {
                return Err(conflict("invitations_pending_email_idx"));
            }
        }
        Ok(())
    }

    fn insert_invitation(&mut self, new: &NewInvitation) -> AppResult<Invitation> {
        let now = Utc::now();
        let invitation = Invitation {
            id: Uuid::new_v4(),
            external_invitation_id: new.external_invitation_id.clone(),
            email: new.email.clone(),
            business_name: new.business_name.clone(),
            phone: new.phone.clone(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            status: InvitationStatus::Pending,
            accepted_at: None,
            accepted_by_user_id: None,
            business_id: new.business_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.check_invitation_unique(&invitation)?;
        self.invitations.insert(invitation.id, invitation.clone());
        Ok(invitation)
    }

    fn save_invitation(&mut self, invitation: &Invitation) -> AppResult<Invitation> {
        let current = self
            .invitations
            .get(&invitation.id)
            .ok_or_else(|| missing("invitations"))?;
        let next = Invitation {
            created_at: current.created_at,
            deleted_at: current.deleted_at,
            updated_at: Utc::now(),
            ..invitation.clone()
        };
        self.check_invitation_unique(&next)?;
        self.invitations.insert(next.id, next.clone());
        Ok(next)
    }

    fn check_business_unique(&self, candidate: &Business) -> AppResult<()> {
        for other in self.businesses.values().filter(|b| b.id != candidate.id) {
            if other.slug == candidate.slug {
                return Err(conflict("businesses_slug_key"));
            }
            if other.name == candidate.name && other.location_id == candidate.location_id {
                return Err(conflict("businesses_name_location_key"));
            }
        }
        Ok(())
    }

    fn insert_business(&mut self, new: &NewBusiness) -> AppResult<Business> {
        let now = Utc::now();
        let business = Business {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            slug: new.slug.clone(),
            description: new.description.clone(),
            category: new.category.clone(),
            contact_first_name: new.contact_first_name.clone(),
            contact_last_name: new.contact_last_name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            website: None,
            status: new.status,
            location_id: new.location_id,
            user_id: new.user_id,
            rating: 0.0,
            review_count: 0,
            featured: false,
            qr_code_url: new.qr_code_url.clone(),
            qr_code_generated_at: new.qr_code_generated_at,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.check_business_unique(&business)?;
        self.businesses.insert(business.id, business.clone());
        Ok(business)
    }

    fn save_business(&mut self, business: &Business) -> AppResult<Business> {
        let current = self
            .businesses
            .get(&business.id)
            .ok_or_else(|| missing("businesses"))?;
        let next = Business {
            slug: current.slug.clone(),
            created_at: current.created_at,
            deleted_at: current.deleted_at,
            updated_at: Utc::now(),
            ..business.clone()
        };
        self.check_business_unique(&next)?;
        self.businesses.insert(next.id, next.clone());
        Ok(next)
    }

    fn live_business(&self, id: Uuid) -> Option<Business> {
        self.businesses
            .get(&id)
            .filter(|b| b.deleted_at.is_none())
            .cloned()
    }
}

fn business_matches(filter: &BusinessFilter, business: &Business) -> bool {
    business.deleted_at.is_none()
        && filter.location_id.is_none_or(|l| business.location_id == l)
        && filter.status.is_none_or(|s| business.status == s)
        && filter.user_id.is_none_or(|u| business.user_id == Some(u))
        && filter
            .category
            .as_ref()
            .is_none_or(|c| business.category.as_ref() == Some(c))
        && filter.search.as_ref().is_none_or(|needle| {
            business
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
        })
}

fn paginate<T: Clone>(rows: Vec<T>, page: PageRequest) -> PageResponse<T> {
    let total = rows.len() as u64;
    let items = rows
        .into_iter()
        .skip(page.offset().max(0) as usize)
        .take(page.limit().max(0) as usize)
        .collect();
    PageResponse::new(items, page, total)
}

/// Store backed by process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_business_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every business write inside a unit of work fail with a
    /// database error until switched off again.
    pub fn set_fail_business_writes(&self, fail: bool) {
        self.fail_business_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl InvitationStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Invitation>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .invitations
            .get(&id)
            .filter(|i| i.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<Invitation>> {
        Ok(self
            .tables
            .lock()
            .await
            .live_invitation_by_external_id(external_id))
    }

    async fn find_pending_by_email(&self, email: &str) -> AppResult<Option<Invitation>> {
        Ok(self.tables.lock().await.pending_invitation_for_email(email))
    }

    async fn list(&self, filter: &InvitationFilter) -> AppResult<Vec<Invitation>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Invitation> = tables
            .invitations
            .values()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, new: &NewInvitation) -> AppResult<Invitation> {
        self.tables.lock().await.insert_invitation(new)
    }

    async fn save(&self, invitation: &Invitation) -> AppResult<Invitation> {
        self.tables.lock().await.save_invitation(invitation)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.get(&id).filter(|u| !u.is_deleted()).cloned())
    }

    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<User>> {
        Ok(self.tables.lock().await.live_user_by_external_id(external_id))
    }

    async fn list(&self, page: PageRequest) -> AppResult<PageResponse<User>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<User> = tables
            .users
            .values()
            .filter(|u| !u.is_deleted())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(rows, page))
    }

    async fn insert(&self, new: &NewUser) -> AppResult<User> {
        self.tables.lock().await.insert_user(new)
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        let mut tables = self.tables.lock().await;
        let current = tables.users.get(&user.id).ok_or_else(|| missing("users"))?;
        let next = User {
            external_id: current.external_id.clone(),
            created_at: current.created_at,
            deleted_at: current.deleted_at,
            updated_at: Utc::now(),
            ..user.clone()
        };
        tables.users.insert(next.id, next.clone());
        Ok(next)
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.users.get_mut(&id) {
            Some(user) if user.deleted_at.is_none() => {
                let now = Utc::now();
                user.deleted_at = Some(now);
                user.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl BusinessStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Business>> {
        Ok(self.tables.lock().await.live_business(id))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Business>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .businesses
            .values()
            .find(|b| b.slug == slug && b.deleted_at.is_none())
            .cloned())
    }

    async fn list(
        &self,
        filter: &BusinessFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Business>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Business> = tables
            .businesses
            .values()
            .filter(|b| business_matches(filter, b))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.featured
                .cmp(&a.featured)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(paginate(rows, page))
    }

    async fn save(&self, business: &Business) -> AppResult<Business> {
        self.tables.lock().await.save_business(business)
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.businesses.get_mut(&id) {
            Some(business) if business.deleted_at.is_none() => {
                let now = Utc::now();
                business.deleted_at = Some(now);
                business.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<Session>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .sessions
            .values()
            .find(|s| s.external_session_id == external_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Session> = tables
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, new: &NewSession) -> AppResult<Session> {
        let mut tables = self.tables.lock().await;
        if tables
            .sessions
            .values()
            .any(|s| s.external_session_id == new.external_session_id)
        {
            return Err(conflict("sessions_external_session_id_key"));
        }
        if !tables.users.contains_key(&new.user_id) {
            return Err(missing("users"));
        }
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            external_session_id: new.external_session_id.clone(),
            user_id: new.user_id,
            status: SessionStatus::Active,
            metadata: new.metadata.clone(),
            last_activity_at: Some(now),
            ended_at: None,
            created_at: now,
            updated_at: now,
        };
        tables.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn save(&self, session: &Session) -> AppResult<Session> {
        let mut tables = self.tables.lock().await;
        let current = tables
            .sessions
            .get(&session.id)
            .ok_or_else(|| missing("sessions"))?;
        let next = Session {
            external_session_id: current.external_session_id.clone(),
            user_id: current.user_id,
            created_at: current.created_at,
            updated_at: Utc::now(),
            ..session.clone()
        };
        tables.sessions.insert(next.id, next.clone());
        Ok(next)
    }
}

#[async_trait]
impl BusinessHoursStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BusinessHours>> {
        Ok(self.tables.lock().await.hours.get(&id).cloned())
    }

    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<BusinessHours>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<BusinessHours> = tables
            .hours
            .values()
            .filter(|h| h.business_id == business_id)
            .cloned()
            .collect();
        rows.sort_by_key(|h| h.day_of_week);
        Ok(rows)
    }

    async fn insert(&self, new: &NewBusinessHours) -> AppResult<BusinessHours> {
        let mut tables = self.tables.lock().await;
        if !tables.businesses.contains_key(&new.business_id) {
            return Err(missing("businesses"));
        }
        if tables
            .hours
            .values()
            .any(|h| h.business_id == new.business_id && h.day_of_week == new.day_of_week)
        {
            return Err(conflict("business_hours_business_day_key"));
        }
        let now = Utc::now();
        let hours = BusinessHours {
            id: Uuid::new_v4(),
            business_id: new.business_id,
            day_of_week: new.day_of_week,
            open_time: new.open_time,
            close_time: new.close_time,
            is_closed: new.is_closed,
            is_holiday: new.is_holiday,
            note: new.note.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.hours.insert(hours.id, hours.clone());
        Ok(hours)
    }

    async fn save(&self, hours: &BusinessHours) -> AppResult<BusinessHours> {
        let mut tables = self.tables.lock().await;
        let current = tables.hours.get(&hours.id).ok_or_else(|| missing("business_hours"))?;
        let next = BusinessHours {
            business_id: current.business_id,
            day_of_week: current.day_of_week,
            created_at: current.created_at,
            updated_at: Utc::now(),
            ..hours.clone()
        };
        tables.hours.insert(next.id, next.clone());
        Ok(next)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.lock().await.hours.remove(&id).is_some())
    }
}

#[async_trait]
impl DealStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Deal>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .deals
            .get(&id)
            .filter(|d| d.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Deal>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .deals
            .values()
            .find(|d| d.code == code && d.deleted_at.is_none())
            .cloned())
    }

    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<Deal>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Deal> = tables
            .deals
            .values()
            .filter(|d| d.business_id == business_id && d.deleted_at.is_none())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_active(&self, now: DateTime<Utc>) -> AppResult<Vec<Deal>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Deal> = tables
            .deals
            .values()
            .filter(|d| d.deleted_at.is_none() && d.is_live(now))
            .cloned()
            .collect();
        rows.sort_by_key(|d| d.end_date);
        Ok(rows)
    }

    async fn insert(&self, new: &NewDeal) -> AppResult<Deal> {
        let mut tables = self.tables.lock().await;
        if !tables.businesses.contains_key(&new.business_id) {
            return Err(missing("businesses"));
        }
        if tables.deals.values().any(|d| d.code == new.code) {
            return Err(conflict("deals_code_key"));
        }
        new.validate()?;
        let now = Utc::now();
        let deal = Deal {
            id: Uuid::new_v4(),
            business_id: new.business_id,
            title: new.title.clone(),
            description: new.description.clone(),
            discount: new.discount.clone(),
            original_price: new.original_price,
            discounted_price: new.discounted_price,
            code: new.code.clone(),
            start_date: new.start_date,
            end_date: new.end_date,
            terms: new.terms.clone(),
            status: new.status,
            redemption_count: 0,
            max_redemptions: new.max_redemptions,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.deals.insert(deal.id, deal.clone());
        Ok(deal)
    }

    async fn save(&self, deal: &Deal) -> AppResult<Deal> {
        let mut tables = self.tables.lock().await;
        let current = tables.deals.get(&deal.id).ok_or_else(|| missing("deals"))?;
        let next = Deal {
            business_id: current.business_id,
            code: current.code.clone(),
            redemption_count: current.redemption_count,
            created_at: current.created_at,
            deleted_at: current.deleted_at,
            updated_at: Utc::now(),
            ..deal.clone()
        };
        tables.deals.insert(next.id, next.clone());
        Ok(next)
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.deals.get_mut(&id) {
            Some(deal) if deal.deleted_at.is_none() => {
                let now = Utc::now();
                deal.deleted_at = Some(now);
                deal.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn redeem(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Deal> {
        let mut tables = self.tables.lock().await;
        let deal = tables
            .deals
            .get_mut(&id)
            .filter(|d| d.deleted_at.is_none())
            .ok_or_else(|| AppError::not_found(format!("Deal {id} not found")))?;
        deal.check_redeemable(now)?;
        deal.redemption_count += 1;
        deal.updated_at = Utc::now();
        Ok(deal.clone())
    }

    async fn expire_ended(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut tables = self.tables.lock().await;
        let mut expired = 0;
        for deal in tables.deals.values_mut().filter(|d| {
            d.status == DealStatus::Active && d.end_date < now && d.deleted_at.is_none()
        }) {
            deal.status = DealStatus::Expired;
            deal.updated_at = Utc::now();
            expired += 1;
        }
        Ok(expired)
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        Ok(self.tables.lock().await.subscriptions.get(&id).cloned())
    }

    async fn find_active(
        &self,
        business_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Subscription>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .subscriptions
            .values()
            .filter(|s| s.business_id == business_id && s.is_active(now))
            .max_by_key(|s| s.end_date)
            .cloned())
    }

    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<Subscription>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Subscription> = tables
            .subscriptions
            .values()
            .filter(|s| s.business_id == business_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, new: &NewSubscription) -> AppResult<Subscription> {
        let mut tables = self.tables.lock().await;
        if !tables.businesses.contains_key(&new.business_id) {
            return Err(missing("businesses"));
        }
        let now = Utc::now();
        let subscription = Subscription {
            id: Uuid::new_v4(),
            business_id: new.business_id,
            plan: new.plan,
            status: new.status,
            start_date: new.start_date,
            end_date: new.end_date,
            price: new.price,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        };
        tables
            .subscriptions
            .insert(subscription.id, subscription.clone());
        Ok(subscription)
    }

    async fn save(&self, subscription: &Subscription) -> AppResult<Subscription> {
        let mut tables = self.tables.lock().await;
        let current = tables
            .subscriptions
            .get(&subscription.id)
            .ok_or_else(|| missing("subscriptions"))?;
        let next = Subscription {
            business_id: current.business_id,
            created_at: current.created_at,
            updated_at: Utc::now(),
            ..subscription.clone()
        };
        tables.subscriptions.insert(next.id, next.clone());
        Ok(next)
    }

    async fn expire_ended(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut tables = self.tables.lock().await;
        let mut expired = 0;
        for subscription in tables
            .subscriptions
            .values_mut()
            .filter(|s| s.status == SubscriptionStatus::Active && s.end_date <= now)
        {
            subscription.status = SubscriptionStatus::Expired;
            subscription.updated_at = Utc::now();
            expired += 1;
        }
        Ok(expired)
    }
}

#[async_trait]
impl SocialLinkStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SocialLink>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .social_links
            .get(&id)
            .filter(|l| l.deleted_at.is_none())
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<SocialLink>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<SocialLink> = tables
            .social_links
            .values()
            .filter(|l| l.deleted_at.is_none())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<SocialLink>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<SocialLink> = tables
            .social_links
            .values()
            .filter(|l| l.business_id == business_id && l.deleted_at.is_none())
            .cloned()
            .collect();
        rows.sort_by_key(|l| l.platform.as_str());
        Ok(rows)
    }

    async fn platform_taken(
        &self,
        business_id: Uuid,
        platform: SocialPlatform,
    ) -> AppResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables
            .social_links
            .values()
            .any(|l| l.business_id == business_id && l.platform == platform))
    }

    async fn insert(&self, new: &NewSocialLink) -> AppResult<SocialLink> {
        let mut tables = self.tables.lock().await;
        if !tables.businesses.contains_key(&new.business_id) {
            return Err(missing("businesses"));
        }
        if tables
            .social_links
            .values()
            .any(|l| l.business_id == new.business_id && l.platform == new.platform)
        {
            return Err(conflict("social_links_business_platform_key"));
        }
        let now = Utc::now();
        let link = SocialLink {
            id: Uuid::new_v4(),
            business_id: new.business_id,
            platform: new.platform,
            url: new.url.clone(),
            username: new.username.clone(),
            is_active: new.is_active,
            followers: 0,
            last_synced: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.social_links.insert(link.id, link.clone());
        Ok(link)
    }

    async fn save(&self, link: &SocialLink) -> AppResult<SocialLink> {
        let mut tables = self.tables.lock().await;
        let current = tables
            .social_links
            .get(&link.id)
            .ok_or_else(|| missing("social_links"))?;
        let next = SocialLink {
            business_id: current.business_id,
            platform: current.platform,
            created_at: current.created_at,
            deleted_at: current.deleted_at,
            updated_at: Utc::now(),
            ..link.clone()
        };
        tables.social_links.insert(next.id, next.clone());
        Ok(next)
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.social_links.get_mut(&id) {
            Some(link) if link.deleted_at.is_none() => {
                let now = Utc::now();
                link.deleted_at = Some(now);
                link.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notification>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .notifications
            .get(&id)
            .filter(|n| n.deleted_at.is_none())
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Notification> = tables
            .notifications
            .values()
            .filter(|n| n.user_id == user_id && n.deleted_at.is_none())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, new: &NewNotification) -> AppResult<Notification> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&new.user_id) {
            return Err(missing("users"));
        }
        let now = Utc::now();
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            kind: new.kind,
            title: new.title.clone(),
            message: new.message.clone(),
            is_read: false,
            related_id: new.related_id,
            metadata: new.metadata.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables
            .notifications
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn save(&self, notification: &Notification) -> AppResult<Notification> {
        let mut tables = self.tables.lock().await;
        let current = tables
            .notifications
            .get(&notification.id)
            .ok_or_else(|| missing("notifications"))?;
        let next = Notification {
            user_id: current.user_id,
            kind: current.kind,
            created_at: current.created_at,
            deleted_at: current.deleted_at,
            updated_at: Utc::now(),
            ..notification.clone()
        };
        tables.notifications.insert(next.id, next.clone());
        Ok(next)
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.notifications.get_mut(&id) {
            Some(notification) if notification.deleted_at.is_none() => {
                let now = Utc::now();
                notification.deleted_at = Some(now);
                notification.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let mut changed = 0;
        for notification in tables
            .notifications
            .values_mut()
            .filter(|n| n.user_id == user_id && !n.is_read && n.deleted_at.is_none())
        {
            notification.is_read = true;
            notification.updated_at = now;
            changed += 1;
        }
        Ok(changed)
    }

    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64> {
        let tables = self.tables.lock().await;
        let unread = tables
            .notifications
            .values()
            .filter(|n| n.user_id == user_id && !n.is_read && n.deleted_at.is_none())
            .count();
        Ok(unread as i64)
    }
}

#[async_trait]
impl BusinessImageStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BusinessImage>> {
        Ok(self.tables.lock().await.images.get(&id).cloned())
    }

    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<BusinessImage>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<BusinessImage> = tables
            .images
            .values()
            .filter(|i| i.business_id == Some(business_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, new: &NewBusinessImage) -> AppResult<BusinessImage> {
        let mut tables = self.tables.lock().await;
        if new
            .business_id
            .is_some_and(|id| !tables.businesses.contains_key(&id))
        {
            return Err(missing("businesses"));
        }
        if tables
            .images
            .values()
            .any(|i| i.storage_key == new.storage_key)
        {
            return Err(conflict("business_images_storage_key_key"));
        }
        let now = Utc::now();
        let image = BusinessImage {
            id: Uuid::new_v4(),
            business_id: new.business_id,
            file_name: new.file_name.clone(),
            file_url: new.file_url.clone(),
            mime_type: new.mime_type.clone(),
            size: new.size,
            storage_key: new.storage_key.clone(),
            is_private: new.is_private,
            created_at: now,
            updated_at: now,
        };
        tables.images.insert(image.id, image.clone());
        Ok(image)
    }

    async fn save(&self, image: &BusinessImage) -> AppResult<BusinessImage> {
        let mut tables = self.tables.lock().await;
        let current = tables.images.get(&image.id).ok_or_else(|| missing("business_images"))?;
        let next = BusinessImage {
            business_id: image.business_id,
            file_url: image.file_url.clone(),
            updated_at: Utc::now(),
            ..current.clone()
        };
        tables.images.insert(next.id, next.clone());
        Ok(next)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.lock().await.images.remove(&id).is_some())
    }
}

#[async_trait]
impl TransactionalStore for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnit {
            guard,
            staged,
            fail_business_writes: Arc::clone(&self.fail_business_writes),
        }))
    }
}

/// A unit of work over [`MemoryStore`].
struct MemoryUnit {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
    fail_business_writes: Arc<AtomicBool>,
}

impl MemoryUnit {
    fn check_business_fault(&self) -> AppResult<()> {
        if self.fail_business_writes.load(Ordering::SeqCst) {
            return Err(AppError::database("Injected business write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnit {
    async fn lock_invitation(&mut self, external_id: &str) -> AppResult<Option<Invitation>> {
        Ok(self.staged.live_invitation_by_external_id(external_id))
    }

    async fn pending_invitation_for_email(
        &mut self,
        email: &str,
    ) -> AppResult<Option<Invitation>> {
        Ok(self.staged.pending_invitation_for_email(email))
    }

    async fn insert_invitation(&mut self, new: &NewInvitation) -> AppResult<Invitation> {
        self.staged.insert_invitation(new)
    }

    async fn save_invitation(&mut self, invitation: &Invitation) -> AppResult<Invitation> {
        self.staged.save_invitation(invitation)
    }

    async fn user_by_external_id(&mut self, external_id: &str) -> AppResult<Option<User>> {
        Ok(self.staged.live_user_by_external_id(external_id))
    }

    async fn insert_user(&mut self, new: &NewUser) -> AppResult<User> {
        self.staged.insert_user(new)
    }

    async fn lock_business(&mut self, id: Uuid) -> AppResult<Option<Business>> {
        Ok(self.staged.live_business(id))
    }

    async fn business_slug_exists(&mut self, slug: &str) -> AppResult<bool> {
        Ok(self.staged.businesses.values().any(|b| b.slug == slug))
    }

    async fn business_name_exists(&mut self, name: &str, location: Location) -> AppResult<bool> {
        Ok(self
            .staged
            .businesses
            .values()
            .any(|b| b.name == name && b.location_id == location))
    }

    async fn insert_business(&mut self, new: &NewBusiness) -> AppResult<Business> {
        self.check_business_fault()?;
        self.staged.insert_business(new)
    }

    async fn save_business(&mut self, business: &Business) -> AppResult<Business> {
        self.check_business_fault()?;
        self.staged.save_business(business)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryUnit {
            mut guard, staged, ..
        } = *self;
        *guard = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use directory_core::error::ErrorKind;
    use directory_entity::business::BusinessStatus;
    use directory_entity::user::{UserRole, UserStatus};

    fn new_invitation(external_id: &str, email: &str) -> NewInvitation {
        NewInvitation {
            external_invitation_id: external_id.to_string(),
            email: email.to_string(),
            business_name: "Shop X".to_string(),
            phone: None,
            first_name: None,
            last_name: None,
            business_id: None,
        }
    }

    fn new_business(name: &str, slug: &str) -> NewBusiness {
        NewBusiness {
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            category: None,
            contact_first_name: None,
            contact_last_name: None,
            email: None,
            phone: None,
            status: BusinessStatus::Pending,
            location_id: Location::McAllen,
            user_id: None,
            qr_code_url: None,
            qr_code_generated_at: None,
        }
    }

    fn new_user(external_id: &str) -> NewUser {
        NewUser {
            external_id: external_id.to_string(),
            email: "someone@example.com".to_string(),
            first_name: None,
            last_name: None,
            role: UserRole::User,
            status: UserStatus::Active,
            profile_image_url: None,
        }
    }

    #[tokio::test]
    async fn test_second_pending_invitation_for_email_conflicts() {
        let store = MemoryStore::new();
        InvitationStore::insert(&store, &new_invitation("inv_1", "Owner@Shop.com"))
            .await
            .unwrap();

        let err = InvitationStore::insert(&store, &new_invitation("inv_2", "owner@shop.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "A pending invitation already exists for this email");
    }

    #[tokio::test]
    async fn test_revoked_invitation_frees_the_email() {
        let store = MemoryStore::new();
        let first = InvitationStore::insert(&store, &new_invitation("inv_1", "a@b.com"))
            .await
            .unwrap();
        let revoked = first.revoke(Utc::now()).unwrap();
        InvitationStore::save(&store, &revoked).await.unwrap();

        assert!(
            InvitationStore::insert(&store, &new_invitation("inv_2", "a@b.com"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_dropped_unit_leaves_no_writes() {
        let store = MemoryStore::new();
        {
            let mut unit = store.begin().await.unwrap();
            unit.insert_business(&new_business("Shop X", "shop-x"))
                .await
                .unwrap();
            unit.insert_user(&new_user("user_1")).await.unwrap();
        }
        assert!(store.find_by_slug("shop-x").await.unwrap().is_none());
        assert!(
            UserStore::find_by_external_id(&store, "user_1")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_committed_unit_is_visible() {
        let store = MemoryStore::new();
        let mut unit = store.begin().await.unwrap();
        unit.insert_business(&new_business("Shop X", "shop-x"))
            .await
            .unwrap();
        unit.commit().await.unwrap();

        assert!(store.find_by_slug("shop-x").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_business_name_unique_per_location() {
        let store = MemoryStore::new();
        let mut unit = store.begin().await.unwrap();
        unit.insert_business(&new_business("Shop X", "shop-x"))
            .await
            .unwrap();
        let err = unit
            .insert_business(&new_business("Shop X", "shop-x-2"))
            .await
            .unwrap_err();
        assert_eq!(
            err.message,
            "A business with this name already exists in this location"
        );
        assert!(
            unit.business_name_exists("Shop X", Location::McAllen)
                .await
                .unwrap()
        );
        assert!(
            !unit
                .business_name_exists("Shop X", Location::Pharr)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_injected_business_failure() {
        let store = MemoryStore::new();
        store.set_fail_business_writes(true);
        let mut unit = store.begin().await.unwrap();
        let err = unit
            .insert_business(&new_business("Shop X", "shop-x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_only_that_user() {
        let store = MemoryStore::new();
        let a = UserStore::insert(&store, &new_user("user_a")).await.unwrap();
        UserStore::insert(&store, &new_user("user_b")).await.unwrap();

        assert!(UserStore::soft_delete(&store, a.id).await.unwrap());
        let page = UserStore::list(&store, PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].external_id, "user_b");
    }

    async fn committed_business(store: &MemoryStore) -> Business {
        let mut unit = store.begin().await.unwrap();
        let business = unit
            .insert_business(&new_business("Shop X", "shop-x"))
            .await
            .unwrap();
        unit.commit().await.unwrap();
        business
    }

    #[tokio::test]
    async fn test_deleted_social_link_still_holds_its_platform() {
        let store = MemoryStore::new();
        let business = committed_business(&store).await;
        let new = NewSocialLink {
            business_id: business.id,
            platform: SocialPlatform::Facebook,
            url: "https://facebook.com/shopx".into(),
            username: None,
            is_active: true,
        };
        let link = SocialLinkStore::insert(&store, &new).await.unwrap();
        assert!(SocialLinkStore::soft_delete(&store, link.id).await.unwrap());

        assert!(
            store
                .platform_taken(business.id, SocialPlatform::Facebook)
                .await
                .unwrap()
        );
        let err = SocialLinkStore::insert(&store, &new).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(
            SocialLinkStore::list_by_business(&store, business.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_mark_all_read_skips_deleted_and_other_users() {
        let store = MemoryStore::new();
        let alice = UserStore::insert(&store, &new_user("user_a")).await.unwrap();
        let bob = UserStore::insert(&store, &new_user("user_b")).await.unwrap();
        let note = |user_id| NewNotification {
            user_id,
            kind: directory_entity::notification::NotificationKind::System,
            title: "Welcome".into(),
            message: "Thanks for joining".into(),
            related_id: None,
            metadata: None,
        };
        NotificationStore::insert(&store, &note(alice.id)).await.unwrap();
        let gone = NotificationStore::insert(&store, &note(alice.id)).await.unwrap();
        NotificationStore::insert(&store, &note(bob.id)).await.unwrap();
        NotificationStore::soft_delete(&store, gone.id).await.unwrap();

        assert_eq!(store.count_unread(alice.id).await.unwrap(), 1);
        assert_eq!(store.mark_all_read(alice.id).await.unwrap(), 1);
        assert_eq!(store.count_unread(alice.id).await.unwrap(), 0);
        assert_eq!(store.count_unread(bob.id).await.unwrap(), 1);

        let err = NotificationStore::insert(&store, &note(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
