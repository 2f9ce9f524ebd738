//! Route definitions for the directory HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::Router;
use axum::routing::{delete, get, patch, post};

use crate::handlers;
use crate::state::AppState;

/// Build the API router without the middleware stack.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(invitation_routes())
        .merge(webhook_routes())
        .merge(user_routes())
        .merge(session_routes())
        .merge(business_routes())
        .merge(hours_routes())
        .merge(deal_routes())
        .merge(subscription_routes())
        .merge(social_routes())
        .merge(notification_routes())
        .merge(image_routes())
        .merge(location_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Invitation lifecycle and acceptance
fn invitation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/invitations",
            get(handlers::invitation::list_invitations).post(handlers::invitation::create_invitation),
        )
        .route(
            "/invitations/accept",
            post(handlers::invitation::accept_invitation),
        )
        .route(
            "/invitations/verify/{token}",
            get(handlers::invitation::verify_invitation),
        )
        .route(
            "/invitations/clerk/{external_id}",
            get(handlers::invitation::get_invitation_by_external_id),
        )
        .route("/invitations/{id}", get(handlers::invitation::get_invitation))
        .route(
            "/invitations/{id}/resend",
            post(handlers::invitation::resend_invitation),
        )
        .route(
            "/invitations/{id}/cancel",
            post(handlers::invitation::cancel_invitation),
        )
}

/// Identity provider webhooks
fn webhook_routes() -> Router<AppState> {
    Router::new().route("/clerk/webhooks", post(handlers::webhook::receive_webhook))
}

/// Local user mirror
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list_users))
        .route(
            "/users/clerk/{external_id}",
            get(handlers::user::get_user_by_external_id),
        )
        .route(
            "/users/{id}",
            get(handlers::user::get_user)
                .patch(handlers::user::update_user)
                .delete(handlers::user::delete_user),
        )
        .route(
            "/users/{id}/businesses",
            get(handlers::user::list_user_businesses),
        )
}

/// Local session mirror
fn session_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/sessions/user/{user_id}",
            get(handlers::session::list_user_sessions),
        )
        .route(
            "/sessions/user/{user_id}/all",
            delete(handlers::session::revoke_all_user_sessions),
        )
        .route(
            "/sessions/{session_id}",
            get(handlers::session::get_session),
        )
        .route(
            "/sessions/{session_id}/end",
            post(handlers::session::end_session),
        )
        .route(
            "/sessions/{session_id}/revoke",
            post(handlers::session::revoke_session),
        )
}

/// Business listings
fn business_routes() -> Router<AppState> {
    Router::new()
        .route("/businesses", get(handlers::business::list_businesses))
        .route(
            "/businesses/slug/{slug}",
            get(handlers::business::get_business_by_slug),
        )
        .route(
            "/businesses/user/{user_id}",
            get(handlers::business::list_businesses_by_owner),
        )
        .route(
            "/businesses/{id}",
            get(handlers::business::get_business)
                .patch(handlers::business::update_business)
                .delete(handlers::business::delete_business),
        )
        .route(
            "/businesses/{id}/qr-code/generate",
            post(handlers::business::regenerate_qr_code),
        )
        .route(
            "/businesses/{id}/open",
            get(handlers::business::open_status),
        )
}

/// Opening hours
fn hours_routes() -> Router<AppState> {
    Router::new()
        .route("/business-hours", post(handlers::hours::create_hours))
        .route(
            "/business-hours/business/{business_id}",
            get(handlers::hours::list_business_hours),
        )
        .route(
            "/business-hours/{id}",
            get(handlers::hours::get_hours)
                .patch(handlers::hours::update_hours)
                .delete(handlers::hours::delete_hours),
        )
}

/// Deals and redemption
fn deal_routes() -> Router<AppState> {
    Router::new()
        .route("/deals", post(handlers::deal::create_deal))
        .route("/deals/active", get(handlers::deal::list_active_deals))
        .route("/deals/code/{code}", get(handlers::deal::get_deal_by_code))
        .route(
            "/deals/business/{business_id}",
            get(handlers::deal::list_business_deals),
        )
        .route(
            "/deals/{id}",
            get(handlers::deal::get_deal)
                .patch(handlers::deal::update_deal)
                .delete(handlers::deal::delete_deal),
        )
        .route("/deals/{id}/status", patch(handlers::deal::set_deal_status))
        .route("/deals/{id}/redeem", post(handlers::deal::redeem_deal))
}

/// Subscriptions
fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/subscriptions",
            post(handlers::subscription::create_subscription),
        )
        .route(
            "/subscriptions/business/{business_id}",
            get(handlers::subscription::list_business_subscriptions),
        )
        .route(
            "/subscriptions/business/{business_id}/active",
            get(handlers::subscription::get_active_subscription),
        )
        .route(
            "/subscriptions/{id}",
            get(handlers::subscription::get_subscription)
                .patch(handlers::subscription::update_subscription),
        )
        .route(
            "/subscriptions/{id}/cancel",
            post(handlers::subscription::cancel_subscription),
        )
}

/// Social media links
fn social_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/social-media",
            get(handlers::social::list_social_links).post(handlers::social::create_social_link),
        )
        .route(
            "/social-media/business/{business_id}",
            get(handlers::social::list_business_social_links),
        )
        .route(
            "/social-media/{id}",
            get(handlers::social::get_social_link)
                .patch(handlers::social::update_social_link)
                .delete(handlers::social::delete_social_link),
        )
        .route(
            "/social-media/{id}/sync-followers",
            patch(handlers::social::sync_followers),
        )
}

/// User notifications
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            post(handlers::notification::create_notification),
        )
        .route(
            "/notifications/user/{user_id}",
            get(handlers::notification::list_user_notifications),
        )
        .route(
            "/notifications/user/{user_id}/unread/count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/user/{user_id}/read/all",
            post(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}",
            get(handlers::notification::get_notification)
                .patch(handlers::notification::update_notification)
                .delete(handlers::notification::delete_notification),
        )
        .route(
            "/notifications/{id}/read",
            patch(handlers::notification::mark_read),
        )
}

/// Uploaded business images
fn image_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/business-images/upload/{kind}",
            post(handlers::image::upload_image),
        )
        .route(
            "/business-images/business/{business_id}",
            get(handlers::image::list_business_images),
        )
        .route(
            "/business-images/refresh-url/{id}",
            post(handlers::image::refresh_image_url),
        )
        .route(
            "/business-images/{id}",
            get(handlers::image::get_image).delete(handlers::image::delete_image),
        )
}

/// Reference data
fn location_routes() -> Router<AppState> {
    Router::new().route("/locations", get(handlers::location::list_locations))
}

/// Liveness and readiness
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/ready", get(handlers::health::readiness))
}
