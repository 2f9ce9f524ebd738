//! Integration tests for the public directory: businesses, hours, deals,
//! subscriptions, social links, notifications, images, locations and health.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::TestApp;

async fn active_business(app: &TestApp) -> String {
    let invitation = app
        .onboard("owner@tacos.com", "Taco Palace", "user_42")
        .await;
    invitation["businessId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_locations_and_health() {
    let app = TestApp::new();

    let locations = app.request("GET", "/api/locations", None).await;
    assert_eq!(locations.status, StatusCode::OK);
    let items = locations.data().as_array().unwrap();
    assert_eq!(items.len(), 7);
    assert_eq!(items[0], json!({"id": "mcallen", "name": "McAllen"}));

    let health = app.request("GET", "/api/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.data()["status"], "ok");

    let ready = app.request("GET", "/api/health/ready", None).await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.data()["database"], "in-memory");
}

#[tokio::test]
async fn test_business_listing_filters() {
    let app = TestApp::new();
    active_business(&app).await;
    app.invite("second@shop.com", "Corner Shop").await;

    let all = app.request("GET", "/api/businesses", None).await;
    assert_eq!(all.data()["total"], 2);

    let pending = app
        .request("GET", "/api/businesses?status=pending", None)
        .await;
    assert_eq!(pending.data()["total"], 1);
    assert_eq!(pending.data()["items"][0]["name"], "Corner Shop");

    let search = app
        .request("GET", "/api/businesses?search=taco&locationId=mcallen", None)
        .await;
    assert_eq!(search.data()["total"], 1);
    assert_eq!(search.data()["items"][0]["slug"], "taco-palace");

    let elsewhere = app
        .request("GET", "/api/businesses?locationId=brownsville", None)
        .await;
    assert_eq!(elsewhere.data()["total"], 0);

    let by_slug = app
        .request("GET", "/api/businesses/slug/corner-shop", None)
        .await;
    assert_eq!(by_slug.status, StatusCode::OK);
    assert_eq!(by_slug.data()["status"], "pending");
}

#[tokio::test]
async fn test_update_business_keeps_slug() {
    let app = TestApp::new();
    let id = active_business(&app).await;

    let updated = app
        .request(
            "PATCH",
            &format!("/api/businesses/{id}"),
            Some(json!({"name": "Taco Palace Deluxe", "category": "restaurant"})),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);
    assert_eq!(updated.data()["name"], "Taco Palace Deluxe");
    assert_eq!(updated.data()["slug"], "taco-palace");
    assert_eq!(updated.data()["category"], "restaurant");
}

#[tokio::test]
async fn test_hours_drive_open_status() {
    let app = TestApp::new();
    let id = active_business(&app).await;

    let created = app
        .request(
            "POST",
            "/api/business-hours",
            Some(json!({
                "businessId": id,
                "dayOfWeek": 1,
                "openTime": "09:00:00",
                "closeTime": "17:00:00"
            })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);

    let listed = app
        .request("GET", &format!("/api/business-hours/business/{id}"), None)
        .await;
    assert_eq!(listed.data().as_array().unwrap().len(), 1);

    // 2026-03-02 is a Monday.
    let open = app
        .request(
            "GET",
            &format!("/api/businesses/{id}/open?at=2026-03-02T10:00:00"),
            None,
        )
        .await;
    assert_eq!(open.status, StatusCode::OK, "{}", open.body);
    assert_eq!(open.data()["isOpen"], true);
    assert_eq!(open.data()["hours"]["dayOfWeek"], 1);

    let late = app
        .request(
            "GET",
            &format!("/api/businesses/{id}/open?at=2026-03-02T18:30:00"),
            None,
        )
        .await;
    assert_eq!(late.data()["isOpen"], false);

    let sunday = app
        .request(
            "GET",
            &format!("/api/businesses/{id}/open?at=2026-03-01T10:00:00"),
            None,
        )
        .await;
    assert_eq!(sunday.data()["isOpen"], false);
    assert!(sunday.data()["hours"].is_null());
}

#[tokio::test]
async fn test_deal_redemption_counts_up_to_the_cap() {
    let app = TestApp::new();
    let id = active_business(&app).await;

    let created = app
        .request(
            "POST",
            "/api/deals",
            Some(json!({
                "businessId": id,
                "title": "Taco Tuesday",
                "discount": "50%",
                "originalPrice": 10.0,
                "discountedPrice": 5.0,
                "code": "TACO50",
                "startDate": "2020-01-01T00:00:00Z",
                "endDate": "2999-01-01T00:00:00Z",
                "status": "active",
                "maxRedemptions": 1
            })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    let deal_id = created.data()["id"].as_str().unwrap().to_string();

    let active = app.request("GET", "/api/deals/active", None).await;
    assert_eq!(active.data().as_array().unwrap().len(), 1);

    let by_code = app.request("GET", "/api/deals/code/TACO50", None).await;
    assert_eq!(by_code.data()["id"], deal_id.as_str());

    let redeemed = app
        .request("POST", &format!("/api/deals/{deal_id}/redeem"), None)
        .await;
    assert_eq!(redeemed.status, StatusCode::OK);
    assert_eq!(redeemed.data()["redemptionCount"], 1);

    let over = app
        .request("POST", &format!("/api/deals/{deal_id}/redeem"), None)
        .await;
    assert_eq!(over.status, StatusCode::BAD_REQUEST);
    assert_eq!(over.body["message"], "Deal has reached maximum redemptions");
}

#[tokio::test]
async fn test_draft_deal_cannot_be_redeemed() {
    let app = TestApp::new();
    let id = active_business(&app).await;

    let created = app
        .request(
            "POST",
            "/api/deals",
            Some(json!({
                "businessId": id,
                "title": "Soon",
                "discount": "10%",
                "originalPrice": 10.0,
                "discountedPrice": 9.0,
                "code": "SOON10",
                "startDate": "2020-01-01T00:00:00Z",
                "endDate": "2999-01-01T00:00:00Z"
            })),
        )
        .await;
    assert_eq!(created.data()["status"], "draft");
    let deal_id = created.data()["id"].as_str().unwrap();

    let rejected = app
        .request("POST", &format!("/api/deals/{deal_id}/redeem"), None)
        .await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected.body["message"], "Deal is not active");
}

#[tokio::test]
async fn test_one_active_subscription_per_business() {
    let app = TestApp::new();
    let id = active_business(&app).await;
    let body = json!({
        "businessId": id,
        "plan": "premium",
        "endDate": "2999-01-01T00:00:00Z",
        "price": 49.99
    });

    let created = app
        .request("POST", "/api/subscriptions", Some(body.clone()))
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.data()["status"], "active");
    let subscription_id = created.data()["id"].as_str().unwrap().to_string();

    let duplicate = app
        .request("POST", "/api/subscriptions", Some(body))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let current = app
        .request(
            "GET",
            &format!("/api/subscriptions/business/{id}/active"),
            None,
        )
        .await;
    assert_eq!(current.data()["id"], subscription_id.as_str());

    let cancelled = app
        .request(
            "POST",
            &format!("/api/subscriptions/{subscription_id}/cancel"),
            None,
        )
        .await;
    assert_eq!(cancelled.status, StatusCode::OK);
    assert_eq!(cancelled.data()["status"], "cancelled");

    let none = app
        .request(
            "GET",
            &format!("/api/subscriptions/business/{id}/active"),
            None,
        )
        .await;
    assert_eq!(none.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_business_is_not_found() {
    let app = TestApp::new();
    let missing = "00000000-0000-0000-0000-000000000001";

    let business = app
        .request("GET", &format!("/api/businesses/{missing}"), None)
        .await;
    assert_eq!(business.status, StatusCode::NOT_FOUND);
    assert_eq!(business.body["error"], "NOT_FOUND");

    let hours = app
        .request(
            "POST",
            "/api/business-hours",
            Some(json!({
                "businessId": missing,
                "dayOfWeek": 1,
                "openTime": "09:00:00",
                "closeTime": "17:00:00"
            })),
        )
        .await;
    assert_eq!(hours.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_social_media_one_link_per_platform() {
    let app = TestApp::new();
    let id = active_business(&app).await;
    let body = json!({
        "businessId": id,
        "platform": "instagram",
        "url": "https://instagram.com/tacopalace",
        "username": "tacopalace"
    });

    let created = app
        .request("POST", "/api/social-media", Some(body.clone()))
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.data()["isActive"], true);
    assert_eq!(created.data()["followers"], 0);
    let link_id = created.data()["id"].as_str().unwrap().to_string();

    let duplicate = app
        .request("POST", "/api/social-media", Some(body.clone()))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(
        duplicate.body["message"],
        "instagram account already exists for this business"
    );

    let synced = app
        .request(
            "PATCH",
            &format!("/api/social-media/{link_id}/sync-followers"),
            Some(json!({"followers": 1200})),
        )
        .await;
    assert_eq!(synced.status, StatusCode::OK, "{}", synced.body);
    assert_eq!(synced.data()["followers"], 1200);
    assert!(synced.data()["lastSynced"].is_string());

    let negative = app
        .request(
            "PATCH",
            &format!("/api/social-media/{link_id}/sync-followers"),
            Some(json!({"followers": -1})),
        )
        .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);

    let deleted = app
        .request("DELETE", &format!("/api/social-media/{link_id}"), None)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    let listed = app
        .request("GET", &format!("/api/social-media/business/{id}"), None)
        .await;
    assert!(listed.data().as_array().unwrap().is_empty());

    let again = app.request("POST", "/api/social-media", Some(body)).await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_owner_is_notified_when_a_deal_goes_live() {
    let app = TestApp::new();
    let invitation = app
        .onboard("owner@tacos.com", "Taco Palace", "user_42")
        .await;
    let business_id = invitation["businessId"].as_str().unwrap();
    let owner_id = invitation["acceptedByUserId"].as_str().unwrap().to_string();

    let created = app
        .request(
            "POST",
            "/api/deals",
            Some(json!({
                "businessId": business_id,
                "title": "Taco Tuesday",
                "discount": "50%",
                "originalPrice": 10.0,
                "discountedPrice": 5.0,
                "code": "TACO50",
                "startDate": "2020-01-01T00:00:00Z",
                "endDate": "2999-01-01T00:00:00Z",
                "status": "active"
            })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);

    let manual = app
        .request(
            "POST",
            "/api/notifications",
            Some(json!({
                "userId": owner_id,
                "type": "system",
                "title": "Welcome",
                "message": "Your listing is live"
            })),
        )
        .await;
    assert_eq!(manual.status, StatusCode::CREATED, "{}", manual.body);
    assert_eq!(manual.data()["type"], "system");

    let inbox = app
        .request("GET", &format!("/api/notifications/user/{owner_id}"), None)
        .await;
    let items = inbox.data().as_array().unwrap();
    assert_eq!(items.len(), 2);
    let deal_notice = items
        .iter()
        .find(|n| n["type"] == "deal")
        .expect("deal notice delivered");
    assert_eq!(deal_notice["title"], "New Deal Available!");
    assert_eq!(deal_notice["metadata"]["businessName"], "Taco Palace");

    let unread = app
        .request(
            "GET",
            &format!("/api/notifications/user/{owner_id}/unread/count"),
            None,
        )
        .await;
    assert_eq!(unread.data()["count"], 2);

    let marked = app
        .request(
            "POST",
            &format!("/api/notifications/user/{owner_id}/read/all"),
            None,
        )
        .await;
    assert_eq!(marked.data()["count"], 2);
    let unread = app
        .request(
            "GET",
            &format!("/api/notifications/user/{owner_id}/unread/count"),
            None,
        )
        .await;
    assert_eq!(unread.data()["count"], 0);

    let short = app
        .request(
            "POST",
            "/api/notifications",
            Some(json!({"userId": owner_id, "type": "system", "title": "Hi", "message": "Hello there"})),
        )
        .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_image_upload_and_removal() {
    let app = TestApp::new();
    let id = active_business(&app).await;

    let uploaded = app
        .upload(
            "/api/business-images/upload/static",
            "front door.png",
            "image/png",
            b"\x89PNG\r\n\x1a\nbytes",
            Some(&id),
        )
        .await;
    assert_eq!(uploaded.status, StatusCode::CREATED, "{}", uploaded.body);
    let image = uploaded.data().clone();
    let key = image["storageKey"].as_str().unwrap();
    assert!(key.starts_with("static-images/"));
    assert!(key.ends_with("-front-door.png"));
    assert_eq!(image["isPrivate"], false);
    assert_eq!(image["businessId"], id.as_str());
    assert!(app.storage.get(key).await.is_some());

    let listed = app
        .request("GET", &format!("/api/business-images/business/{id}"), None)
        .await;
    assert_eq!(listed.data().as_array().unwrap().len(), 1);

    let image_id = image["id"].as_str().unwrap();
    let refresh = app
        .request(
            "POST",
            &format!("/api/business-images/refresh-url/{image_id}"),
            None,
        )
        .await;
    assert_eq!(refresh.status, StatusCode::NOT_FOUND);

    let deleted = app
        .request("DELETE", &format!("/api/business-images/{image_id}"), None)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert!(app.storage.get(key).await.is_none());
}

#[tokio::test]
async fn test_image_upload_rejects_bad_input() {
    let app = TestApp::new();

    let gif = app
        .upload(
            "/api/business-images/upload/profile",
            "logo.gif",
            "image/gif",
            b"GIF89a",
            None,
        )
        .await;
    assert_eq!(gif.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        gif.body["message"],
        "Invalid file type. Only JPEG and PNG are allowed"
    );

    let kind = app
        .upload(
            "/api/business-images/upload/banner",
            "logo.png",
            "image/png",
            b"png",
            None,
        )
        .await;
    assert_eq!(kind.status, StatusCode::BAD_REQUEST);

    let profile = app
        .upload(
            "/api/business-images/upload/profile",
            "me.jpg",
            "image/jpeg",
            b"jpeg",
            None,
        )
        .await;
    assert_eq!(profile.status, StatusCode::CREATED, "{}", profile.body);
    assert_eq!(profile.data()["isPrivate"], true);
    let refreshed = app
        .request(
            "POST",
            &format!(
                "/api/business-images/refresh-url/{}",
                profile.data()["id"].as_str().unwrap()
            ),
            None,
        )
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
}
