//! Integration tests for the identity provider webhook endpoint.

mod helpers;

use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{Value, json};

use helpers::TestApp;

fn user_event(kind: &str, id: &str, email: &str) -> Value {
    json!({
        "type": kind,
        "object": "event",
        "data": {
            "id": id,
            "email_addresses": [{"id": "idn_1", "email_address": email}],
            "primary_email_address_id": "idn_1",
            "first_name": "Rosa",
            "last_name": "Garza",
            "image_url": null,
            "public_metadata": {}
        }
    })
}

#[tokio::test]
async fn test_unsigned_webhook_is_rejected() {
    let app = TestApp::with_signed_webhooks();
    let request = Request::builder()
        .method("POST")
        .uri("/api/clerk/webhooks")
        .header("content-type", "application/json")
        .body(Body::from(
            user_event("user.created", "user_1", "rosa@example.com").to_string(),
        ))
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
    let lookup = app.request("GET", "/api/users/clerk/user_1", None).await;
    assert_eq!(lookup.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signed_user_events_sync_the_mirror() {
    let app = TestApp::with_signed_webhooks();

    let created = app
        .webhook(user_event("user.created", "user_1", "rosa@example.com"))
        .await;
    assert_eq!(created.status, StatusCode::OK, "{}", created.body);
    assert_eq!(created.body, json!({"success": true, "event": "user.created"}));

    let updated = app
        .webhook(user_event("user.updated", "user_1", "rosa@garza.com"))
        .await;
    assert_eq!(updated.status, StatusCode::OK);

    let user = app.request("GET", "/api/users/clerk/user_1", None).await;
    assert_eq!(user.status, StatusCode::OK);
    assert_eq!(user.data()["email"], "rosa@garza.com");
    assert_eq!(user.data()["firstName"], "Rosa");

    let deleted = app
        .webhook(json!({"type": "user.deleted", "data": {"id": "user_1", "deleted": true}}))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    let gone = app.request("GET", "/api/users/clerk/user_1", None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_events_follow_the_user() {
    let app = TestApp::new();
    app.webhook(user_event("user.created", "user_1", "rosa@example.com"))
        .await;

    let created = app
        .webhook(json!({
            "type": "session.created",
            "data": {"id": "sess_1", "user_id": "user_1", "client_id": "client_1"}
        }))
        .await;
    assert_eq!(created.status, StatusCode::OK, "{}", created.body);

    let session = app.request("GET", "/api/sessions/sess_1", None).await;
    assert_eq!(session.data()["status"], "active");
    assert_eq!(session.data()["metadata"]["clientId"], "client_1");

    for _ in 0..2 {
        let ended = app
            .webhook(json!({"type": "session.ended", "data": {"id": "sess_1", "user_id": "user_1"}}))
            .await;
        assert_eq!(ended.status, StatusCode::OK);
    }
    let session = app.request("GET", "/api/sessions/sess_1", None).await;
    assert_eq!(session.data()["status"], "ended");
}

#[tokio::test]
async fn test_invitation_accepted_by_provider_activates_business() {
    let app = TestApp::new();
    let invitation = app.invite("owner@tacos.com", "Taco Palace").await;

    let event = json!({
        "type": "organizationInvitation.accepted",
        "data": {"id": "inv_1", "email_address": "owner@tacos.com", "user_id": "user_7"}
    });
    for _ in 0..2 {
        let response = app.webhook(event.clone()).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    }

    let business_id = invitation["businessId"].as_str().unwrap();
    let business = app
        .request("GET", &format!("/api/businesses/{business_id}"), None)
        .await;
    assert_eq!(business.data()["status"], "active");

    let stored = app.request("GET", "/api/invitations/clerk/inv_1", None).await;
    assert_eq!(stored.data()["status"], "accepted");
}

#[tokio::test]
async fn test_unknown_and_malformed_events() {
    let app = TestApp::new();

    let unknown = app
        .webhook(json!({"type": "email.created", "data": {"id": "ema_1"}}))
        .await;
    assert_eq!(unknown.status, StatusCode::OK);
    assert_eq!(unknown.body["event"], "email.created");

    let request = Request::builder()
        .method("POST")
        .uri("/api/clerk/webhooks")
        .body(Body::from("{not json"))
        .unwrap();
    let malformed = app.send(request).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}
