//! Integration tests for the invitation to activation flow.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::{TestApp, ticket_for};

#[tokio::test]
async fn test_create_invitation_provisions_pending_business() {
    let app = TestApp::new();

    let invitation = app.invite("owner@tacos.com", "Taco Palace").await;
    assert_eq!(invitation["status"], "pending");
    assert_eq!(invitation["email"], "owner@tacos.com");
    assert_eq!(invitation["clerkInvitationId"], "inv_1");

    let business_id = invitation["businessId"].as_str().unwrap();
    let response = app
        .request("GET", &format!("/api/businesses/{business_id}"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let business = response.data();
    assert_eq!(business["name"], "Taco Palace");
    assert_eq!(business["slug"], "taco-palace");
    assert_eq!(business["status"], "pending");
    assert_eq!(business["locationId"], "mcallen");
    assert!(business["userId"].is_null());
    assert!(
        business["qrCodeUrl"]
            .as_str()
            .unwrap()
            .starts_with("http://assets.test/")
    );
    assert_eq!(app.storage.len().await, 1);
}

#[tokio::test]
async fn test_create_invitation_rejects_bad_input() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/invitations",
            Some(json!({"email": "nope", "businessName": "X"})),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION");
    assert!(response.body["details"]["email"].is_array());
    assert!(app.storage.is_empty().await);
}

#[tokio::test]
async fn test_second_pending_invitation_for_same_email_conflicts() {
    let app = TestApp::new();
    app.invite("owner@tacos.com", "Taco Palace").await;

    let response = app
        .request(
            "POST",
            "/api/invitations",
            Some(json!({"email": "OWNER@tacos.com", "businessName": "Taco Annex"})),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_provider_failure_leaves_nothing_behind() {
    let app = TestApp::new();
    app.gateway.fail_creates(true);

    let response = app
        .request(
            "POST",
            "/api/invitations",
            Some(json!({"email": "owner@tacos.com", "businessName": "Taco Palace"})),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "EXTERNAL_SERVICE");
    assert_eq!(
        response.body["details"]["errors"][0]["code"],
        "form_identifier_exists"
    );

    let businesses = app.request("GET", "/api/businesses", None).await;
    assert_eq!(businesses.data()["total"], 0);
    let invitations = app.request("GET", "/api/invitations", None).await;
    assert_eq!(invitations.data().as_array().unwrap().len(), 0);
    assert!(app.storage.is_empty().await);
}

#[tokio::test]
async fn test_verify_then_accept_activates_business() {
    let app = TestApp::new();
    let invitation = app.invite("owner@tacos.com", "Taco Palace").await;
    let ticket = ticket_for("inv_1");

    let verified = app
        .request("GET", &format!("/api/invitations/verify/{ticket}"), None)
        .await;
    assert_eq!(verified.status, StatusCode::OK);
    assert_eq!(verified.data()["valid"], true);
    assert_eq!(verified.data()["businessName"], "Taco Palace");

    let accepted = app
        .request(
            "POST",
            "/api/invitations/accept",
            Some(json!({"userId": "user_42", "ticket": ticket})),
        )
        .await;
    assert_eq!(accepted.status, StatusCode::OK, "{}", accepted.body);
    assert_eq!(accepted.data()["status"], "accepted");

    let owner = app.request("GET", "/api/users/clerk/user_42", None).await;
    assert_eq!(owner.status, StatusCode::OK);
    assert_eq!(owner.data()["role"], "business_owner");
    assert_eq!(owner.data()["email"], "owner@tacos.com");
    let owner_id = owner.data()["id"].as_str().unwrap().to_string();

    let business_id = invitation["businessId"].as_str().unwrap();
    let business = app
        .request("GET", &format!("/api/businesses/{business_id}"), None)
        .await;
    assert_eq!(business.data()["status"], "active");
    assert_eq!(business.data()["userId"], owner_id.as_str());

    let owned = app
        .request("GET", &format!("/api/users/{owner_id}/businesses"), None)
        .await;
    assert_eq!(owned.data()["total"], 1);
    assert_eq!(owned.data()["items"][0]["slug"], "taco-palace");

    let again = app
        .request(
            "POST",
            "/api/invitations/accept",
            Some(json!({"userId": "user_43", "ticket": ticket})),
        )
        .await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    let verified = app
        .request("GET", &format!("/api/invitations/verify/{ticket}"), None)
        .await;
    assert_eq!(verified.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_accept_with_garbage_ticket() {
    let app = TestApp::new();
    app.invite("owner@tacos.com", "Taco Palace").await;

    let response = app
        .request(
            "POST",
            "/api/invitations/accept",
            Some(json!({"userId": "user_42", "ticket": "not-a-ticket"})),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION");
}

#[tokio::test]
async fn test_cancel_revokes_at_provider() {
    let app = TestApp::new();
    let invitation = app.invite("owner@tacos.com", "Taco Palace").await;
    let id = invitation["id"].as_str().unwrap();

    let cancelled = app
        .request("POST", &format!("/api/invitations/{id}/cancel"), None)
        .await;
    assert_eq!(cancelled.status, StatusCode::OK);
    assert_eq!(cancelled.data()["status"], "revoked");
    assert_eq!(app.gateway.revoked(), vec!["inv_1".to_string()]);

    let listed = app
        .request("GET", "/api/invitations?status=revoked", None)
        .await;
    assert_eq!(listed.data().as_array().unwrap().len(), 1);

    let by_external = app.request("GET", "/api/invitations/clerk/inv_1", None).await;
    assert_eq!(by_external.data()["id"], id);
}

#[tokio::test]
async fn test_invalid_and_unknown_ids() {
    let app = TestApp::new();

    let bad = app.request("GET", "/api/invitations/not-a-uuid", None).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad.body["message"], "Invalid UUID: not-a-uuid");

    let missing = app
        .request(
            "GET",
            "/api/invitations/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}
