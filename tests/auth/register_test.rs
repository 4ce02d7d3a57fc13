use axum::http::StatusCode;
use serde_json::json;

use crate::common::{test_email, test_password, TestContext};
use torii_gate::services::hashing;

#[tokio::test]
async fn register_with_valid_data_returns_created() {
    let ctx = TestContext::new().await;
    let email = test_email();

    let response = ctx
        .server
        .post("/api/auth/register")
        .json(&json!({
            "full_name": "Ada Obi",
            "email": &email,
            "password": test_password(),
            "phone_number": "+2348012345678",
            "role": "landlord"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["role"], "landlord");
    assert_eq!(body["user"]["is_verified"], false);
    // No credential material in any client-visible rendering.
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["user"].get("verification_token").is_none());
}

#[tokio::test]
async fn register_defaults_to_tenant_role() {
    let ctx = TestContext::new().await;
    let email = test_email();

    let response = ctx
        .server
        .post("/api/auth/register")
        .json(&json!({
            "full_name": "Ada Obi",
            "email": &email,
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["role"], "tenant");
}

#[tokio::test]
async fn register_stores_a_salted_hash_not_the_plaintext() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register("Ada Obi", &email, test_password(), "tenant").await;

    let stored = ctx.users.get_by_email(&email).unwrap();
    assert_ne!(stored.password_hash, test_password());
    assert!(hashing::verify_password(test_password(), &stored.password_hash).unwrap());
    assert!(!hashing::verify_password("NotThePassword1!", &stored.password_hash).unwrap());
}

#[tokio::test]
async fn register_sends_verification_email_with_stored_token() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register("Ada Obi", &email, test_password(), "tenant").await;

    let sent = ctx.mailer.last_to(&email).expect("no email recorded");
    let token = ctx.verification_token(&email);
    assert!(sent.body.contains(&token));
    assert!(sent.body.contains("/verify-email/"));
}

#[tokio::test]
async fn register_with_existing_email_returns_conflict() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register("Ada Obi", &email, test_password(), "tenant").await;

    let response = ctx
        .server
        .post("/api/auth/register")
        .json(&json!({
            "full_name": "Ngozi Eze",
            "email": &email,
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_with_existing_phone_returns_conflict() {
    let ctx = TestContext::new().await;

    let first = ctx
        .server
        .post("/api/auth/register")
        .json(&json!({
            "full_name": "Ada Obi",
            "email": test_email(),
            "password": test_password(),
            "phone_number": "+2348099999999"
        }))
        .await;
    first.assert_status(StatusCode::CREATED);

    let second = ctx
        .server
        .post("/api/auth/register")
        .json(&json!({
            "full_name": "Ngozi Eze",
            "email": test_email(),
            "password": test_password(),
            "phone_number": "+2348099999999"
        }))
        .await;
    second.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn two_users_without_phone_numbers_do_not_collide() {
    let ctx = TestContext::new().await;
    ctx.register("Ada Obi", &test_email(), test_password(), "tenant").await;
    ctx.register("Ngozi Eze", &test_email(), test_password(), "tenant").await;
}

#[tokio::test]
async fn register_with_invalid_email_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/auth/register")
        .json(&json!({
            "full_name": "Ada Obi",
            "email": "not-an-email",
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_with_short_password_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/auth/register")
        .json(&json!({
            "full_name": "Ada Obi",
            "email": test_email(),
            "password": "short"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_with_missing_fields_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/auth/register")
        .json(&json!({
            "email": test_email(),
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}
