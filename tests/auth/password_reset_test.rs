use axum::http::StatusCode;
use serde_json::json;

use crate::common::{test_email, test_password, TestContext};

#[tokio::test]
async fn forgot_password_delivers_token_only_via_email() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register_verified("Ada Obi", &email, test_password(), "tenant")
        .await;

    let response = ctx
        .server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": &email }))
        .await;
    response.assert_status_ok();

    // Never in the response body.
    let body: serde_json::Value = response.json();
    assert!(body.get("token").is_none());

    let token = ctx.reset_token(&email);
    let sent = ctx.mailer.last_to(&email).expect("no reset email recorded");
    assert!(sent.body.contains(&token));
    assert!(sent.body.contains("/reset-password/"));
}

#[tokio::test]
async fn forgot_password_for_unknown_email_returns_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": "nobody@example.com" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reset_replaces_password_and_clears_the_token() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register_verified("Ada Obi", &email, test_password(), "tenant")
        .await;

    ctx.server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": &email }))
        .await
        .assert_status_ok();
    let token = ctx.reset_token(&email);

    let response = ctx
        .server
        .post("/api/auth/reset-password")
        .json(&json!({ "token": &token, "password": "BrandNewPass1!" }))
        .await;
    response.assert_status_ok();

    // Old password no longer works, new one does.
    ctx.server
        .post("/api/auth/login")
        .json(&json!({ "email": &email, "password": test_password(), "role": "tenant" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    ctx.login(&email, "BrandNewPass1!", "tenant").await;

    let stored = ctx.users.get_by_email(&email).unwrap();
    assert!(stored.reset_password_token.is_none());
    assert!(stored.reset_password_expires.is_none());
}

#[tokio::test]
async fn reset_token_is_single_use() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register_verified("Ada Obi", &email, test_password(), "tenant")
        .await;

    ctx.server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": &email }))
        .await
        .assert_status_ok();
    let token = ctx.reset_token(&email);

    ctx.server
        .post("/api/auth/reset-password")
        .json(&json!({ "token": &token, "password": "BrandNewPass1!" }))
        .await
        .assert_status_ok();

    let replay = ctx
        .server
        .post("/api/auth/reset-password")
        .json(&json!({ "token": &token, "password": "AnotherPass1!" }))
        .await;
    replay.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expired_reset_token_leaves_old_password_usable() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register_verified("Ada Obi", &email, test_password(), "tenant")
        .await;

    ctx.server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": &email }))
        .await
        .assert_status_ok();
    ctx.users.expire_reset_token(&email);
    let token = ctx.reset_token(&email);
    let hash_before = ctx.users.get_by_email(&email).unwrap().password_hash;

    let response = ctx
        .server
        .post("/api/auth/reset-password")
        .json(&json!({ "token": &token, "password": "BrandNewPass1!" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    assert_eq!(
        ctx.users.get_by_email(&email).unwrap().password_hash,
        hash_before
    );
    ctx.login(&email, test_password(), "tenant").await;
}

#[tokio::test]
async fn unknown_reset_token_returns_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/auth/reset-password")
        .json(&json!({ "token": "deadbeef", "password": "BrandNewPass1!" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn newer_forgot_request_supersedes_the_previous_token() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register_verified("Ada Obi", &email, test_password(), "tenant")
        .await;

    ctx.server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": &email }))
        .await
        .assert_status_ok();
    let first_token = ctx.reset_token(&email);

    ctx.server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": &email }))
        .await
        .assert_status_ok();
    let second_token = ctx.reset_token(&email);
    assert_ne!(first_token, second_token);

    let stale = ctx
        .server
        .post("/api/auth/reset-password")
        .json(&json!({ "token": &first_token, "password": "BrandNewPass1!" }))
        .await;
    stale.assert_status(StatusCode::NOT_FOUND);
}
