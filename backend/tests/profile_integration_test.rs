//! Integration tests for profile endpoints

mod common;

use axum::http::StatusCode;
use common::json;
use serde_json::json;

#[tokio::test]
async fn test_get_profile_requires_auth() {
    let app = common::TestApp::new();

    let (status, _) = app.get("/api/v1/profile").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_not_provisioned() {
    let app = common::TestApp::new();
    let user = app.create_test_user();

    let (status, _) = app.get_auth("/api/v1/profile", &user.token).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_provision_defaults() {
    let app = common::TestApp::new();
    let user = app.create_test_user();

    let (status, body) = app.post_auth("/api/v1/profile", "", &user.token).await;

    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["username"], "default_user");
    assert_eq!(body["email"], user.email.as_str());
    assert_eq!(body["gender"], "Prefer Not to Say");
    assert!(body["age"].is_null());
}

#[tokio::test]
async fn test_update_profile() {
    let app = common::TestApp::new();
    let user = app.create_test_user();
    app.post_auth("/api/v1/profile", "", &user.token).await;

    let body = json!({
        "username": "sam",
        "heightCm": 168.0,
        "gender": "Others",
        "allergies": "Penicillin",
        "email": "ignored@example.com"
    });
    let (status, body) = app
        .put_auth("/api/v1/profile", &body.to_string(), &user.token)
        .await;

    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["username"], "sam");
    assert_eq!(body["heightCm"], 168.0);
    assert_eq!(body["gender"], "Others");
    assert_eq!(body["email"], user.email.as_str());
}

#[tokio::test]
async fn test_update_profile_invalid_height() {
    let app = common::TestApp::new();
    let user = app.create_test_user();
    app.post_auth("/api/v1/profile", "", &user.token).await;

    let body = json!({ "heightCm": -5 });
    let (status, body) = app
        .put_auth("/api/v1/profile", &body.to_string(), &user.token)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json(&body);
    assert_eq!(body["error"]["field"], "heightCm");
    assert_eq!(body["error"]["message"], "Height must be a non-negative number.");
}
