//! Common test utilities for integration tests
//!
//! The application runs against in-process collaborators so these tests need
//! no external services.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use fake::{faker::internet::en::SafeEmail, Fake};
use health_tracker_backend::{
    config::AppConfig,
    routes,
    state::{AppState, Collaborators},
};
use tower::ServiceExt;
use uuid::Uuid;

/// An authenticated identity with a valid access token
pub struct TestUser {
    pub owner_id: String,
    pub email: String,
    pub token: String,
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a test application backed by in-memory collaborators
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application whose places client targets `places_base_url`
    pub fn with_places(places_base_url: &str) -> Self {
        let mut config = test_config();
        config.places.base_url = places_base_url.to_string();
        config.places.api_key = "test-key".to_string();
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self::from_state(AppState::in_memory(config))
    }

    /// Create a test application around explicit collaborators
    pub fn with_collaborators(collaborators: Collaborators) -> Self {
        Self::from_state(AppState::new(collaborators, test_config()))
    }

    fn from_state(state: AppState) -> Self {
        let app = routes::create_router(state.clone());
        Self { app, state }
    }

    /// Mint a token for a fresh identity
    pub fn create_test_user(&self) -> TestUser {
        let owner_id = Uuid::new_v4().to_string();
        let email: String = SafeEmail().fake();
        let token = self
            .state
            .jwt()
            .generate_access_token(&owner_id, &email)
            .unwrap();

        TestUser {
            owner_id,
            email,
            token,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }

    fn request(method: Method, path: &str, token: Option<&str>) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match token {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Make a GET request without credentials
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Self::request(Method::GET, path, None)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> (StatusCode, String) {
        let request = Self::request(Method::GET, path, Some(token))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_auth(&self, path: &str, body: &str, token: &str) -> (StatusCode, String) {
        let request = Self::request(Method::POST, path, Some(token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// POST raw bytes, as used for photo uploads
    pub async fn post_bytes_auth(&self, path: &str, bytes: Vec<u8>, token: &str) -> (StatusCode, String) {
        let request = Self::request(Method::POST, path, Some(token))
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(Body::from(bytes))
            .unwrap();
        self.send(request).await
    }

    pub async fn put_auth(&self, path: &str, body: &str, token: &str) -> (StatusCode, String) {
        let request = Self::request(Method::PUT, path, Some(token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> (StatusCode, String) {
        let request = Self::request(Method::DELETE, path, Some(token))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }
}

pub fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap()
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.jwt.secret = "test-secret-key-for-testing-only-32chars".to_string();
    config.storage.root_dir = std::env::temp_dir()
        .join("health-tracker-test-blobs")
        .to_string_lossy()
        .into_owned();
    config
}
