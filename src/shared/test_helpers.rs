use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::{api_router, AppServices};
use crate::core::config::AuthConfig;
use crate::modules::store::MemoryStore;

pub const TEST_JWT_SECRET: &str = "test-secret-for-session-tokens-0123456789";

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        token_ttl: Duration::from_secs(3600),
        jwt_leeway: Duration::from_secs(0),
    }
}

/// Full API router over a fresh in-memory store
pub fn test_server() -> TestServer {
    let services = AppServices::new(Arc::new(MemoryStore::new()), &test_auth_config());
    TestServer::new(api_router(&services)).unwrap()
}

pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// Register a user with a generated name and email
pub async fn register_user(server: &TestServer, role: &str) -> TestUser {
    let name: String = Name().fake();
    let email = format!(
        "{}.{}",
        Uuid::now_v7().simple(),
        SafeEmail().fake::<String>().to_lowercase()
    );

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": name,
            "email": email,
            "password": "secret123",
            "role": role,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    TestUser {
        id: body["data"]["user"]["id"].as_str().unwrap().parse().unwrap(),
        name,
        email,
        token: body["data"]["accessToken"].as_str().unwrap().to_string(),
    }
}

/// File a report as `user` and return its `data` payload
pub async fn create_report(server: &TestServer, user: &TestUser, body: Value) -> Value {
    let response = server
        .post("/api/reports")
        .authorization_bearer(&user.token)
        .json(&body)
        .await;
    response.assert_status_ok();
    response.json::<Value>()["data"].clone()
}

pub fn report_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Steps to reproduce attached",
        "severity": "high",
        "reporterEmail": "a@x.com",
    })
}
