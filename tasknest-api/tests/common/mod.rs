/// Common test utilities for router tests
///
/// Every test gets its own router over a fresh in-memory store, so tests
/// are independent and need no external services.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};
use tasknest_api::{
    app::{build_router, AppState},
    config::Config,
};
use tasknest_shared::{auth::password::PasswordConfig, store::memory::MemoryStore};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing the router and its backing store
#[allow(dead_code)]
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
}

/// A registered test user
#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

#[allow(dead_code)]
impl TestContext {
    /// Creates a router over an empty in-memory store
    pub fn new() -> Self {
        let vars: HashMap<&str, &str> =
            HashMap::from([("STORAGE_BACKEND", "memory"), ("JWT_SECRET", TEST_SECRET)]);
        let mut config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
            .expect("test config");

        // Full-strength Argon2 makes every register/login take ~100ms
        config.password = PasswordConfig::insecure_fast();

        let store = Arc::new(MemoryStore::new());
        let app = build_router(AppState::new(store.clone(), config));

        Self { app, store }
    }

    /// Sends one request and returns the status and JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("x-auth-token", token);
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, json)
    }

    /// Registers a user and returns its id and token
    pub async fn register(&self, username: &str, password: &str) -> TestUser {
        let (status, json) = self
            .send(
                "POST",
                "/api/register",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", json);

        TestUser {
            id: json["user"]["id"].as_str().unwrap().parse().unwrap(),
            username: json["user"]["username"].as_str().unwrap().to_string(),
            token: json["token"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a task and returns the response body
    pub async fn create_task(&self, token: &str, body: Value) -> Value {
        let (status, json) = self.send("POST", "/api/tasks", Some(token), Some(body)).await;
        assert_eq!(status, StatusCode::OK, "create failed: {}", json);
        json
    }

    /// Lists the caller's task titles in response order
    pub async fn titles(&self, token: &str) -> Vec<String> {
        let (status, json) = self.send("GET", "/api/tasks", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);

        json.as_array()
            .unwrap()
            .iter()
            .map(|task| task["title"].as_str().unwrap().to_string())
            .collect()
    }
}
