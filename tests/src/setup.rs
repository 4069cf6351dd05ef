//! Common test setup.

use std::sync::Arc;

use axum_test::TestServer;
use chrono::Duration;

use api::{router, routes, AppState};
use mediarate_core::AuthGateway;

use crate::fixtures;
use crate::mocks::{MemorySessionStore, MemoryStore};

/// A running server over in-memory stores, plus handles for direct seeding
/// and inspection.
pub struct TestContext {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub sessions: Arc<MemorySessionStore>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_token_lifetime(Duration::hours(12))
    }

    /// Shortened (or negative) token lifetimes let tests observe expiry
    /// without sleeping.
    pub fn with_token_lifetime(lifetime: Duration) -> Self {
        let store = Arc::new(MemoryStore::new());
        let sessions = Arc::new(MemorySessionStore::new());

        let state = AppState::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            sessions.clone(),
        )
        .with_auth(AuthGateway::new(sessions.clone()).with_lifetime(lifetime));

        let dispatcher = Arc::new(routes::registry(state));
        let server = TestServer::new(router(dispatcher)).expect("Failed to create test server");

        Self {
            server,
            store,
            sessions,
        }
    }

    /// Register a user and log them in; returns the session token.
    pub async fn register_and_login(&self, username: &str) -> String {
        let response = self
            .server
            .post("/api/users/register")
            .json(&fixtures::credentials(username, "secret"))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let response = self
            .server
            .post("/api/users/login")
            .json(&fixtures::credentials(username, "secret"))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        body["token"].as_str().expect("login returns a token").to_string()
    }

    /// Create a media item as the given user; returns its id.
    pub async fn create_media(&self, token: &str, payload: &serde_json::Value) -> i64 {
        let response = self
            .server
            .post("/api/media")
            .add_header("Authorization", format!("Bearer {token}"))
            .json(payload)
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let body: serde_json::Value = response.json();
        body["id"].as_i64().expect("created media has an id")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
