//! Registration, login, and logout.
//!
//! Register and login are the only two routes that never authenticate;
//! logout revokes the presented session token.

use std::sync::LazyLock;

use axum::http::{Method, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use validator::Validate;

use mediarate_core::auth::extract_bearer_token;
use mediarate_core::limits::USERNAME_MAX_LEN;
use mediarate_core::password::{hash_password, verify_password};
use mediarate_core::{Error, Result};

use crate::dispatch::{RouteHandler, RouteRequest};
use crate::path::PathPattern;
use crate::response::success_body;
use crate::routes::{is_blank, parse_body};
use crate::state::AppState;

static REGISTER: LazyLock<PathPattern> =
    LazyLock::new(|| PathPattern::new("/api/users/register"));
static LOGIN: LazyLock<PathPattern> = LazyLock::new(|| PathPattern::new("/api/users/login"));
static LOGOUT: LazyLock<PathPattern> = LazyLock::new(|| PathPattern::new("/api/users/logout"));

/// Clients send either PascalCase or camelCase field names.
#[derive(Debug, Deserialize, Validate)]
struct Credentials {
    #[serde(default, alias = "Username")]
    #[validate(length(max = "USERNAME_MAX_LEN"))]
    username: Option<String>,
    #[serde(default, alias = "Password")]
    password: Option<String>,
}

pub struct UserRoutes {
    state: AppState,
}

impl UserRoutes {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    async fn register(&self, req: &mut RouteRequest) -> Result<()> {
        let creds: Credentials = parse_body(req).unwrap_or(Credentials {
            username: None,
            password: None,
        });

        if is_blank(&creds.username) || is_blank(&creds.password) {
            return Err(Error::validation("Username and Password are required."));
        }
        if creds.validate().is_err() {
            return Err(Error::validation("Username must be at most 64 characters."));
        }

        let username = creds.username.unwrap();
        let password_hash = hash_password(&creds.password.unwrap());

        let Some(user) = self.state.users.create_user(&username, &password_hash).await? else {
            return Err(Error::conflict("Username already exists."));
        };

        info!(user_id = user.id, username = %user.username, "user registered");

        req.respond(
            StatusCode::CREATED,
            json!({
                "id": user.id,
                "username": user.username,
            }),
        );
        Ok(())
    }

    async fn login(&self, req: &mut RouteRequest) -> Result<()> {
        let creds: Credentials = parse_body(req).unwrap_or(Credentials {
            username: None,
            password: None,
        });

        if is_blank(&creds.username) || is_blank(&creds.password) {
            return Err(Error::validation("Username and Password are required."));
        }

        let username = creds.username.unwrap();
        let password = creds.password.unwrap();

        // Unknown user and wrong password answer identically.
        let Some(user) = self.state.users.find_by_username(&username).await? else {
            return Err(Error::invalid_token("Invalid username or password."));
        };
        if !verify_password(&password, &user.password_hash) {
            return Err(Error::invalid_token("Invalid username or password."));
        }

        let issued = self.state.auth.issue_token(user.id).await?;

        info!(user_id = user.id, "login");

        req.respond(
            StatusCode::OK,
            json!({
                "token": issued.token,
                "username": user.username,
                "expiresInSeconds": self.state.auth.lifetime().num_seconds(),
            }),
        );
        Ok(())
    }

    async fn logout(&self, req: &mut RouteRequest) -> Result<()> {
        let Some(token) = extract_bearer_token(req.authorization(), req.authentication()) else {
            return Err(Error::missing_token(
                "Missing or invalid Authentication/Authorization header.",
            ));
        };

        if !self.state.auth.revoke(&token).await? {
            return Err(Error::invalid_token("Invalid or expired token."));
        }

        req.respond(StatusCode::OK, success_body());
        Ok(())
    }
}

#[async_trait::async_trait]
impl RouteHandler for UserRoutes {
    async fn handle(&self, req: &mut RouteRequest) -> Result<()> {
        if req.method() != Method::POST {
            return Ok(());
        }

        if REGISTER.capture(req.path()).is_some() {
            return self.register(req).await;
        }
        if LOGIN.capture(req.path()).is_some() {
            return self.login(req).await;
        }
        if LOGOUT.capture(req.path()).is_some() {
            return self.logout(req).await;
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "users"
    }
}
