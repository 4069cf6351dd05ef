//! Bearer-token extraction and the authentication gateway.
//!
//! Two header slots carry the same credential: the legacy non-standard
//! `Authentication` header and the standard `Authorization` header. The
//! legacy header wins when both parse. This preference order is a
//! compatibility shim for existing clients and must not change.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::session::SessionStore;

/// Default session lifetime: 12 hours.
pub const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 12;

/// Outcome of authenticating a request. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthResult {
    Authenticated { user_id: i64 },
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Neither header slot yielded a parseable token.
    MissingToken,
    /// A token was presented but the store does not know it (or it expired).
    InvalidOrExpired,
}

/// A freshly issued session token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Parse a single header value of the form `Bearer <token>`.
///
/// The prefix match is case-insensitive; the remainder is trimmed and must be
/// non-blank. A correct prefix with a blank remainder yields None, never an
/// empty token.
pub fn parse_bearer(header_value: Option<&str>) -> Option<String> {
    let value = header_value?.trim_start();

    const PREFIX: &str = "Bearer ";
    if value.len() < PREFIX.len() || !value[..PREFIX.len()].eq_ignore_ascii_case(PREFIX) {
        return None;
    }

    let token = value[PREFIX.len()..].trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Extract a bearer token from the two accepted header slots.
///
/// `authentication` is the legacy non-standard header and is consulted
/// first; the standard `authorization` slot is used only when the legacy one
/// is absent or malformed.
pub fn extract_bearer_token(
    authorization: Option<&str>,
    authentication: Option<&str>,
) -> Option<String> {
    parse_bearer(authentication).or_else(|| parse_bearer(authorization))
}

/// Issues tokens at login and resolves them on every authenticated request.
#[derive(Clone)]
pub struct AuthGateway {
    sessions: Arc<dyn SessionStore>,
    lifetime: Duration,
}

impl AuthGateway {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            sessions,
            lifetime: Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS),
        }
    }

    /// Override the default 12 h lifetime (tests use short or negative ones).
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Generate an unguessable token, store it, and return it with its expiry.
    ///
    /// The token is a v4 UUID in simple form: 32 hex chars, uniform random,
    /// carrying no user or time structure.
    pub async fn issue_token(&self, user_id: i64) -> Result<IssuedToken> {
        let token = Uuid::new_v4().simple().to_string();
        let expires_at = Utc::now() + self.lifetime;

        self.sessions
            .create_session(&token, user_id, expires_at)
            .await?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Revoke the presented token; reports whether a session existed.
    pub async fn revoke(&self, token: &str) -> Result<bool> {
        self.sessions.revoke_token(token).await
    }

    /// Authenticate a request from its two identity header slots.
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
        authentication: Option<&str>,
    ) -> Result<AuthResult> {
        let Some(token) = extract_bearer_token(authorization, authentication) else {
            return Ok(AuthResult::Rejected(RejectReason::MissingToken));
        };

        match self.sessions.resolve_token(&token).await? {
            Some(user_id) => Ok(AuthResult::Authenticated { user_id }),
            None => Ok(AuthResult::Rejected(RejectReason::InvalidOrExpired)),
        }
    }
}
