//! Session records and the session persistence contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An issued bearer-token session.
///
/// Created at login, read on every authenticated request, deleted on logout
/// or lazily on the first resolution after expiry. Never mutated otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque token presented by the client.
    pub token: String,
    /// Account the token authenticates.
    pub user_id: i64,
    /// The session is valid iff `now <= expires_at`.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Persistence contract for issued sessions.
///
/// `resolve_token` is the only read that mutates: the first lookup of an
/// expired token deletes its record, so every later lookup takes the plain
/// absent path. Concurrent resolutions of the same expired token may race to
/// delete; deleting an absent record is a no-op, so the race is harmless.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a token -> user mapping. The caller supplies a token with
    /// negligible collision probability; duplicate insertion is not handled.
    async fn create_session(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Resolve a token to its user id, evicting it first if expired.
    async fn resolve_token(&self, token: &str) -> Result<Option<i64>>;

    /// Delete a session if present; reports whether a record existed.
    async fn revoke_token(&self, token: &str) -> Result<bool>;
}
