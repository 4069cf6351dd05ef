//! Session persistence with lazy expiry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use mediarate_core::{Result, Session, SessionStore};

use crate::client::PgClient;
use crate::db_err;

pub struct PgSessionStore {
    client: PgClient,
}

impl PgSessionStore {
    pub fn new(client: PgClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create_session(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .execute(self.client.pool())
            .await
            .map_err(|e| db_err("create_session", e))?;
        Ok(())
    }

    /// Expired rows are deleted on the resolve that finds them. The delete is
    /// fire-and-forget for correctness: a concurrent resolve deleting the same
    /// row first changes nothing about the outcome.
    async fn resolve_token(&self, token: &str) -> Result<Option<i64>> {
        let row: Option<(i64, DateTime<Utc>)> =
            sqlx::query_as("SELECT user_id, expires_at FROM sessions WHERE token = $1")
                .bind(token)
                .fetch_optional(self.client.pool())
                .await
                .map_err(|e| db_err("resolve_token", e))?;

        let Some((user_id, expires_at)) = row else {
            return Ok(None);
        };

        let session = Session {
            token: token.to_string(),
            user_id,
            expires_at,
        };
        if session.is_expired_at(Utc::now()) {
            sqlx::query("DELETE FROM sessions WHERE token = $1")
                .bind(token)
                .execute(self.client.pool())
                .await
                .map_err(|e| db_err("evict_expired_session", e))?;
            return Ok(None);
        }

        Ok(Some(user_id))
    }

    async fn revoke_token(&self, token: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(self.client.pool())
            .await
            .map_err(|e| db_err("revoke_token", e))?;
        Ok(result.rows_affected() > 0)
    }
}
