//! User accounts and profile stats.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use mediarate_core::{Result, User, UserStats, UserStore};

use crate::client::PgClient;
use crate::db_err;

#[derive(FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    display_name: Option<String>,
    bio: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            display_name: row.display_name,
            bio: row.bio,
            updated_at: row.updated_at,
        }
    }
}

const USER_COLUMNS: &str = "id, username, password_hash, display_name, bio, updated_at";

pub struct PgUserStore {
    client: PgClient,
}

impl PgUserStore {
    pub fn new(client: PgClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) \
             ON CONFLICT (username) DO NOTHING \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(password_hash)
        .fetch_optional(self.client.pool())
        .await
        .map_err(|e| db_err("create_user", e))?;

        Ok(row.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
                .bind(username)
                .fetch_optional(self.client.pool())
                .await
                .map_err(|e| db_err("find_by_username", e))?;

        Ok(row.map(User::from))
    }

    async fn update_profile(
        &self,
        user_id: i64,
        display_name: Option<&str>,
        bio: Option<&str>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET display_name = $2, bio = $3, updated_at = now() WHERE id = $1",
        )
        .bind(user_id)
        .bind(display_name)
        .bind(bio)
        .execute(self.client.pool())
        .await
        .map_err(|e| db_err("update_profile", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn user_stats(&self, user_id: i64) -> Result<UserStats> {
        let (total_ratings, average_stars): (i64, Option<f64>) = sqlx::query_as(
            "SELECT COUNT(*), AVG(stars)::float8 FROM ratings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(self.client.pool())
        .await
        .map_err(|e| db_err("user_stats", e))?;

        // Most frequent genre among this user's rated media; count ties break
        // alphabetically so the answer is stable.
        let favorite_genre: Option<(String,)> = sqlx::query_as(
            "SELECT m.genre FROM ratings r \
             JOIN media m ON m.id = r.media_id \
             WHERE r.user_id = $1 AND m.genre IS NOT NULL \
             GROUP BY m.genre \
             ORDER BY COUNT(*) DESC, m.genre ASC \
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(self.client.pool())
        .await
        .map_err(|e| db_err("user_stats", e))?;

        let (favorites_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM favorites WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(self.client.pool())
                .await
                .map_err(|e| db_err("user_stats", e))?;

        Ok(UserStats {
            total_ratings,
            average_stars,
            favorite_genre: favorite_genre.map(|(g,)| g),
            favorites_count,
        })
    }
}
