//! Favorites persistence.

use async_trait::async_trait;
use sqlx::FromRow;

use mediarate_core::{FavoriteStore, MediaItem, Result};

use crate::client::PgClient;
use crate::db_err;

#[derive(FromRow)]
struct MediaRow {
    id: i64,
    title: String,
    description: Option<String>,
    media_type: Option<String>,
    release_year: Option<i32>,
    genre: Option<String>,
    age_restriction: Option<i32>,
    created_by: i64,
}

impl From<MediaRow> for MediaItem {
    fn from(row: MediaRow) -> Self {
        MediaItem {
            id: row.id,
            title: row.title,
            description: row.description,
            media_type: row.media_type,
            release_year: row.release_year,
            genre: row.genre,
            age_restriction: row.age_restriction,
            created_by: row.created_by,
        }
    }
}

pub struct PgFavoriteStore {
    client: PgClient,
}

impl PgFavoriteStore {
    pub fn new(client: PgClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FavoriteStore for PgFavoriteStore {
    async fn add(&self, user_id: i64, media_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO favorites (user_id, media_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, media_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(media_id)
        .execute(self.client.pool())
        .await
        .map_err(|e| db_err("add_favorite", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, user_id: i64, media_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND media_id = $2")
            .bind(user_id)
            .bind(media_id)
            .execute(self.client.pool())
            .await
            .map_err(|e| db_err("remove_favorite", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn favorites_for_user(&self, user_id: i64) -> Result<Vec<MediaItem>> {
        let rows: Vec<MediaRow> = sqlx::query_as(
            "SELECT m.id, m.title, m.description, m.media_type, m.release_year, \
             m.genre, m.age_restriction, m.created_by \
             FROM favorites f \
             JOIN media m ON m.id = f.media_id \
             WHERE f.user_id = $1 \
             ORDER BY m.id ASC",
        )
        .bind(user_id)
        .fetch_all(self.client.pool())
        .await
        .map_err(|e| db_err("favorites_for_user", e))?;

        Ok(rows.into_iter().map(MediaItem::from).collect())
    }
}
