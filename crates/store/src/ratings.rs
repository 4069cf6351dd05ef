//! Rating persistence, including likes, the leaderboard, and the
//! recommendation input queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use mediarate_core::{LeaderboardEntry, MediaItem, MediaStats, Rating, RatingStore, Result};

use crate::client::PgClient;
use crate::db_err;

#[derive(FromRow)]
struct RatingRow {
    id: i64,
    media_id: i64,
    user_id: i64,
    stars: i32,
    comment: Option<String>,
    comment_confirmed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RatingRow> for Rating {
    fn from(row: RatingRow) -> Self {
        Rating {
            id: row.id,
            media_id: row.media_id,
            user_id: row.user_id,
            stars: row.stars,
            comment: row.comment,
            comment_confirmed: row.comment_confirmed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct RatingWithLikesRow {
    #[sqlx(flatten)]
    rating: RatingRow,
    like_count: i64,
}

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

const RATING_COLUMNS: &str =
    "r.id, r.media_id, r.user_id, r.stars, r.comment, r.comment_confirmed, r.created_at, r.updated_at";

const MEDIA_COLUMNS: &str =
    "m.id, m.title, m.description, m.media_type, m.release_year, m.genre, m.age_restriction, m.created_by";

pub struct PgRatingStore {
    client: PgClient,
}

impl PgRatingStore {
    pub fn new(client: PgClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RatingStore for PgRatingStore {
    async fn create(
        &self,
        media_id: i64,
        user_id: i64,
        stars: i32,
        comment: Option<&str>,
    ) -> Result<Option<Rating>> {
        let row: Option<RatingRow> = sqlx::query_as(
            "INSERT INTO ratings (media_id, user_id, stars, comment) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (media_id, user_id) DO NOTHING \
             RETURNING id, media_id, user_id, stars, comment, comment_confirmed, created_at, updated_at",
        )
        .bind(media_id)
        .bind(user_id)
        .bind(stars)
        .bind(comment)
        .fetch_optional(self.client.pool())
        .await
        .map_err(|e| db_err("create_rating", e))?;

        Ok(row.map(Rating::from))
    }

    async fn list_for_media(&self, media_id: i64) -> Result<Vec<(Rating, i64)>> {
        let rows: Vec<RatingWithLikesRow> = sqlx::query_as(&format!(
            "SELECT {RATING_COLUMNS}, COUNT(l.user_id) AS like_count \
             FROM ratings r \
             LEFT JOIN rating_likes l ON l.rating_id = r.id \
             WHERE r.media_id = $1 \
             GROUP BY r.id \
             ORDER BY r.created_at DESC, r.id DESC"
        ))
        .bind(media_id)
        .fetch_all(self.client.pool())
        .await
        .map_err(|e| db_err("list_ratings", e))?;

        Ok(rows
            .into_iter()
            .map(|row| (Rating::from(row.rating), row.like_count))
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Rating>> {
        let row: Option<RatingRow> =
            sqlx::query_as(&format!("SELECT {RATING_COLUMNS} FROM ratings r WHERE r.id = $1"))
                .bind(id)
                .fetch_optional(self.client.pool())
                .await
                .map_err(|e| db_err("get_rating", e))?;

        Ok(row.map(Rating::from))
    }

    async fn update(
        &self,
        id: i64,
        owner_id: i64,
        stars: i32,
        comment: Option<&str>,
    ) -> Result<bool> {
        // An edited comment goes back to unconfirmed.
        let result = sqlx::query(
            "UPDATE ratings SET stars = $3, comment = $4, comment_confirmed = FALSE, \
             updated_at = now() \
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .bind(stars)
        .bind(comment)
        .execute(self.client.pool())
        .await
        .map_err(|e| db_err("update_rating", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64, owner_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM ratings WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(self.client.pool())
            .await
            .map_err(|e| db_err("delete_rating", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn confirm_comment(&self, id: i64, owner_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE ratings SET comment_confirmed = TRUE, updated_at = now() \
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .execute(self.client.pool())
        .await
        .map_err(|e| db_err("confirm_comment", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn like(&self, rating_id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO rating_likes (rating_id, user_id) VALUES ($1, $2) \
             ON CONFLICT (rating_id, user_id) DO NOTHING",
        )
        .bind(rating_id)
        .bind(user_id)
        .execute(self.client.pool())
        .await
        .map_err(|e| db_err("like_rating", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn unlike(&self, rating_id: i64, user_id: i64) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM rating_likes WHERE rating_id = $1 AND user_id = $2")
                .bind(rating_id)
                .bind(user_id)
                .execute(self.client.pool())
                .await
                .map_err(|e| db_err("unlike_rating", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn like_count(&self, rating_id: i64) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM rating_likes WHERE rating_id = $1")
                .bind(rating_id)
                .fetch_one(self.client.pool())
                .await
                .map_err(|e| db_err("like_count", e))?;
        Ok(count)
    }

    async fn media_stats(&self, media_id: i64) -> Result<MediaStats> {
        let (average_score, ratings_count): (Option<f64>, i64) =
            sqlx::query_as("SELECT AVG(stars)::float8, COUNT(*) FROM ratings WHERE media_id = $1")
                .bind(media_id)
                .fetch_one(self.client.pool())
                .await
                .map_err(|e| db_err("media_stats", e))?;

        Ok(MediaStats {
            average_score,
            ratings_count,
        })
    }

    async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        let rows: Vec<(i64, String, i64)> = sqlx::query_as(
            "SELECT u.id, u.username, COUNT(r.id) AS ratings_count \
             FROM users u \
             JOIN ratings r ON r.user_id = u.id \
             GROUP BY u.id, u.username \
             ORDER BY ratings_count DESC, u.username ASC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.client.pool())
        .await
        .map_err(|e| db_err("leaderboard", e))?;

        Ok(rows
            .into_iter()
            .map(|(user_id, username, ratings_count)| LeaderboardEntry {
                user_id,
                username,
                ratings_count,
            })
            .collect())
    }

    async fn history_for_user(&self, user_id: i64) -> Result<Vec<(Rating, String)>> {
        #[derive(FromRow)]
        struct HistoryRow {
            #[sqlx(flatten)]
            rating: RatingRow,
            media_title: String,
        }

        let rows: Vec<HistoryRow> = sqlx::query_as(&format!(
            "SELECT {RATING_COLUMNS}, m.title AS media_title \
             FROM ratings r \
             JOIN media m ON m.id = r.media_id \
             WHERE r.user_id = $1 \
             ORDER BY r.created_at DESC, r.id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.client.pool())
        .await
        .map_err(|e| db_err("rating_history", e))?;

        Ok(rows
            .into_iter()
            .map(|row| (Rating::from(row.rating), row.media_title))
            .collect())
    }

    async fn highly_rated_media(&self, user_id: i64) -> Result<Vec<MediaItem>> {
        let rows: Vec<MediaRow> = sqlx::query_as(&format!(
            "SELECT {MEDIA_COLUMNS} FROM ratings r \
             JOIN media m ON m.id = r.media_id \
             WHERE r.user_id = $1 AND r.stars >= 4",
        ))
        .bind(user_id)
        .fetch_all(self.client.pool())
        .await
        .map_err(|e| db_err("highly_rated_media", e))?;

        Ok(rows.into_iter().map(MediaItem::from).collect())
    }

    async fn unrated_media(&self, user_id: i64) -> Result<Vec<MediaItem>> {
        let rows: Vec<MediaRow> = sqlx::query_as(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media m \
             WHERE NOT EXISTS \
               (SELECT 1 FROM ratings r WHERE r.media_id = m.id AND r.user_id = $1)",
        ))
        .bind(user_id)
        .fetch_all(self.client.pool())
        .await
        .map_err(|e| db_err("unrated_media", e))?;

        Ok(rows.into_iter().map(MediaItem::from).collect())
    }
}
