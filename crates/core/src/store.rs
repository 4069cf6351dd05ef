//! Persistence contracts for the domain repositories.
//!
//! The API crate talks only to these traits; `pg-store` implements them over
//! PostgreSQL and the integration tests over in-memory maps. Owner-scoped
//! mutations take the acting user id and report `false` when zero rows were
//! affected, without distinguishing "absent" from "present but not owned" —
//! each handler maps that outcome per endpoint.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{LeaderboardEntry, MediaItem, MediaSort, MediaStats, Rating, SortDirection, User, UserStats};

/// Fields of a media item supplied by the client on create/update.
#[derive(Debug, Clone)]
pub struct MediaDraft {
    pub title: String,
    pub description: Option<String>,
    pub media_type: Option<String>,
    pub release_year: Option<i32>,
    pub genre: Option<String>,
    pub age_restriction: Option<i32>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns None when the username is already taken.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn update_profile(
        &self,
        user_id: i64,
        display_name: Option<&str>,
        bio: Option<&str>,
    ) -> Result<bool>;

    async fn user_stats(&self, user_id: i64) -> Result<UserStats>;
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn create(&self, draft: MediaDraft, created_by: i64) -> Result<MediaItem>;

    async fn list(&self, sort: MediaSort, direction: SortDirection) -> Result<Vec<MediaItem>>;

    async fn get(&self, id: i64) -> Result<Option<MediaItem>>;

    /// Owner-scoped: affects zero rows unless `owner_id` created the item.
    async fn update(&self, id: i64, draft: MediaDraft, owner_id: i64) -> Result<bool>;

    /// Owner-scoped delete.
    async fn delete(&self, id: i64, owner_id: i64) -> Result<bool>;
}

#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Returns None when the user already rated this media item.
    async fn create(
        &self,
        media_id: i64,
        user_id: i64,
        stars: i32,
        comment: Option<&str>,
    ) -> Result<Option<Rating>>;

    /// Ratings for one media item, newest first, with their like counts.
    async fn list_for_media(&self, media_id: i64) -> Result<Vec<(Rating, i64)>>;

    async fn get(&self, id: i64) -> Result<Option<Rating>>;

    /// Owner-scoped update of stars and comment.
    async fn update(&self, id: i64, owner_id: i64, stars: i32, comment: Option<&str>) -> Result<bool>;

    /// Owner-scoped delete.
    async fn delete(&self, id: i64, owner_id: i64) -> Result<bool>;

    /// Owner-scoped comment publication.
    async fn confirm_comment(&self, id: i64, owner_id: i64) -> Result<bool>;

    /// Returns false when the user already liked this rating.
    async fn like(&self, rating_id: i64, user_id: i64) -> Result<bool>;

    /// Returns false when no like existed.
    async fn unlike(&self, rating_id: i64, user_id: i64) -> Result<bool>;

    async fn like_count(&self, rating_id: i64) -> Result<i64>;

    async fn media_stats(&self, media_id: i64) -> Result<MediaStats>;

    /// Users ranked by rating count desc, then username asc. `limit` is
    /// already clamped by the caller.
    async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>>;

    /// The user's ratings joined with each media title, newest first.
    async fn history_for_user(&self, user_id: i64) -> Result<Vec<(Rating, String)>>;

    /// Media the user rated with stars >= 4; recommendation profile input.
    async fn highly_rated_media(&self, user_id: i64) -> Result<Vec<MediaItem>>;

    /// Catalog items the user has never rated; recommendation candidates.
    async fn unrated_media(&self, user_id: i64) -> Result<Vec<MediaItem>>;
}

#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Returns false when the media item is already a favorite.
    async fn add(&self, user_id: i64, media_id: i64) -> Result<bool>;

    /// Returns false when no favorite existed.
    async fn remove(&self, user_id: i64, media_id: i64) -> Result<bool>;

    /// The user's favorite media items, by media id.
    async fn favorites_for_user(&self, user_id: i64) -> Result<Vec<MediaItem>>;
}
