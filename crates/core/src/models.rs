//! Domain records shared between the API and the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// A catalog entry: movie, series, or game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_restriction: Option<i32>,
    pub created_by: i64,
}

/// A star rating with an optional comment.
///
/// The comment is public only once confirmed by its author; until then only
/// the author sees it. Each user rates a given media item at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: i64,
    pub media_id: i64,
    pub user_id: i64,
    pub stars: i32,
    pub comment: Option<String>,
    pub comment_confirmed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate rating stats for one media item.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    pub ratings_count: i64,
}

/// Aggregate profile stats for one user.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_ratings: i64,
    pub average_stars: Option<f64>,
    pub favorite_genre: Option<String>,
    pub favorites_count: i64,
}

/// One leaderboard row: users ranked by how many ratings they submitted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub username: String,
    pub ratings_count: i64,
}

/// Whitelisted sort keys for the media listing.
///
/// Only these map to ORDER BY expressions; anything else falls back to `Id`
/// so client input never reaches the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaSort {
    #[default]
    Id,
    Title,
    Year,
    Score,
}

impl MediaSort {
    pub fn parse(sort: Option<&str>) -> Self {
        match sort.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("title") => Self::Title,
            Some("year") => Self::Year,
            Some("score") => Self::Score,
            _ => Self::Id,
        }
    }
}

/// Sort direction for the media listing; anything but "desc" is ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(order: Option<&str>) -> Self {
        match order.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}
