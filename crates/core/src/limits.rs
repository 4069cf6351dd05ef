//! Shared limits and patterns.

/// Default number of recommendations returned when the client sends no limit.
pub const RECOMMENDATION_DEFAULT_LIMIT: usize = 10;

/// Hard cap on recommendations per request; larger limits are clamped, never rejected.
pub const RECOMMENDATION_MAX_LIMIT: usize = 50;

/// Default leaderboard size.
pub const LEADERBOARD_DEFAULT_LIMIT: i64 = 10;

/// Leaderboard hard cap.
pub const LEADERBOARD_MAX_LIMIT: i64 = 100;

/// Usernames as they appear in URL path segments.
pub const USERNAME_PATTERN: &str = r"^[A-Za-z0-9_.\-]{1,64}$";

/// Maximum username length accepted at registration.
pub const USERNAME_MAX_LEN: u64 = 64;

/// Valid star range for ratings.
pub const MIN_STARS: i32 = 1;
pub const MAX_STARS: i32 = 5;
