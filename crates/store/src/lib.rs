//! PostgreSQL persistence for MediaRate.
//!
//! One [`PgClient`] owns the connection pool; the per-aggregate store types
//! borrow it and implement the repository traits from `mediarate-core`.

pub mod client;
pub mod config;
pub mod favorites;
pub mod media;
pub mod ratings;
pub mod schema;
pub mod sessions;
pub mod users;

pub use client::PgClient;
pub use config::PgConfig;
pub use favorites::PgFavoriteStore;
pub use media::PgMediaStore;
pub use ratings::PgRatingStore;
pub use sessions::PgSessionStore;
pub use users::PgUserStore;

use mediarate_core::error::Error;

/// Map a sqlx error into the domain error, preserving the driver message for
/// the logs while clients only ever see the taxonomy text.
pub(crate) fn db_err(context: &str, err: sqlx::Error) -> Error {
    tracing::error!(context, error = %err, "database operation failed");
    Error::database(format!("{context}: {err}"))
}
