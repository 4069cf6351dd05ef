//! Table definitions, applied idempotently at startup.

use mediarate_core::Result;

use crate::client::PgClient;
use crate::db_err;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            BIGSERIAL PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    display_name  TEXT,
    bio           TEXT,
    updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_MEDIA_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS media (
    id              BIGSERIAL PRIMARY KEY,
    title           TEXT NOT NULL,
    description     TEXT,
    media_type      TEXT,
    release_year    INT,
    genre           TEXT,
    age_restriction INT,
    created_by      BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
)
"#;

const CREATE_RATINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ratings (
    id                BIGSERIAL PRIMARY KEY,
    media_id          BIGINT NOT NULL REFERENCES media(id) ON DELETE CASCADE,
    user_id           BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    stars             INT NOT NULL CHECK (stars BETWEEN 1 AND 5),
    comment           TEXT,
    comment_confirmed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at        TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at        TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (media_id, user_id)
)
"#;

const CREATE_RATING_LIKES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS rating_likes (
    rating_id BIGINT NOT NULL REFERENCES ratings(id) ON DELETE CASCADE,
    user_id   BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    PRIMARY KEY (rating_id, user_id)
)
"#;

const CREATE_FAVORITES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS favorites (
    user_id  BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    media_id BIGINT NOT NULL REFERENCES media(id) ON DELETE CASCADE,
    PRIMARY KEY (user_id, media_id)
)
"#;

const CREATE_SESSIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    token      TEXT PRIMARY KEY,
    user_id    BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    expires_at TIMESTAMPTZ NOT NULL
)
"#;

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_ratings_media ON ratings(media_id)",
    "CREATE INDEX IF NOT EXISTS idx_ratings_user ON ratings(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)",
];

/// Create every table and index. Safe to run on every startup.
pub async fn init_schema(client: &PgClient) -> Result<()> {
    let statements = [
        CREATE_USERS_TABLE,
        CREATE_MEDIA_TABLE,
        CREATE_RATINGS_TABLE,
        CREATE_RATING_LIKES_TABLE,
        CREATE_FAVORITES_TABLE,
        CREATE_SESSIONS_TABLE,
    ];

    for stmt in statements.iter().chain(CREATE_INDEXES) {
        sqlx::query(stmt)
            .execute(client.pool())
            .await
            .map_err(|e| db_err("init_schema", e))?;
    }

    tracing::info!("database schema initialized");
    Ok(())
}
