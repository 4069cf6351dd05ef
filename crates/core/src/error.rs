//! Unified error taxonomy for the MediaRate backend.
//!
//! Every store or handler failure is converted into one of these variants at
//! the handler boundary; the HTTP layer maps each variant to a status code.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MediaRate backend.
#[derive(Debug, Error)]
pub enum Error {
    /// Request carried no parseable bearer token.
    #[error("{0}")]
    MissingToken(String),

    /// Token was presented but is unknown or past its expiry.
    #[error("{0}")]
    InvalidOrExpiredToken(String),

    /// Type or range check on request input failed.
    #[error("{0}")]
    Validation(String),

    /// Resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Resource exists but the caller is not its owner, or cross-user access.
    #[error("{0}")]
    Forbidden(String),

    /// Duplicate action: already rated, liked, favorited, or username taken.
    #[error("{0}")]
    Conflict(String),

    /// Persistence failure.
    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Internal(String),
}

impl Error {
    pub fn missing_token(msg: impl Into<String>) -> Self {
        Self::MissingToken(msg.into())
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidOrExpiredToken(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MissingToken(_) => 401,
            Self::InvalidOrExpiredToken(_) => 401,
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Forbidden(_) => 403,
            Self::Conflict(_) => 409,
            Self::Database(_) => 500,
            Self::Serialization(_) => 400,
            Self::Internal(_) => 500,
        }
    }
}
