//! Core types, session authentication, and recommendation scoring for MediaRate.

pub mod auth;
pub mod error;
pub mod limits;
pub mod models;
pub mod password;
pub mod recommend;
pub mod session;
pub mod store;

pub use auth::{AuthGateway, AuthResult, IssuedToken, RejectReason};
pub use error::{Error, Result};
pub use models::*;
pub use recommend::{ScoredCandidate, ScoringProfile};
pub use session::{Session, SessionStore};
pub use store::{FavoriteStore, MediaDraft, MediaStore, RatingStore, UserStore};
