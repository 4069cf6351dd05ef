//! Route handlers.
//!
//! Every handler follows the same discipline: match its routes via
//! `PathPattern` first and decline silently when nothing matches, then
//! authenticate (all routes except register and login), then validate
//! parameters, then perform the domain operation and write exactly one
//! response.

pub mod favorites;
pub mod leaderboard;
pub mod media;
pub mod profiles;
pub mod ratings;
pub mod recommendations;
pub mod users;

use serde::de::DeserializeOwned;

use mediarate_core::{AuthResult, Error, RejectReason, Result};

use crate::dispatch::{Dispatcher, RouteRequest};
use crate::state::AppState;

/// Build the handler chain in its fixed registration order. Handlers use
/// disjoint path matching, so the order mostly does not matter; it follows
/// the order the routes grew in.
pub fn registry(state: AppState) -> Dispatcher {
    Dispatcher::new()
        .register(users::UserRoutes::new(state.clone()))
        .register(profiles::ProfileRoutes::new(state.clone()))
        .register(recommendations::RecommendationRoutes::new(state.clone()))
        .register(media::MediaRoutes::new(state.clone()))
        .register(ratings::RatingRoutes::new(state.clone()))
        .register(favorites::FavoriteRoutes::new(state.clone()))
        .register(leaderboard::LeaderboardRoutes::new(state))
}

/// Authenticate the request or fail with the matching 401 taxonomy error.
pub(crate) async fn require_user(state: &AppState, req: &RouteRequest) -> Result<i64> {
    match state
        .auth
        .authenticate(req.authorization(), req.authentication())
        .await?
    {
        AuthResult::Authenticated { user_id } => Ok(user_id),
        AuthResult::Rejected(RejectReason::MissingToken) => Err(Error::missing_token(
            "Missing or invalid Authentication/Authorization header.",
        )),
        AuthResult::Rejected(RejectReason::InvalidOrExpired) => {
            Err(Error::invalid_token("Invalid or expired token."))
        }
    }
}

/// Deserialize the JSON body into a payload DTO. An absent body or a body of
/// the wrong shape yields None; the caller reports its own 400 message.
pub(crate) fn parse_body<T: DeserializeOwned>(req: &RouteRequest) -> Option<T> {
    serde_json::from_value(req.body()?.clone()).ok()
}

/// True for None, empty, and whitespace-only strings.
pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}
