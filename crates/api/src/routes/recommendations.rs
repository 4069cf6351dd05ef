//! Personalized recommendations, derived from the requester's own highly
//! rated media. Own-account only.

use std::sync::LazyLock;

use axum::http::{Method, StatusCode};

use mediarate_core::recommend::{recommend, ScoringProfile};
use mediarate_core::{Error, Result};

use crate::dispatch::{RouteHandler, RouteRequest};
use crate::path::PathPattern;
use crate::response::items_body;
use crate::routes::require_user;
use crate::state::AppState;

static RECOMMENDATIONS: LazyLock<PathPattern> =
    LazyLock::new(|| PathPattern::new("/api/users/{username}/recommendations"));

pub struct RecommendationRoutes {
    state: AppState,
}

impl RecommendationRoutes {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    async fn list(&self, req: &mut RouteRequest, username: &str) -> Result<()> {
        let requester_id = require_user(&self.state, req).await?;

        let Some(user) = self.state.users.find_by_username(username).await? else {
            return Err(Error::not_found("User not found."));
        };
        if user.id != requester_id {
            return Err(Error::forbidden(
                "You can only view your own recommendations.",
            ));
        }

        let limit = req.query("limit").and_then(|v| v.trim().parse::<i64>().ok());

        let history = self.state.ratings.highly_rated_media(user.id).await?;
        let candidates = self.state.ratings.unrated_media(user.id).await?;

        let profile = ScoringProfile::from_highly_rated(&history);
        let scored = recommend(&profile, candidates, limit);

        let mut items = Vec::with_capacity(scored.len());
        for candidate in &scored {
            items.push(serde_json::to_value(candidate)?);
        }

        tracing::debug!(
            user_id = user.id,
            history = history.len(),
            returned = items.len(),
            "recommendations computed"
        );
        req.respond(StatusCode::OK, items_body(items));
        Ok(())
    }
}

#[async_trait::async_trait]
impl RouteHandler for RecommendationRoutes {
    async fn handle(&self, req: &mut RouteRequest) -> Result<()> {
        let Some(params) = RECOMMENDATIONS.capture(req.path()) else {
            return Ok(());
        };
        if req.method() != Method::GET {
            return Ok(());
        }
        let Some(username) = params.username("username") else {
            return Ok(());
        };
        let username = username.to_string();

        self.list(req, &username).await
    }

    fn name(&self) -> &'static str {
        "recommendations"
    }
}
