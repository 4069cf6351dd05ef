//! Leaderboard of the most active raters. Requires a session like every
//! route outside register/login.

use std::sync::LazyLock;

use axum::http::{Method, StatusCode};

use mediarate_core::limits::{LEADERBOARD_DEFAULT_LIMIT, LEADERBOARD_MAX_LIMIT};
use mediarate_core::Result;

use crate::dispatch::{RouteHandler, RouteRequest};
use crate::path::PathPattern;
use crate::response::items_body;
use crate::routes::require_user;
use crate::state::AppState;

static LEADERBOARD: LazyLock<PathPattern> =
    LazyLock::new(|| PathPattern::new("/api/leaderboard"));

fn clamp_limit(requested: Option<i64>) -> i64 {
    match requested {
        Some(n) if n > 0 => n.min(LEADERBOARD_MAX_LIMIT),
        _ => LEADERBOARD_DEFAULT_LIMIT,
    }
}

pub struct LeaderboardRoutes {
    state: AppState,
}

impl LeaderboardRoutes {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    async fn list(&self, req: &mut RouteRequest) -> Result<()> {
        require_user(&self.state, req).await?;

        let limit = clamp_limit(req.query("limit").and_then(|v| v.trim().parse::<i64>().ok()));

        let entries = self.state.ratings.leaderboard(limit).await?;

        let mut items = Vec::with_capacity(entries.len());
        for entry in &entries {
            items.push(serde_json::to_value(entry)?);
        }
        req.respond(StatusCode::OK, items_body(items));
        Ok(())
    }
}

#[async_trait::async_trait]
impl RouteHandler for LeaderboardRoutes {
    async fn handle(&self, req: &mut RouteRequest) -> Result<()> {
        if LEADERBOARD.capture(req.path()).is_none() || req.method() != Method::GET {
            return Ok(());
        }
        self.list(req).await
    }

    fn name(&self) -> &'static str {
        "leaderboard"
    }
}
