//! Per-user favorite media. All three routes require a session; the listing
//! is scoped to the requester via the `me` alias.

use std::sync::LazyLock;

use axum::http::{Method, StatusCode};

use mediarate_core::{Error, Result};

use crate::dispatch::{RouteHandler, RouteRequest};
use crate::path::PathPattern;
use crate::response::{items_body, success_body};
use crate::routes::require_user;
use crate::state::AppState;

static FAVORITE: LazyLock<PathPattern> =
    LazyLock::new(|| PathPattern::new("/api/media/{id}/favorite"));
static LISTING: LazyLock<PathPattern> =
    LazyLock::new(|| PathPattern::new("/api/users/me/favorites"));

pub struct FavoriteRoutes {
    state: AppState,
}

impl FavoriteRoutes {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    async fn add(&self, req: &mut RouteRequest, media_id: i64) -> Result<()> {
        let user_id = require_user(&self.state, req).await?;

        if self.state.media.get(media_id).await?.is_none() {
            return Err(Error::not_found("Media not found."));
        }

        if !self.state.favorites.add(user_id, media_id).await? {
            return Err(Error::conflict("Media is already in favorites."));
        }

        req.respond(StatusCode::OK, success_body());
        Ok(())
    }

    async fn remove(&self, req: &mut RouteRequest, media_id: i64) -> Result<()> {
        let user_id = require_user(&self.state, req).await?;

        if !self.state.favorites.remove(user_id, media_id).await? {
            return Err(Error::not_found("Favorite not found."));
        }

        req.respond(StatusCode::OK, success_body());
        Ok(())
    }

    async fn list(&self, req: &mut RouteRequest) -> Result<()> {
        let user_id = require_user(&self.state, req).await?;

        let favorites = self.state.favorites.favorites_for_user(user_id).await?;

        let mut items = Vec::with_capacity(favorites.len());
        for item in favorites {
            let stats = self.state.ratings.media_stats(item.id).await?;
            let mut value = serde_json::to_value(&item)?;
            let stats_value = serde_json::to_value(stats)?;
            if let (Some(obj), Some(extra)) = (value.as_object_mut(), stats_value.as_object()) {
                for (k, v) in extra {
                    obj.insert(k.clone(), v.clone());
                }
            }
            items.push(value);
        }

        req.respond(StatusCode::OK, items_body(items));
        Ok(())
    }
}

#[async_trait::async_trait]
impl RouteHandler for FavoriteRoutes {
    async fn handle(&self, req: &mut RouteRequest) -> Result<()> {
        if let Some(params) = FAVORITE.capture(req.path()) {
            let Some(media_id) = params.int("id") else {
                return Ok(());
            };
            return match *req.method() {
                Method::POST => self.add(req, media_id).await,
                Method::DELETE => self.remove(req, media_id).await,
                _ => Ok(()),
            };
        }

        if LISTING.capture(req.path()).is_some() {
            if req.method() != Method::GET {
                return Ok(());
            }
            return self.list(req).await;
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "favorites"
    }
}
