//! Ratings: one per user per media item, with star scores, moderated
//! comments, and likes.
//!
//! A comment stays private until its author confirms it; the listing and
//! single-rating responses only include an unconfirmed comment when the
//! requester is the author.

use std::sync::LazyLock;

use axum::http::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use mediarate_core::limits::{MAX_STARS, MIN_STARS};
use mediarate_core::{Error, Rating, Result};

use crate::dispatch::{RouteHandler, RouteRequest};
use crate::path::PathPattern;
use crate::response::{items_body, success_body};
use crate::routes::{parse_body, require_user};
use crate::state::AppState;

static MEDIA_RATINGS: LazyLock<PathPattern> =
    LazyLock::new(|| PathPattern::new("/api/media/{mediaId}/ratings"));
static RATING: LazyLock<PathPattern> = LazyLock::new(|| PathPattern::new("/api/ratings/{id}"));
static CONFIRM: LazyLock<PathPattern> =
    LazyLock::new(|| PathPattern::new("/api/ratings/{id}/confirm"));
static LIKE: LazyLock<PathPattern> = LazyLock::new(|| PathPattern::new("/api/ratings/{id}/like"));

#[derive(Debug, Default, Deserialize)]
struct RatingPayload {
    #[serde(default, alias = "Stars")]
    stars: Option<i32>,
    #[serde(default, alias = "Comment")]
    comment: Option<String>,
}

/// Serialize a rating, hiding an unconfirmed comment from everyone but its
/// author.
fn rating_json(rating: &Rating, like_count: i64, requester: Option<i64>) -> Value {
    let mut value = json!({
        "id": rating.id,
        "mediaId": rating.media_id,
        "userId": rating.user_id,
        "stars": rating.stars,
        "commentConfirmed": rating.comment_confirmed,
        "likeCount": like_count,
        "createdAt": rating.created_at,
        "updatedAt": rating.updated_at,
    });
    if rating.comment_confirmed || requester == Some(rating.user_id) {
        value["comment"] = json!(rating.comment);
    }
    value
}

pub struct RatingRoutes {
    state: AppState,
}

impl RatingRoutes {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    async fn list_for_media(&self, req: &mut RouteRequest, media_id: i64, user_id: i64) -> Result<()> {
        if self.state.media.get(media_id).await?.is_none() {
            return Err(Error::not_found("Media not found."));
        }

        let ratings = self.state.ratings.list_for_media(media_id).await?;

        let items = ratings
            .iter()
            .map(|(rating, like_count)| rating_json(rating, *like_count, Some(user_id)))
            .collect();
        req.respond(StatusCode::OK, items_body(items));
        Ok(())
    }

    async fn create(&self, req: &mut RouteRequest, media_id: i64, user_id: i64) -> Result<()> {
        let payload: RatingPayload = parse_body(req).unwrap_or_default();
        let stars = payload.stars.unwrap_or(0);
        if !(MIN_STARS..=MAX_STARS).contains(&stars) {
            return Err(Error::validation("Stars must be between 1 and 5."));
        }

        if self.state.media.get(media_id).await?.is_none() {
            return Err(Error::not_found("Media not found."));
        }

        let Some(rating) = self
            .state
            .ratings
            .create(media_id, user_id, stars, payload.comment.as_deref())
            .await?
        else {
            return Err(Error::conflict("You already rated this media."));
        };

        tracing::info!(rating_id = rating.id, media_id, user_id, "rating created");
        req.respond(StatusCode::CREATED, rating_json(&rating, 0, Some(user_id)));
        Ok(())
    }

    async fn update(&self, req: &mut RouteRequest, id: i64, user_id: i64) -> Result<()> {
        let payload: RatingPayload = parse_body(req).unwrap_or_default();
        let stars = payload.stars.unwrap_or(0);
        if !(MIN_STARS..=MAX_STARS).contains(&stars) {
            return Err(Error::validation("Stars must be between 1 and 5."));
        }

        if self.state.ratings.get(id).await?.is_none() {
            return Err(Error::not_found("Rating not found."));
        }

        if !self
            .state
            .ratings
            .update(id, user_id, stars, payload.comment.as_deref())
            .await?
        {
            return Err(Error::forbidden("You are not allowed to update this rating."));
        }

        let updated = self
            .state
            .ratings
            .get(id)
            .await?
            .ok_or_else(|| Error::not_found("Rating not found."))?;
        let like_count = self.state.ratings.like_count(id).await?;
        req.respond(StatusCode::OK, rating_json(&updated, like_count, Some(user_id)));
        Ok(())
    }

    async fn delete(&self, req: &mut RouteRequest, id: i64, user_id: i64) -> Result<()> {
        if !self.state.ratings.delete(id, user_id).await? {
            return Err(Error::forbidden(
                "You are not allowed to delete this rating or it does not exist.",
            ));
        }

        req.respond(StatusCode::OK, success_body());
        Ok(())
    }

    async fn confirm(&self, req: &mut RouteRequest, id: i64, user_id: i64) -> Result<()> {
        if !self.state.ratings.confirm_comment(id, user_id).await? {
            return Err(Error::forbidden(
                "You are not allowed to confirm this rating or it does not exist.",
            ));
        }

        req.respond(StatusCode::OK, success_body());
        Ok(())
    }

    async fn like(&self, req: &mut RouteRequest, id: i64, user_id: i64) -> Result<()> {
        if self.state.ratings.get(id).await?.is_none() {
            return Err(Error::not_found("Rating not found."));
        }

        if !self.state.ratings.like(id, user_id).await? {
            return Err(Error::conflict("You already liked this rating."));
        }

        req.respond(StatusCode::OK, success_body());
        Ok(())
    }

    async fn unlike(&self, req: &mut RouteRequest, id: i64, user_id: i64) -> Result<()> {
        if !self.state.ratings.unlike(id, user_id).await? {
            return Err(Error::not_found("Like not found."));
        }

        req.respond(StatusCode::OK, success_body());
        Ok(())
    }
}

#[async_trait::async_trait]
impl RouteHandler for RatingRoutes {
    async fn handle(&self, req: &mut RouteRequest) -> Result<()> {
        if let Some(params) = MEDIA_RATINGS.capture(req.path()) {
            let Some(media_id) = params.int("mediaId") else {
                return Ok(());
            };
            let user_id = require_user(&self.state, req).await?;
            return match *req.method() {
                Method::GET => self.list_for_media(req, media_id, user_id).await,
                Method::POST => self.create(req, media_id, user_id).await,
                _ => Ok(()),
            };
        }

        if let Some(params) = CONFIRM.capture(req.path()) {
            let Some(id) = params.int("id") else {
                return Ok(());
            };
            if req.method() != Method::POST {
                return Ok(());
            }
            let user_id = require_user(&self.state, req).await?;
            return self.confirm(req, id, user_id).await;
        }

        if let Some(params) = LIKE.capture(req.path()) {
            let Some(id) = params.int("id") else {
                return Ok(());
            };
            let user_id = require_user(&self.state, req).await?;
            return match *req.method() {
                Method::POST => self.like(req, id, user_id).await,
                Method::DELETE => self.unlike(req, id, user_id).await,
                _ => Ok(()),
            };
        }

        if let Some(params) = RATING.capture(req.path()) {
            let Some(id) = params.int("id") else {
                return Ok(());
            };
            let user_id = require_user(&self.state, req).await?;
            return match *req.method() {
                Method::PUT => self.update(req, id, user_id).await,
                Method::DELETE => self.delete(req, id, user_id).await,
                _ => Ok(()),
            };
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "ratings"
    }
}
