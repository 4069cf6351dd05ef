//! Media catalog CRUD. Every media route requires a session; update and
//! delete are additionally owner-scoped.

use std::sync::LazyLock;

use axum::http::{Method, StatusCode};
use serde::Deserialize;

use mediarate_core::{Error, MediaDraft, MediaSort, Result, SortDirection};

use crate::dispatch::{RouteHandler, RouteRequest};
use crate::path::PathPattern;
use crate::response::{items_body, success_body};
use crate::routes::{is_blank, parse_body, require_user};
use crate::state::AppState;

static COLLECTION: LazyLock<PathPattern> = LazyLock::new(|| PathPattern::new("/api/media"));
static ITEM: LazyLock<PathPattern> = LazyLock::new(|| PathPattern::new("/api/media/{id}"));

#[derive(Debug, Default, Deserialize)]
struct MediaPayload {
    #[serde(default, alias = "Title")]
    title: Option<String>,
    #[serde(default, alias = "Description")]
    description: Option<String>,
    #[serde(default, alias = "MediaType", rename = "mediaType")]
    media_type: Option<String>,
    #[serde(default, alias = "ReleaseYear", rename = "releaseYear")]
    release_year: Option<i32>,
    #[serde(default, alias = "Genre")]
    genre: Option<String>,
    #[serde(default, alias = "AgeRestriction", rename = "ageRestriction")]
    age_restriction: Option<i32>,
}

impl MediaPayload {
    /// Title and media type are mandatory; everything else passes through.
    fn into_draft(self) -> Option<MediaDraft> {
        if is_blank(&self.title) || is_blank(&self.media_type) {
            return None;
        }
        Some(MediaDraft {
            title: self.title.unwrap_or_default().trim().to_string(),
            description: self.description,
            media_type: self.media_type.map(|t| t.trim().to_string()),
            release_year: self.release_year,
            genre: self.genre,
            age_restriction: self.age_restriction,
        })
    }
}

pub struct MediaRoutes {
    state: AppState,
}

impl MediaRoutes {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    async fn list(&self, req: &mut RouteRequest) -> Result<()> {
        let sort = MediaSort::parse(req.query("sort"));
        let direction = SortDirection::parse(req.query("order"));

        let media = self.state.media.list(sort, direction).await?;

        let mut items = Vec::with_capacity(media.len());
        for item in media {
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

    async fn get(&self, req: &mut RouteRequest, id: i64) -> Result<()> {
        let Some(item) = self.state.media.get(id).await? else {
            return Err(Error::not_found("Media not found."));
        };
        let stats = self.state.ratings.media_stats(id).await?;

        let mut value = serde_json::to_value(&item)?;
        let stats_value = serde_json::to_value(stats)?;
        if let (Some(obj), Some(extra)) = (value.as_object_mut(), stats_value.as_object()) {
            for (k, v) in extra {
                obj.insert(k.clone(), v.clone());
            }
        }

        req.respond(StatusCode::OK, value);
        Ok(())
    }

    async fn create(&self, req: &mut RouteRequest, user_id: i64) -> Result<()> {
        let payload: MediaPayload = parse_body(req).unwrap_or_default();
        let Some(draft) = payload.into_draft() else {
            return Err(Error::validation("Title and MediaType are required."));
        };

        let item = self.state.media.create(draft, user_id).await?;
        tracing::info!(media_id = item.id, created_by = user_id, "media item created");

        req.respond(StatusCode::CREATED, serde_json::to_value(&item)?);
        Ok(())
    }

    async fn update(&self, req: &mut RouteRequest, id: i64, user_id: i64) -> Result<()> {
        if self.state.media.get(id).await?.is_none() {
            return Err(Error::not_found("Media not found."));
        }

        let payload: MediaPayload = parse_body(req).unwrap_or_default();
        let Some(draft) = payload.into_draft() else {
            return Err(Error::validation("Title and MediaType are required."));
        };

        if !self.state.media.update(id, draft, user_id).await? {
            return Err(Error::forbidden("You are not allowed to update this media."));
        }

        let updated = self
            .state
            .media
            .get(id)
            .await?
            .ok_or_else(|| Error::not_found("Media not found."))?;
        req.respond(StatusCode::OK, serde_json::to_value(&updated)?);
        Ok(())
    }

    async fn delete(&self, req: &mut RouteRequest, id: i64, user_id: i64) -> Result<()> {
        if !self.state.media.delete(id, user_id).await? {
            return Err(Error::forbidden(
                "You are not allowed to delete this media or it does not exist.",
            ));
        }

        tracing::info!(media_id = id, deleted_by = user_id, "media item deleted");
        req.respond(StatusCode::OK, success_body());
        Ok(())
    }
}

#[async_trait::async_trait]
impl RouteHandler for MediaRoutes {
    async fn handle(&self, req: &mut RouteRequest) -> Result<()> {
        if COLLECTION.capture(req.path()).is_some() {
            let user_id = require_user(&self.state, req).await?;
            return match *req.method() {
                Method::GET => self.list(req).await,
                Method::POST => self.create(req, user_id).await,
                _ => Ok(()),
            };
        }

        if let Some(params) = ITEM.capture(req.path()) {
            // Non-numeric ids fall through so sibling handlers can decline too.
            let Some(id) = params.int("id") else {
                return Ok(());
            };
            let user_id = require_user(&self.state, req).await?;
            return match *req.method() {
                Method::GET => self.get(req, id).await,
                Method::PUT => self.update(req, id, user_id).await,
                Method::DELETE => self.delete(req, id, user_id).await,
                _ => Ok(()),
            };
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "media"
    }
}
