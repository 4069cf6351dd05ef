//! User profile and rating history. Both are own-account only.

use std::sync::LazyLock;

use axum::http::{Method, StatusCode};
use serde::Deserialize;
use serde_json::json;

use mediarate_core::{Error, Result};

use crate::dispatch::{RouteHandler, RouteRequest};
use crate::path::PathPattern;
use crate::response::{items_body, success_body};
use crate::routes::{parse_body, require_user};
use crate::state::AppState;

static PROFILE: LazyLock<PathPattern> =
    LazyLock::new(|| PathPattern::new("/api/users/{username}/profile"));
static HISTORY: LazyLock<PathPattern> =
    LazyLock::new(|| PathPattern::new("/api/users/{username}/ratings"));

#[derive(Debug, Default, Deserialize)]
struct ProfileUpdate {
    #[serde(default, alias = "DisplayName", rename = "displayName")]
    display_name: Option<String>,
    #[serde(default, alias = "Bio")]
    bio: Option<String>,
}

pub struct ProfileRoutes {
    state: AppState,
}

impl ProfileRoutes {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Resolve the path username to an account and enforce own-account
    /// access with the endpoint-specific forbidden message.
    async fn resolve_own_user(
        &self,
        username: &str,
        requester_id: i64,
        forbidden_msg: &str,
    ) -> Result<mediarate_core::User> {
        let Some(user) = self.state.users.find_by_username(username).await? else {
            return Err(Error::not_found("User not found."));
        };
        if user.id != requester_id {
            return Err(Error::forbidden(forbidden_msg));
        }
        Ok(user)
    }

    async fn get_profile(
        &self,
        req: &mut RouteRequest,
        requester_id: i64,
        username: &str,
    ) -> Result<()> {
        let user = self
            .resolve_own_user(username, requester_id, "You can only view your own profile.")
            .await?;

        let stats = self.state.users.user_stats(user.id).await?;

        req.respond(
            StatusCode::OK,
            json!({
                "id": user.id,
                "username": user.username,
                "displayName": user.display_name,
                "bio": user.bio,
                "updatedAt": user.updated_at,
                "stats": stats,
            }),
        );
        Ok(())
    }

    async fn update_profile(
        &self,
        req: &mut RouteRequest,
        requester_id: i64,
        username: &str,
    ) -> Result<()> {
        let user = self
            .resolve_own_user(username, requester_id, "You can only edit your own profile.")
            .await?;

        let update: ProfileUpdate = parse_body(req).unwrap_or_default();

        let ok = self
            .state
            .users
            .update_profile(user.id, update.display_name.as_deref(), update.bio.as_deref())
            .await?;
        if !ok {
            return Err(Error::internal("Profile update failed."));
        }

        req.respond(StatusCode::OK, success_body());
        Ok(())
    }

    async fn rating_history(
        &self,
        req: &mut RouteRequest,
        requester_id: i64,
        username: &str,
    ) -> Result<()> {
        let user = self
            .resolve_own_user(
                username,
                requester_id,
                "You can only view your own rating history.",
            )
            .await?;

        let history = self.state.ratings.history_for_user(user.id).await?;

        // Own history: the author always sees their comment, confirmed or not.
        let items = history
            .into_iter()
            .map(|(rating, media_title)| {
                json!({
                    "ratingId": rating.id,
                    "mediaId": rating.media_id,
                    "mediaTitle": media_title,
                    "stars": rating.stars,
                    "comment": rating.comment,
                    "commentConfirmed": rating.comment_confirmed,
                    "createdAt": rating.created_at,
                    "updatedAt": rating.updated_at,
                })
            })
            .collect();

        req.respond(StatusCode::OK, items_body(items));
        Ok(())
    }
}

#[async_trait::async_trait]
impl RouteHandler for ProfileRoutes {
    async fn handle(&self, req: &mut RouteRequest) -> Result<()> {
        if let Some(params) = PROFILE.capture(req.path()) {
            let Some(username) = params.username("username") else {
                return Ok(());
            };
            let username = username.to_string();

            match *req.method() {
                Method::GET => {
                    let requester_id = require_user(&self.state, req).await?;
                    return self.get_profile(req, requester_id, &username).await;
                }
                Method::PUT => {
                    let requester_id = require_user(&self.state, req).await?;
                    return self.update_profile(req, requester_id, &username).await;
                }
                _ => return Ok(()),
            }
        }

        if let Some(params) = HISTORY.capture(req.path()) {
            if req.method() != Method::GET {
                return Ok(());
            }
            let Some(username) = params.username("username") else {
                return Ok(());
            };
            let username = username.to_string();

            let requester_id = require_user(&self.state, req).await?;
            return self.rating_history(req, requester_id, &username).await;
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "profiles"
    }
}
