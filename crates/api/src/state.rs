//! Shared application state handed to every route handler at registration.

use std::sync::Arc;

use mediarate_core::{AuthGateway, FavoriteStore, MediaStore, RatingStore, SessionStore, UserStore};

/// Store handles plus the auth gateway. Cloning is cheap (all Arcs).
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub media: Arc<dyn MediaStore>,
    pub ratings: Arc<dyn RatingStore>,
    pub favorites: Arc<dyn FavoriteStore>,
    pub auth: AuthGateway,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        media: Arc<dyn MediaStore>,
        ratings: Arc<dyn RatingStore>,
        favorites: Arc<dyn FavoriteStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            users,
            media,
            ratings,
            favorites,
            auth: AuthGateway::new(sessions),
        }
    }

    /// Replace the default auth gateway (tests shorten the token lifetime).
    pub fn with_auth(mut self, auth: AuthGateway) -> Self {
        self.auth = auth;
        self
    }
}
