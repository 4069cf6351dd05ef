//! HTTP layer for MediaRate: chain-of-responsibility dispatch over an
//! ordered list of route handlers, plus the axum boundary that feeds it.

pub mod dispatch;
pub mod path;
pub mod query;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use dispatch::{Dispatcher, RouteHandler, RouteRequest};
pub use server::router;
pub use state::AppState;
