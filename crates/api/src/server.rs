//! axum boundary: funnels every request into the dispatcher.
//!
//! The router has no per-path routes; a single fallback service builds the
//! RouteRequest, runs the handler chain, and renders the response. When no
//! handler claims a request this layer produces the default 404 body.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Bytes},
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::debug;

use crate::dispatch::{Dispatcher, RouteRequest};
use crate::response::error_body;

/// Request bodies above this size are rejected outright.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Creates the application router around a fully registered dispatcher.
pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .fallback(dispatch_entry)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(dispatcher)
}

async fn dispatch_entry(
    State(dispatcher): State<Arc<Dispatcher>>,
    request: Request,
) -> Response {
    let (parts, body) = request.into_parts();

    let bytes: Bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(error_body("Request body is too large or unreadable.")),
            )
                .into_response();
        }
    };

    let mut req = RouteRequest::new(
        parts.method.clone(),
        parts.uri.path(),
        &parts.headers,
        &bytes,
        parts.uri.query(),
    );

    dispatcher.dispatch(&mut req).await;

    match req.take_response() {
        Some((status, body)) => (status, Json(body)).into_response(),
        None => {
            debug!(method = %parts.method, path = parts.uri.path(), "no handler claimed request");
            (StatusCode::NOT_FOUND, Json(error_body("Not found."))).into_response()
        }
    }
}
