//! Chain-of-responsibility request dispatch.
//!
//! The dispatcher holds an ordered list of handlers, registered explicitly
//! once at startup. Each inbound request is offered to the handlers in
//! registration order; the first one that writes a response ends the chain.
//! Handlers decline by returning without responding, and must do so without
//! observable side effects.

use std::collections::HashMap;

use axum::http::{HeaderMap, Method, StatusCode};
use serde_json::Value;
use tracing::warn;

use mediarate_core::{Error, Result};

use crate::query;
use crate::response::error_body;

/// One inbound request as seen by the handler chain.
///
/// Owned by the dispatcher for the duration of the call and lent to each
/// handler; handlers must not retain it. Carries a single response slot:
/// the first `respond` wins, later writes are ignored.
pub struct RouteRequest {
    method: Method,
    path: String,
    authorization: Option<String>,
    authentication: Option<String>,
    body: Option<Value>,
    query: HashMap<String, String>,
    response: Option<(StatusCode, Value)>,
}

impl RouteRequest {
    pub fn new(
        method: Method,
        path: impl Into<String>,
        headers: &HeaderMap,
        body_bytes: &[u8],
        query_string: Option<&str>,
    ) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        // Tolerant body handling: an absent or unparseable body simply means
        // "no body"; handlers report the specific missing-field error.
        let body = if body_bytes.is_empty() {
            None
        } else {
            serde_json::from_slice(body_bytes).ok()
        };

        Self {
            method,
            path: path.into(),
            authorization: header("Authorization"),
            authentication: header("Authentication"),
            body,
            query: query::parse(query_string),
            response: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Standard `Authorization` header value, verbatim.
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    /// Legacy `Authentication` header value, verbatim.
    pub fn authentication(&self) -> Option<&str> {
        self.authentication.as_deref()
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Query parameter by case-insensitive name.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn responded(&self) -> bool {
        self.response.is_some()
    }

    /// Write the response. Exactly one response per request: the first write
    /// wins and later calls are ignored.
    pub fn respond(&mut self, status: StatusCode, body: Value) {
        if self.response.is_none() {
            self.response = Some((status, body));
        }
    }

    pub fn respond_error(&mut self, err: &Error) {
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.respond(status, error_body(&err.to_string()));
    }

    pub fn take_response(&mut self) -> Option<(StatusCode, Value)> {
        self.response.take()
    }
}

/// The contract every route handler implements.
///
/// A handler inspects the request and either fully handles it (writes one
/// response, possibly an error response) or declines by returning `Ok(())`
/// without responding. Errors bubbling out are converted to taxonomy
/// responses by the dispatcher at this boundary; none escape further.
#[async_trait::async_trait]
pub trait RouteHandler: Send + Sync {
    async fn handle(&self, req: &mut RouteRequest) -> Result<()>;

    /// Name used in dispatch logging.
    fn name(&self) -> &'static str;
}

/// Ordered handler chain. Built once at startup, read-only afterwards.
#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<Box<dyn RouteHandler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, handler: impl RouteHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Offer the request to each handler in registration order; stop at the
    /// first response. Leaves the request unhandled when nobody claims it —
    /// the boundary layer produces the default not-found response.
    pub async fn dispatch(&self, req: &mut RouteRequest) {
        for handler in &self.handlers {
            if let Err(err) = handler.handle(req).await {
                warn!(
                    handler = handler.name(),
                    method = %req.method(),
                    path = req.path(),
                    error = %err,
                    "handler failed"
                );
                req.respond_error(&err);
            }
            if req.responded() {
                return;
            }
        }
    }
}
