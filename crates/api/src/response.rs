//! Standardized response bodies.
//!
//! Errors always carry the same shape: `{"success": false, "error": msg}`.
//! Pure-action endpoints (toggles, updates, deletes, confirm) answer with
//! `{"success": true}`; resource endpoints return their own bodies.

use serde_json::{json, Value};

pub fn error_body(message: &str) -> Value {
    json!({
        "success": false,
        "error": message,
    })
}

pub fn success_body() -> Value {
    json!({ "success": true })
}

/// `{"items": [...]}` wrapper used by every list endpoint.
pub fn items_body(items: Vec<Value>) -> Value {
    json!({ "items": items })
}
