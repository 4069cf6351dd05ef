//! Query-string parsing.
//!
//! Percent-decoded key/value pairs with case-insensitive (lowercased) keys.
//! Later duplicates overwrite earlier ones; blank keys are dropped.

use std::collections::HashMap;

use url::form_urlencoded;

pub fn parse(query: Option<&str>) -> HashMap<String, String> {
    let mut result = HashMap::new();

    let Some(query) = query else {
        return result;
    };
    let query = query.strip_prefix('?').unwrap_or(query);
    if query.trim().is_empty() {
        return result;
    }

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let key = key.trim().to_ascii_lowercase();
        if !key.is_empty() {
            result.insert(key, value.into_owned());
        }
    }

    result
}
