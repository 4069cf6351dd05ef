//! Typed path-segment matching.
//!
//! Replaces prefix/suffix string slicing with a small pattern matcher:
//! literal segments must match exactly, `{name}` segments bind the raw
//! segment for typed extraction. Handlers validate the bound values (numeric
//! id, URL-safe username) before doing any work, and decline the request
//! when validation fails.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use mediarate_core::limits::USERNAME_PATTERN;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(USERNAME_PATTERN).expect("invalid username pattern"));

enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route pattern such as `/api/media/{id}/ratings`.
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if let Some(name) = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Segment::Param(name.to_string())
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();
        Self { segments }
    }

    /// Match a request path, binding each `{name}` segment. Returns None when
    /// the segment count or any literal differs.
    pub fn capture(&self, path: &str) -> Option<PathParams> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut values = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    values.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(PathParams { values })
    }
}

/// Bound path parameters with typed accessors.
pub struct PathParams {
    values: HashMap<String, String>,
}

impl PathParams {
    /// Decimal integer parameter; None when the segment is not numeric.
    pub fn int(&self, name: &str) -> Option<i64> {
        self.values.get(name)?.parse().ok()
    }

    /// URL-safe username parameter; None when the segment fails the charset check.
    pub fn username(&self, name: &str) -> Option<&str> {
        let raw = self.values.get(name)?;
        USERNAME_RE.is_match(raw).then_some(raw.as_str())
    }

    pub fn raw(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}
