//! Route path validation and normalization.
//!
//! # Rules
//! - Non-empty and rooted at `/`
//! - Parses as a clean URL path: no query, no fragment, nothing the URL
//!   parser would re-encode or collapse (spaces, `..`, backslashes)
//! - No empty segments (`//`)
//! - A trailing `/` is dropped, except for the root itself

use std::fmt;

use url::Url;

use crate::routing::RouteError;

/// Base used to run a path through the URL parser.
const PARSE_BASE: &str = "http://localhost";

/// A validated, normalized route path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutePath(String);

impl RoutePath {
    /// Validate `raw` and normalize it.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        if !is_valid_path(raw) {
            return Err(RouteError::InvalidPath(raw.to_string()));
        }
        Ok(Self(normalize(raw).to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path validity predicate.
pub fn is_valid_path(raw: &str) -> bool {
    if raw.is_empty() || !raw.starts_with('/') {
        return false;
    }
    if raw.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return false;
    }

    let url = match Url::parse(&format!("{PARSE_BASE}{raw}")) {
        Ok(url) => url,
        Err(_) => return false,
    };
    if url.query().is_some() || url.fragment().is_some() || url.path() != raw {
        return false;
    }

    let body = raw.strip_suffix('/').unwrap_or(raw);
    body.is_empty() || body[1..].split('/').all(|segment| !segment.is_empty())
}

/// Drop a trailing slash (the root stays `/`).
pub fn normalize(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    }
}
