//! HTTP verbs accepted by the route table.
//!
//! # Design Decisions
//! - Closed set of verbs; anything the transport sees outside it is unroutable
//! - `Verb::None` is an explicit sentinel that can never be bound

use std::fmt;
use std::str::FromStr;

use axum::http::Method;

/// HTTP verb of a route or request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    /// "No verb" sentinel. Rejected at registration.
    None,
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
}

impl Verb {
    /// Uppercase verb name used in logs and metrics labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
            Verb::Patch => "PATCH",
            Verb::Options => "OPTIONS",
            Verb::None => "UNKNOWN_VERB",
        }
    }

    /// Map a transport method onto a verb. Methods outside the routable set
    /// (HEAD, TRACE, CONNECT, extensions) map to the sentinel.
    pub fn from_method(method: &Method) -> Self {
        match *method {
            Method::GET => Verb::Get,
            Method::POST => Verb::Post,
            Method::PUT => Verb::Put,
            Method::DELETE => Verb::Delete,
            Method::PATCH => Verb::Patch,
            Method::OPTIONS => Verb::Options,
            _ => Verb::None,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a verb name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown HTTP verb: {0}")]
pub struct UnknownVerb(pub String);

impl FromStr for Verb {
    type Err = UnknownVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Verb::Get),
            "POST" => Ok(Verb::Post),
            "PUT" => Ok(Verb::Put),
            "DELETE" => Ok(Verb::Delete),
            "PATCH" => Ok(Verb::Patch),
            "OPTIONS" => Ok(Verb::Options),
            _ => Err(UnknownVerb(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_method() {
        assert_eq!(Verb::from_method(&Method::GET), Verb::Get);
        assert_eq!(Verb::from_method(&Method::PUT), Verb::Put);
        assert_eq!(Verb::from_method(&Method::OPTIONS), Verb::Options);
        assert_eq!(Verb::from_method(&Method::HEAD), Verb::None);
        assert_eq!(Verb::from_method(&Method::TRACE), Verb::None);
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(Verb::Patch.to_string(), "PATCH");
        assert_eq!(Verb::None.to_string(), "UNKNOWN_VERB");
        assert_eq!("delete".parse::<Verb>(), Ok(Verb::Delete));
        assert!("FETCH".parse::<Verb>().is_err());
    }
}
