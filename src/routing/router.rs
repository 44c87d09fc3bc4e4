//! Route table: (verb, path) → handler.
//!
//! # Responsibilities
//! - Validate bindings before they are stored
//! - Look up the handler for a request
//! - Hand out handles that can later unbind their route
//!
//! # Design Decisions
//! - Filled once at startup, then shared read-only behind an `Arc`
//! - Re-registering a key overwrites it; it never duplicates
//! - Key policy is explicit: compound (verb, path) keys by default, or
//!   path-only keys where a later verb on the same path replaces the earlier one

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::http::method::Verb;
use crate::http::request::Request;
use crate::http::response::ApiResponse;
use crate::routing::path::RoutePath;
use crate::routing::RouteError;

/// Application handler. `None` means the handler produced no response.
pub type Handler = Arc<dyn Fn(&Request) -> Option<ApiResponse> + Send + Sync>;

/// How bindings are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    /// One binding per (verb, path).
    #[default]
    Compound,
    /// One binding per path; binding another verb replaces the previous one.
    PathOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RouteKey {
    verb: Option<Verb>,
    path: RoutePath,
}

struct RouteEntry {
    id: u64,
    verb: Verb,
    handler: Handler,
}

/// Proof of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteHandle {
    id: u64,
    verb: Verb,
    path: RoutePath,
}

impl RouteHandle {
    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn path(&self) -> &RoutePath {
        &self.path
    }
}

/// The route table.
pub struct RouteTable {
    policy: KeyPolicy,
    routes: HashMap<RouteKey, RouteEntry>,
    next_id: u64,
}

impl RouteTable {
    /// Create an empty table with the given key policy.
    pub fn new(policy: KeyPolicy) -> Self {
        Self {
            policy,
            routes: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn policy(&self) -> KeyPolicy {
        self.policy
    }

    fn key(&self, verb: Verb, path: RoutePath) -> RouteKey {
        match self.policy {
            KeyPolicy::Compound => RouteKey { verb: Some(verb), path },
            KeyPolicy::PathOnly => RouteKey { verb: None, path },
        }
    }

    /// Bind `handler` to (verb, path).
    pub fn register<F>(&mut self, verb: Verb, path: &str, handler: F) -> Result<RouteHandle, RouteError>
    where
        F: Fn(&Request) -> Option<ApiResponse> + Send + Sync + 'static,
    {
        if verb == Verb::None {
            return Err(RouteError::InvalidVerb);
        }
        let path = RoutePath::parse(path)?;

        let id = self.next_id;
        self.next_id += 1;

        let key = self.key(verb, path.clone());
        let entry = RouteEntry {
            id,
            verb,
            handler: Arc::new(handler),
        };
        if let Some(previous) = self.routes.insert(key, entry) {
            tracing::debug!(
                path = %path,
                previous_verb = %previous.verb,
                verb = %verb,
                "Route binding replaced"
            );
        }

        Ok(RouteHandle { id, verb, path })
    }

    /// Find the handler for (verb, path). The request path is normalized the
    /// same way registered paths are.
    pub fn lookup(&self, verb: Verb, request_path: &str) -> Option<Handler> {
        if verb == Verb::None {
            return None;
        }
        let path = RoutePath::parse(request_path).ok()?;
        let entry = self.routes.get(&self.key(verb, path))?;
        // Path-only keys still answer only to the verb that was bound.
        (entry.verb == verb).then(|| entry.handler.clone())
    }

    /// Remove the binding owned by `handle`. Returns false if the handle was
    /// already replaced or unbound.
    pub fn unbind(&mut self, handle: &RouteHandle) -> bool {
        let key = self.key(handle.verb, handle.path.clone());
        match self.routes.get(&key) {
            Some(entry) if entry.id == handle.id => {
                self.routes.remove(&key);
                true
            }
            _ => false,
        }
    }

    /// Current bindings, sorted by path then verb.
    pub fn routes(&self) -> Vec<(Verb, RoutePath)> {
        let mut routes: Vec<(Verb, RoutePath)> = self
            .routes
            .iter()
            .map(|(key, entry)| (entry.verb, key.path.clone()))
            .collect();
        routes.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("policy", &self.policy)
            .field("routes", &self.routes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::envelope::Envelope;

    fn reply(message: &'static str) -> impl Fn(&Request) -> Option<ApiResponse> + Send + Sync + 'static {
        move |_| Some(Envelope::success_message(message).into())
    }

    fn call(table: &RouteTable, verb: Verb, path: &str) -> Option<String> {
        let handler = table.lookup(verb, path)?;
        let request = Request::builder(verb, path).build();
        handler(&request).map(|r| r.envelope().unwrap().message)
    }

    #[test]
    fn test_register_then_lookup() {
        let mut table = RouteTable::new(KeyPolicy::Compound);
        table.register(Verb::Get, "/health", reply("health")).unwrap();
        table.register(Verb::Put, "/player/set_location", reply("set")).unwrap();

        assert_eq!(call(&table, Verb::Get, "/health").as_deref(), Some("health"));
        assert_eq!(call(&table, Verb::Get, "/health/").as_deref(), Some("health"));
        assert_eq!(call(&table, Verb::Put, "/player/set_location").as_deref(), Some("set"));
        assert!(table.lookup(Verb::Post, "/health").is_none());
        assert!(table.lookup(Verb::Get, "/missing").is_none());
        assert!(table.lookup(Verb::Get, "/Health").is_none());
    }

    #[test]
    fn test_rejects_invalid_bindings() {
        let mut table = RouteTable::new(KeyPolicy::Compound);
        assert_eq!(
            table.register(Verb::None, "/health", reply("x")).unwrap_err(),
            RouteError::InvalidVerb
        );
        assert_eq!(
            table.register(Verb::Get, "/health?full=1", reply("x")).unwrap_err(),
            RouteError::InvalidPath("/health?full=1".to_string())
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_compound_keys_keep_verbs_apart() {
        let mut table = RouteTable::new(KeyPolicy::Compound);
        table.register(Verb::Get, "/player/location", reply("get")).unwrap();
        table.register(Verb::Put, "/player/location", reply("put")).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(call(&table, Verb::Get, "/player/location").as_deref(), Some("get"));
        assert_eq!(call(&table, Verb::Put, "/player/location").as_deref(), Some("put"));
    }

    #[test]
    fn test_path_only_keys_last_verb_wins() {
        let mut table = RouteTable::new(KeyPolicy::PathOnly);
        table.register(Verb::Get, "/player/location", reply("get")).unwrap();
        table.register(Verb::Put, "/player/location", reply("put")).unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.lookup(Verb::Get, "/player/location").is_none());
        assert_eq!(call(&table, Verb::Put, "/player/location").as_deref(), Some("put"));
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut table = RouteTable::new(KeyPolicy::Compound);
        let first = table.register(Verb::Get, "/health", reply("first")).unwrap();
        let second = table.register(Verb::Get, "/health/", reply("second")).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(call(&table, Verb::Get, "/health").as_deref(), Some("second"));

        // The replaced handle no longer owns the binding.
        assert!(!table.unbind(&first));
        assert!(table.unbind(&second));
        assert!(!table.unbind(&second));
        assert!(table.lookup(Verb::Get, "/health").is_none());
    }

    #[test]
    fn test_routes_listing_is_sorted() {
        let mut table = RouteTable::new(KeyPolicy::Compound);
        table.register(Verb::Put, "/player/set_rotation", reply("a")).unwrap();
        table.register(Verb::Get, "/health", reply("b")).unwrap();
        table.register(Verb::Get, "/player/get_rotation", reply("c")).unwrap();

        let listed: Vec<String> = table
            .routes()
            .into_iter()
            .map(|(verb, path)| format!("{verb} {path}"))
            .collect();
        assert_eq!(
            listed,
            vec!["GET /health", "GET /player/get_rotation", "PUT /player/set_rotation"]
        );
    }
}
