//! Application handlers and their route bindings.

pub mod base;
pub mod player;

use std::sync::Arc;

use crate::domain::World;
use crate::http::method::Verb;
use crate::http::request::Request;
use crate::http::response::ApiResponse;
use crate::routing::{RouteError, RouteHandle, RouteTable};

type WorldHandler = fn(&dyn World, &Request) -> Option<ApiResponse>;

const PLAYER_ROUTES: [(Verb, &str, WorldHandler); 4] = [
    (Verb::Get, "/player/get_location", player::get_player_location),
    (Verb::Put, "/player/set_location", player::set_player_location),
    (Verb::Get, "/player/get_rotation", player::get_player_rotation),
    (Verb::Put, "/player/set_rotation", player::set_player_rotation),
];

/// Register one binding, logging the result. A rejected binding is skipped.
pub fn bind_route<F>(table: &mut RouteTable, verb: Verb, path: &str, handler: F) -> Result<RouteHandle, RouteError>
where
    F: Fn(&Request) -> Option<ApiResponse> + Send + Sync + 'static,
{
    tracing::info!(verb = %verb, path = %path, "Binding route");
    table.register(verb, path, handler).inspect_err(|e| {
        tracing::warn!(verb = %verb, path = %path, error = %e, "Route binding rejected");
    })
}

/// Bind every application route. Returns how many bindings succeeded.
pub fn bind_routes(table: &mut RouteTable, world: Arc<dyn World>) -> usize {
    let mut bound = 0;

    if bind_route(table, Verb::Get, "/health", base::health_check).is_ok() {
        bound += 1;
    }

    for (verb, path, handler) in PLAYER_ROUTES {
        let world = world.clone();
        if bind_route(table, verb, path, move |request| handler(world.as_ref(), request)).is_ok() {
            bound += 1;
        }
    }

    bound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SimWorld;
    use crate::routing::KeyPolicy;

    #[test]
    fn test_bind_routes_registers_surface() {
        let mut table = RouteTable::new(KeyPolicy::Compound);
        let bound = bind_routes(&mut table, Arc::new(SimWorld::empty()));

        assert_eq!(bound, 5);
        let listed: Vec<String> = table
            .routes()
            .into_iter()
            .map(|(verb, path)| format!("{verb} {path}"))
            .collect();
        assert_eq!(
            listed,
            vec![
                "GET /health",
                "GET /player/get_location",
                "GET /player/get_rotation",
                "PUT /player/set_location",
                "PUT /player/set_rotation",
            ]
        );
    }

    #[test]
    fn test_rebinding_does_not_duplicate() {
        let mut table = RouteTable::new(KeyPolicy::Compound);
        let world: Arc<dyn World> = Arc::new(SimWorld::empty());
        bind_routes(&mut table, world.clone());
        bind_routes(&mut table, world);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_rejected_binding_is_skipped() {
        let mut table = RouteTable::new(KeyPolicy::Compound);
        assert!(bind_route(&mut table, Verb::Get, "no-leading-slash", base::health_check).is_err());
        assert!(bind_route(&mut table, Verb::None, "/health", base::health_check).is_err());
        assert!(table.is_empty());
    }
}
