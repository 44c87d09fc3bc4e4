//! Start/stop contract of the gateway.

use std::sync::Arc;

use pawn_gateway::config::GatewayConfig;
use pawn_gateway::domain::SimWorld;
use pawn_gateway::lifecycle::WebServer;

mod common;

fn local_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_host = "127.0.0.1".into();
    config
}

#[tokio::test]
async fn test_stop_is_idempotent() {
    let server = WebServer::new(local_config(), Arc::new(SimWorld::empty()));
    server.stop().await;
    assert!(!server.is_running().await);

    server.start(0).await.unwrap();
    server.stop().await;
    server.stop().await;
    assert!(!server.is_running().await);
}

#[tokio::test]
async fn test_stopped_listener_refuses_connections() {
    let gw = common::start_default_gateway().await;
    let (status, _) = gw.get("/health").await;
    assert_eq!(status, 200);

    let url = gw.url("/health");
    let client = gw.client.clone();
    gw.server.stop().await;

    assert!(client.get(&url).send().await.is_err());
}

#[tokio::test]
async fn test_restart_serves_again() {
    let gw = common::start_default_gateway().await;
    let port = gw.server.local_addr().await.unwrap().port();

    // Start while running: the old listener is stopped first, then rebound.
    let addr = gw.server.start(port).await.unwrap();
    assert_eq!(addr.port(), port);

    let (status, body) = gw.get("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    gw.shutdown().await;
}
