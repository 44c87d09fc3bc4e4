//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::sync::Arc;

use pawn_gateway::config::GatewayConfig;
use pawn_gateway::domain::{SimPawn, SimWorld};
use pawn_gateway::lifecycle::WebServer;
use serde_json::Value;

/// A gateway bound to an ephemeral local port, plus handles on its world.
pub struct TestGateway {
    pub server: WebServer,
    pub world: Arc<SimWorld>,
    pub pawn: Arc<SimPawn>,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` and decode the envelope.
    pub async fn get(&self, path: &str) -> (u16, Value) {
        let res = self.client.get(self.url(path)).send().await.expect("gateway unreachable");
        decode(res).await
    }

    /// PUT `body` to `path` with the given content type and decode the envelope.
    pub async fn put(&self, path: &str, content_type: &str, body: &str) -> (u16, Value) {
        let res = self
            .client
            .put(self.url(path))
            .header("Content-Type", content_type)
            .body(body.to_string())
            .send()
            .await
            .expect("gateway unreachable");
        decode(res).await
    }

    pub async fn shutdown(self) {
        self.server.stop().await;
    }
}

async fn decode(res: reqwest::Response) -> (u16, Value) {
    let status = res.status().as_u16();
    let text = res.text().await.expect("body unreadable");
    let value = serde_json::from_str(&text).unwrap_or(Value::String(text));
    (status, value)
}

/// Start a gateway on 127.0.0.1 with a possessed pawn at the origin.
pub async fn start_gateway(mut config: GatewayConfig) -> TestGateway {
    config.listener.bind_host = "127.0.0.1".into();

    let (world, pawn) = SimWorld::with_pawn();
    let world = Arc::new(world);
    let server = WebServer::new(config, world.clone());
    let addr = server.start(0).await.expect("gateway failed to start");

    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("client build failed");

    TestGateway {
        server,
        world,
        pawn,
        base_url: format!("http://{}", addr),
        client,
    }
}

pub async fn start_default_gateway() -> TestGateway {
    start_gateway(GatewayConfig::default()).await
}
