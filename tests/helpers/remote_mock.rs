//! Mock remote mirror for testing
//!
//! Serves `products.json`, `categories.json` and `orders.json` under a
//! `bot_data` folder the way the static host does.

use serde_json::Value;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};
use ShopDesk::config::{FetchFailurePolicy, RemoteConfig, Settings};

pub struct RemoteMockServer {
    pub server: MockServer,
}

impl RemoteMockServer {
    pub async fn new() -> Self {
        Self { server: MockServer::start().await }
    }

    pub fn base_url(&self) -> String {
        format!("{}/bot_data", self.server.uri())
    }

    pub fn remote_config(&self, on_fetch_failure: FetchFailurePolicy) -> RemoteConfig {
        RemoteConfig {
            base_url: self.base_url(),
            timeout_seconds: 5,
            on_fetch_failure,
            ..Settings::default().remote
        }
    }

    /// Serve `body` for one resource
    pub async fn mock_resource(&self, name: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/bot_data/{}", name)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer one resource with an HTTP error
    pub async fn mock_failure(&self, name: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/bot_data/{}", name)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Serve all three mirrored collections
    pub async fn mock_collections(&self, products: Value, categories: Value, orders: Value) {
        self.mock_resource("products.json", products).await;
        self.mock_resource("categories.json", categories).await;
        self.mock_resource("orders.json", orders).await;
    }

    /// Drop every mounted mock
    pub async fn reset(&self) {
        self.server.reset().await;
    }
}
