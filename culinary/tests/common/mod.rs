#![allow(dead_code)]

use axum::Router;
use axum_test::{TestResponse, TestServer};
use serde_json::Value;

use culinary::{routes, state::AppState, store::memory::InMemoryStore};
use culinary_core::gateway::DocumentGateway;

/// An API router wired to a fresh in-memory store.
pub struct TestEnv {
    pub gateway: DocumentGateway,
    pub router: Router,
}

impl TestEnv {
    pub fn start() -> Self {
        Self::with_gateway(DocumentGateway::new(InMemoryStore::new()))
    }

    /// An environment whose gateway has no store behind it.
    pub fn disconnected() -> Self {
        Self::with_gateway(DocumentGateway::disconnected())
    }

    fn with_gateway(gateway: DocumentGateway) -> Self {
        let state = AppState::new(gateway.clone()).with_database("culinary_test", true);
        Self {
            gateway,
            router: routes::router(state),
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> TestServer {
        TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> TestServer {
        TestServer::builder()
            .build(self.router.clone())
    }

    /// Number of documents stored in `collection`, read straight from the gateway.
    pub async fn count(&self, collection: &str) -> usize {
        self.gateway
            .find(collection, None)
            .await
            .expect("gateway query failed")
            .len()
    }
}

/// Returns the `id` from a create response.
pub fn created_id(response: &TestResponse) -> String {
    response.json::<Value>()["id"]
        .as_str()
        .expect("response has a string id")
        .to_string()
}

/// Returns the `items` array from a list response.
pub fn items(response: &TestResponse) -> Vec<Value> {
    response.json::<Value>()["items"]
        .as_array()
        .expect("response has an items array")
        .clone()
}

/// Returns the `title` of every item in a list response.
pub fn titles(response: &TestResponse) -> Vec<String> {
    items(response)
        .iter()
        .map(|item| item["title"].as_str().unwrap_or_default().to_string())
        .collect()
}
