//! Shared helpers for integration tests.

use axum::{body::to_bytes, response::Response};
use kidcheck::server::model::app::AppState;
use kidcheck_test_utils::TestContext;
use serde::de::DeserializeOwned;

/// Extension trait for TestContext to create the application state used by controllers
pub trait TestContextExt {
    fn into_app_state(&self) -> AppState;
}

impl TestContextExt for TestContext {
    fn into_app_state(&self) -> AppState {
        self.to_app_state::<AppState>()
    }
}

/// Read a JSON response body into `T`
pub async fn body_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");

    serde_json::from_slice(&bytes).expect("Failed to parse response body")
}
