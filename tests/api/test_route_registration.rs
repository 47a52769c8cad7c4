// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Route Registration tests
//!
//! These tests verify that:
//! - GET / serves the front-end page from the static directory
//! - POST /analyze_frame is registered and rejects other methods
//! - GET /health reports model availability
//! - Unknown paths fall through to 404

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use frame_analyzer::{
    api::{create_app, AppState},
    vision::ModelHandle,
};
use serde_json::json;
use tokio_test::assert_ok;
use tower::util::ServiceExt; // for `oneshot`

use super::fake_model::{json_body, FakeModel};

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[cfg(test)]
mod route_registration_tests {
    use super::*;

    #[tokio::test]
    async fn test_index_served_from_static_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("index.html"),
            "<html><body>camera capture</body></html>",
        )
        .unwrap();

        let mut state = AppState::new_for_test();
        state.static_dir = dir.path().to_path_buf();
        let app = create_app(state);

        let response = assert_ok!(app.oneshot(get("/")).await);
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("camera capture"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new_for_test();
        state.static_dir = dir.path().to_path_buf();
        let app = create_app(state);

        let response = assert_ok!(app.oneshot(get("/does-not-exist")).await);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_analyze_frame_rejects_get() {
        let app = create_app(AppState::new_for_test());

        let response = assert_ok!(app.oneshot(get("/analyze_frame")).await);
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_health_degraded_without_client() {
        let app = create_app(AppState::new_for_test());

        let response = assert_ok!(app.oneshot(get("/health")).await);
        assert_eq!(response.status(), StatusCode::OK);

        let value = json_body(response).await;
        assert_eq!(value["status"], "degraded");
        assert_eq!(value["modelAvailable"], false);
        assert!(value.get("model").is_none());
        assert!(value["issue"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_health_healthy_with_client() {
        let state =
            AppState::new_for_test().with_model(ModelHandle::ready(FakeModel::replying("[]")));
        let app = create_app(state);

        let response = assert_ok!(app.oneshot(get("/health")).await);
        let value = json_body(response).await;
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["model"], json!("fake-gemini"));
        assert_eq!(value["modelAvailable"], true);
        assert_eq!(value["version"], frame_analyzer::version::VERSION);
    }

    #[tokio::test]
    async fn test_cors_preflight_allowed() {
        let app = create_app(AppState::new_for_test());

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/analyze_frame")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();

        let response = assert_ok!(app.oneshot(request).await);
        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }
}
