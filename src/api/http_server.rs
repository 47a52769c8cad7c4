// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{any::Any, path::PathBuf, time::Duration};
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};
use tracing::{error, info};

use super::analyze_frame::analyze_frame_handler;
use super::errors::AnalysisError;
use crate::config::ServerConfig;
use crate::vision::ModelHandle;

/// Shared state handed to every handler
///
/// Read-only after startup; cloning is cheap.
#[derive(Clone, Debug)]
pub struct AppState {
    pub model: ModelHandle,
    pub model_timeout: Duration,
    pub max_body_bytes: usize,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(model: ModelHandle, config: &ServerConfig) -> Self {
        Self {
            model,
            model_timeout: config.model_timeout(),
            max_body_bytes: config.max_body_bytes,
            static_dir: config.static_dir.clone(),
        }
    }

    /// State with default settings and no model client
    pub fn new_for_test() -> Self {
        Self::new(
            ModelHandle::unavailable("no model configured for test"),
            &ServerConfig::default(),
        )
    }

    pub fn with_model(mut self, model: ModelHandle) -> Self {
        self.model = model;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub model_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
}

/// Build the application router
pub fn create_app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    let max_body_bytes = state.max_body_bytes;

    Router::new()
        .route("/analyze_frame", post(analyze_frame_handler))
        .route("/health", get(health_handler))
        // GET / and any other asset is the camera-capture front-end
        .fallback_service(static_files)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind, serve until Ctrl+C, and shut down gracefully
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let model = ModelHandle::initialize(&config);
    let state = AppState::new(model, &config);
    let app = create_app(state);

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Frame analyzer listening on http://{}", listener.local_addr()?);
    info!("Static files served from {}", config.static_dir.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Frame analyzer stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status, model, issue) = match &state.model {
        ModelHandle::Ready(model) => ("healthy", Some(model.model_name().to_string()), None),
        ModelHandle::Unavailable { reason } => ("degraded", None, Some(reason.clone())),
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: crate::version::VERSION.to_string(),
        model,
        model_available: state.model.is_ready(),
        issue,
    })
}

// A panic in one request must not take the server down
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "request handler panicked".to_string()
    };

    error!("Request handler panicked: {}", detail);
    AnalysisError::Unexpected(detail).into_response()
}
