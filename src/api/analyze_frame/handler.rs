// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze frame endpoint handler

use axum::{body::Bytes, extract::State, Json};
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use super::pipeline::analyze_frame;
use super::request::AnalyzeFrameRequest;
use super::response::AnalyzeFrameResponse;
use crate::api::errors::AnalysisError;
use crate::api::http_server::AppState;

/// POST /analyze_frame - Detect objects matching a command in a camera frame
///
/// The body is read as raw bytes so the client-initialization check runs
/// before any body parsing.
///
/// # Request
/// - `image`: Data URL of the frame (required)
/// - `command`: Detection command, e.g. "red cup" (optional, trimmed)
///
/// # Response
/// - `success`: always `true`
/// - `detections`: the model's JSON array, unchanged
/// - `command`: echo of the trimmed command
///
/// # Errors
/// - 400 Bad Request: `image` missing, `null` or empty
/// - 500 Internal Server Error: client not initialized, decode (including a
///   non-string `image`), image, model, or JSON failures, and a non-string
///   `command`
pub async fn analyze_frame_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalyzeFrameResponse>, AnalysisError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("analyze_frame", %request_id);

    async move {
        let request = AnalyzeFrameRequest::from_body(&body);
        analyze_frame(&state.model, request, state.model_timeout)
            .await
            .map(Json)
            .map_err(|e| {
                warn!("Frame analysis failed ({}): {}", e.kind(), e);
                e
            })
    }
    .instrument(span)
    .await
}
