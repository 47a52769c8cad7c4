// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Frame analysis pipeline
//!
//! Received -> Decoded -> Materialized -> ModelCalled -> Responded. Any stage
//! can fail straight to an [`AnalysisError`]; nothing is retried.

use image::RgbImage;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::request::AnalyzeFrameRequest;
use super::response::AnalyzeFrameResponse;
use crate::api::errors::AnalysisError;
use crate::vision::{
    audit_detections, build_detection_prompt, materialize_image, prompt_preview, DataUrl,
    ImageInfo, ModelError, ModelHandle, JSON_MIME_TYPE, PROMPT_LOG_PREVIEW_CHARS,
};

/// Pipeline position of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Decoded,
    Materialized,
    ModelCalled,
    Responded,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Received => "received",
            PipelineStage::Decoded => "decoded",
            PipelineStage::Materialized => "materialized",
            PipelineStage::ModelCalled => "model_called",
            PipelineStage::Responded => "responded",
        }
    }
}

/// Decode a data URL into an RGB bitmap (CPU-bound; runs on the blocking pool)
fn decode_frame(data_url: &str) -> Result<(RgbImage, ImageInfo), AnalysisError> {
    let url = DataUrl::parse(data_url)?;
    let bytes = url.decode()?;
    debug!(
        stage = PipelineStage::Decoded.as_str(),
        "Decoded {} bytes (declared type: {})",
        bytes.len(),
        url.mime_type().unwrap_or("none")
    );

    let (image, info) = materialize_image(&bytes)?;
    debug!(
        stage = PipelineStage::Materialized.as_str(),
        "Materialized {}x{} {:?} frame",
        info.width,
        info.height,
        info.format
    );
    Ok((image, info))
}

/// Run one frame analysis request through the pipeline
///
/// The model handle is checked first, so an uninitialized client fails every
/// request regardless of its content.
pub async fn analyze_frame(
    model: &ModelHandle,
    request: AnalyzeFrameRequest,
    model_timeout: Duration,
) -> Result<AnalyzeFrameResponse, AnalysisError> {
    let model = model.get().cloned().ok_or_else(|| {
        warn!("Rejecting request: Gemini client is not initialized");
        AnalysisError::ClientUninitialized
    })?;

    let (image_data_url, command) = request.into_parts()?;
    debug!(
        stage = PipelineStage::Received.as_str(),
        "Frame received with command {:?}", command
    );

    let (image, info) = tokio::task::spawn_blocking(move || decode_frame(&image_data_url))
        .await
        .map_err(|e| AnalysisError::Unexpected(format!("frame decoding task failed: {}", e)))??;

    let prompt = build_detection_prompt(&command);
    let start = Instant::now();

    let text = match tokio::time::timeout(
        model_timeout,
        model.generate(&prompt, &image, JSON_MIME_TYPE),
    )
    .await
    {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            error!("Model API error: {}", e);
            error!(
                "Failed prompt (API error): {}...",
                prompt_preview(&prompt, PROMPT_LOG_PREVIEW_CHARS)
            );
            return Err(e.into());
        }
        Err(_) => {
            let e = ModelError::Timeout(model_timeout.as_secs());
            error!("Model API error: {}", e);
            error!(
                "Failed prompt (timeout): {}...",
                prompt_preview(&prompt, PROMPT_LOG_PREVIEW_CHARS)
            );
            return Err(e.into());
        }
    };
    debug!(
        stage = PipelineStage::ModelCalled.as_str(),
        "{} answered in {}ms",
        model.model_name(),
        start.elapsed().as_millis()
    );

    let detections: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
        error!("JSON decode error: {}", e);
        error!("Gemini raw output: {}", text);
        AnalysisError::MalformedModelOutput
    })?;

    let flagged = audit_detections(&detections);
    info!(
        stage = PipelineStage::Responded.as_str(),
        "Frame analyzed: {} detections ({} flagged) for command {:?} ({:?}, {} bytes)",
        detections.as_array().map(Vec::len).unwrap_or(0),
        flagged,
        command,
        info.format,
        info.size_bytes
    );

    Ok(AnalyzeFrameResponse::new(detections, command))
}
