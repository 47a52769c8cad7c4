// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Frame decoding and the hosted detection model
//!
//! This module provides:
//! - Data URL decoding and RGB normalization of camera frames
//! - The detection prompt template
//! - The `DetectionModel` seam and its Gemini implementation

pub mod detection;
pub mod gemini_client;
pub mod image_utils;
pub mod model;
pub mod prompt;

pub use detection::{audit_detections, is_hex_color, Detection, DetectionIssue};
pub use gemini_client::GeminiClient;
pub use image_utils::{
    decode_data_url, encode_jpeg, materialize_image, DataUrl, DataUrlError, ImageError, ImageInfo,
};
pub use model::{DetectionModel, ModelError, ModelHandle, JSON_MIME_TYPE};
pub use prompt::{build_detection_prompt, prompt_preview, PROMPT_LOG_PREVIEW_CHARS};
