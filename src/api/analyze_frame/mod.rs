// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze frame API endpoint module
//!
//! Provides POST /analyze_frame for command-filtered object detection.

pub mod handler;
pub mod pipeline;
pub mod request;
pub mod response;

pub use handler::analyze_frame_handler;
pub use pipeline::{analyze_frame, PipelineStage};
pub use request::AnalyzeFrameRequest;
pub use response::AnalyzeFrameResponse;
