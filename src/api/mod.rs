// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analyze_frame;
pub mod errors;
pub mod http_server;

pub use analyze_frame::{analyze_frame_handler, AnalyzeFrameRequest, AnalyzeFrameResponse};
pub use errors::{AnalysisError, ErrorResponse};
pub use http_server::{create_app, start_server, AppState, HealthResponse};
