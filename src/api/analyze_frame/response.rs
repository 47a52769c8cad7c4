// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze frame response types

use serde::{Deserialize, Serialize};

/// Successful frame analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeFrameResponse {
    /// Always `true`; failures use the error body instead
    pub success: bool,
    /// Model output exactly as parsed, in model order
    pub detections: serde_json::Value,
    /// Echo of the (trimmed) request command
    pub command: String,
}

impl AnalyzeFrameResponse {
    pub fn new(detections: serde_json::Value, command: String) -> Self {
        Self {
            success: true,
            detections,
            command,
        }
    }
}
