// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the frame analyzer

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Full version string with feature description
pub const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"), "-gemini-frame-analysis");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "data-url-frames",
    "gemini-generate-content",
    "json-detections",
    "color-hex",
    "static-frontend",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Frame Analyzer {}", VERSION)
}
