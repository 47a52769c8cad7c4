// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection records returned by the model
//!
//! Model output is relayed to clients exactly as parsed. The typed
//! [`Detection`] exists so the service can flag suspicious entries in the
//! logs without rejecting them.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// A detected object: normalized box, label, and dominant color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// `[x_min, y_min, x_max, y_max]` as fractions of width/height
    #[serde(rename = "box")]
    pub bbox: [f64; 4],
    /// Object label
    pub name: String,
    /// Dominant color as `#RRGGBB`
    pub color_hex: String,
}

/// Reasons a detection looks wrong
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionIssue {
    #[error("coordinate {index} is {value}, outside [0, 1]")]
    CoordinateOutOfRange { index: usize, value: f64 },

    #[error("box is inverted: min {min} > max {max} on the {axis} axis")]
    InvertedBox { axis: char, min: f64, max: f64 },

    #[error("color '{0}' is not a #RRGGBB hex code")]
    InvalidColor(String),
}

impl Detection {
    /// Check the geometric and color invariants, returning every violation
    pub fn issues(&self) -> Vec<DetectionIssue> {
        let mut issues = Vec::new();

        for (index, value) in self.bbox.iter().copied().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                issues.push(DetectionIssue::CoordinateOutOfRange { index, value });
            }
        }

        let [x_min, y_min, x_max, y_max] = self.bbox;
        if x_min > x_max {
            issues.push(DetectionIssue::InvertedBox {
                axis: 'x',
                min: x_min,
                max: x_max,
            });
        }
        if y_min > y_max {
            issues.push(DetectionIssue::InvertedBox {
                axis: 'y',
                min: y_min,
                max: y_max,
            });
        }

        if !is_hex_color(&self.color_hex) {
            issues.push(DetectionIssue::InvalidColor(self.color_hex.clone()));
        }

        issues
    }

    pub fn is_valid(&self) -> bool {
        self.issues().is_empty()
    }
}

/// `#` followed by exactly six hex digits
pub fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .map(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}

/// Log warnings for entries that break the detection contract
///
/// Nothing is rejected; returns the number of flagged entries.
pub fn audit_detections(output: &serde_json::Value) -> usize {
    let Some(entries) = output.as_array() else {
        warn!("Model output is valid JSON but not an array; relaying as-is");
        return 1;
    };

    let mut flagged = 0;
    for (position, entry) in entries.iter().enumerate() {
        match Detection::deserialize(entry) {
            Ok(detection) => {
                let issues = detection.issues();
                if !issues.is_empty() {
                    flagged += 1;
                    for issue in issues {
                        warn!(
                            "Detection {} ('{}') failed validation: {}",
                            position, detection.name, issue
                        );
                    }
                }
            }
            Err(e) => {
                flagged += 1;
                warn!("Detection {} does not match the expected shape: {}", position, e);
            }
        }
    }
    flagged
}
