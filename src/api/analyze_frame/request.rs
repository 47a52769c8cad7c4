// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze frame request types and validation

use serde_json::{Map, Value};
use tracing::debug;

use crate::api::errors::AnalysisError;

/// Request for frame analysis
///
/// Fields keep the raw JSON value so that a field of the wrong type can be
/// told apart from a missing one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzeFrameRequest {
    /// Data URL of the frame (`data:image/jpeg;base64,...`)
    pub image: Option<Value>,

    /// Free-text detection command, e.g. "red cup"
    pub command: Option<Value>,
}

/// JSON type name used in error messages
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl AnalyzeFrameRequest {
    /// Build a request from string fields
    pub fn new(image: Option<&str>, command: Option<&str>) -> Self {
        Self {
            image: image.map(|s| Value::String(s.to_string())),
            command: command.map(|s| Value::String(s.to_string())),
        }
    }

    /// Parse a request body leniently
    ///
    /// A body that is not a JSON object carries no fields at all, so it fails
    /// the presence check.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Self::from_map(map),
            Ok(other) => {
                debug!("Request body is a JSON {}, not an object", type_name(&other));
                Self::default()
            }
            Err(e) => {
                debug!("Request body is not valid JSON: {}", e);
                Self::default()
            }
        }
    }

    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            image: map.remove("image"),
            command: map.remove("command"),
        }
    }

    /// Validate the analyze frame request
    ///
    /// Only an absent, `null` or empty `image` counts as missing.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        match &self.image {
            None | Some(Value::Null) => Err(AnalysisError::MissingInput),
            Some(Value::String(image)) if image.is_empty() => Err(AnalysisError::MissingInput),
            Some(_) => Ok(()),
        }
    }

    /// Validate and split into `(image data URL, trimmed command)`
    ///
    /// A non-string `image` is a decode failure; a non-string `command` is
    /// rejected as unexpected input. An absent or `null` command is empty.
    pub fn into_parts(self) -> Result<(String, String), AnalysisError> {
        self.validate()?;

        let image = match self.image {
            Some(Value::String(image)) => image,
            Some(other) => {
                return Err(AnalysisError::Decode(format!(
                    "expected a data URL string, got {}",
                    type_name(&other)
                )))
            }
            None => return Err(AnalysisError::MissingInput),
        };

        let command = match self.command {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(command)) => command.trim().to_string(),
            Some(other) => {
                return Err(AnalysisError::Unexpected(format!(
                    "'command' must be a string, got {}",
                    type_name(&other)
                )))
            }
        };

        Ok((image, command))
    }
}
