// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vision::{DataUrlError, ImageError, ModelError};

/// Error body returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Every way a frame analysis request can fail
///
/// Display strings are the exact client-facing messages. Raw model output and
/// prompt text never appear here; they only go to the logs.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalysisError {
    #[error("Gemini API client is not initialized. Check API Key.")]
    ClientUninitialized,

    #[error("No image data received")]
    MissingInput,

    #[error("Base64 decoding error: {0}")]
    Decode(String),

    #[error("Image processing error: {0}")]
    Image(String),

    #[error("Gemini API Error: {0}")]
    ModelApi(String),

    #[error("Gemini did not return valid JSON or format was incorrect.")]
    MalformedModelOutput,

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl AnalysisError {
    /// Stable identifier for logs
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::ClientUninitialized => "client_uninitialized",
            AnalysisError::MissingInput => "missing_input",
            AnalysisError::Decode(_) => "decode_error",
            AnalysisError::Image(_) => "image_error",
            AnalysisError::ModelApi(_) => "model_api_error",
            AnalysisError::MalformedModelOutput => "malformed_model_output",
            AnalysisError::Unexpected(_) => "unexpected_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::MissingInput => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

impl From<DataUrlError> for AnalysisError {
    fn from(e: DataUrlError) -> Self {
        AnalysisError::Decode(e.to_string())
    }
}

impl From<ImageError> for AnalysisError {
    fn from(e: ImageError) -> Self {
        AnalysisError::Image(e.to_string())
    }
}

impl From<ModelError> for AnalysisError {
    fn from(e: ModelError) -> Self {
        AnalysisError::ModelApi(e.to_string())
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
