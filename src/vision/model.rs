// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection model seam and the process-wide client handle

use async_trait::async_trait;
use image::RgbImage;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::vision::gemini_client::GeminiClient;

/// MIME type requested from the model for structured output
pub const JSON_MIME_TYPE: &str = "application/json";

/// Errors raised by a detection model backend
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("API key is not set")]
    MissingApiKey,

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("request to model API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("model returned no text (reason: {reason})")]
    EmptyResponse { reason: String },

    #[error("failed to prepare image for upload: {0}")]
    ImageEncoding(String),

    #[error("model call timed out after {0}s")]
    Timeout(u64),
}

/// A hosted multimodal model that answers a prompt about one image
///
/// Implementations must be safe to call concurrently; the service shares one
/// instance across all requests.
#[async_trait]
pub trait DetectionModel: Send + Sync {
    /// Send `prompt` and `image` to the model, asking for `response_mime_type`
    /// output, and return the raw response text.
    async fn generate(
        &self,
        prompt: &str,
        image: &RgbImage,
        response_mime_type: &str,
    ) -> Result<String, ModelError>;

    /// Model identifier for logging and health reporting
    fn model_name(&self) -> &str;
}

/// Outcome of model client initialization, fixed at startup
#[derive(Clone)]
pub enum ModelHandle {
    Ready(Arc<dyn DetectionModel>),
    Unavailable { reason: String },
}

impl ModelHandle {
    /// Build the Gemini client once; failure is recorded, never retried
    pub fn initialize(config: &ServerConfig) -> Self {
        match GeminiClient::from_config(config) {
            Ok(client) => {
                info!("✅ Gemini client initialized (model: {})", client.model_name());
                Self::Ready(Arc::new(client))
            }
            Err(e) => {
                error!(
                    "FATAL: Gemini client initialization failed ({}). Check that GEMINI_API_KEY is set correctly.",
                    e
                );
                Self::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn ready(model: Arc<dyn DetectionModel>) -> Self {
        Self::Ready(model)
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// The model, if initialization succeeded
    pub fn get(&self) -> Option<&Arc<dyn DetectionModel>> {
        match self {
            Self::Ready(model) => Some(model),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.get().is_some()
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(model) => f.debug_tuple("Ready").field(&model.model_name()).finish(),
            Self::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}
