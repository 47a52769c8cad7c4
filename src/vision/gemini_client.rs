// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Gemini `generateContent` client for multimodal detection prompts

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::RgbImage;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::vision::image_utils::encode_jpeg;
use crate::vision::model::{DetectionModel, ModelError};

const API_KEY_HEADER: &str = "x-goog-api-key";
const UPLOAD_MIME_TYPE: &str = "image/jpeg";

// --- Gemini REST serde structs ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    status: Option<String>,
}

/// Client for the Gemini REST API
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model_name: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(
        api_key: &str,
        endpoint: &str,
        model_name: &str,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ModelError::MissingApiKey);
        }
        if model_name.trim().is_empty() {
            return Err(ModelError::InvalidConfig("model name is empty".to_string()));
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ModelError::InvalidConfig(format!(
                "endpoint '{}' is not an http(s) URL",
                endpoint
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!(
            "Gemini client configured: endpoint={}, model={}",
            endpoint, model_name
        );

        Ok(Self {
            client,
            endpoint,
            model_name: model_name.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Create a client from the server configuration
    pub fn from_config(config: &ServerConfig) -> Result<Self, ModelError> {
        let api_key = config.api_key().ok_or(ModelError::MissingApiKey)?;
        Self::new(
            api_key,
            &config.api_base_url,
            &config.model_name,
            config.model_timeout(),
        )
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model_name
        )
    }
}

/// Build the request body: one user turn with the prompt and the JPEG frame
fn build_request(prompt: &str, jpeg: &[u8], response_mime_type: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![
                Part {
                    text: Some(prompt.to_string()),
                    inline_data: None,
                },
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: UPLOAD_MIME_TYPE.to_string(),
                        data: STANDARD.encode(jpeg),
                    }),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: response_mime_type.to_string(),
        },
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(response: GenerateContentResponse) -> Result<String, ModelError> {
    let block_reason = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(ModelError::EmptyResponse {
            reason: block_reason.unwrap_or_else(|| "no candidates".to_string()),
        });
    };

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ModelError::EmptyResponse {
            reason: candidate
                .finish_reason
                .or(block_reason)
                .unwrap_or_else(|| "empty content".to_string()),
        });
    }

    Ok(text)
}

/// Pull a readable message out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(status) => format!("{} ({})", envelope.error.message, status),
            None => envelope.error.message,
        },
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl DetectionModel for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        image: &RgbImage,
        response_mime_type: &str,
    ) -> Result<String, ModelError> {
        let start = std::time::Instant::now();

        let jpeg = encode_jpeg(image).map_err(|e| ModelError::ImageEncoding(e.to_string()))?;
        let request = build_request(prompt, &jpeg, response_mime_type);

        let url = self.generate_url();
        debug!(
            "Gemini generateContent POST {} ({}x{} frame, {} bytes)",
            url,
            image.width(),
            image.height(),
            jpeg.len()
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let api_response: GenerateContentResponse = response.json().await?;
        let text = extract_text(api_response)?;

        debug!(
            "Gemini responded with {} chars in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
