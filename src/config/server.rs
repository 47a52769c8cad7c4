// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Gemini model used for frame analysis
pub const DEFAULT_MODEL_NAME: &str = "gemini-2.5-flash";

/// Public Gemini REST endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Camera frames arrive base64-encoded inside JSON, so the body limit sits
/// well above axum's 2MB default.
const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Frame analyzer server configuration
#[derive(Parser, Clone)]
#[command(name = "frame-analyzer")]
#[command(version)]
#[command(about = "Relay camera frames and commands to Gemini for object detection", long_about = None)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Gemini API key (can also be set via GEMINI_API_KEY env var)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model name
    #[arg(long = "model", env = "GEMINI_MODEL", default_value = DEFAULT_MODEL_NAME)]
    pub model_name: String,

    /// Base URL of the Gemini REST API
    #[arg(long, env = "GEMINI_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Upper bound on a single model call, in seconds
    #[arg(long, env = "MODEL_TIMEOUT_SECS", default_value_t = 60)]
    pub model_timeout_secs: u64,

    /// Maximum accepted request body size in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Directory holding the camera-capture front-end (index.html)
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Socket address the server listens on
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    /// The API key with surrounding whitespace removed, or `None` when unset or blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            api_key: None,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model_timeout_secs: 60,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            static_dir: PathBuf::from("static"),
        }
    }
}

// The API key must never reach the logs.
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("api_base_url", &self.api_base_url)
            .field("model_timeout_secs", &self.model_timeout_secs)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}
