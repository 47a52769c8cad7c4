// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use frame_analyzer::{api::start_server, config::ServerConfig, version};
use std::env;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env so GEMINI_API_KEY can live next to the binary
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServerConfig::parse();

    info!("🚀 Starting {}", version::get_version_string());
    info!("Features: {}", version::FEATURES.join(", "));
    debug!("Configuration: {:?}", config);

    start_server(config).await
}
