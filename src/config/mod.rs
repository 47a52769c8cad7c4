// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Process configuration, read from CLI flags, the environment, and `.env`

pub mod server;

pub use server::{ServerConfig, DEFAULT_API_BASE_URL, DEFAULT_MODEL_NAME};
