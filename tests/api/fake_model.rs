// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Test doubles shared by the API tests

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use frame_analyzer::vision::{DetectionModel, ModelError};
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What the fake model does when called
#[derive(Clone)]
pub enum FakeReply {
    Text(String),
    ApiError { status: u16, message: String },
    Panic,
}

/// Scripted `DetectionModel` that records every call
pub struct FakeModel {
    reply: FakeReply,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
    last_dimensions: Mutex<Option<(u32, u32)>>,
}

impl FakeModel {
    pub fn new(reply: FakeReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_dimensions: Mutex::new(None),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(FakeReply::Text(text.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }

    pub fn last_dimensions(&self) -> Option<(u32, u32)> {
        *self.last_dimensions.lock().unwrap()
    }
}

#[async_trait]
impl DetectionModel for FakeModel {
    async fn generate(
        &self,
        prompt: &str,
        image: &RgbImage,
        _response_mime_type: &str,
    ) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        *self.last_dimensions.lock().unwrap() = Some(image.dimensions());

        match &self.reply {
            FakeReply::Text(text) => Ok(text.clone()),
            FakeReply::ApiError { status, message } => Err(ModelError::Api {
                status: *status,
                message: message.clone(),
            }),
            FakeReply::Panic => panic!("fake model exploded"),
        }
    }

    fn model_name(&self) -> &str {
        "fake-gemini"
    }
}

/// Data URL of a solid-color PNG
pub fn png_data_url(width: u32, height: u32) -> String {
    let img: RgbImage = ImageBuffer::from_fn(width, height, |x, _| Rgb([x as u8, 0, 0]));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png).unwrap();
    format!("data:image/png;base64,{}", STANDARD.encode(buffer.into_inner()))
}

/// Data URL of a solid-color JPEG, as a browser canvas would send
pub fn jpeg_data_url(width: u32, height: u32) -> String {
    let img: RgbImage = ImageBuffer::from_fn(width, height, |_, _| Rgb([0, 0, 255]));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Jpeg).unwrap();
    format!("data:image/jpeg;base64,{}", STANDARD.encode(buffer.into_inner()))
}

/// POST a JSON body to /analyze_frame
pub fn analyze_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze_frame")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

/// Read a response body as JSON
pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
