// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Data URL decoding and image materialization for incoming camera frames

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use thiserror::Error;

/// Standard alphabet, tolerant of missing `=` padding
const FRAME_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// JPEG quality used when re-encoding frames for upload
const UPLOAD_JPEG_QUALITY: u8 = 90;

/// Errors splitting or base64-decoding a data URL
#[derive(Debug, Error)]
pub enum DataUrlError {
    #[error("data URL is missing the ',' separator between header and payload")]
    MissingSeparator,

    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Errors turning raw bytes into a bitmap (or back into bytes)
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is empty")]
    EmptyData,

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Failed to encode image: {0}")]
    EncodeFailed(String),
}

/// A data URL split at its first comma
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl<'a> {
    /// Everything before the first comma, e.g. `data:image/jpeg;base64`
    pub header: &'a str,
    /// Base64 payload after the first comma
    pub payload: &'a str,
}

impl<'a> DataUrl<'a> {
    /// Split a data URL on its first comma
    pub fn parse(data_url: &'a str) -> Result<Self, DataUrlError> {
        let (header, payload) = data_url
            .split_once(',')
            .ok_or(DataUrlError::MissingSeparator)?;
        Ok(Self { header, payload })
    }

    /// MIME type declared in the header, if any (`data:image/png;base64` -> `image/png`)
    pub fn mime_type(&self) -> Option<&'a str> {
        let media = self.header.strip_prefix("data:")?;
        let mime = media.split(';').next()?.trim();
        (!mime.is_empty()).then_some(mime)
    }

    /// Decode the payload; the header is informational only
    pub fn decode(&self) -> Result<Vec<u8>, DataUrlError> {
        let compact: String = self
            .payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        Ok(FRAME_BASE64.decode(compact)?)
    }
}

/// Image information extracted during loading
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// Size in bytes
    pub size_bytes: usize,
}

/// Split and base64-decode a data URL into raw image bytes
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, DataUrlError> {
    DataUrl::parse(data_url)?.decode()
}

/// Parse raw bytes into a 3-channel RGB bitmap
///
/// Alpha, grayscale and palette images are all normalized to RGB so the
/// model always receives the same pixel layout.
pub fn materialize_image(bytes: &[u8]) -> Result<(RgbImage, ImageInfo), ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    let format = image::guess_format(bytes).map_err(|_| ImageError::UnsupportedFormat)?;

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    let info = ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((img.to_rgb8(), info))
}

/// Encode an RGB bitmap as JPEG for upload to the model
pub fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, UPLOAD_JPEG_QUALITY);
    image
        .write_with_encoder(encoder)
        .map_err(|e| ImageError::EncodeFailed(e.to_string()))?;
    Ok(buffer.into_inner())
}
