// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image loading for the embedding pipeline
//!
//! Turns the `imageBase64` payload of an embed request into a decoded raster
//! image. The payload may carry a data-URI header (`data:image/png;base64,`),
//! which is stripped before decoding.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Errors raised while turning an encoded payload into an image
#[derive(Debug, Error)]
pub enum ImageError {
    /// The payload is not valid standard base64
    #[error("Invalid base64 encoding: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The decoded bytes are not a supported raster image
    #[error("Failed to decode image: {0}")]
    Format(String),
}

impl ImageError {
    /// Short machine-friendly name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ImageError::Decode(_) => "decode_error",
            ImageError::Format(_) => "image_format_error",
        }
    }
}

/// Image information extracted during loading
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// Size of the decoded byte payload
    pub size_bytes: usize,
}

/// Strip an optional data-URI header.
///
/// Everything up to and including the last comma is dropped; input without a
/// comma is returned unchanged.
pub fn strip_data_uri_prefix(encoded: &str) -> &str {
    match encoded.rfind(',') {
        Some(idx) => &encoded[idx + 1..],
        None => encoded,
    }
}

/// Decode the base64 body of an `EncodedImage` into raw bytes.
///
/// ASCII whitespace (line wrapping from command-line encoders) is ignored.
pub fn decode_payload(encoded: &str) -> Result<Vec<u8>, ImageError> {
    let payload = strip_data_uri_prefix(encoded).trim();

    if payload.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: String = payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        return Ok(STANDARD.decode(compact)?);
    }

    Ok(STANDARD.decode(payload)?)
}

/// Decode a base64-encoded image, with or without a data-URI header
///
/// # Returns
/// * `Ok((DynamicImage, ImageInfo))` - The decoded image and metadata
/// * `Err(ImageError::Decode)` - The text is not valid base64
/// * `Err(ImageError::Format)` - The bytes are not a decodable image
///
/// # Example
/// ```ignore
/// let (image, info) = decode_base64_image("data:image/png;base64,iVBORw0KGgo...")?;
/// println!("Image size: {}x{}", info.width, info.height);
/// ```
pub fn decode_base64_image(encoded: &str) -> Result<(DynamicImage, ImageInfo), ImageError> {
    let bytes = decode_payload(encoded)?;
    decode_image_bytes(&bytes)
}

/// Parse raw image bytes, sniffing the format from the content
pub fn decode_image_bytes(bytes: &[u8]) -> Result<(DynamicImage, ImageInfo), ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::Format("image data is empty".to_string()));
    }

    let format = image::guess_format(bytes)
        .map_err(|_| ImageError::Format("unsupported image format".to_string()))?;

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::Format(e.to_string()))?;

    let info = ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((img, info))
}
