// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image decoding and normalization for the embedding pipeline
//!
//! `normalize` is the whole front half of the pipeline: it accepts the
//! request's encoded image and yields the tensor the feature extractor
//! consumes. Any failure aborts the request; nothing is retried.

pub mod image_utils;
pub mod preprocessing;

pub use image_utils::{
    decode_base64_image, decode_image_bytes, decode_payload, strip_data_uri_prefix, ImageError,
    ImageInfo,
};
pub use preprocessing::{
    preprocess_for_extractor, resize_for_extractor, NormalizedTensor, CHANNELS, INPUT_SIZE,
};

use tracing::debug;

/// Decode an encoded image and preprocess it for the extractor
///
/// # Errors
/// * `ImageError::Decode` - the payload is not valid base64
/// * `ImageError::Format` - the bytes do not parse as a raster image
pub fn normalize(encoded: &str) -> Result<NormalizedTensor, ImageError> {
    let (image, info) = decode_base64_image(encoded)?;

    debug!(
        "Decoded {:?} image: {}x{}, {} bytes",
        info.format, info.width, info.height, info.size_bytes
    );

    Ok(preprocess_for_extractor(&image))
}
