// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the MobileNetV2 feature extractor

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use ndarray::Array4;

/// Square input size expected by MobileNetV2
pub const INPUT_SIZE: u32 = 224;

/// Color channels fed to the extractor (RGB)
pub const CHANNELS: usize = 3;

/// Interpolation used for the hard resize
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Preprocessed model input of shape (1, 224, 224, 3), channels-last.
///
/// Values follow the MobileNetV2 pretraining recipe: `pixel / 127.5 - 1.0`,
/// so every element is in `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor(Array4<f32>);

impl NormalizedTensor {
    /// All-zero tensor (mid-gray after scaling), used for the warm-up pass
    pub fn zeros() -> Self {
        let size = INPUT_SIZE as usize;
        Self(Array4::zeros((1, size, size, CHANNELS)))
    }

    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    pub fn as_array(&self) -> &Array4<f32> {
        &self.0
    }

    pub fn into_array(self) -> Array4<f32> {
        self.0
    }
}

/// Scale one 8-bit channel value into `[-1.0, 1.0]`
#[inline]
pub fn scale_pixel(value: u8) -> f32 {
    f32::from(value) / 127.5 - 1.0
}

/// Force RGB and hard-resize to `INPUT_SIZE` x `INPUT_SIZE`.
///
/// Alpha is discarded and grayscale is replicated into three channels.
/// Aspect ratio is not preserved.
pub fn resize_for_extractor(image: &DynamicImage) -> RgbImage {
    let rgb = image.to_rgb8();
    if rgb.dimensions() == (INPUT_SIZE, INPUT_SIZE) {
        return rgb;
    }
    image::imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, RESIZE_FILTER)
}

/// Preprocess a decoded image into the extractor's input tensor
///
/// Steps:
/// 1. Convert to RGB
/// 2. Resize to 224x224 (bicubic, no crop)
/// 3. Scale each channel with `scale_pixel`
/// 4. Lay out as NHWC with a batch dimension of 1
pub fn preprocess_for_extractor(image: &DynamicImage) -> NormalizedTensor {
    let rgb = resize_for_extractor(image);
    let size = INPUT_SIZE as usize;

    let tensor = Array4::from_shape_fn((1, size, size, CHANNELS), |(_, y, x, c)| {
        scale_pixel(rgb.get_pixel(x as u32, y as u32)[c])
    });

    NormalizedTensor(tensor)
}
