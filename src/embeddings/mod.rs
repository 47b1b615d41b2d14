// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Image embedding extraction
//!
//! The feature extractor is loaded once at startup from ONNX weights and
//! shared read-only by every request through `Arc<dyn FeatureExtractor>`.

pub mod extractor;
pub mod model_source;
pub mod onnx_model;
pub mod similarity;

pub use extractor::{
    check_dimension, global_average_pool, EmbeddingVector, FeatureExtractor, InferenceError,
};
pub use model_source::{resolve_model_path, ModelSource};
pub use onnx_model::OnnxFeatureExtractor;
pub use similarity::cosine_similarity;

#[cfg(test)]
pub use extractor::MockFeatureExtractor;
