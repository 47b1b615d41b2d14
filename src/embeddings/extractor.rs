// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Feature extractor seam
//!
//! The HTTP layer only knows the `FeatureExtractor` trait. Production wires in
//! `OnnxFeatureExtractor`; tests substitute a fixed-output stub.

use ndarray::{ArrayViewD, Axis};
use thiserror::Error;

use crate::vision::NormalizedTensor;

/// Fixed-length image embedding
pub type EmbeddingVector = Vec<f32>;

/// Runtime failures of the feature extractor
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Feature extraction failed: {0}")]
    Runtime(String),

    #[error("Unexpected extractor output shape: {0:?}")]
    UnexpectedShape(Vec<usize>),

    #[error("Unexpected embedding dimension: {actual} (expected {expected})")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Feature extractor session is unavailable")]
    SessionPoisoned,
}

/// A pretrained network used as a pure image → vector function.
///
/// Implementations hold read-only weights; `extract` must be deterministic
/// and safe to call from several threads at once.
#[cfg_attr(test, mockall::automock)]
pub trait FeatureExtractor: Send + Sync {
    /// Run one forward pass and return the pooled embedding
    fn extract(&self, tensor: &NormalizedTensor) -> Result<EmbeddingVector, InferenceError>;

    /// Embedding width, constant for the lifetime of the extractor
    fn dimension(&self) -> usize;

    /// Human readable model name
    fn model_name(&self) -> String;
}

/// Collapse extractor output into a single embedding.
///
/// Accepts either already-pooled output `[1, C]` or a channels-last feature
/// map `[1, H, W, C]`, which is averaged over both spatial axes.
pub fn global_average_pool(output: ArrayViewD<'_, f32>) -> Result<EmbeddingVector, InferenceError> {
    let shape = output.shape().to_vec();

    if shape.first() != Some(&1) {
        return Err(InferenceError::UnexpectedShape(shape));
    }

    let sample = output.index_axis(Axis(0), 0);
    match sample.ndim() {
        1 => Ok(sample.iter().copied().collect()),
        3 => {
            // [H, W, C] -> [W, C] -> [C]
            let pooled = sample
                .mean_axis(Axis(0))
                .and_then(|rows| rows.mean_axis(Axis(0)))
                .ok_or_else(|| InferenceError::UnexpectedShape(shape.clone()))?;
            Ok(pooled.iter().copied().collect())
        }
        _ => Err(InferenceError::UnexpectedShape(shape)),
    }
}

/// Check an embedding against the width fixed at load time
pub fn check_dimension(
    embedding: EmbeddingVector,
    expected: usize,
) -> Result<EmbeddingVector, InferenceError> {
    if embedding.len() != expected {
        return Err(InferenceError::DimensionMismatch {
            expected,
            actual: embedding.len(),
        });
    }
    Ok(embedding)
}
