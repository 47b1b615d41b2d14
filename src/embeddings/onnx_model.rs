// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX MobileNetV2 Feature Extractor
//!
//! Wraps an ONNX Runtime session holding MobileNetV2 with its ImageNet
//! classifier removed. The graph may end either in global average pooling
//! (`[1, 1280]`) or at the last feature map (`[1, 7, 7, 1280]`); the latter is
//! pooled here so both exports produce the same embedding.
//!
//! Runs on CPU only. The session is loaded once at startup and never mutated
//! afterwards.

use anyhow::{Context, Result};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::extractor::{
    check_dimension, global_average_pool, EmbeddingVector, FeatureExtractor, InferenceError,
};
use crate::vision::NormalizedTensor;

/// ONNX-based image feature extractor
///
/// # Thread Safety
/// The session sits behind `Arc<Mutex>`; concurrent requests take turns on
/// the runtime, each forward pass is independent.
#[derive(Clone)]
pub struct OnnxFeatureExtractor {
    /// ONNX Runtime session
    session: Arc<Mutex<Session>>,

    /// Model input name (e.g. "input_1")
    input_name: String,

    /// Model name reported by the API (e.g. "mobilenet_v2")
    model_name: String,

    /// Embedding width, learned from a warm-up pass at load time
    dimension: usize,
}

impl std::fmt::Debug for OnnxFeatureExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxFeatureExtractor")
            .field("input_name", &self.input_name)
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl OnnxFeatureExtractor {
    /// Load the extractor from an ONNX file
    ///
    /// # Arguments
    /// - `model_name`: Name reported by `GET /api/model`
    /// - `model_path`: Path to the ONNX model file
    /// - `intra_threads`: ONNX Runtime intra-op thread count
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    /// - The warm-up pass fails or the output cannot be pooled into a vector
    ///
    /// # Example
    /// ```ignore
    /// let extractor = OnnxFeatureExtractor::new(
    ///     "mobilenet_v2",
    ///     "./models/mobilenet_v2/model.onnx",
    ///     4,
    /// )?;
    /// assert_eq!(extractor.dimension(), 1280);
    /// ```
    pub fn new<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        intra_threads: usize,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }

        info!("Loading feature extractor from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load ONNX model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .context("ONNX model declares no inputs")?;

        debug!("Feature extractor input: {}", input_name);

        let session = Arc::new(Mutex::new(session));

        // Warm-up pass fixes the embedding width for the process lifetime
        let warmup = run_session(&session, &input_name, &NormalizedTensor::zeros())
            .context("Warm-up inference failed")?;
        if warmup.is_empty() {
            anyhow::bail!("Feature extractor produced an empty embedding");
        }

        info!(
            "✅ Feature extractor '{}' loaded (CPU-only, {}D embeddings)",
            model_name,
            warmup.len()
        );

        Ok(Self {
            session,
            input_name,
            model_name,
            dimension: warmup.len(),
        })
    }
}

impl FeatureExtractor for OnnxFeatureExtractor {
    fn extract(&self, tensor: &NormalizedTensor) -> Result<EmbeddingVector, InferenceError> {
        let embedding = run_session(&self.session, &self.input_name, tensor)?;
        check_dimension(embedding, self.dimension)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> String {
        self.model_name.clone()
    }
}

fn run_session(
    session: &Mutex<Session>,
    input_name: &str,
    tensor: &NormalizedTensor,
) -> Result<EmbeddingVector, InferenceError> {
    let input_value = Value::from_array(tensor.as_array().to_owned())
        .map_err(|e| InferenceError::Runtime(format!("Failed to create input tensor: {}", e)))?;

    let mut session = session
        .lock()
        .map_err(|_| InferenceError::SessionPoisoned)?;

    let outputs = session
        .run(ort::inputs![input_name => input_value])
        .map_err(|e| InferenceError::Runtime(e.to_string()))?;

    let output = outputs[0]
        .try_extract_array::<f32>()
        .map_err(|e| InferenceError::Runtime(format!("Failed to extract output tensor: {}", e)))?;

    global_average_pool(output)
}
