// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response bodies for the embedding service

use serde::{Deserialize, Serialize};

/// Response body for POST /api/embed
///
/// # Example
/// ```json
/// {
///   "embedding": [0.0, 0.412, 1.73, ...]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedResponse {
    /// Embedding vector; its length is fixed by the loaded model
    pub embedding: Vec<f32>,
}

impl From<Vec<f32>> for EmbedResponse {
    fn from(embedding: Vec<f32>) -> Self {
        Self { embedding }
    }
}

/// Response body for GET /
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub message: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            message: "Backend is running!".to_string(),
        }
    }
}

/// Response body for GET /api/model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfoResponse {
    /// Model name (e.g. "mobilenet_v2")
    pub model: String,
    /// Embedding width
    pub dimension: usize,
}
