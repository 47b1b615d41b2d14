// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /api/embed HTTP handler
//!
//! Adapts the JSON request/response framing to the embedding pipeline:
//! decode → normalize → extract → serialize.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

use crate::api::embed::{EmbedRequest, EmbedResponse};
use crate::api::http_server::AppState;
use crate::api::ApiError;
use crate::embeddings::{EmbeddingVector, FeatureExtractor, InferenceError};
use crate::vision::normalize;

/// Run the full pipeline for one encoded image.
///
/// Synchronous and CPU-bound; no partial results on failure.
pub fn embed_image(
    extractor: &dyn FeatureExtractor,
    encoded: &str,
) -> Result<EmbeddingVector, ApiError> {
    let tensor = normalize(encoded)?;
    let embedding = extractor.extract(&tensor)?;
    Ok(embedding)
}

/// POST /api/embed handler
///
/// # Request Body
/// ```json
/// { "imageBase64": "data:image/jpeg;base64,/9j/4AAQ..." }
/// ```
///
/// # Response Body
/// ```json
/// { "embedding": [0.0, 0.41, ...] }
/// ```
///
/// # Errors
/// - 400 Bad Request: `imageBase64` missing, or the body is not valid JSON
/// - 413 Payload Too Large: body exceeds the configured limit
/// - 500 Internal Server Error: base64 decoding, image parsing or inference failed
pub async fn embed_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let embedding = embed_payload(&state, payload).await?;
    Ok(Json(EmbedResponse::from(embedding)))
}

/// Validate a JSON body and run the pipeline off the async workers.
///
/// Shared by every route that accepts `{"imageBase64": ...}`.
pub async fn embed_payload(
    state: &AppState,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<EmbeddingVector, ApiError> {
    let Json(body) = payload.map_err(ApiError::from_rejection)?;
    let encoded = EmbedRequest::from_json(body)?.into_image()?;

    debug!("Embed request received ({} chars)", encoded.len());

    let started = Instant::now();
    let extractor = state.extractor.clone();

    // Forward pass is CPU-bound; keep it off the async workers
    let embedding = tokio::task::spawn_blocking(move || embed_image(extractor.as_ref(), &encoded))
        .await
        .map_err(|e| {
            ApiError::Inference(InferenceError::Runtime(format!(
                "embedding task aborted: {}",
                e
            )))
        })??;

    info!(
        "Embedding generated: {} dimensions in {}ms",
        embedding.len(),
        started.elapsed().as_millis()
    );

    Ok(embedding)
}
