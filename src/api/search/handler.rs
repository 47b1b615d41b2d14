// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use super::SearchResponse;
use crate::api::embed::handler::embed_payload;
use crate::api::http_server::AppState;
use crate::api::ApiError;

/// POST /api/search handler
///
/// Accepts the same body as POST /api/embed. Errors are those of the embed
/// route; an empty catalog yields an empty result list.
pub async fn search_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let embedding = embed_payload(&state, payload).await?;

    let results = state.catalog.search(&embedding, state.search_limit);
    info!(
        "Search ranked {} products, returning {}",
        state.catalog.len(),
        results.len()
    );

    Ok(Json(SearchResponse { results }))
}
