// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embed;
pub mod errors;
pub mod http_server;
pub mod search;

pub use embed::{
    embed_handler, embed_image, embed_payload, EmbedRequest, EmbedResponse, HealthResponse,
    ModelInfoResponse,
};
pub use errors::{ApiError, ErrorResponse, MISSING_IMAGE_MESSAGE};
pub use http_server::{create_app, start_server, AppState, HttpConfig};
pub use search::{search_handler, SearchResponse};
