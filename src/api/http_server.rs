// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{embed_handler, search_handler, HealthResponse, ModelInfoResponse};
use crate::catalog::{ProductStore, DEFAULT_SEARCH_LIMIT};
use crate::embeddings::FeatureExtractor;

/// Shared state handed to every handler.
///
/// The extractor and catalog are created once at startup and only read
/// afterwards.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn FeatureExtractor>,
    pub catalog: Arc<ProductStore>,
    /// Hits returned by POST /api/search
    pub search_limit: usize,
}

impl AppState {
    /// State with an empty catalog
    pub fn new(extractor: Arc<dyn FeatureExtractor>) -> Self {
        Self {
            extractor,
            catalog: Arc::new(ProductStore::default()),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_catalog(mut self, catalog: ProductStore, search_limit: usize) -> Self {
        self.catalog = Arc::new(catalog);
        self.search_limit = search_limit;
        self
    }
}

/// Transport settings for the router
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
    /// Single allowed CORS origin; `None` allows any origin
    pub allowed_origin: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 20 * 1024 * 1024,
            allowed_origin: None,
        }
    }
}

/// Build the router with all routes and layers
pub fn create_app(state: AppState, config: &HttpConfig) -> Result<Router> {
    let cors = cors_layer(config.allowed_origin.as_deref())?;

    let app = Router::new()
        // Health check
        .route("/", get(health_handler))
        // Embedding endpoint (and the short alias)
        .route("/api/embed", post(embed_handler))
        .route("/embed", post(embed_handler))
        // Visual search over the product catalog
        .route("/api/search", post(search_handler))
        // Loaded model description
        .route("/api/model", get(model_info_handler))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer> {
    let layer = match allowed_origin {
        Some(origin) => {
            let origin: HeaderValue = origin
                .parse()
                .with_context(|| format!("Invalid CORS origin: {}", origin))?;
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE])
        }
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };
    Ok(layer)
}

/// Bind and serve until Ctrl-C
pub async fn start_server(addr: SocketAddr, state: AppState, config: &HttpConfig) -> Result<()> {
    let app = create_app(state, config)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Embedding service listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Embedding service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

async fn model_info_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(ModelInfoResponse {
        model: state.extractor.model_name(),
        dimension: state.extractor.dimension(),
    })
}
