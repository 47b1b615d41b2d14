// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use std::{env, sync::Arc};
use tracing::{error, info, warn};
use visual_embed_service::{
    api::{start_server, AppState},
    catalog::ProductStore,
    config::ServiceConfig,
    embeddings::{resolve_model_path, FeatureExtractor, OnnxFeatureExtractor},
};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        error!("Embedding service failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = ServiceConfig::parse();
    config.validate().context("Invalid configuration")?;

    println!("🚀 Starting visual embedding service...");

    let model_path = resolve_model_path(&config.model_source())
        .await
        .context("Failed to locate model weights")?;

    let model_name = config.model_name.clone();
    let intra_threads = config.intra_threads;
    let extractor = tokio::task::spawn_blocking(move || {
        OnnxFeatureExtractor::new(model_name, model_path, intra_threads)
    })
    .await
    .context("Model loading task failed")?
    .context("Failed to load feature extractor")?;

    info!(
        "✅ Feature extractor ready: {} ({} dimensions)",
        extractor.model_name(),
        extractor.dimension()
    );

    let catalog = match &config.catalog_path {
        Some(path) => ProductStore::load(path)
            .await
            .context("Failed to load product catalog")?,
        None => ProductStore::default(),
    };

    let mismatched = catalog.count_dimension_mismatches(extractor.dimension());
    if mismatched > 0 {
        warn!(
            "{} of {} catalog products do not have {}-dimensional embeddings and will score 0",
            mismatched,
            catalog.len(),
            extractor.dimension()
        );
    }

    let state = AppState::new(Arc::new(extractor)).with_catalog(catalog, config.search_limit);
    start_server(config.bind_addr(), state, &config.http_config()).await
}
