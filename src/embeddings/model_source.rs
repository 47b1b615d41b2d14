// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Locating the feature extractor weights before startup
//!
//! A local file wins. Otherwise the file is fetched once from the Hugging
//! Face Hub (cached by `hf-hub` under `~/.cache/huggingface`). An optional
//! SHA-256 digest guards against corrupted or swapped weights.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Where to find the ONNX weights
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSource {
    /// Local ONNX file
    pub model_path: PathBuf,
    /// Hugging Face repo to fetch from when `model_path` is absent
    pub model_repo: Option<String>,
    /// File name inside `model_repo`
    pub model_file: String,
    /// Expected lowercase hex SHA-256 of the weights
    pub sha256: Option<String>,
}

/// Resolve the weights to a local path, downloading if needed, then verify
/// the checksum when one is configured.
pub async fn resolve_model_path(source: &ModelSource) -> Result<PathBuf> {
    let path = if source.model_path.exists() {
        info!("Using local model weights at {}", source.model_path.display());
        source.model_path.clone()
    } else if let Some(repo) = &source.model_repo {
        info!(
            "Model not found at {}, fetching {} from {}",
            source.model_path.display(),
            source.model_file,
            repo
        );
        fetch_from_hub(repo, &source.model_file).await?
    } else {
        anyhow::bail!(
            "ONNX model file not found: {} (set MODEL_REPO to download it)",
            source.model_path.display()
        );
    };

    if let Some(expected) = &source.sha256 {
        verify_checksum(&path, expected).await?;
    }

    Ok(path)
}

async fn fetch_from_hub(repo: &str, file: &str) -> Result<PathBuf> {
    let api = hf_hub::api::tokio::Api::new().context("Failed to initialise Hugging Face client")?;
    let path = api
        .model(repo.to_string())
        .get(file)
        .await
        .with_context(|| format!("Failed to download {} from {}", file, repo))?;

    info!("✅ Model weights cached at {}", path.display());
    Ok(path)
}

/// SHA-256 of a file as lowercase hex
pub async fn calculate_checksum(path: &Path) -> Result<String> {
    let data = fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

/// Fail if the file's digest differs from `expected` (case-insensitive)
pub async fn verify_checksum(path: &Path, expected: &str) -> Result<()> {
    let actual = calculate_checksum(path).await?;
    if !actual.eq_ignore_ascii_case(expected) {
        anyhow::bail!(
            "Model checksum mismatch for {}: expected {}, got {}",
            path.display(),
            expected,
            actual
        );
    }
    info!("Model checksum verified");
    Ok(())
}
