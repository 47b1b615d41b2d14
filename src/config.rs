// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Service configuration
//!
//! Every setting can come from a flag or from the environment (a `.env`
//! file is loaded first by the binary). Values are validated once at
//! startup; an invalid configuration aborts before the model is loaded.

use anyhow::{bail, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::api::HttpConfig;
use crate::catalog::DEFAULT_SEARCH_LIMIT;
use crate::embeddings::ModelSource;

/// Visual embedding service
#[derive(Parser, Debug, Clone)]
#[command(name = "visual-embed-service")]
#[command(version)]
#[command(about = "HTTP service turning images into MobileNetV2 embeddings", long_about = None)]
pub struct ServiceConfig {
    /// Address to bind
    #[arg(long, env = "SERVICE_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5001)]
    pub port: u16,

    /// Local ONNX weights
    #[arg(long, env = "MODEL_PATH", default_value = "./models/mobilenet_v2/model.onnx")]
    pub model_path: PathBuf,

    /// Name reported by GET /api/model
    #[arg(long, env = "MODEL_NAME", default_value = "mobilenet_v2")]
    pub model_name: String,

    /// Hugging Face repo used when the local weights are missing
    #[arg(long, env = "MODEL_REPO")]
    pub model_repo: Option<String>,

    /// File to fetch from the repo
    #[arg(long, env = "MODEL_FILE", default_value = "model.onnx")]
    pub model_file: String,

    /// Expected SHA-256 of the weights (hex)
    #[arg(long, env = "MODEL_SHA256")]
    pub model_sha256: Option<String>,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,

    /// Largest accepted request body in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = 20 * 1024 * 1024)]
    pub max_body_bytes: usize,

    /// Single allowed CORS origin (any origin when unset)
    #[arg(long, env = "ALLOWED_ORIGIN")]
    pub allowed_origin: Option<String>,

    /// Product catalog (JSON array with precomputed embeddings)
    #[arg(long, env = "CATALOG_PATH")]
    pub catalog_path: Option<PathBuf>,

    /// Hits returned by POST /api/search
    #[arg(long, env = "SEARCH_LIMIT", default_value_t = DEFAULT_SEARCH_LIMIT)]
    pub search_limit: usize,
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.intra_threads == 0 {
            bail!("intra_threads must be at least 1");
        }
        if self.max_body_bytes == 0 {
            bail!("max_body_bytes must be greater than 0");
        }
        if self.search_limit == 0 {
            bail!("search_limit must be at least 1");
        }
        if let Some(sha) = &self.model_sha256 {
            if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
                bail!("model_sha256 must be 64 hex characters, got '{}'", sha);
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn model_source(&self) -> ModelSource {
        ModelSource {
            model_path: self.model_path.clone(),
            model_repo: self.model_repo.clone(),
            model_file: self.model_file.clone(),
            sha256: self.model_sha256.clone(),
        }
    }

    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            max_body_bytes: self.max_body_bytes,
            allowed_origin: self.allowed_origin.clone(),
        }
    }
}
