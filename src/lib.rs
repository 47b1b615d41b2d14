// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod catalog;
pub mod config;
pub mod embeddings;
pub mod vision;

pub use api::{create_app, start_server, AppState, HttpConfig};
pub use config::ServiceConfig;
pub use embeddings::{FeatureExtractor, OnnxFeatureExtractor};
pub use vision::{normalize, NormalizedTensor};
