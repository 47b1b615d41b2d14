// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding API Module
//!
//! This module provides the POST /api/embed endpoint, which turns a
//! base64-encoded image into a MobileNetV2 embedding.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{embed_handler, embed_image, embed_payload};
pub use request::EmbedRequest;
pub use response::{EmbedResponse, HealthResponse, ModelInfoResponse};
