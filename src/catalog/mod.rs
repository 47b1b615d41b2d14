// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Read-only product catalog for visual search
//!
//! Products are loaded once from a JSON file holding precomputed embeddings
//! and ranked against a query embedding by cosine similarity.

pub mod product_store;

pub use product_store::{Product, ProductId, ProductStore, SearchHit, DEFAULT_SEARCH_LIMIT};
