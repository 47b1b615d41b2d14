// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Visual Search API Module
//!
//! POST /api/search embeds the query image and ranks the product catalog
//! against it.

pub mod handler;
pub mod response;

pub use handler::search_handler;
pub use response::SearchResponse;
