// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API response types

use serde::{Deserialize, Serialize};

use crate::catalog::SearchHit;

/// Response body for POST /api/search
///
/// # Example
/// ```json
/// {
///   "results": [
///     { "id": 12, "name": "Red sneaker", "category": "shoes",
///       "image_url": "https://...", "similarityScore": 0.93 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    /// Best matches, highest similarity first
    pub results: Vec<SearchHit>,
}
