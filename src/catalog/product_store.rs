// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::embeddings::cosine_similarity;

/// Number of hits returned by a search unless configured otherwise
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Catalog identifiers appear both as numbers and as strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(u64),
    Text(String),
}

/// One catalog entry with its precomputed embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    pub embedding: Vec<f32>,
}

/// A ranked catalog entry, without its embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ProductId,
    pub name: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(rename = "similarityScore")]
    pub similarity_score: f32,
}

impl SearchHit {
    fn from_product(product: &Product, similarity_score: f32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            image_url: product.image_url.clone(),
            price: product.price,
            similarity_score,
        }
    }
}

/// In-memory product catalog, immutable after loading
#[derive(Debug, Clone, Default)]
pub struct ProductStore {
    products: Vec<Product>,
}

impl ProductStore {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Load the catalog from a JSON array of products.
    ///
    /// A missing file yields an empty catalog. A file that exists but does not
    /// parse is an error.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("⚠️ No product catalog found at {}", path.display());
            return Ok(Self::default());
        }

        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read product catalog {}", path.display()))?;
        let products: Vec<Product> = serde_json::from_slice(&data)
            .with_context(|| format!("Failed to parse product catalog {}", path.display()))?;

        info!("✅ Loaded {} product embeddings", products.len());
        Ok(Self::new(products))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Count products whose embedding width differs from `expected`.
    ///
    /// Such products always score 0.0.
    pub fn count_dimension_mismatches(&self, expected: usize) -> usize {
        self.products
            .iter()
            .filter(|p| p.embedding.len() != expected)
            .count()
    }

    /// Rank every product against `query` and return the best `k`,
    /// highest similarity first
    pub fn search(&self, query: &[f32], k: usize) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = self
            .products
            .iter()
            .map(|product| {
                SearchHit::from_product(product, cosine_similarity(query, &product.embedding))
            })
            .collect();

        hits.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        hits.truncate(k);
        hits
    }
}
