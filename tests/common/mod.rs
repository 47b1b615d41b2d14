// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
#![allow(dead_code)]

//! Shared fixtures for the integration suites

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use serde_json::Value;
use std::io::Cursor;
use std::sync::Arc;
use tower::ServiceExt;
use visual_embed_service::api::{create_app, AppState, HttpConfig};
use visual_embed_service::catalog::{Product, ProductId, ProductStore};
use visual_embed_service::embeddings::{EmbeddingVector, FeatureExtractor, InferenceError};
use visual_embed_service::vision::NormalizedTensor;

pub const STUB_DIMENSION: usize = 1280;

/// Deterministic stand-in for the ONNX extractor.
///
/// The pixels are split into contiguous regions in row-major order, and each
/// output element is the mean of one channel over one region. Different
/// images give different vectors and the same image always gives the same one.
pub struct StubExtractor;

impl FeatureExtractor for StubExtractor {
    fn extract(&self, tensor: &NormalizedTensor) -> Result<EmbeddingVector, InferenceError> {
        let values = tensor
            .as_array()
            .as_slice()
            .ok_or_else(|| InferenceError::Runtime("tensor not contiguous".to_string()))?;
        let pixels = values.len() / 3;
        let regions = STUB_DIMENSION.div_ceil(3);
        let embedding: Vec<f32> = (0..STUB_DIMENSION)
            .map(|i| {
                let (region, channel) = (i / 3, i % 3);
                let start = region * pixels / regions;
                let end = (region + 1) * pixels / regions;
                let sum: f32 = (start..end).map(|p| values[p * 3 + channel]).sum();
                sum / (end - start) as f32
            })
            .collect();
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        STUB_DIMENSION
    }

    fn model_name(&self) -> String {
        "stub_mobilenet_v2".to_string()
    }
}

/// Extractor whose forward pass always fails
pub struct FailingExtractor;

impl FeatureExtractor for FailingExtractor {
    fn extract(&self, _tensor: &NormalizedTensor) -> Result<EmbeddingVector, InferenceError> {
        Err(InferenceError::Runtime("simulated runtime failure".to_string()))
    }

    fn dimension(&self) -> usize {
        STUB_DIMENSION
    }

    fn model_name(&self) -> String {
        "failing".to_string()
    }
}

pub fn stub_app() -> Router {
    app_with(Arc::new(StubExtractor), &HttpConfig::default())
}

pub fn app_with(extractor: Arc<dyn FeatureExtractor>, config: &HttpConfig) -> Router {
    create_app(AppState::new(extractor), config).expect("router should build")
}

pub fn catalog_app(catalog: ProductStore, search_limit: usize) -> Router {
    let state = AppState::new(Arc::new(StubExtractor)).with_catalog(catalog, search_limit);
    create_app(state, &HttpConfig::default()).expect("router should build")
}

pub fn catalog_product(id: u64, name: &str, embedding: Vec<f32>) -> Product {
    Product {
        id: ProductId::Number(id),
        name: name.to_string(),
        category: Some("apparel".to_string()),
        image_url: Some(format!("https://cdn.example.com/{}.jpg", id)),
        price: None,
        embedding,
    }
}

pub fn encode(image: &DynamicImage, format: ImageFormat) -> String {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), format)
        .expect("encode test image");
    STANDARD.encode(bytes)
}

/// Horizontal red-to-blue gradient
pub fn gradient_png_base64(width: u32, height: u32) -> String {
    let image = RgbImage::from_fn(width, height, |x, _| {
        let t = (x * 255 / width.max(1)) as u8;
        Rgb([255 - t, 0, t])
    });
    encode(&DynamicImage::ImageRgb8(image), ImageFormat::Png)
}

pub fn solid_png_base64(width: u32, height: u32, color: [u8; 3]) -> String {
    let image = RgbImage::from_pixel(width, height, Rgb(color));
    encode(&DynamicImage::ImageRgb8(image), ImageFormat::Png)
}

pub fn gray_png_base64(width: u32, height: u32, level: u8) -> String {
    let image = image::GrayImage::from_pixel(width, height, image::Luma([level]));
    encode(&DynamicImage::ImageLuma8(image), ImageFormat::Png)
}

pub fn rgba_png_base64(width: u32, height: u32) -> String {
    let image = RgbaImage::from_pixel(width, height, Rgba([10, 200, 30, 128]));
    encode(&DynamicImage::ImageRgba8(image), ImageFormat::Png)
}

pub fn jpeg_base64(width: u32, height: u32) -> String {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    encode(&DynamicImage::ImageRgb8(image), ImageFormat::Jpeg)
}

pub fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Send one request and return status plus parsed JSON body
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub fn embed_body(image_base64: &str) -> String {
    serde_json::json!({ "imageBase64": image_base64 }).to_string()
}

pub fn embedding_of(json: &Value) -> Vec<f32> {
    json["embedding"]
        .as_array()
        .expect("embedding array")
        .iter()
        .map(|v| v.as_f64().expect("number") as f32)
        .collect()
}
