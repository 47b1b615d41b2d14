// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::embeddings::InferenceError;
use crate::vision::ImageError;

/// Exact message returned when `imageBase64` is absent
pub const MISSING_IMAGE_MESSAGE: &str = "Missing 'imageBase64' in request";

/// JSON body of every error response: `{"error": "<message>"}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Everything an embed request can fail with.
///
/// This is the only place failure kinds are mapped to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", MISSING_IMAGE_MESSAGE)]
    MissingField,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl ApiError {
    /// Map a JSON extractor rejection, keeping the size-limit case distinct
    pub fn from_rejection(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::InvalidRequest(rejection.body_text())
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingField | ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Image(_) | ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-friendly name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MissingField => "missing_field",
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::Image(e) => e.kind(),
            ApiError::Inference(_) => "inference_error",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        warn!(kind = self.kind(), status = status.as_u16(), "Embed request failed: {}", self);
        (status, Json(self.to_response())).into_response()
    }
}
