// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbedRequest type for POST /api/embed

use crate::api::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON key carrying the encoded image
pub const IMAGE_FIELD: &str = "imageBase64";

/// Request body for POST /api/embed (and its alias POST /embed)
///
/// # Example
/// ```json
/// {
///   "imageBase64": "data:image/png;base64,iVBORw0KGgo..."
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbedRequest {
    /// Encoded image, with or without a data-URI header.
    /// `None` when the field is absent or `null`.
    #[serde(rename = "imageBase64", default)]
    pub image_base64: Option<String>,
}

impl EmbedRequest {
    pub fn new(image_base64: impl Into<String>) -> Self {
        Self {
            image_base64: Some(image_base64.into()),
        }
    }

    /// Build a request from any well-formed JSON body
    ///
    /// Bodies that are not objects (`null`, strings, arrays, numbers) carry no
    /// `imageBase64` and yield an empty request. A present, non-null value
    /// that is not a string is rejected.
    pub fn from_json(body: Value) -> Result<Self, ApiError> {
        let Value::Object(mut fields) = body else {
            return Ok(Self::default());
        };

        match fields.remove(IMAGE_FIELD) {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::String(encoded)) => Ok(Self::new(encoded)),
            Some(other) => Err(ApiError::InvalidRequest(format!(
                "'{}' must be a string, got {}",
                IMAGE_FIELD,
                json_type_name(&other)
            ))),
        }
    }

    /// Validates the request and hands over the encoded image
    ///
    /// # Returns
    /// - `Ok(String)` with the encoded image
    /// - `Err(ApiError::MissingField)` if `imageBase64` is absent
    pub fn into_image(self) -> Result<String, ApiError> {
        self.image_base64.ok_or(ApiError::MissingField)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
