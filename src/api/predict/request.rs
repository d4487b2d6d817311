// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! JSON classification request

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;

/// Request body for POST /v1/classify
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    /// Base64-encoded image, optionally as a `data:image/...;base64,` URL
    #[serde(default)]
    pub image: Option<String>,
}

impl ClassifyRequest {
    /// Check presence and encoded size of the image
    pub fn validate(&self, max_image_bytes: usize) -> Result<&str, ApiError> {
        let image = match self.image.as_deref().map(str::trim) {
            Some(image) if !image.is_empty() => image,
            _ => {
                return Err(ApiError::ValidationError {
                    field: "image".to_string(),
                    message: "image is required".to_string(),
                })
            }
        };

        let max_encoded = max_encoded_len(max_image_bytes);
        if image.len() > max_encoded {
            return Err(ApiError::PayloadTooLarge {
                size: Some(image.len() / 4 * 3),
                limit: max_image_bytes,
            });
        }

        Ok(image)
    }
}

/// Longest base64 text (plus a data URL prefix) that can hold `max_bytes`
pub fn max_encoded_len(max_bytes: usize) -> usize {
    max_bytes.div_ceil(3) * 4 + 128
}
