// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::classifier::ClassifierError;
use crate::vision::ImageError;

/// JSON body of every failed request
///
/// `error` keeps the single-key shape existing clients read;
/// `error_type` lets them branch without parsing the message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    ValidationError { field: String, message: String },
    /// `size` is unknown when the body was cut off before it was fully read
    PayloadTooLarge { size: Option<usize>, limit: usize },
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, details) = match self {
            ApiError::InvalidRequest(_) => ("invalid_request", None),
            ApiError::ValidationError { field, .. } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", Some(details))
            }
            ApiError::PayloadTooLarge { size, limit } => {
                let mut details = HashMap::new();
                if let Some(size) = size {
                    details.insert("size".to_string(), serde_json::Value::Number((*size).into()));
                }
                details.insert("limit".to_string(), serde_json::Value::Number((*limit).into()));
                ("payload_too_large", Some(details))
            }
            ApiError::InternalError(_) => ("internal_error", None),
        };

        ErrorResponse {
            error: self.to_string(),
            error_type: error_type.to_string(),
            details,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) | ApiError::ValidationError { .. } => 400,
            ApiError::PayloadTooLarge { .. } => 413,
            ApiError::InternalError(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::PayloadTooLarge {
                size: Some(size),
                limit,
            } => write!(
                f,
                "Image data is too large: {} bytes (max: {} bytes)",
                size, limit
            ),
            ApiError::PayloadTooLarge { size: None, limit } => {
                write!(f, "Request body is too large (max image size: {} bytes)", limit)
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::TooLarge(size, limit) => ApiError::PayloadTooLarge {
                size: Some(size),
                limit,
            },
            other => ApiError::InvalidRequest(format!("Invalid image: {}", other)),
        }
    }
}

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::Image(image_err) => image_err.into(),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}
