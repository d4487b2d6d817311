// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction API endpoint module
//!
//! Provides POST /predict_image/ (multipart upload) and POST /v1/classify
//! (base64 JSON) for classifying chili leaf images.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{classify_handler, predict_image_handler, FILE_FIELD};
pub use request::ClassifyRequest;
pub use response::{PredictResponse, PredictionData, STUB_DESCRIPTION, STUB_PREVENTION};
