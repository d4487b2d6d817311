// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction endpoint handlers

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use tracing::{debug, info};

use super::request::ClassifyRequest;
use super::response::PredictResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::classifier::{Classification, Classifier, ClassifierError};
use crate::vision::decode_base64_image;

/// Multipart form field carrying the image
pub const FILE_FIELD: &str = "file";

/// POST /predict_image/ - Classify an uploaded image
///
/// # Request
/// `multipart/form-data` with the image in the `file` field.
///
/// # Response
/// `{"data": {...}}` shaped by the configured response mode.
///
/// # Errors
/// - 400 Bad Request: not multipart, no `file` field, empty or undecodable image
/// - 413 Payload Too Large: image exceeds the upload limit
/// - 500 Internal Server Error: inference failed
pub async fn predict_image_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let result = predict_from_multipart(&state, content_length(&headers), multipart).await;
    state.record_outcome("predict_image", &result);
    result.map(Json)
}

/// POST /v1/classify - Classify a base64-encoded image
///
/// # Request
/// `{"image": "<base64>"}`
///
/// # Response
/// Same as POST /predict_image/.
pub async fn classify_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let result = classify_from_json(&state, content_length(&headers), payload).await;
    state.record_outcome("classify", &result);
    result.map(Json)
}

async fn predict_from_multipart(
    state: &AppState,
    body_size: Option<usize>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<PredictResponse, ApiError> {
    let mut multipart =
        multipart.map_err(|e| rejection_error(state, body_size, e.status(), e.body_text()))?;
    let bytes = read_file_field(state, body_size, &mut multipart).await?;

    let max_bytes = state.max_upload_bytes;
    let classification =
        classify_blocking(state, move |classifier| classifier.classify_bytes(&bytes, max_bytes))
            .await?;

    Ok(respond(state, &classification))
}

async fn classify_from_json(
    state: &AppState,
    body_size: Option<usize>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<PredictResponse, ApiError> {
    let Json(request) =
        payload.map_err(|e| rejection_error(state, body_size, e.status(), e.body_text()))?;
    let image = request.validate(state.max_upload_bytes)?.to_string();

    let max_bytes = state.max_upload_bytes;
    let classification = classify_blocking(state, move |classifier| {
        let (decoded, info) = decode_base64_image(&image, max_bytes)?;
        debug!(
            "Decoded image: {}x{}, {:?}, {} bytes",
            info.width, info.height, info.format, info.size_bytes
        );
        classifier.classify(&decoded)
    })
    .await?;

    Ok(respond(state, &classification))
}

/// Declared request body size, if the client sent one
fn content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Extractor rejections keep their 413; everything else is a bad request
///
/// A body cut off at the router limit was never fully read, so its size is
/// only known when the client declared it.
fn rejection_error(
    state: &AppState,
    body_size: Option<usize>,
    status: StatusCode,
    text: String,
) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge {
            size: body_size,
            limit: state.max_upload_bytes,
        }
    } else {
        ApiError::InvalidRequest(text)
    }
}

/// Pull the `file` field out of the form, ignoring any other fields
async fn read_file_field(
    state: &AppState,
    body_size: Option<usize>,
    multipart: &mut Multipart,
) -> Result<Bytes, ApiError> {
    let max_bytes = state.max_upload_bytes;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        rejection_error(
            state,
            body_size,
            e.status(),
            format!("Malformed multipart body: {}", e),
        )
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        debug!(
            "Received upload: filename={:?}, content_type={:?}",
            field.file_name(),
            field.content_type()
        );

        let bytes = field.bytes().await.map_err(|e| {
            rejection_error(
                state,
                body_size,
                e.status(),
                format!("Failed to read upload: {}", e),
            )
        })?;

        if bytes.is_empty() {
            return Err(ApiError::ValidationError {
                field: FILE_FIELD.to_string(),
                message: "uploaded file is empty".to_string(),
            });
        }
        if bytes.len() > max_bytes {
            return Err(ApiError::PayloadTooLarge {
                size: Some(bytes.len()),
                limit: max_bytes,
            });
        }

        return Ok(bytes);
    }

    Err(ApiError::ValidationError {
        field: FILE_FIELD.to_string(),
        message: "file is required".to_string(),
    })
}

/// Run decoding + inference on the blocking pool
async fn classify_blocking<F>(state: &AppState, job: F) -> Result<Classification, ApiError>
where
    F: FnOnce(&Classifier) -> Result<Classification, ClassifierError> + Send + 'static,
{
    let classifier = state.classifier.clone();
    let started = Instant::now();

    let classification = tokio::task::spawn_blocking(move || job(&classifier))
        .await
        .map_err(|e| ApiError::InternalError(format!("Classification task failed: {}", e)))??;

    state
        .metrics
        .observe_inference(started.elapsed().as_secs_f64());

    Ok(classification)
}

fn respond(state: &AppState, classification: &Classification) -> PredictResponse {
    state.metrics.record_prediction(&classification.class_name);

    info!(
        "Prediction: {} ({:.4}) in {}ms",
        classification.class_name, classification.confidence, classification.processing_time_ms
    );

    PredictResponse::from_classification(classification, state.response_mode)
}
