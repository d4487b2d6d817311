// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::errors::ApiError;
use super::http_server::AppState;
use crate::version;

/// Greeting returned by GET /
pub const INDEX_MESSAGE: &str = "Hello world from ML endpoint!";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub classes: usize,
    pub response_mode: String,
    pub uptime_secs: u64,
    /// Build info from `version::get_version_info`
    pub version: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassInfo {
    pub id: usize,
    pub name: String,
    pub description: String,
    pub prevention: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassesResponse {
    pub classes: Vec<ClassInfo>,
}

/// GET /
pub async fn index_handler() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: INDEX_MESSAGE.to_string(),
    })
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model: state.classifier.model_name(),
        classes: state.classifier.labels().len(),
        response_mode: state.response_mode.as_str().to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        version: version::get_version_info(),
    })
}

/// GET /v1/classes - label table in model output order
pub async fn classes_handler(State(state): State<AppState>) -> Json<ClassesResponse> {
    let classes = state
        .classifier
        .labels()
        .iter()
        .enumerate()
        .map(|(id, label)| ClassInfo {
            id,
            name: label.name.clone(),
            description: label.description.clone(),
            prevention: label.prevention.clone(),
        })
        .collect();

    Json(ClassesResponse { classes })
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| ApiError::InternalError(format!("Failed to encode metrics: {}", e)))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}
