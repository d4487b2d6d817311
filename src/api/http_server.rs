// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use super::errors::ApiError;
use super::handlers::{classes_handler, health_handler, index_handler, metrics_handler};
use super::predict::request::max_encoded_len;
use super::predict::{classify_handler, predict_image_handler};
use crate::classifier::Classifier;
use crate::config::ResponseMode;
use crate::monitoring::{ServiceMetrics, OUTCOME_CLIENT_ERROR, OUTCOME_OK, OUTCOME_SERVER_ERROR};

/// Room for multipart boundaries, headers and JSON framing
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
    pub response_mode: ResponseMode,
    pub max_upload_bytes: usize,
    pub metrics: Arc<ServiceMetrics>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        classifier: Arc<Classifier>,
        response_mode: ResponseMode,
        max_upload_bytes: usize,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            classifier,
            response_mode,
            max_upload_bytes,
            metrics,
            started_at: Instant::now(),
        }
    }

    /// Largest request body the router accepts
    pub fn body_limit(&self) -> usize {
        max_encoded_len(self.max_upload_bytes) + BODY_OVERHEAD_BYTES
    }

    /// Count and log the outcome of a prediction request
    pub fn record_outcome<T>(&self, endpoint: &str, result: &Result<T, ApiError>) {
        let outcome = match result {
            Ok(_) => OUTCOME_OK,
            Err(e) if e.is_client_error() => {
                warn!("{} rejected: {}", endpoint, e);
                OUTCOME_CLIENT_ERROR
            }
            Err(e) => {
                error!("{} failed: {}", endpoint, e);
                OUTCOME_SERVER_ERROR
            }
        };
        self.metrics.record_request(endpoint, outcome);
    }
}

/// Build the router with every route and layer
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.body_limit();

    Router::new()
        .route("/", get(index_handler))
        .route("/predict_image/", post(predict_image_handler))
        .route("/predict_image", post(predict_image_handler))
        .route("/v1/classify", post(classify_handler))
        .route("/v1/classes", get(classes_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .context("Failed to read listener address")?;
    let app = create_app(state);

    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    info!("API server stopped");
    Ok(())
}
