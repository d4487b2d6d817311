// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// src/monitoring/metrics.rs - Prometheus metrics for the classification service

use anyhow::{Context, Result};
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

/// Latency buckets (seconds) sized for CPU inference of a 224x224 image
const INFERENCE_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

/// Request outcome label values
pub const OUTCOME_OK: &str = "ok";
pub const OUTCOME_CLIENT_ERROR: &str = "client_error";
pub const OUTCOME_SERVER_ERROR: &str = "server_error";

/// Service metrics kept in a private registry
#[derive(Clone)]
pub struct ServiceMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    inference_duration: Histogram,
    predictions_total: IntCounterVec,
}

impl std::fmt::Debug for ServiceMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceMetrics").finish_non_exhaustive()
    }
}

impl ServiceMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("chili_requests_total", "Classification requests by endpoint and outcome"),
            &["endpoint", "outcome"],
        )
        .context("Failed to create requests counter")?;

        let inference_duration = Histogram::with_opts(
            HistogramOpts::new(
                "chili_inference_duration_seconds",
                "Time spent preprocessing and running the model",
            )
            .buckets(INFERENCE_BUCKETS.to_vec()),
        )
        .context("Failed to create inference histogram")?;

        let predictions_total = IntCounterVec::new(
            Opts::new("chili_predictions_total", "Predictions by class"),
            &["class"],
        )
        .context("Failed to create predictions counter")?;

        registry
            .register(Box::new(requests_total.clone()))
            .context("Failed to register requests counter")?;
        registry
            .register(Box::new(inference_duration.clone()))
            .context("Failed to register inference histogram")?;
        registry
            .register(Box::new(predictions_total.clone()))
            .context("Failed to register predictions counter")?;

        Ok(Self {
            registry,
            requests_total,
            inference_duration,
            predictions_total,
        })
    }

    pub fn record_request(&self, endpoint: &str, outcome: &str) {
        self.requests_total
            .with_label_values(&[endpoint, outcome])
            .inc();
    }

    pub fn observe_inference(&self, seconds: f64) {
        self.inference_duration.observe(seconds);
    }

    pub fn record_prediction(&self, class_name: &str) {
        self.predictions_total.with_label_values(&[class_name]).inc();
    }

    pub fn request_count(&self, endpoint: &str, outcome: &str) -> u64 {
        self.requests_total
            .with_label_values(&[endpoint, outcome])
            .get()
    }

    pub fn prediction_count(&self, class_name: &str) -> u64 {
        self.predictions_total.with_label_values(&[class_name]).get()
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn encode(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .context("Failed to encode metrics")?;
        String::from_utf8(buffer).context("Metrics output is not valid UTF-8")
    }
}
