// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use chili_leaf_classifier::{
    api::{serve, AppState},
    classifier::{Classifier, LabelTable, OnnxBackend},
    config::ServiceConfig,
    monitoring::ServiceMetrics,
    version,
};
use clap::Parser;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::parse();
    config.validate().context("Invalid configuration")?;

    println!("🌶️  Starting chili leaf classifier...\n");
    println!("📦 {}", version::get_version_string());
    println!("📦 BUILD VERSION: {}", version::VERSION);
    println!();

    let labels = match &config.labels_path {
        Some(path) => LabelTable::from_json_file(path)
            .with_context(|| format!("Failed to load labels from {}", path.display()))?,
        None => LabelTable::chili_leaf(),
    };
    info!("Loaded {} classes: {:?}", labels.len(), labels.names());

    println!("🧠 Loading model from {}...", config.model_path.display());
    let backend = OnnxBackend::load(&config.model_path, config.intra_threads)
        .with_context(|| format!("Failed to load model {}", config.model_path.display()))?;

    let classifier = Classifier::new(
        Arc::new(backend),
        labels,
        config.preprocess_options(),
        config.apply_softmax,
    )
    .context("Model does not match the label table")?;
    println!("✅ Model ready");

    let metrics = Arc::new(ServiceMetrics::new().context("Failed to register metrics")?);
    let state = AppState::new(
        Arc::new(classifier),
        config.response_mode,
        config.max_upload_bytes,
        metrics,
    );

    let listener = TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr()))?;

    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("Endpoints:");
    println!("  Predict:   POST http://localhost:{}/predict_image/", config.port);
    println!("  Classify:  POST http://localhost:{}/v1/classify", config.port);
    println!("  Classes:   GET  http://localhost:{}/v1/classes", config.port);
    println!("  Health:    GET  http://localhost:{}/health", config.port);
    println!("  Metrics:   GET  http://localhost:{}/metrics", config.port);
    println!("\nTest with curl:");
    println!(
        "  curl -X POST http://localhost:{}/predict_image/ -F 'file=@leaf.jpg'",
        config.port
    );
    println!("\nResponse mode: {}", config.response_mode.as_str());
    println!("Press Ctrl+C to shutdown...");
    println!("{}\n", separator);

    serve(listener, state, shutdown_signal()).await?;

    println!("👋 Goodbye!");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    println!("\n⏹️  Shutting down...");
}
