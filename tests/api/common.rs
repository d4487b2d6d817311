// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared helpers for API tests

use std::io::Cursor;
use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response};
use chili_leaf_classifier::{
    api::AppState,
    classifier::{Classifier, LabelTable},
    config::ResponseMode,
    monitoring::ServiceMetrics,
    vision::PreprocessOptions,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::common::MockBackend;

pub const BOUNDARY: &str = "chili-test-boundary";

/// Whitefly (index 3) wins with 0.75
pub const WHITEFLY_SCORES: [f32; 5] = [0.0625, 0.125, 0.0625, 0.75, 0.0];

/// Backend that always returns `scores`
pub fn scoring_backend(scores: Vec<f32>) -> MockBackend {
    let mut backend = MockBackend::new();
    backend
        .expect_run()
        .returning(move |_| Ok(scores.clone()));
    backend
        .expect_name()
        .returning(|| "mock-model.onnx".to_string());
    backend
}

/// Backend that passes warm-up and then fails every request
pub fn failing_backend() -> MockBackend {
    let mut backend = MockBackend::new();
    backend
        .expect_run()
        .times(1)
        .returning(|_| Ok(WHITEFLY_SCORES.to_vec()));
    backend
        .expect_run()
        .returning(|_| Err(anyhow::anyhow!("session run failed")));
    backend
        .expect_name()
        .returning(|| "mock-model.onnx".to_string());
    backend
}

pub fn state_with_backend(
    backend: MockBackend,
    mode: ResponseMode,
    max_upload_bytes: usize,
) -> AppState {
    let classifier = Classifier::new(
        Arc::new(backend),
        LabelTable::chili_leaf(),
        PreprocessOptions::default(),
        false,
    )
    .expect("mock classifier should build");

    AppState::new(
        Arc::new(classifier),
        mode,
        max_upload_bytes,
        Arc::new(ServiceMetrics::new().expect("metrics")),
    )
}

pub fn test_state(mode: ResponseMode) -> AppState {
    state_with_backend(
        scoring_backend(WHITEFLY_SCORES.to_vec()),
        mode,
        1024 * 1024,
    )
}

/// A small PNG with a colour gradient
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, 140, (y % 256) as u8])
    }));
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .expect("encode png");
    buf.into_inner()
}

/// A PNG of pseudo-random pixels; does not compress well
pub fn noisy_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut seed: u32 = 0x2545_f491;
    let image = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (seed >> 24) as u8
        };
        Rgb([next(), next(), next()])
    }));
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .expect("encode png");
    buf.into_inner()
}

/// Single-part multipart/form-data body
pub fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(uri: &str, field: &str, content: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field, "leaf.png", content)))
        .unwrap()
}

pub fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}
