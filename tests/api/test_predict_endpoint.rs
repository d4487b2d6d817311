// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /predict_image/ tests
//!
//! Upload a leaf image as multipart/form-data and check the payload
//! for each response mode.

use axum::http::StatusCode;
use chili_leaf_classifier::{
    api::{create_app, STUB_DESCRIPTION, STUB_PREVENTION},
    classifier::LabelTable,
    config::ResponseMode,
};
use tower::util::ServiceExt; // for `oneshot`

use super::common::{body_json, png_bytes, test_state, upload_request};

#[tokio::test]
async fn test_full_mode_returns_label_text() {
    let app = create_app(test_state(ResponseMode::Full));

    let response = app
        .oneshot(upload_request("/predict_image/", "file", &png_bytes(64, 48)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let whitefly = LabelTable::chili_leaf().get(3).cloned().unwrap();
    assert_eq!(json["data"]["class"], "Whitefly");
    assert_eq!(json["data"]["description"], whitefly.description.as_str());
    assert_eq!(json["data"]["prevention"], whitefly.prevention.as_str());
    assert_eq!(json["data"]["confidence"], 0.75);
}

#[tokio::test]
async fn test_stub_mode_returns_placeholders() {
    let app = create_app(test_state(ResponseMode::Stub));

    let response = app
        .oneshot(upload_request("/predict_image/", "file", &png_bytes(64, 48)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["class"], "Whitefly");
    assert_eq!(json["data"]["description"], STUB_DESCRIPTION);
    assert_eq!(json["data"]["prevention"], STUB_PREVENTION);
    assert_eq!(json["data"]["confidence"], 0.75);
}

#[tokio::test]
async fn test_id_only_mode_returns_index() {
    let app = create_app(test_state(ResponseMode::IdOnly));

    let response = app
        .oneshot(upload_request("/predict_image/", "file", &png_bytes(64, 48)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["class"], 3);
    assert_eq!(json["data"]["confidence"], 0.75);
    assert!(json["data"].get("description").is_none());
    assert!(json["data"].get("prevention").is_none());
}

#[tokio::test]
async fn test_route_without_trailing_slash() {
    let app = create_app(test_state(ResponseMode::Full));

    let response = app
        .oneshot(upload_request("/predict_image", "file", &png_bytes(16, 16)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_any_image_size_is_accepted() {
    for (width, height) in [(1, 1), (224, 224), (500, 120)] {
        let app = create_app(test_state(ResponseMode::Full));
        let response = app
            .oneshot(upload_request(
                "/predict_image/",
                "file",
                &png_bytes(width, height),
            ))
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::OK,
            "{}x{} upload should classify",
            width,
            height
        );
    }
}

#[tokio::test]
async fn test_successful_prediction_is_counted() {
    let state = test_state(ResponseMode::Full);
    let metrics = state.metrics.clone();
    let app = create_app(state);

    let response = app
        .oneshot(upload_request("/predict_image/", "file", &png_bytes(32, 32)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(metrics.request_count("predict_image", "ok"), 1);
    assert_eq!(metrics.prediction_count("Whitefly"), 1);
}
