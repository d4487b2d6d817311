// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod predict;

pub use errors::{ApiError, ErrorResponse};
pub use handlers::{
    ClassInfo, ClassesResponse, HealthResponse, IndexResponse, INDEX_MESSAGE,
};
pub use http_server::{create_app, serve, AppState};
pub use predict::{
    ClassifyRequest, PredictResponse, PredictionData, FILE_FIELD, STUB_DESCRIPTION,
    STUB_PREVENTION,
};
