// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod classifier;
pub mod config;
pub mod monitoring;
pub mod version;
pub mod vision;

pub use api::{create_app, serve, AppState};
pub use classifier::{Classification, Classifier, ClassifierBackend, LabelTable, OnnxBackend};
pub use config::{ResponseMode, ServiceConfig};
