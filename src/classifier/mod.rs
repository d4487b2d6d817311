// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chili leaf disease classifier
//!
//! Components:
//! - `backend` - model runtime seam and the ONNX Runtime implementation
//! - `labels` - class name / description / prevention table
//! - `model` - preprocessing + forward pass + label lookup
//! - `error` - classifier error type

pub mod backend;
pub mod error;
pub mod labels;
pub mod model;

pub use backend::{ClassifierBackend, OnnxBackend};
pub use error::ClassifierError;
pub use labels::{ClassLabel, LabelTable};
pub use model::{softmax, top_class, Classification, Classifier};
