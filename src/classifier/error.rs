// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::path::PathBuf;

use thiserror::Error;

use crate::vision::ImageError;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("Model file not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("Failed to load model: {0:#}")]
    ModelLoad(anyhow::Error),

    #[error("Inference failed: {0:#}")]
    Inference(anyhow::Error),

    #[error("Model returned an empty output tensor")]
    EmptyOutput,

    #[error("Model output contains non-finite scores")]
    NonFiniteOutput,

    #[error("Model outputs {actual} classes but the label table has {expected}")]
    LabelMismatch { expected: usize, actual: usize },

    #[error("Invalid label table: {0}")]
    InvalidLabels(String),

    #[error("Failed to read label table {}: {source}", .path.display())]
    LabelsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse label table: {0}")]
    LabelsParse(#[from] serde_json::Error),
}
