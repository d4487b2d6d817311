// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction response types

use serde::{Deserialize, Serialize};

use crate::classifier::Classification;
use crate::config::ResponseMode;

/// Description returned by the stub response mode
pub const STUB_DESCRIPTION: &str = "Description not available.";

/// Prevention text returned by the stub response mode
pub const STUB_PREVENTION: &str = "Prevention advice not available.";

/// Prediction payload, shaped by the configured `ResponseMode`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionData {
    /// `full` and `stub` modes
    Labeled {
        class: String,
        description: String,
        prevention: String,
        confidence: f32,
    },
    /// `id-only` mode: class is the model output index
    IdOnly { class: usize, confidence: f32 },
}

/// Successful prediction: `{"data": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub data: PredictionData,
}

impl PredictResponse {
    pub fn from_classification(classification: &Classification, mode: ResponseMode) -> Self {
        let data = match mode {
            ResponseMode::Full => PredictionData::Labeled {
                class: classification.class_name.clone(),
                description: classification.description.clone(),
                prevention: classification.prevention.clone(),
                confidence: classification.confidence,
            },
            ResponseMode::Stub => PredictionData::Labeled {
                class: classification.class_name.clone(),
                description: STUB_DESCRIPTION.to_string(),
                prevention: STUB_PREVENTION.to_string(),
                confidence: classification.confidence,
            },
            ResponseMode::IdOnly => PredictionData::IdOnly {
                class: classification.class_index,
                confidence: classification.confidence,
            },
        };

        Self { data }
    }
}
