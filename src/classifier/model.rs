// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classification pipeline: preprocess, forward pass, label lookup

use std::sync::Arc;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use super::backend::ClassifierBackend;
use super::error::ClassifierError;
use super::labels::{ClassLabel, LabelTable};
use crate::vision::{decode_image_bytes, preprocess_image, PreprocessOptions};

/// Result of classifying one image
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Index of the winning output unit
    pub class_index: usize,
    pub class_name: String,
    pub description: String,
    pub prevention: String,
    /// Score of the winning class (0.0-1.0 for softmax outputs)
    pub confidence: f32,
    pub processing_time_ms: u64,
}

/// Image classifier bound to a model backend and a label table
///
/// The backend's output width is checked against the label table once,
/// at construction, so a request can never index past the table.
pub struct Classifier {
    backend: Arc<dyn ClassifierBackend>,
    labels: LabelTable,
    options: PreprocessOptions,
    apply_softmax: bool,
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("model", &self.backend.name())
            .field("classes", &self.labels.len())
            .field("options", &self.options)
            .field("apply_softmax", &self.apply_softmax)
            .finish()
    }
}

impl Classifier {
    /// Create a classifier and validate it with a warm-up forward pass
    pub fn new(
        backend: Arc<dyn ClassifierBackend>,
        labels: LabelTable,
        options: PreprocessOptions,
        apply_softmax: bool,
    ) -> Result<Self, ClassifierError> {
        let started = Instant::now();
        let scores = backend
            .run(options.zeros())
            .map_err(ClassifierError::Inference)?;

        if scores.len() != labels.len() {
            return Err(ClassifierError::LabelMismatch {
                expected: labels.len(),
                actual: scores.len(),
            });
        }

        info!(
            "Classifier warm-up complete: {} classes, input {:?}, {}ms",
            labels.len(),
            options.input_shape(),
            started.elapsed().as_millis()
        );

        Ok(Self {
            backend,
            labels,
            options,
            apply_softmax,
        })
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn model_name(&self) -> String {
        self.backend.name()
    }

    /// Classify raw upload bytes
    pub fn classify_bytes(
        &self,
        bytes: &[u8],
        max_bytes: usize,
    ) -> Result<Classification, ClassifierError> {
        let (image, info) = decode_image_bytes(bytes, max_bytes)?;
        debug!(
            "Decoded image: {}x{}, {:?}, {} bytes",
            info.width, info.height, info.format, info.size_bytes
        );
        self.classify(&image)
    }

    /// Classify a decoded image
    pub fn classify(&self, image: &DynamicImage) -> Result<Classification, ClassifierError> {
        let started = Instant::now();

        let input = preprocess_image(image, &self.options);
        let raw = self.backend.run(input).map_err(ClassifierError::Inference)?;

        let scores = if self.apply_softmax {
            softmax(&raw)
        } else {
            raw
        };

        let (class_index, confidence) = top_class(&scores)?;
        let label: &ClassLabel =
            self.labels
                .get(class_index)
                .ok_or(ClassifierError::LabelMismatch {
                    expected: self.labels.len(),
                    actual: scores.len(),
                })?;

        Ok(Classification {
            class_index,
            class_name: label.name.clone(),
            description: label.description.clone(),
            prevention: label.prevention.clone(),
            confidence,
            processing_time_ms: started.elapsed().as_millis() as u64,
        })
    }
}

/// Index and value of the highest score; ties resolve to the lowest index
pub fn top_class(scores: &[f32]) -> Result<(usize, f32), ClassifierError> {
    if scores.is_empty() {
        return Err(ClassifierError::EmptyOutput);
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(ClassifierError::NonFiniteOutput);
    }

    let mut best = (0, scores[0]);
    for (index, &score) in scores.iter().enumerate().skip(1) {
        if score > best.1 {
            best = (index, score);
        }
    }
    Ok(best)
}

/// Numerically stable softmax
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
