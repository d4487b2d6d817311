// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model runtime backends
//!
//! The classifier only needs "tensor in, scores out". `OnnxBackend` runs an
//! exported model with ONNX Runtime on CPU; tests plug in fakes.

use anyhow::{Context, Result};
use ndarray::Array4;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::error::ClassifierError;

/// Forward pass of an image classification network
pub trait ClassifierBackend: Send + Sync {
    /// Run one batch-of-one input tensor, returning the flattened class scores
    fn run(&self, input: Array4<f32>) -> Result<Vec<f32>>;

    /// Human-readable model name for logs and /health
    fn name(&self) -> String;
}

/// ONNX Runtime session for an exported classifier (CPU only)
#[derive(Clone)]
pub struct OnnxBackend {
    session: Arc<Mutex<Session>>,
    input_name: String,
    output_name: String,
    model_name: String,
}

impl std::fmt::Debug for OnnxBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxBackend")
            .field("model_name", &self.model_name)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

impl OnnxBackend {
    /// Load a model from an `.onnx` file
    ///
    /// # Errors
    /// - `ModelNotFound` if the file does not exist
    /// - `ModelLoad` if ONNX Runtime rejects the file or the session options
    pub fn load<P: AsRef<Path>>(model_path: P, intra_threads: usize) -> Result<Self, ClassifierError> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            return Err(ClassifierError::ModelNotFound(model_path.to_path_buf()));
        }

        info!("Loading classification model from {}", model_path.display());

        let session = Self::build_session(model_path, intra_threads)
            .map_err(ClassifierError::ModelLoad)?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| ClassifierError::ModelLoad(anyhow::anyhow!("model declares no inputs")))?;

        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| ClassifierError::ModelLoad(anyhow::anyhow!("model declares no outputs")))?;

        if let Some(input) = session.inputs.first() {
            debug!("Classifier expected input: {:?}", input.input_type);
        }

        let model_name = model_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());

        info!(
            "✅ Classification model loaded (CPU-only) - input: {}, output: {}",
            input_name, output_name
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            output_name,
            model_name,
        })
    }

    fn build_session(model_path: &Path, intra_threads: usize) -> Result<Session> {
        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load classification model from {}",
                model_path.display()
            ))?;
        Ok(session)
    }
}

impl ClassifierBackend for OnnxBackend {
    fn run(&self, input: Array4<f32>) -> Result<Vec<f32>> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("model session lock poisoned"))?;

        let input_value = Value::from_array(input).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .context("Classification inference failed")?;

        let scores = outputs[self.output_name.as_str()]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        debug!("Classifier output shape: {:?}", scores.shape());

        Ok(scores.iter().copied().collect())
    }

    fn name(&self) -> String {
        self.model_name.clone()
    }
}
