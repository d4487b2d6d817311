// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Every setting can come from a command-line flag or an environment
//! variable. `main` loads a `.env` file (if any) before parsing.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::vision::preprocessing::PreprocessOptions;

/// Default upload limit (10MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default model input edge in pixels
pub const DEFAULT_TARGET_SIZE: u32 = 224;

/// Memory layout of the model input tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// [1, H, W, 3] - Keras / TensorFlow exports
    Nhwc,
    /// [1, 3, H, W] - PyTorch exports
    Nchw,
}

/// Interpolation used when resizing uploads to the model input size
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    Lanczos3,
}

impl ResizeFilter {
    pub fn as_filter_type(self) -> image::imageops::FilterType {
        match self {
            ResizeFilter::Nearest => image::imageops::FilterType::Nearest,
            ResizeFilter::Triangle => image::imageops::FilterType::Triangle,
            ResizeFilter::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Shape of the prediction payload returned to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseMode {
    /// Class name, description, prevention and confidence
    Full,
    /// Class name and confidence with placeholder description/prevention
    Stub,
    /// Numeric class index and confidence
    IdOnly,
}

impl ResponseMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseMode::Full => "full",
            ResponseMode::Stub => "stub",
            ResponseMode::IdOnly => "id-only",
        }
    }
}

/// Chili leaf classifier service
#[derive(Parser, Debug, Clone)]
#[command(name = "chili-leaf-classifier")]
#[command(version)]
#[command(about = "HTTP image classification service for chili leaf diseases", long_about = None)]
pub struct ServiceConfig {
    /// Address to bind the HTTP server to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Path to the ONNX classification model
    #[arg(long, env = "MODEL_PATH", default_value = "./model/model.onnx")]
    pub model_path: PathBuf,

    /// Optional JSON label table replacing the built-in chili leaf classes
    #[arg(long, env = "LABELS_PATH")]
    pub labels_path: Option<PathBuf>,

    /// Edge length (pixels) uploads are resized to
    #[arg(long, env = "TARGET_SIZE", default_value_t = DEFAULT_TARGET_SIZE)]
    pub target_size: u32,

    /// Model input tensor layout
    #[arg(long, env = "TENSOR_LAYOUT", value_enum, default_value_t = TensorLayout::Nhwc)]
    pub tensor_layout: TensorLayout,

    /// Resize interpolation
    #[arg(long, env = "RESIZE_FILTER", value_enum, default_value_t = ResizeFilter::Nearest)]
    pub resize_filter: ResizeFilter,

    /// Prediction payload shape
    #[arg(long, env = "RESPONSE_MODE", value_enum, default_value_t = ResponseMode::Full)]
    pub response_mode: ResponseMode,

    /// Apply softmax to raw model outputs (for models exported without one)
    #[arg(long, env = "APPLY_SOFTMAX", default_value_t = false)]
    pub apply_softmax: bool,

    /// Maximum accepted image size in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            model_path: PathBuf::from("./model/model.onnx"),
            labels_path: None,
            target_size: DEFAULT_TARGET_SIZE,
            tensor_layout: TensorLayout::Nhwc,
            resize_filter: ResizeFilter::Nearest,
            response_mode: ResponseMode::Full,
            apply_softmax: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            intra_threads: 4,
        }
    }
}

impl ServiceConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn preprocess_options(&self) -> PreprocessOptions {
        PreprocessOptions {
            target_size: self.target_size,
            layout: self.tensor_layout,
            filter: self.resize_filter,
        }
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.target_size == 0 {
            anyhow::bail!("target_size must be greater than 0");
        }
        if self.max_upload_bytes == 0 {
            anyhow::bail!("max_upload_bytes must be greater than 0");
        }
        if self.intra_threads == 0 {
            anyhow::bail!("intra_threads must be greater than 0");
        }
        Ok(())
    }
}
