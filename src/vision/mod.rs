// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image handling for the classifier
//!
//! - `image_utils` - decoding uploads (raw bytes or base64)
//! - `preprocessing` - resizing and scaling into the model input tensor

pub mod image_utils;
pub mod preprocessing;

pub use image_utils::{
    decode_base64_image, decode_image_bytes, detect_format, ImageError,
    ImageInfo,
};
pub use preprocessing::{preprocess_image, PreprocessOptions};
