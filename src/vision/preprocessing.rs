// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the leaf classifier
//!
//! Mirrors what the Keras training pipeline fed the network:
//! RGB, exact resize to a square input, pixel values scaled into [0, 1],
//! batch dimension of one.

use image::{imageops, DynamicImage};
use ndarray::Array4;

use crate::config::{ResizeFilter, TensorLayout, DEFAULT_TARGET_SIZE};

/// Pixel scale applied to every channel (img_to_array(img) / 255.0)
pub const PIXEL_SCALE: f32 = 1.0 / 255.0;

/// Tensor-shaping knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessOptions {
    /// Square edge in pixels
    pub target_size: u32,
    pub layout: TensorLayout,
    pub filter: ResizeFilter,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            layout: TensorLayout::Nhwc,
            filter: ResizeFilter::Nearest,
        }
    }
}

impl PreprocessOptions {
    /// Shape of the tensor produced by `preprocess_image`
    pub fn input_shape(&self) -> [usize; 4] {
        let size = self.target_size as usize;
        match self.layout {
            TensorLayout::Nhwc => [1, size, size, 3],
            TensorLayout::Nchw => [1, 3, size, size],
        }
    }

    /// All-zero tensor of the model input shape, used for warm-up runs
    pub fn zeros(&self) -> Array4<f32> {
        let [n, a, b, c] = self.input_shape();
        Array4::zeros((n, a, b, c))
    }
}

/// Preprocess an image into a model input tensor
///
/// Steps:
/// 1. Convert to 8-bit RGB (alpha dropped, grayscale expanded)
/// 2. Resize exactly to target_size x target_size (aspect ratio not kept)
/// 3. Scale to [0, 1]
/// 4. Lay out as NHWC [1, H, W, 3] or NCHW [1, 3, H, W]
pub fn preprocess_image(image: &DynamicImage, options: &PreprocessOptions) -> Array4<f32> {
    let size = options.target_size;
    let rgb = image.to_rgb8();
    let rgb = if rgb.dimensions() == (size, size) {
        rgb
    } else {
        imageops::resize(&rgb, size, size, options.filter.as_filter_type())
    };

    let mut tensor = options.zeros();

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for c in 0..3 {
            let value = pixel[c] as f32 * PIXEL_SCALE;
            match options.layout {
                TensorLayout::Nhwc => tensor[[0, y, x, c]] = value,
                TensorLayout::Nchw => tensor[[0, c, y, x]] = value,
            }
        }
    }

    tensor
}
