//! SIMD-accelerated downscaling for previews.
//!
//! Uses fast_image_resize, which picks AVX2/SSE4.1/NEON kernels at runtime.

use crate::error::DecodeError;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbImage;
use std::path::Path;

/// Target size that fits `width x height` inside a `max_dimension` square.
///
/// The longer edge becomes exactly `max_dimension`, the shorter edge is
/// scaled and rounded (never below 1). Images already inside the bound keep
/// their size.
pub fn fit_within(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let long = width.max(height);
    if long <= max_dimension {
        return (width, height);
    }

    let short = width.min(height);
    let scaled = ((short as f64) * (max_dimension as f64) / (long as f64)).round();
    let scaled = (scaled as u32).max(1);

    if width >= height {
        (max_dimension, scaled)
    } else {
        (scaled, max_dimension)
    }
}

/// Reusable RGB resizer with a Lanczos3 convolution
pub struct PreviewResizer {
    resizer: Resizer,
    options: ResizeOptions,
}

impl PreviewResizer {
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3)),
        }
    }

    /// Resize RGB pixels to exactly `width x height`.
    pub fn resize(
        &mut self,
        pixels: &RgbImage,
        width: u32,
        height: u32,
        path: &Path,
    ) -> Result<RgbImage, DecodeError> {
        let resize_error = |reason: String| DecodeError::Resize {
            path: path.to_path_buf(),
            reason,
        };

        if width == 0 || height == 0 {
            return Err(resize_error("Invalid destination dimensions".to_string()));
        }
        if (pixels.width(), pixels.height()) == (width, height) {
            return Ok(pixels.clone());
        }

        let src_image = Image::from_vec_u8(
            pixels.width(),
            pixels.height(),
            pixels.as_raw().clone(),
            PixelType::U8x3,
        )
        .map_err(|e| resize_error(format!("Failed to create source image: {}", e)))?;

        let mut dst_image = Image::new(width, height, PixelType::U8x3);

        self.resizer
            .resize(&src_image, &mut dst_image, &self.options)
            .map_err(|e| resize_error(format!("Resize failed: {}", e)))?;

        RgbImage::from_raw(width, height, dst_image.into_vec())
            .ok_or_else(|| resize_error("Failed to create result buffer".to_string()))
    }
}

impl Default for PreviewResizer {
    fn default() -> Self {
        Self::new()
    }
}
