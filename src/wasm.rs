//! WebAssembly exports for FilterStag.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! Images travel as flat row-major `u8` buffers (length = width * height)
//! with explicit dimensions. Kernels travel the same way as `f64` buffers.
//! Errors surface as JavaScript exceptions.

use wasm_bindgen::prelude::*;

use crate::filters::convolve::linear_spatial_filtering;
use crate::filters::kernel::FilterKernel;
use crate::filters::metrics;
use crate::filters::noise::add_gaussian_additive_noise_seeded;
use crate::filters::stats::ImageStatistics;
use crate::image::GrayImage;

fn image_from(data: &[u8], width: usize, height: usize) -> Result<GrayImage, JsError> {
    Ok(GrayImage::from_shape_vec(height, width, data.to_vec())?)
}

fn kernel_from(weights: &[f64], width: usize, height: usize) -> Result<FilterKernel, JsError> {
    if width == 0 || weights.len() != width * height {
        return Err(JsError::new("kernel buffer does not match its dimensions"));
    }
    let rows: Vec<Vec<f64>> = weights.chunks(width).map(|r| r.to_vec()).collect();
    Ok(FilterKernel::new(&rows)?)
}

// ============================================================================
// Statistics
// ============================================================================

/// Mean, variance and standard deviation as `[mean, variance, std]`.
///
/// # Arguments
/// * `data` - Flat array of grayscale bytes (length = width * height)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
#[wasm_bindgen]
pub fn statistics_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<f64>, JsError> {
    let stats = ImageStatistics::compute(&image_from(data, width, height)?);
    Ok(vec![stats.mean, stats.variance, stats.standard_deviation])
}

// ============================================================================
// Noise & Filtering
// ============================================================================

/// Add variance-calibrated Gaussian noise.
///
/// # Arguments
/// * `data` - Flat array of grayscale bytes
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `std_dev_coef` - Noise sigma as a multiple of the image sigma
/// * `seed` - Random seed for deterministic results
///
/// # Returns
/// Flat array of noisy grayscale bytes
#[wasm_bindgen]
pub fn add_gaussian_noise_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    std_dev_coef: f64,
    seed: u64,
) -> Result<Vec<u8>, JsError> {
    let image = image_from(data, width, height)?;
    let result = add_gaussian_additive_noise_seeded(&image, std_dev_coef, seed)?;
    Ok(result.to_vec())
}

/// Correlate with a kernel using mirror boundaries.
///
/// Kernel weights are normalized to a unit sum before use.
#[wasm_bindgen]
pub fn linear_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    kernel: &[f64],
    kernel_width: usize,
    kernel_height: usize,
) -> Result<Vec<u8>, JsError> {
    let image = image_from(data, width, height)?;
    let kernel = kernel_from(kernel, kernel_width, kernel_height)?;
    Ok(linear_spatial_filtering(&image, &kernel)?.to_vec())
}

// ============================================================================
// Metrics
// ============================================================================

/// `[mse, rmse, psnr]`; psnr is `Infinity` for identical images.
#[wasm_bindgen]
pub fn quality_scores_wasm(
    reference: &[u8],
    candidate: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<f64>, JsError> {
    let reference = image_from(reference, width, height)?;
    let candidate = image_from(candidate, width, height)?;
    let scores = metrics::QualityScores::compute(&reference, &candidate)?;
    Ok(vec![
        scores.mse,
        scores.rmse,
        scores.psnr.unwrap_or(f64::INFINITY),
    ])
}
