//! Fidelity metrics between a reference image and a processed one.
//!
//! - MSE: mean of squared per-pixel differences
//! - RMSE: square root of MSE
//! - PSNR: `20 * log10((L - 1) / RMSE)`
//!
//! Identical images have RMSE 0, for which PSNR is undefined; the PSNR
//! functions return `FilterError::DegenerateMetric` in that case.
//!
//! The `*_from_*` functions take values computed earlier. They are trusted:
//! nothing checks that a supplied MSE or RMSE belongs to any particular pair.

use ndarray::Zip;
use serde::Serialize;

use crate::config::IntensityRange;
use crate::error::{FilterError, FilterResult};
use crate::image::{validate_images_size_match, GrayImage};

fn ensure_comparable(a: &GrayImage, b: &GrayImage) -> FilterResult<()> {
    validate_images_size_match(a, b).map_err(|e| FilterError::DegenerateMetric(e.to_string()))
}

/// Mean squared error.
///
/// Returns `DegenerateMetric` when the dimensions differ.
pub fn mse(a: &GrayImage, b: &GrayImage) -> FilterResult<f64> {
    ensure_comparable(a, b)?;

    let sum_sq: u64 = Zip::from(a.pixels()).and(b.pixels()).par_fold(
        || 0u64,
        |acc, &x, &y| {
            let d = x as i64 - y as i64;
            acc + (d * d) as u64
        },
        |l, r| l + r,
    );

    Ok(sum_sq as f64 / a.len() as f64)
}

/// Root mean squared error.
pub fn rmse(a: &GrayImage, b: &GrayImage) -> FilterResult<f64> {
    Ok(rmse_from_mse(mse(a, b)?))
}

/// RMSE from a precomputed MSE.
pub fn rmse_from_mse(mse: f64) -> f64 {
    mse.sqrt()
}

/// Peak signal-to-noise ratio in dB, 8-bit peak.
pub fn psnr(a: &GrayImage, b: &GrayImage) -> FilterResult<f64> {
    psnr_from_rmse(rmse(a, b)?)
}

/// PSNR from a precomputed MSE, 8-bit peak.
pub fn psnr_from_mse(mse: f64) -> FilterResult<f64> {
    psnr_from_rmse(rmse_from_mse(mse))
}

/// PSNR from a precomputed RMSE, 8-bit peak.
pub fn psnr_from_rmse(rmse: f64) -> FilterResult<f64> {
    psnr_from_rmse_in_range(rmse, &IntensityRange::default())
}

/// PSNR from a precomputed RMSE with a custom level count.
///
/// # Arguments
/// * `rmse` - Root mean squared error, must be positive
/// * `range` - Supplies L, the number of intensity levels
///
/// # Returns
/// PSNR in dB, `DegenerateMetric` for zero RMSE
pub fn psnr_from_rmse_in_range(rmse: f64, range: &IntensityRange) -> FilterResult<f64> {
    if rmse.is_nan() || rmse < 0.0 {
        return Err(FilterError::InvalidParameter(format!(
            "rmse must be non-negative, got {rmse}"
        )));
    }
    if rmse == 0.0 {
        return Err(FilterError::DegenerateMetric(
            "PSNR is undefined for zero RMSE (identical images)".to_string(),
        ));
    }
    Ok(20.0 * (range.peak() / rmse).log10())
}

/// MSE, RMSE and PSNR for one image pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityScores {
    pub mse: f64,
    pub rmse: f64,
    /// `None` when RMSE is 0.
    pub psnr: Option<f64>,
}

impl QualityScores {
    /// Score `candidate` against `reference`, computing MSE once.
    pub fn compute(reference: &GrayImage, candidate: &GrayImage) -> FilterResult<Self> {
        Self::compute_in_range(reference, candidate, &IntensityRange::default())
    }

    pub fn compute_in_range(
        reference: &GrayImage,
        candidate: &GrayImage,
        range: &IntensityRange,
    ) -> FilterResult<Self> {
        let mse = mse(reference, candidate)?;
        let rmse = rmse_from_mse(mse);
        let psnr = match psnr_from_rmse_in_range(rmse, range) {
            Ok(v) => Some(v),
            Err(FilterError::DegenerateMetric(_)) => None,
            Err(e) => return Err(e),
        };
        Ok(Self { mse, rmse, psnr })
    }
}
