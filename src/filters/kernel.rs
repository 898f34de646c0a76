//! Filter kernel construction and validation.
//!
//! A `FilterKernel` is an odd-by-odd grid of weights summing to 1, so a unique
//! center cell exists at `(rows / 2, cols / 2)`.
//!
//! ## Functions
//!
//! - `create_filter_kernel`: divide raw weights by their sum (no shape check)
//! - `validate_filter_kernel_size`: odd row count, odd and equal row lengths
//! - `validate_filter_kernel`: size check plus unit-sum check
//!
//! `FilterKernel::new` runs all three; `FilterKernel::from_normalized` only
//! validates and is meant for weights that should already be normalized.

use log::debug;
use ndarray::{Array2, ArrayView2};

use crate::error::{FilterError, FilterResult};

/// Absolute tolerance when validating that a weight sum is 1.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-9;

/// Sums this close to 1 are rounding residue from an earlier division and
/// are not divided again.
const RENORMALIZATION_EPSILON: f64 = 1e-12;

/// Largest side length `FilterKernel::gaussian` will build.
pub const MAX_GAUSSIAN_SIDE: usize = 1025;

fn weight_sum(weights: &[Vec<f64>]) -> f64 {
    weights.iter().map(|row| row.iter().sum::<f64>()).sum()
}

fn is_unit_sum(sum: f64) -> bool {
    (sum - 1.0).abs() <= NORMALIZATION_TOLERANCE
}

fn is_normalized_sum(sum: f64) -> bool {
    (sum - 1.0).abs() <= RENORMALIZATION_EPSILON
}

// ============================================================================
// Construction & Validation
// ============================================================================

/// Normalize raw weights to a unit sum.
///
/// Weights whose sum is already 1 (up to float rounding of an earlier
/// normalization) are returned unchanged, bit for bit, so calling this twice
/// is the same as calling it once. Any larger deviation is divided out, even
/// one `validate_filter_kernel` would still accept.
///
/// # Arguments
/// * `weights` - Raw kernel weights (row-major)
///
/// # Returns
/// Normalized weights, or `FilterError::DegenerateKernel` when the sum is 0
pub fn create_filter_kernel(weights: &[Vec<f64>]) -> FilterResult<Vec<Vec<f64>>> {
    let sum = weight_sum(weights);

    if sum == 0.0 {
        return Err(FilterError::DegenerateKernel);
    }
    if !sum.is_finite() {
        return Err(FilterError::InvalidParameter(format!(
            "kernel weights sum to {sum}"
        )));
    }
    if is_normalized_sum(sum) {
        return Ok(weights.to_vec());
    }

    debug!("normalizing kernel weights by sum {sum}");
    Ok(weights
        .iter()
        .map(|row| row.iter().map(|w| w / sum).collect())
        .collect())
}

/// Reject kernels without a unique center cell.
pub fn validate_filter_kernel_size(weights: &[Vec<f64>]) -> FilterResult<()> {
    let rows = weights.len();
    if rows % 2 == 0 {
        return Err(FilterError::Shape(format!(
            "filter kernel must have an odd row count, got {rows}"
        )));
    }

    let cols = weights[0].len();
    for (i, row) in weights.iter().enumerate() {
        if row.len() != cols {
            return Err(FilterError::Shape(format!(
                "filter kernel row {i} has {} weights, expected {cols}",
                row.len()
            )));
        }
        if row.len() % 2 == 0 {
            return Err(FilterError::Shape(format!(
                "filter kernel row {i} has even length {}",
                row.len()
            )));
        }
    }
    Ok(())
}

/// Shape check followed by a strict unit-sum check.
pub fn validate_filter_kernel(weights: &[Vec<f64>]) -> FilterResult<()> {
    validate_filter_kernel_size(weights)?;

    let sum = weight_sum(weights);
    if !is_unit_sum(sum) {
        return Err(FilterError::Normalization { sum });
    }
    Ok(())
}

// ============================================================================
// FilterKernel
// ============================================================================

/// Validated, normalized kernel. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterKernel {
    weights: Array2<f64>,
}

impl FilterKernel {
    /// Normalize and validate raw weights.
    pub fn new(weights: &[Vec<f64>]) -> FilterResult<Self> {
        validate_filter_kernel_size(weights)?;
        let normalized = create_filter_kernel(weights)?;
        Self::from_normalized(&normalized)
    }

    /// Validate weights that must already sum to 1.
    pub fn from_normalized(weights: &[Vec<f64>]) -> FilterResult<Self> {
        validate_filter_kernel(weights)?;
        let rows = weights.len();
        let cols = weights[0].len();
        let flat: Vec<f64> = weights.iter().flatten().copied().collect();
        let weights = Array2::from_shape_vec((rows, cols), flat)
            .map_err(|e| FilterError::Shape(e.to_string()))?;
        Ok(Self { weights })
    }

    /// 3x3 binomial smoothing kernel `[[1,2,1],[2,4,2],[1,2,1]] / 16`.
    pub fn gaussian_3x3() -> Self {
        Self::from_literal(&[[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]])
    }

    /// Center-heavy 3x3 kernel `[[1,15,1],[15,30,15],[1,15,1]] / 94`.
    pub fn center_weighted_3x3() -> Self {
        Self::from_literal(&[[1.0, 15.0, 1.0], [15.0, 30.0, 15.0], [1.0, 15.0, 1.0]])
    }

    fn from_literal(rows: &[[f64; 3]; 3]) -> Self {
        let sum: f64 = rows.iter().flatten().sum();
        let weights = Array2::from_shape_fn((3, 3), |(r, c)| rows[r][c] / sum);
        Self { weights }
    }

    /// Kernel with a single 1 at the center.
    pub fn identity(rows: usize, cols: usize) -> FilterResult<Self> {
        let mut weights = vec![vec![0.0; cols]; rows];
        if rows > 0 && cols > 0 {
            weights[rows / 2][cols / 2] = 1.0;
        }
        Self::from_normalized(&weights)
    }

    /// Uniform averaging kernel of side `size` (odd).
    pub fn box_filter(size: usize) -> FilterResult<Self> {
        Self::new(&vec![vec![1.0; size]; size])
    }

    /// Sampled 2D Gaussian with side `ceil(6 sigma)` forced odd.
    ///
    /// `sigma <= 0` gives the 1x1 identity kernel. A side above
    /// `MAX_GAUSSIAN_SIDE` is `InvalidParameter`.
    pub fn gaussian(sigma: f64) -> FilterResult<Self> {
        if !sigma.is_finite() {
            return Err(FilterError::InvalidParameter(format!(
                "gaussian sigma must be finite, got {sigma}"
            )));
        }
        if sigma <= 0.0 {
            return Self::identity(1, 1);
        }

        let span = (sigma * 6.0).ceil();
        if span >= MAX_GAUSSIAN_SIDE as f64 {
            return Err(FilterError::InvalidParameter(format!(
                "gaussian sigma {sigma} needs a side above {MAX_GAUSSIAN_SIDE}"
            )));
        }
        let size = (span as usize) | 1;
        let half = (size / 2) as f64;
        let k1d: Vec<f64> = (0..size)
            .map(|i| {
                let x = i as f64 - half;
                (-x * x / (2.0 * sigma * sigma)).exp()
            })
            .collect();

        let weights: Vec<Vec<f64>> = k1d
            .iter()
            .map(|&ky| k1d.iter().map(|&kx| ky * kx).collect())
            .collect();
        Self::new(&weights)
    }

    /// (rows, cols)
    pub fn dim(&self) -> (usize, usize) {
        self.weights.dim()
    }

    /// Center cell, also the extension radii per axis.
    pub fn center(&self) -> (usize, usize) {
        let (rows, cols) = self.dim();
        (rows / 2, cols / 2)
    }

    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }

    pub fn sum(&self) -> f64 {
        self.weights.sum()
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.weights.rows().into_iter().map(|r| r.to_vec()).collect()
    }
}
