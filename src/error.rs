//! Error taxonomy shared by every filter operation.
//!
//! Validation is fail-fast: the operation that detects a broken invariant
//! returns immediately, nothing is retried or silently repaired.

use thiserror::Error;

/// Errors produced by image validation, filtering and scoring.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Ragged rows, mismatched image pair, or even-sized kernel.
    #[error("shape error: {0}")]
    Shape(String),

    /// Kernel weights do not sum to 1.
    #[error("kernel weights sum to {sum}, expected 1")]
    Normalization {
        /// Actual sum of all weights.
        sum: f64,
    },

    /// Kernel weights sum to 0 so they cannot be normalized.
    #[error("kernel weights sum to zero, normalization is undefined")]
    DegenerateKernel,

    /// Boundary-extension query outside the reflected range.
    #[error(
        "boundary overflow at ({row}, {col}) for {rows}x{cols} image with extension radii ({row_radius}, {col_radius})"
    )]
    BoundaryOverflow {
        /// Queried row.
        row: isize,
        /// Queried column.
        col: isize,
        /// Image rows.
        rows: usize,
        /// Image columns.
        cols: usize,
        /// Row extension radius.
        row_radius: usize,
        /// Column extension radius.
        col_radius: usize,
    },

    /// Kernel radius reaches an image dimension, so mirror extension would
    /// reflect past the opposite edge. Raised before any query is made.
    #[error(
        "extension radii ({row_radius}, {col_radius}) must be below image dimensions {rows}x{cols}"
    )]
    ExtensionTooWide {
        /// Image rows.
        rows: usize,
        /// Image columns.
        cols: usize,
        /// Row extension radius.
        row_radius: usize,
        /// Column extension radius.
        col_radius: usize,
    },

    /// Metric is undefined for the given pair (zero RMSE in PSNR, size mismatch).
    #[error("degenerate metric: {0}")]
    DegenerateMetric(String),

    /// Numeric argument outside its valid domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result alias used across the crate.
pub type FilterResult<T> = Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_overflow_message_names_coordinates() {
        let err = FilterError::BoundaryOverflow {
            row: -3,
            col: 1,
            rows: 2,
            cols: 2,
            row_radius: 3,
            col_radius: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("(-3, 1)"));
        assert!(msg.contains("2x2"));
    }

    #[test]
    fn test_extension_too_wide_message_names_radii() {
        let err = FilterError::ExtensionTooWide {
            rows: 1,
            cols: 4,
            row_radius: 1,
            col_radius: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("(1, 1)"));
        assert!(msg.contains("1x4"));
    }

    #[test]
    fn test_normalization_message_reports_sum() {
        let err = FilterError::Normalization { sum: 16.0 };
        assert_eq!(err.to_string(), "kernel weights sum to 16, expected 1");
    }
}
