//! Linear spatial filtering with mirror boundary extension.
//!
//! Each output pixel is the weighted sum of its neighbourhood:
//!
//! `out[i][j] = sum_{s=-a..a} sum_{t=-b..b} kernel[a+s][b+t] * ext(i+s, j+t)`
//!
//! with `(a, b)` the kernel center. This is correlation: the kernel is not
//! flipped, `kernel[a+s][b+t]` pairs with source offset `(s, t)`.
//!
//! Rows are processed in parallel with rayon; there is no cross-pixel state.

use log::debug;
use ndarray::{Array2, Axis};
use rayon::prelude::*;

use super::boundary::MirrorExtension;
use super::kernel::FilterKernel;
use super::quantize::convert_to_proper_image;
use crate::config::IntensityRange;
use crate::error::FilterResult;
use crate::image::GrayImage;

/// Raw correlation sums before re-quantization.
///
/// # Arguments
/// * `image` - Source image
/// * `kernel` - Validated kernel
///
/// # Returns
/// Grid of the same dimensions as `image`, or `ExtensionTooWide` when a
/// kernel radius reaches the image dimension
pub fn correlate(image: &GrayImage, kernel: &FilterKernel) -> FilterResult<Array2<f64>> {
    let extension = MirrorExtension::new(image, kernel.dim());
    extension.check_reach()?;

    let (a, b) = kernel.center();
    let weights = kernel.weights();
    let (height, width) = image.dim();
    let mut output = Array2::<f64>::zeros((height, width));

    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .try_for_each(|(i, mut row)| -> FilterResult<()> {
            for j in 0..width {
                let mut sum = 0.0f64;
                for ((ki, kj), &w) in weights.indexed_iter() {
                    let si = i as isize + ki as isize - a as isize;
                    let sj = j as isize + kj as isize - b as isize;
                    sum += w * extension.get(si, sj)? as f64;
                }
                row[j] = sum;
            }
            Ok(())
        })?;

    Ok(output)
}

/// Filter an 8-bit image with `kernel`.
///
/// # Arguments
/// * `image` - Source image
/// * `kernel` - Validated, normalized kernel
///
/// # Returns
/// Filtered image with identical dimensions
pub fn linear_spatial_filtering(image: &GrayImage, kernel: &FilterKernel) -> FilterResult<GrayImage> {
    linear_spatial_filtering_in_range(image, kernel, &IntensityRange::default())
}

/// Filter and quantize to a custom intensity range.
pub fn linear_spatial_filtering_in_range(
    image: &GrayImage,
    kernel: &FilterKernel,
    range: &IntensityRange,
) -> FilterResult<GrayImage> {
    let (kr, kc) = kernel.dim();
    debug!(
        "filtering {}x{} image with {kr}x{kc} kernel",
        image.rows(),
        image.cols()
    );

    let sums = correlate(image, kernel)?;
    convert_to_proper_image(&sums, range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;

    fn grid3() -> GrayImage {
        GrayImage::from_rows(&[vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]).unwrap()
    }

    #[test]
    fn test_identity_kernel_is_noop() {
        let img = GrayImage::from_rows(&[
            vec![0, 17, 255, 3],
            vec![90, 91, 92, 93],
            vec![250, 1, 2, 128],
        ])
        .unwrap();
        let kernel = FilterKernel::identity(3, 3).unwrap();
        assert_eq!(linear_spatial_filtering(&img, &kernel).unwrap(), img);
    }

    #[test]
    fn test_binomial_on_uniform_image() {
        let img = GrayImage::filled(5, 5, 10).unwrap();
        let kernel = FilterKernel::new(&[
            vec![1.0, 2.0, 1.0],
            vec![2.0, 4.0, 2.0],
            vec![1.0, 2.0, 1.0],
        ])
        .unwrap();
        let out = linear_spatial_filtering(&img, &kernel).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_binomial_hand_computed() {
        let out = linear_spatial_filtering(&grid3(), &FilterKernel::gaussian_3x3()).unwrap();
        // center: 80 / 16
        assert_eq!(out[(1, 1)], 5);
        // corner mirrors row/col 1: 48 / 16
        assert_eq!(out[(0, 0)], 3);
        assert_eq!(out.dim(), (3, 3));
    }

    #[test]
    fn test_correlation_does_not_flip_kernel() {
        // weight at (1, 0) pairs with source offset (0, -1)
        let kernel = FilterKernel::from_normalized(&[
            vec![0.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ])
        .unwrap();
        let img = GrayImage::from_rows(&[
            vec![10, 20, 30, 40],
            vec![50, 60, 70, 80],
            vec![90, 100, 110, 120],
        ])
        .unwrap();
        let out = linear_spatial_filtering(&img, &kernel).unwrap();
        assert_eq!(out.to_rows()[0], vec![20, 10, 20, 30]);
        assert_eq!(out.to_rows()[2], vec![100, 90, 100, 110]);
    }

    #[test]
    fn test_oversized_kernel_fails_before_filtering() {
        let img = GrayImage::from_rows(&[vec![1, 2], vec![3, 4]]).unwrap();
        let kernel = FilterKernel::box_filter(5).unwrap();
        assert!(matches!(
            linear_spatial_filtering(&img, &kernel),
            Err(FilterError::ExtensionTooWide { .. })
        ));
    }

    #[test]
    fn test_single_row_with_horizontal_kernel() {
        let img = GrayImage::from_rows(&[vec![0, 16, 32, 48]]).unwrap();
        let kernel = FilterKernel::new(&[vec![1.0, 2.0, 1.0]]).unwrap();
        let out = linear_spatial_filtering(&img, &kernel).unwrap();
        // j=0: (16 + 0 + 16) / 4 = 8, j=3: (32 + 96 + 32) / 4 = 40
        assert_eq!(out.to_rows(), vec![vec![8, 16, 32, 40]]);
    }

    #[test]
    fn test_correlate_returns_unquantized_sums() {
        let img = GrayImage::from_rows(&[vec![1, 2, 3]]).unwrap();
        let kernel = FilterKernel::new(&[vec![1.0, 1.0, 2.0]]).unwrap();
        let sums = correlate(&img, &kernel).unwrap();
        // j=0: (2 + 1 + 2*2) / 4
        assert_eq!(sums[[0, 0]], 1.75);
    }
}
