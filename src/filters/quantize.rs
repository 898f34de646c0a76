//! Re-quantization of floating point intermediates back into images.

use ndarray::Array2;

use crate::config::IntensityRange;
use crate::error::FilterResult;
use crate::image::GrayImage;

/// Clip to `[range.min, range.max]` and truncate to `u8`.
///
/// This is the only place where noise sums and convolution sums become
/// pixels again. NaN samples clip to `range.min`.
///
/// # Arguments
/// * `values` - Floating point grid, any magnitude
/// * `range` - Quantization bounds
///
/// # Returns
/// Image with identical dimensions
pub fn convert_to_proper_image(values: &Array2<f64>, range: &IntensityRange) -> FilterResult<GrayImage> {
    let lo = range.min as f64;
    let hi = range.max as f64;
    GrayImage::from_array(values.mapv(|v| quantize(v, lo, hi)))
}

#[inline]
fn quantize(v: f64, lo: f64, hi: f64) -> u8 {
    if v.is_nan() {
        return lo as u8;
    }
    v.clamp(lo, hi) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_clips_and_truncates() {
        let values = array![[-12.5, 0.0, 0.9], [127.99, 255.0, 300.0]];
        let img = convert_to_proper_image(&values, &IntensityRange::default()).unwrap();
        assert_eq!(img.to_rows(), vec![vec![0, 0, 0], vec![127, 255, 255]]);
    }

    #[test]
    fn test_integer_values_pass_through() {
        let values = array![[10.0, 20.0], [30.0, 40.0]];
        let img = convert_to_proper_image(&values, &IntensityRange::default()).unwrap();
        assert_eq!(img.to_rows(), vec![vec![10, 20], vec![30, 40]]);
    }

    #[test]
    fn test_custom_range() {
        let range = IntensityRange::new(16, 235, 256).unwrap();
        let values = array![[0.0, 100.5, 250.0]];
        let img = convert_to_proper_image(&values, &range).unwrap();
        assert_eq!(img.to_rows(), vec![vec![16, 100, 235]]);
    }

    #[test]
    fn test_nan_goes_to_minimum() {
        let values = array![[f64::NAN]];
        let img = convert_to_proper_image(&values, &IntensityRange::default()).unwrap();
        assert_eq!(img[(0, 0)], 0);
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        let values = Array2::<f64>::zeros((0, 3));
        assert!(convert_to_proper_image(&values, &IntensityRange::default()).is_err());
    }
}
