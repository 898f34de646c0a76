//! First and second order intensity statistics.
//!
//! Population statistics over all N x M samples. The `*_with_*` variants take
//! values the caller already computed; they are trusted as-is.

use crate::image::GrayImage;

/// Arithmetic mean of all samples.
pub fn mean(image: &GrayImage) -> f64 {
    let sum: u64 = image.pixels().iter().map(|&v| v as u64).sum();
    sum as f64 / image.len() as f64
}

/// Population variance (divides by N x M).
pub fn variance(image: &GrayImage) -> f64 {
    variance_with_mean(image, mean(image))
}

/// Population variance around a precomputed mean.
pub fn variance_with_mean(image: &GrayImage, mean: f64) -> f64 {
    let sum_sq: f64 = image
        .pixels()
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum();
    sum_sq / image.len() as f64
}

/// Standard deviation, computing mean and variance.
pub fn standard_deviation(image: &GrayImage) -> f64 {
    variance(image).sqrt()
}

/// Standard deviation around a precomputed mean.
pub fn standard_deviation_with_mean(image: &GrayImage, mean: f64) -> f64 {
    variance_with_mean(image, mean).sqrt()
}

/// Standard deviation from a precomputed variance.
pub fn standard_deviation_from_variance(variance: f64) -> f64 {
    variance.sqrt()
}

/// Baseline statistics reported for an image.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ImageStatistics {
    pub mean: f64,
    pub variance: f64,
    pub standard_deviation: f64,
}

impl ImageStatistics {
    /// Compute mean, variance and standard deviation, reusing each step.
    pub fn compute(image: &GrayImage) -> Self {
        let mean = mean(image);
        let variance = variance_with_mean(image, mean);
        Self {
            mean,
            variance,
            standard_deviation: standard_deviation_from_variance(variance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> GrayImage {
        GrayImage::from_rows(&[vec![0, 2, 4], vec![6, 8, 10]]).unwrap()
    }

    #[test]
    fn test_mean_of_ramp() {
        assert_relative_eq!(mean(&ramp()), 5.0);
    }

    #[test]
    fn test_variance_is_population() {
        // deviations -5,-3,-1,1,3,5 -> squares sum 70, / 6
        assert_relative_eq!(variance(&ramp()), 70.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_uniform_image_has_zero_spread() {
        let img = GrayImage::filled(4, 7, 42).unwrap();
        assert_eq!(mean(&img), 42.0);
        assert_eq!(variance(&img), 0.0);
        assert_eq!(standard_deviation(&img), 0.0);
    }

    #[test]
    fn test_std_is_sqrt_of_variance() {
        let img = ramp();
        assert_relative_eq!(standard_deviation(&img), variance(&img).sqrt());
        assert!(variance(&img) >= 0.0);
    }

    #[test]
    fn test_precomputed_inputs_are_trusted() {
        let img = ramp();
        // A wrong mean shifts the variance; nothing re-validates it.
        assert_relative_eq!(variance_with_mean(&img, 0.0), 220.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(standard_deviation_from_variance(9.0), 3.0);
    }

    #[test]
    fn test_statistics_summary_matches_individual_calls() {
        let img = ramp();
        let stats = ImageStatistics::compute(&img);
        assert_relative_eq!(stats.mean, mean(&img));
        assert_relative_eq!(stats.variance, variance(&img));
        assert_relative_eq!(stats.standard_deviation, standard_deviation(&img));
    }

    #[test]
    fn test_single_pixel() {
        let img = GrayImage::filled(1, 1, 255).unwrap();
        assert_eq!(mean(&img), 255.0);
        assert_eq!(variance(&img), 0.0);
    }
}
