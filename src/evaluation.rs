//! Denoising experiment over a single image.
//!
//! Runs the full pipeline in memory: baseline statistics, one noisy image per
//! noise coefficient, every kernel applied to every noisy image, and quality
//! scores of each result against the clean input. No file I/O happens here;
//! saving images and printing scores is left to the caller.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::IntensityRange;
use crate::error::{FilterError, FilterResult};
use crate::filters::boundary::MirrorExtension;
use crate::filters::convolve::linear_spatial_filtering_in_range;
use crate::filters::kernel::FilterKernel;
use crate::filters::metrics::QualityScores;
use crate::filters::noise::add_gaussian_additive_noise_in_range;
use crate::filters::stats::ImageStatistics;
use crate::image::GrayImage;

/// Noise levels and kernels to evaluate.
#[derive(Debug, Clone)]
pub struct DenoiseExperiment {
    pub std_dev_coefs: Vec<f64>,
    pub kernels: Vec<FilterKernel>,
    pub seed: u64,
    pub range: IntensityRange,
}

impl Default for DenoiseExperiment {
    fn default() -> Self {
        Self {
            std_dev_coefs: vec![0.2, 0.3],
            kernels: vec![
                FilterKernel::gaussian_3x3(),
                FilterKernel::center_weighted_3x3(),
            ],
            seed: 0,
            range: IntensityRange::default(),
        }
    }
}

/// A noisy copy of the input and how far it is from the original.
#[derive(Debug, Clone)]
pub struct NoisyVariant {
    pub std_dev_coef: f64,
    pub image: GrayImage,
    pub scores: QualityScores,
}

/// One kernel applied to one noisy variant.
#[derive(Debug, Clone)]
pub struct FilteredResult {
    pub kernel_index: usize,
    pub noisy_index: usize,
    pub image: GrayImage,
    pub scores: QualityScores,
}

/// Flattened score row for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRow {
    pub kernel: usize,
    pub noisy: usize,
    pub std_dev_coef: f64,
    pub mse: f64,
    pub rmse: f64,
    pub psnr: Option<f64>,
}

/// Everything produced by `DenoiseExperiment::run`.
#[derive(Debug, Clone)]
pub struct ExperimentReport {
    pub baseline: ImageStatistics,
    pub noisy: Vec<NoisyVariant>,
    /// Indexed `[kernel][noisy]`.
    pub filtered: Vec<Vec<FilteredResult>>,
}

impl DenoiseExperiment {
    pub fn with_std_dev_coefs(mut self, coefs: Vec<f64>) -> Self {
        self.std_dev_coefs = coefs;
        self
    }

    pub fn with_kernels(mut self, kernels: Vec<FilterKernel>) -> Self {
        self.kernels = kernels;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_range(mut self, range: IntensityRange) -> Self {
        self.range = range;
        self
    }

    /// Reject bad parameters before any pixel work starts.
    pub fn validate(&self, image: &GrayImage) -> FilterResult<()> {
        self.range.validate()?;
        for &coef in &self.std_dev_coefs {
            if !coef.is_finite() || coef < 0.0 {
                return Err(FilterError::InvalidParameter(format!(
                    "noise coefficient must be finite and non-negative, got {coef}"
                )));
            }
        }
        for kernel in &self.kernels {
            MirrorExtension::new(image, kernel.dim()).check_reach()?;
        }
        Ok(())
    }

    /// Run with a generator seeded from `self.seed`.
    pub fn run(&self, image: &GrayImage) -> FilterResult<ExperimentReport> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.run_with_rng(image, &mut rng)
    }

    /// Run drawing noise from `rng`, one noisy image per coefficient in order.
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        image: &GrayImage,
        rng: &mut R,
    ) -> FilterResult<ExperimentReport> {
        self.validate(image)?;

        let baseline = ImageStatistics::compute(image);
        debug!(
            "baseline: mean={:.3}, variance={:.3}, std={:.3}",
            baseline.mean, baseline.variance, baseline.standard_deviation
        );

        let mut noisy = Vec::with_capacity(self.std_dev_coefs.len());
        for &coef in &self.std_dev_coefs {
            let noisy_image = add_gaussian_additive_noise_in_range(image, coef, &self.range, rng)?;
            let scores = QualityScores::compute_in_range(image, &noisy_image, &self.range)?;
            noisy.push(NoisyVariant {
                std_dev_coef: coef,
                image: noisy_image,
                scores,
            });
        }

        let mut filtered = Vec::with_capacity(self.kernels.len());
        for (kernel_index, kernel) in self.kernels.iter().enumerate() {
            let mut per_kernel = Vec::with_capacity(noisy.len());
            for (noisy_index, variant) in noisy.iter().enumerate() {
                let out = linear_spatial_filtering_in_range(&variant.image, kernel, &self.range)?;
                let scores = QualityScores::compute_in_range(image, &out, &self.range)?;
                if scores.psnr.is_none() {
                    warn!("kernel {kernel_index} restored noisy image {noisy_index} exactly, PSNR undefined");
                }
                per_kernel.push(FilteredResult {
                    kernel_index,
                    noisy_index,
                    image: out,
                    scores,
                });
            }
            filtered.push(per_kernel);
        }

        Ok(ExperimentReport {
            baseline,
            noisy,
            filtered,
        })
    }
}

impl ExperimentReport {
    /// Scores of every filtered image, kernel-major.
    pub fn score_table(&self) -> Vec<ScoreRow> {
        self.filtered
            .iter()
            .flatten()
            .map(|r| ScoreRow {
                kernel: r.kernel_index,
                noisy: r.noisy_index,
                std_dev_coef: self.noisy[r.noisy_index].std_dev_coef,
                mse: r.scores.mse,
                rmse: r.scores.rmse,
                psnr: r.scores.psnr,
            })
            .collect()
    }

    /// Kernel with the lowest RMSE for a given noise level.
    pub fn best_kernel_for(&self, noisy_index: usize) -> Option<usize> {
        self.filtered
            .iter()
            .filter_map(|per_kernel| per_kernel.get(noisy_index))
            .min_by(|a, b| a.scores.rmse.total_cmp(&b.scores.rmse))
            .map(|r| r.kernel_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured() -> GrayImage {
        let rows: Vec<Vec<u8>> = (0..24)
            .map(|i| (0..24).map(|j| (60 + 4 * ((i * 3 + j * 5) % 32)) as u8).collect())
            .collect();
        GrayImage::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_default_matches_lab_setup() {
        let exp = DenoiseExperiment::default();
        assert_eq!(exp.std_dev_coefs, vec![0.2, 0.3]);
        assert_eq!(exp.kernels.len(), 2);
    }

    #[test]
    fn test_report_shape() {
        let report = DenoiseExperiment::default().with_seed(11).run(&textured()).unwrap();
        assert_eq!(report.noisy.len(), 2);
        assert_eq!(report.filtered.len(), 2);
        assert!(report.filtered.iter().all(|k| k.len() == 2));
        assert_eq!(report.score_table().len(), 4);
        assert_eq!(report.filtered[1][0].kernel_index, 1);
        assert_eq!(report.filtered[1][0].noisy_index, 0);
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let img = textured();
        let a = DenoiseExperiment::default().with_seed(3).run(&img).unwrap();
        let b = DenoiseExperiment::default().with_seed(3).run(&img).unwrap();
        assert_eq!(a.noisy[1].image, b.noisy[1].image);
        assert_eq!(a.filtered[0][1].image, b.filtered[0][1].image);
    }

    #[test]
    fn test_invalid_coefficient_rejected_up_front() {
        let exp = DenoiseExperiment::default().with_std_dev_coefs(vec![0.1, -1.0]);
        assert!(matches!(
            exp.run(&textured()),
            Err(FilterError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_oversized_kernel_rejected_up_front() {
        let img = GrayImage::filled(1, 4, 100).unwrap();
        let exp = DenoiseExperiment::default();
        assert!(matches!(
            exp.run(&img),
            Err(FilterError::ExtensionTooWide { .. })
        ));
    }

    #[test]
    fn test_zero_noise_identity_kernel_has_undefined_psnr() {
        let exp = DenoiseExperiment::default()
            .with_std_dev_coefs(vec![0.0])
            .with_kernels(vec![FilterKernel::identity(3, 3).unwrap()]);
        let report = exp.run(&textured()).unwrap();
        assert_eq!(report.filtered[0][0].scores.mse, 0.0);
        assert_eq!(report.filtered[0][0].scores.psnr, None);
    }

    #[test]
    fn test_best_kernel_out_of_range() {
        let report = DenoiseExperiment::default().run(&textured()).unwrap();
        assert!(report.best_kernel_for(0).is_some());
        assert_eq!(report.best_kernel_for(5), None);
    }
}
