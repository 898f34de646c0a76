//! FilterStag Rust Extensions
//!
//! Denoising quality evaluation for grayscale images, with Python bindings
//! via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Images are single-channel 8-bit grids of shape (height, width). Rows must
//! all have the same length; this is checked when a `GrayImage` is built.
//!
//! ## Pipeline
//! - **Statistics**: mean, variance, standard deviation
//! - **Noise**: Gaussian noise scaled to a coefficient of the image sigma
//! - **Filtering**: kernel correlation with mirror boundary extension
//! - **Metrics**: MSE, RMSE, PSNR against the clean reference
//!
//! Floating point intermediates are clipped to the intensity range and
//! truncated back to `u8` in one place (`filters::quantize`).

pub mod config;
pub mod error;
pub mod evaluation;
pub mod filters;
pub mod image;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{IntensityRange, MAX_INTENSITY, MAX_NUMBER_OF_INTENSITY_LEVELS, MIN_INTENSITY};
pub use error::{FilterError, FilterResult};
pub use evaluation::{DenoiseExperiment, ExperimentReport};
pub use filters::kernel::FilterKernel;
pub use filters::metrics::QualityScores;
pub use image::GrayImage;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::error::FilterError;
    use crate::filters::boundary as boundary_mod;
    use crate::filters::convolve;
    use crate::filters::kernel::{self as kernel_mod, FilterKernel};
    use crate::filters::metrics;
    use crate::filters::noise as noise_mod;
    use crate::filters::stats;
    use crate::image::GrayImage;

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> Self {
            PyValueError::new_err(err.to_string())
        }
    }

    fn to_image(image: &PyReadonlyArray2<'_, u8>) -> PyResult<GrayImage> {
        Ok(GrayImage::from_array(image.as_array().to_owned())?)
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Arithmetic mean of all pixels.
    #[pyfunction]
    pub fn mean<'py>(image: PyReadonlyArray2<'py, u8>) -> PyResult<f64> {
        Ok(stats::mean(&to_image(&image)?))
    }

    /// Population variance, optionally around a precomputed mean.
    #[pyfunction]
    #[pyo3(signature = (image, mean=None))]
    pub fn variance<'py>(image: PyReadonlyArray2<'py, u8>, mean: Option<f64>) -> PyResult<f64> {
        let img = to_image(&image)?;
        Ok(match mean {
            Some(m) => stats::variance_with_mean(&img, m),
            None => stats::variance(&img),
        })
    }

    /// Standard deviation. A supplied variance wins over a supplied mean.
    #[pyfunction]
    #[pyo3(signature = (image, mean=None, variance=None))]
    pub fn standard_deviation<'py>(
        image: PyReadonlyArray2<'py, u8>,
        mean: Option<f64>,
        variance: Option<f64>,
    ) -> PyResult<f64> {
        if let Some(v) = variance {
            return Ok(stats::standard_deviation_from_variance(v));
        }
        let img = to_image(&image)?;
        Ok(match mean {
            Some(m) => stats::standard_deviation_with_mean(&img, m),
            None => stats::standard_deviation(&img),
        })
    }

    // ========================================================================
    // Noise
    // ========================================================================

    /// Add Gaussian noise with sigma = `std_dev_coef` * image sigma.
    ///
    /// # Arguments
    /// * `image` - 2D grayscale image (u8)
    /// * `std_dev_coef` - Noise scale relative to the image sigma
    /// * `seed` - Random seed, entropy from the OS when omitted
    #[pyfunction]
    #[pyo3(signature = (image, std_dev_coef, seed=None))]
    pub fn add_gaussian_additive_noise<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        std_dev_coef: f64,
        seed: Option<u64>,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let img = to_image(&image)?;
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let result = noise_mod::add_gaussian_additive_noise(&img, std_dev_coef, &mut rng)?;
        Ok(result.into_array().into_pyarray(py))
    }

    // ========================================================================
    // Kernels & Filtering
    // ========================================================================

    /// Normalize raw kernel weights to a unit sum.
    #[pyfunction]
    pub fn create_filter_kernel(weights: Vec<Vec<f64>>) -> PyResult<Vec<Vec<f64>>> {
        Ok(kernel_mod::create_filter_kernel(&weights)?)
    }

    /// Raise ValueError unless the kernel is odd-sized and sums to 1.
    #[pyfunction]
    pub fn validate_filter_kernel(weights: Vec<Vec<f64>>) -> PyResult<()> {
        Ok(kernel_mod::validate_filter_kernel(&weights)?)
    }

    /// Mirror-pad an image for a kernel of the given size.
    #[pyfunction]
    pub fn mirror_pad<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        kernel_rows: usize,
        kernel_cols: usize,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let img = to_image(&image)?;
        let padded = boundary_mod::mirror_pad(&img, (kernel_rows, kernel_cols))?;
        Ok(padded.into_pyarray(py))
    }

    /// Correlate an image with a kernel (weights are normalized first).
    #[pyfunction]
    pub fn linear_spatial_filtering<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        kernel: Vec<Vec<f64>>,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let img = to_image(&image)?;
        let kernel = FilterKernel::new(&kernel)?;
        let result = convolve::linear_spatial_filtering(&img, &kernel)?;
        Ok(result.into_array().into_pyarray(py))
    }

    // ========================================================================
    // Metrics
    // ========================================================================

    #[pyfunction]
    pub fn mse<'py>(
        image1: PyReadonlyArray2<'py, u8>,
        image2: PyReadonlyArray2<'py, u8>,
    ) -> PyResult<f64> {
        Ok(metrics::mse(&to_image(&image1)?, &to_image(&image2)?)?)
    }

    #[pyfunction]
    #[pyo3(signature = (image1, image2, mse=None))]
    pub fn rmse<'py>(
        image1: PyReadonlyArray2<'py, u8>,
        image2: PyReadonlyArray2<'py, u8>,
        mse: Option<f64>,
    ) -> PyResult<f64> {
        match mse {
            Some(m) => Ok(metrics::rmse_from_mse(m)),
            None => Ok(metrics::rmse(&to_image(&image1)?, &to_image(&image2)?)?),
        }
    }

    /// PSNR in dB. Raises ValueError for identical images.
    #[pyfunction]
    #[pyo3(signature = (image1, image2, mse=None, rmse=None))]
    pub fn psnr<'py>(
        image1: PyReadonlyArray2<'py, u8>,
        image2: PyReadonlyArray2<'py, u8>,
        mse: Option<f64>,
        rmse: Option<f64>,
    ) -> PyResult<f64> {
        let value = match (rmse, mse) {
            (Some(r), _) => metrics::psnr_from_rmse(r)?,
            (None, Some(m)) => metrics::psnr_from_mse(m)?,
            (None, None) => metrics::psnr(&to_image(&image1)?, &to_image(&image2)?)?,
        };
        Ok(value)
    }

    /// FilterStag Rust extension module
    #[pymodule]
    pub fn filterstag_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Statistics
        m.add_function(wrap_pyfunction!(mean, m)?)?;
        m.add_function(wrap_pyfunction!(variance, m)?)?;
        m.add_function(wrap_pyfunction!(standard_deviation, m)?)?;

        // Noise
        m.add_function(wrap_pyfunction!(add_gaussian_additive_noise, m)?)?;

        // Kernels & filtering
        m.add_function(wrap_pyfunction!(create_filter_kernel, m)?)?;
        m.add_function(wrap_pyfunction!(validate_filter_kernel, m)?)?;
        m.add_function(wrap_pyfunction!(mirror_pad, m)?)?;
        m.add_function(wrap_pyfunction!(linear_spatial_filtering, m)?)?;

        // Metrics
        m.add_function(wrap_pyfunction!(mse, m)?)?;
        m.add_function(wrap_pyfunction!(rmse, m)?)?;
        m.add_function(wrap_pyfunction!(psnr, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::filterstag_rust;
