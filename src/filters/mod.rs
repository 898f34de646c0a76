//! Grayscale filtering, noise and scoring.
//!
//! ## Data Flow
//!
//! ```text
//! image -> stats (mean, sigma) -> noise (noisy image)
//!       -> convolve (kernel + mirror boundary) -> filtered image
//!       -> metrics (vs. original) -> MSE / RMSE / PSNR
//! ```
//!
//! ## Modules
//!
//! - **stats**: mean, population variance, standard deviation
//! - **kernel**: normalized odd-by-odd weight grids and their validation
//! - **boundary**: mirror extension, lazy queries or an eager padded grid
//! - **noise**: Gaussian noise scaled to the image sigma
//! - **convolve**: correlation of an image with a kernel
//! - **quantize**: clip and truncate float grids back to pixels
//! - **metrics**: MSE, RMSE, PSNR
//!
//! Everything is a pure function of its inputs except noise synthesis,
//! which draws from a caller-supplied random source.

pub mod stats;
pub mod kernel;
pub mod boundary;
pub mod quantize;
pub mod noise;
pub mod convolve;
pub mod metrics;
