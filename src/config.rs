//! Intensity range configuration.
//!
//! Quantization bounds and the number of intensity levels used by PSNR.
//! The default is standard 8-bit grayscale.

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};

/// Lowest valid pixel intensity for 8-bit grayscale.
pub const MIN_INTENSITY: u8 = 0;
/// Highest valid pixel intensity for 8-bit grayscale.
pub const MAX_INTENSITY: u8 = 255;
/// Number of intensity levels (L) for 8-bit grayscale.
pub const MAX_NUMBER_OF_INTENSITY_LEVELS: u32 = 256;

/// Quantization bounds plus the level count used for peak signal.
///
/// Missing fields in a deserialized document fall back to the 8-bit default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntensityRange {
    pub min: u8,
    pub max: u8,
    pub levels: u32,
}

impl Default for IntensityRange {
    fn default() -> Self {
        Self {
            min: MIN_INTENSITY,
            max: MAX_INTENSITY,
            levels: MAX_NUMBER_OF_INTENSITY_LEVELS,
        }
    }
}

impl IntensityRange {
    /// Create a validated range.
    ///
    /// # Arguments
    /// * `min` - Lowest intensity kept after clipping
    /// * `max` - Highest intensity kept after clipping, must exceed `min`
    /// * `levels` - Number of intensity levels L, at least 2
    pub fn new(min: u8, max: u8, levels: u32) -> FilterResult<Self> {
        let range = Self { min, max, levels };
        range.validate()?;
        Ok(range)
    }

    /// Check a range that may have come from deserialization.
    pub fn validate(&self) -> FilterResult<()> {
        if self.min >= self.max {
            return Err(FilterError::InvalidParameter(format!(
                "intensity range min {} must be below max {}",
                self.min, self.max
            )));
        }
        if self.levels < 2 {
            return Err(FilterError::InvalidParameter(format!(
                "intensity levels must be at least 2, got {}",
                self.levels
            )));
        }
        Ok(())
    }

    /// Peak signal value (L - 1) used by PSNR.
    pub fn peak(&self) -> f64 {
        (self.levels - 1) as f64
    }
}
