//! Grayscale image model.
//!
//! A `GrayImage` is an N x M grid of 8-bit intensities (N rows, M columns,
//! both at least 1). Rectangularity is checked once at construction; every
//! transformation in the crate returns a new image instead of mutating one.

use std::ops::Index;

use ndarray::{Array2, ArrayView2};

use crate::error::{FilterError, FilterResult};

/// Immutable row-major grayscale image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    pixels: Array2<u8>,
}

impl GrayImage {
    /// Build an image from decoded rows.
    ///
    /// # Arguments
    /// * `rows` - Row-major samples, every row must have the same length
    ///
    /// # Returns
    /// The image, or `FilterError::Shape` for empty or ragged input
    pub fn from_rows(rows: &[Vec<u8>]) -> FilterResult<Self> {
        validate_image_size(rows)?;
        let height = rows.len();
        let width = rows[0].len();
        let flat: Vec<u8> = rows.iter().flatten().copied().collect();
        Self::from_shape_vec(height, width, flat)
    }

    /// Build an image from a flat row-major buffer.
    pub fn from_shape_vec(height: usize, width: usize, data: Vec<u8>) -> FilterResult<Self> {
        let pixels = Array2::from_shape_vec((height, width), data).map_err(|e| {
            FilterError::Shape(format!("cannot shape buffer as {height}x{width}: {e}"))
        })?;
        Self::from_array(pixels)
    }

    /// Wrap an existing array.
    pub fn from_array(pixels: Array2<u8>) -> FilterResult<Self> {
        let (height, width) = pixels.dim();
        if height == 0 || width == 0 {
            return Err(FilterError::Shape(format!(
                "image must have at least one row and column, got {height}x{width}"
            )));
        }
        Ok(Self { pixels })
    }

    /// Image with every pixel set to `value`.
    pub fn filled(height: usize, width: usize, value: u8) -> FilterResult<Self> {
        Self::from_array(Array2::from_elem((height, width), value))
    }

    pub fn rows(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn cols(&self) -> usize {
        self.pixels.ncols()
    }

    /// (rows, cols)
    pub fn dim(&self) -> (usize, usize) {
        self.pixels.dim()
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.pixels.get((row, col)).copied()
    }

    pub fn view(&self) -> ArrayView2<'_, u8> {
        self.pixels.view()
    }

    pub fn pixels(&self) -> &Array2<u8> {
        &self.pixels
    }

    pub fn into_array(self) -> Array2<u8> {
        self.pixels
    }

    /// Copy back into nested rows for an external encoder.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.pixels.rows().into_iter().map(|r| r.to_vec()).collect()
    }

    /// Flat row-major buffer.
    pub fn to_vec(&self) -> Vec<u8> {
        self.pixels.iter().copied().collect()
    }
}

impl Index<(usize, usize)> for GrayImage {
    type Output = u8;

    fn index(&self, index: (usize, usize)) -> &u8 {
        &self.pixels[index]
    }
}

/// Check that every row has the same length as the first one.
///
/// Also rejects an empty grid or an empty first row.
pub fn validate_image_size<T>(rows: &[Vec<T>]) -> FilterResult<()> {
    let Some(first) = rows.first() else {
        return Err(FilterError::Shape("image has no rows".to_string()));
    };
    let cols = first.len();
    if cols == 0 {
        return Err(FilterError::Shape("image has no columns".to_string()));
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != cols {
            return Err(FilterError::Shape(format!(
                "image row {i} has {} elements, expected {cols}",
                row.len()
            )));
        }
    }
    Ok(())
}

/// Check that two images have identical dimensions.
pub fn validate_images_size_match(a: &GrayImage, b: &GrayImage) -> FilterResult<()> {
    if a.rows() != b.rows() {
        return Err(FilterError::Shape(format!(
            "images have different row counts: {} vs {}",
            a.rows(),
            b.rows()
        )));
    }
    if a.cols() != b.cols() {
        return Err(FilterError::Shape(format!(
            "images have different column counts: {} vs {}",
            a.cols(),
            b.cols()
        )));
    }
    Ok(())
}
