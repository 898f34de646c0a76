//! Mirror (reflection) boundary extension.
//!
//! For an N x M image and a kernel footprint (Kr, Kc) the extension radii are
//! `er = Kr / 2` and `ec = Kc / 2`. A query `(i, j)` with `i` in
//! `[-er, N - 1 + er]` and `j` in `[-ec, M - 1 + ec]` maps back into the grid:
//!
//! - `i < 0` reflects to `-i`
//! - `i >= N` reflects to `N - 1 - (i - N + 1)`
//!
//! and the same rule applies to columns. The edge row itself is not repeated.
//! A radius of N or more would reflect past the opposite edge; such queries
//! return `FilterError::BoundaryOverflow` instead of indexing the wrong pixel,
//! and `check_reach` reports the whole footprint up front as
//! `FilterError::ExtensionTooWide`.

use ndarray::{Array2, ArrayView2};

use crate::error::{FilterError, FilterResult};
use crate::image::GrayImage;

/// Reflect one index into `[0, len)`; `None` when the reflection overshoots.
#[inline]
fn reflect(index: isize, len: usize) -> Option<usize> {
    let n = len as isize;
    let reflected = if index < 0 {
        -index
    } else if index >= n {
        n - 1 - (index - n + 1)
    } else {
        index
    };
    if (0..n).contains(&reflected) {
        Some(reflected as usize)
    } else {
        None
    }
}

/// Lazy mirror extension of an image for a given kernel footprint.
#[derive(Debug, Clone, Copy)]
pub struct MirrorExtension<'a> {
    image: ArrayView2<'a, u8>,
    row_radius: usize,
    col_radius: usize,
}

impl<'a> MirrorExtension<'a> {
    /// Extension for a kernel of `(rows, cols)`.
    pub fn new(image: &'a GrayImage, kernel_dim: (usize, usize)) -> Self {
        Self {
            image: image.view(),
            row_radius: kernel_dim.0 / 2,
            col_radius: kernel_dim.1 / 2,
        }
    }

    /// (row radius, column radius)
    pub fn radii(&self) -> (usize, usize) {
        (self.row_radius, self.col_radius)
    }

    /// Padded extent `(N + 2 er, M + 2 ec)`.
    pub fn extended_dim(&self) -> (usize, usize) {
        let (rows, cols) = self.image.dim();
        (rows + 2 * self.row_radius, cols + 2 * self.col_radius)
    }

    fn overflow(&self, row: isize, col: isize) -> FilterError {
        let (rows, cols) = self.image.dim();
        FilterError::BoundaryOverflow {
            row,
            col,
            rows,
            cols,
            row_radius: self.row_radius,
            col_radius: self.col_radius,
        }
    }

    /// Fail unless every query in the declared range reflects in-bounds.
    ///
    /// Holds when each radius is strictly below the matching image dimension.
    pub fn check_reach(&self) -> FilterResult<()> {
        let (rows, cols) = self.image.dim();
        if self.row_radius >= rows || self.col_radius >= cols {
            return Err(FilterError::ExtensionTooWide {
                rows,
                cols,
                row_radius: self.row_radius,
                col_radius: self.col_radius,
            });
        }
        Ok(())
    }

    /// In-bounds source coordinate for an extended query.
    pub fn source_index(&self, row: isize, col: isize) -> FilterResult<(usize, usize)> {
        let (rows, cols) = self.image.dim();
        let er = self.row_radius as isize;
        let ec = self.col_radius as isize;

        if row < -er || row > rows as isize - 1 + er || col < -ec || col > cols as isize - 1 + ec {
            return Err(self.overflow(row, col));
        }

        match (reflect(row, rows), reflect(col, cols)) {
            (Some(r), Some(c)) => Ok((r, c)),
            _ => Err(self.overflow(row, col)),
        }
    }

    /// Intensity at an extended coordinate.
    pub fn get(&self, row: isize, col: isize) -> FilterResult<u8> {
        let idx = self.source_index(row, col)?;
        Ok(self.image[idx])
    }
}

/// Materialize the full mirror-padded grid.
///
/// Element `[r, c]` of the result equals `MirrorExtension::get(r - er, c - ec)`.
///
/// # Arguments
/// * `image` - Source image
/// * `kernel_dim` - Kernel footprint (rows, cols) that sets the radii
///
/// # Returns
/// Padded grid of `(N + 2 er) x (M + 2 ec)`, or `ExtensionTooWide` when a
/// radius reaches the image dimension
pub fn mirror_pad(image: &GrayImage, kernel_dim: (usize, usize)) -> FilterResult<Array2<u8>> {
    let extension = MirrorExtension::new(image, kernel_dim);
    extension.check_reach()?;

    let (er, ec) = extension.radii();
    let (height, width) = extension.extended_dim();
    let mut padded = Array2::<u8>::zeros((height, width));

    for r in 0..height {
        for c in 0..width {
            padded[[r, c]] = extension.get(r as isize - er as isize, c as isize - ec as isize)?;
        }
    }

    Ok(padded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid5() -> GrayImage {
        let rows: Vec<Vec<u8>> = (0..5)
            .map(|i| (0..5).map(|j| (10 * i + j) as u8).collect())
            .collect();
        GrayImage::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_mirror_top_edge() {
        let img = grid5();
        let ext = MirrorExtension::new(&img, (3, 3));
        for j in 0..5 {
            assert_eq!(ext.get(-1, j).unwrap(), img[(1, j as usize)]);
        }
    }

    #[test]
    fn test_mirror_bottom_edge() {
        let img = grid5();
        let ext = MirrorExtension::new(&img, (3, 3));
        for j in 0..5 {
            assert_eq!(ext.get(5, j).unwrap(), img[(3, j as usize)]);
        }
    }

    #[test]
    fn test_mirror_columns_and_corners() {
        let img = grid5();
        let ext = MirrorExtension::new(&img, (3, 3));
        assert_eq!(ext.get(2, -1).unwrap(), img[(2, 1)]);
        assert_eq!(ext.get(2, 5).unwrap(), img[(2, 3)]);
        assert_eq!(ext.get(-1, -1).unwrap(), img[(1, 1)]);
        assert_eq!(ext.get(5, 5).unwrap(), img[(3, 3)]);
    }

    #[test]
    fn test_interior_is_identity() {
        let img = grid5();
        let ext = MirrorExtension::new(&img, (5, 5));
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(ext.get(i, j).unwrap(), img[(i as usize, j as usize)]);
            }
        }
    }

    #[test]
    fn test_query_outside_declared_range_fails() {
        let img = grid5();
        let ext = MirrorExtension::new(&img, (3, 3));
        assert!(matches!(
            ext.get(-2, 0),
            Err(FilterError::BoundaryOverflow { row: -2, col: 0, .. })
        ));
        assert!(ext.get(0, 6).is_err());
    }

    #[test]
    fn test_radius_reaching_dimension_overflows() {
        let img = GrayImage::from_rows(&[vec![1, 2], vec![3, 4]]).unwrap();
        let ext = MirrorExtension::new(&img, (5, 3));
        assert_eq!(ext.radii(), (2, 1));
        assert_eq!(
            ext.check_reach(),
            Err(FilterError::ExtensionTooWide {
                rows: 2,
                cols: 2,
                row_radius: 2,
                col_radius: 1,
            })
        );
        // -2 reflects to 2 which is outside a 2-row image
        assert!(ext.get(-2, 0).is_err());
        // -1 still reflects in range
        assert_eq!(ext.get(-1, 0).unwrap(), 3);
    }

    #[test]
    fn test_mirror_pad_layout() {
        let img = GrayImage::from_rows(&[vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        let padded = mirror_pad(&img, (3, 3)).unwrap();
        assert_eq!(padded.dim(), (4, 5));
        assert_eq!(padded.row(0).to_vec(), vec![5, 4, 5, 6, 5]);
        assert_eq!(padded.row(1).to_vec(), vec![2, 1, 2, 3, 2]);
        assert_eq!(padded.row(2).to_vec(), vec![5, 4, 5, 6, 5]);
        assert_eq!(padded.row(3).to_vec(), vec![2, 1, 2, 3, 2]);
    }

    #[test]
    fn test_mirror_pad_matches_lazy_queries() {
        let img = grid5();
        let padded = mirror_pad(&img, (5, 3)).unwrap();
        let ext = MirrorExtension::new(&img, (5, 3));
        for r in 0..9 {
            for c in 0..7 {
                assert_eq!(padded[[r, c]], ext.get(r as isize - 2, c as isize - 1).unwrap());
            }
        }
    }

    #[test]
    fn test_mirror_pad_rejects_oversized_kernel() {
        let img = GrayImage::filled(1, 5, 3).unwrap();
        assert!(matches!(
            mirror_pad(&img, (3, 3)),
            Err(FilterError::ExtensionTooWide { rows: 1, row_radius: 1, .. })
        ));
        assert!(mirror_pad(&img, (1, 9)).is_ok());
    }
}
