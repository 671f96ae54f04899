//! Scalar field storage.
//!
//! A field is a rectangular grid of `f64` samples stored as one flat row-major
//! buffer. Row index `y` grows upward and column index `x` grows to the right,
//! so the sample at `(0, 0)` is the bottom-left grid point and output
//! coordinates are in grid units from that corner.

use crate::error::{ContourError, Result};

/// An immutable rows×cols grid of scalar samples. NaN marks missing data.
///
/// # Example
///
/// ```
/// use iso_marching_squares::ScalarField;
///
/// let field = ScalarField::new(vec![
///     vec![1.0, 2.0, 3.0],
///     vec![4.0, 5.0, 6.0],
/// ]).unwrap();
///
/// assert_eq!(field.rows(), 2);
/// assert_eq!(field.cols(), 3);
/// assert_eq!(field.value(2, 1), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    values: Vec<f64>,
    width: usize,
    height: usize,
}

impl ScalarField {
    /// Build a field from nested rows.
    ///
    /// # Errors
    ///
    /// Fails when there are fewer than two rows or two columns, or when the rows
    /// differ in length.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let height = rows.len();
        if height < 2 {
            return Err(ContourError::TooFewRows(height));
        }
        let width = rows[0].len();
        if width < 2 {
            return Err(ContourError::TooFewColumns(width));
        }
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != width)
        {
            return Err(ContourError::RaggedRow {
                row,
                expected: width,
                found,
            });
        }

        Ok(Self {
            values: rows.into_iter().flatten().collect(),
            width,
            height,
        })
    }

    /// Build a field from a flat row-major buffer of `width * height` values,
    /// as read from array stores such as Zarr or NetCDF.
    ///
    /// # Arguments
    ///
    /// * `values` - Samples, row by row starting at the bottom row
    /// * `width` - Number of grid points per row
    /// * `height` - Number of rows
    pub fn from_flat(values: Vec<f64>, width: usize, height: usize) -> Result<Self> {
        if height < 2 {
            return Err(ContourError::TooFewRows(height));
        }
        if width < 2 {
            return Err(ContourError::TooFewColumns(width));
        }
        let expected = width * height;
        if values.len() != expected {
            return Err(ContourError::FlatLength {
                width,
                height,
                expected,
                found: values.len(),
            });
        }
        Ok(Self {
            values,
            width,
            height,
        })
    }

    /// Number of grid-point rows.
    pub fn rows(&self) -> usize {
        self.height
    }

    /// Number of grid-point columns.
    pub fn cols(&self) -> usize {
        self.width
    }

    /// Number of cell rows (`rows - 1`).
    pub fn cell_rows(&self) -> usize {
        self.height - 1
    }

    /// Number of cell columns (`cols - 1`).
    pub fn cell_cols(&self) -> usize {
        self.width - 1
    }

    /// Sample at column `x`, row `y`.
    #[inline]
    pub fn value(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x]
    }

    /// Corner samples of cell `(x, y)` as `[x0, x1, x2, x3]`: bottom-left,
    /// bottom-right, top-right, top-left.
    #[inline]
    pub fn corners(&self, x: usize, y: usize) -> [f64; 4] {
        [
            self.value(x, y),
            self.value(x + 1, y),
            self.value(x + 1, y + 1),
            self.value(x, y + 1),
        ]
    }

    /// True when any corner of cell `(x, y)` is NaN.
    pub fn cell_has_missing(&self, x: usize, y: usize) -> bool {
        self.corners(x, y).iter().any(|v| v.is_nan())
    }

    /// True when any sample is NaN.
    pub fn has_missing(&self) -> bool {
        self.values.iter().any(|v| v.is_nan())
    }

    /// Samples on the outer boundary of the grid, each visited once.
    pub fn boundary(&self) -> impl Iterator<Item = f64> + '_ {
        let (w, h) = (self.width, self.height);
        let bottom = (0..w).map(move |x| self.value(x, 0));
        let top = (0..w).map(move |x| self.value(x, h - 1));
        let sides = (1..h - 1).flat_map(move |y| [self.value(0, y), self.value(w - 1, y)]);
        bottom.chain(top).chain(sides)
    }

    /// Smallest and largest non-NaN sample, or `None` if every sample is NaN.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Raw row-major samples.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

impl TryFrom<Vec<Vec<f64>>> for ScalarField {
    type Error = ContourError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScalarField {
        ScalarField::new(vec![
            vec![0.0, 1.0, 2.0],
            vec![3.0, 4.0, 5.0],
            vec![6.0, 7.0, 8.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_field_dimensions() {
        let field = sample();
        assert_eq!(field.rows(), 3);
        assert_eq!(field.cols(), 3);
        assert_eq!(field.cell_rows(), 2);
        assert_eq!(field.cell_cols(), 2);
    }

    #[test]
    fn test_corners_order() {
        let field = sample();
        // bottom-left, bottom-right, top-right, top-left
        assert_eq!(field.corners(0, 0), [0.0, 1.0, 4.0, 3.0]);
        assert_eq!(field.corners(1, 1), [4.0, 5.0, 8.0, 7.0]);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert_eq!(
            ScalarField::new(vec![vec![1.0, 2.0]]),
            Err(ContourError::TooFewRows(1))
        );
        assert_eq!(
            ScalarField::new(vec![vec![1.0], vec![2.0]]),
            Err(ContourError::TooFewColumns(1))
        );
        assert_eq!(
            ScalarField::new(vec![vec![1.0, 2.0], vec![3.0]]),
            Err(ContourError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_from_flat() {
        let field = ScalarField::from_flat(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0], 3, 2).unwrap();
        assert_eq!(field.value(0, 1), 3.0);
        assert_eq!(field.corners(1, 0), [1.0, 2.0, 5.0, 4.0]);

        let err = ScalarField::from_flat(vec![0.0; 5], 3, 2).unwrap_err();
        assert!(matches!(err, ContourError::FlatLength { expected: 6, found: 5, .. }));
    }

    #[test]
    fn test_boundary_visits_each_edge_sample_once() {
        let field = sample();
        let mut boundary: Vec<f64> = field.boundary().collect();
        boundary.sort_by(f64::total_cmp);
        assert_eq!(boundary, vec![0.0, 1.0, 2.0, 3.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_min_max_skips_missing() {
        let field = ScalarField::new(vec![vec![f64::NAN, 2.0], vec![-1.0, 9.0]]).unwrap();
        assert_eq!(field.min_max(), Some((-1.0, 9.0)));
        assert!(field.has_missing());
        assert!(field.cell_has_missing(0, 0));

        let empty = ScalarField::new(vec![vec![f64::NAN; 2]; 2]).unwrap();
        assert_eq!(empty.min_max(), None);
    }
}
