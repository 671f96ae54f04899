//! Contouring entry points.
//!
//! Every call validates its input, then runs one pass per threshold or band,
//! strictly in order. A pass classifies the candidate cells, asks the shape
//! library for their geometry and either emits per-cell polygons or hands the
//! edges to the tracer. Passes share only the read-only field and, for
//! multi-level calls, a QuadTree built once up front.

use crate::cell::{Band, Cell};
use crate::edge::{BandPort, CellEdges, LinePort, Port};
use crate::error::{ContourError, Result};
use crate::field::ScalarField;
use crate::line_shape::line_cell;
use crate::options::Options;
use crate::point::{to_grid, Path};
use crate::quadtree::QuadTree;
use crate::shape::{band_cell, CellGeometry};
use crate::tracer::{trace_paths, CellGrid, TraceSettings};
use std::borrow::Cow;
use std::time::Instant;

/// Data to contour: a bare field, or a field already indexed by a QuadTree.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    Field(&'a ScalarField),
    Tree(&'a QuadTree),
}

impl<'a> Input<'a> {
    pub fn field(&self) -> &'a ScalarField {
        match *self {
            Input::Field(field) => field,
            Input::Tree(tree) => tree.field(),
        }
    }
}

impl<'a> From<&'a ScalarField> for Input<'a> {
    fn from(field: &'a ScalarField) -> Self {
        Input::Field(field)
    }
}

impl<'a> From<&'a QuadTree> for Input<'a> {
    fn from(tree: &'a QuadTree) -> Self {
        Input::Tree(tree)
    }
}

/// What differs between an isoline pass and an isoband pass.
trait Pass {
    type Port: Port;

    const KIND: &'static str;

    /// Cell code for the corners, `None` when any corner is NaN.
    fn classify(&self, corners: [f64; 4]) -> Option<Cell>;

    fn geometry(&self, cell: &Cell, polygons: bool) -> Result<CellGeometry<Self::Port>>;

    /// Value range a cell must touch to contribute.
    fn range(&self) -> (f64, f64);

    /// True when the contour region covers the whole grid boundary.
    fn needs_frame(&self, field: &ScalarField) -> bool;

    fn walks_frame(&self, opts: &Options) -> bool;
}

struct LinePass {
    threshold: f64,
}

impl Pass for LinePass {
    type Port = LinePort;

    const KIND: &'static str = "isolines";

    fn classify(&self, corners: [f64; 4]) -> Option<Cell> {
        Cell::isoline(corners, self.threshold)
    }

    fn geometry(&self, cell: &Cell, polygons: bool) -> Result<CellGeometry<LinePort>> {
        line_cell(cell, self.threshold, polygons)
    }

    fn range(&self) -> (f64, f64) {
        (self.threshold, f64::INFINITY)
    }

    // A field lying entirely on the threshold has no contour.
    fn needs_frame(&self, field: &ScalarField) -> bool {
        if field.boundary().any(|v| v.is_nan() || v < self.threshold) {
            return false;
        }
        match field.min_max() {
            Some((lo, hi)) => lo < self.threshold || hi > self.threshold,
            None => false,
        }
    }

    fn walks_frame(&self, opts: &Options) -> bool {
        opts.linear_ring
    }
}

struct BandPass {
    band: Band,
}

impl Pass for BandPass {
    type Port = BandPort;

    const KIND: &'static str = "isobands";

    fn classify(&self, corners: [f64; 4]) -> Option<Cell> {
        Cell::isoband(corners, self.band)
    }

    fn geometry(&self, cell: &Cell, polygons: bool) -> Result<CellGeometry<BandPort>> {
        band_cell(cell, self.band, polygons)
    }

    fn range(&self) -> (f64, f64) {
        (self.band.lower, self.band.upper)
    }

    fn needs_frame(&self, field: &ScalarField) -> bool {
        field.boundary().all(|v| self.band.contains(v))
    }

    fn walks_frame(&self, _opts: &Options) -> bool {
        true
    }
}

/// Shared state of one call: the field, the optional index and the cells
/// dropped for missing data.
struct Runner<'a> {
    field: &'a ScalarField,
    tree: Option<Cow<'a, QuadTree>>,
    missing: Vec<(usize, usize)>,
    opts: &'a Options,
}

impl<'a> Runner<'a> {
    fn new(input: Input<'a>, levels: usize, opts: &'a Options) -> Self {
        let field = input.field();
        let tree = match input {
            _ if opts.no_quad_tree => None,
            Input::Tree(tree) => Some(Cow::Borrowed(tree)),
            Input::Field(field) if levels > 1 => {
                let started = Instant::now();
                let tree = QuadTree::new(field.clone());
                tracing::debug!(elapsed = ?started.elapsed(), "quadtree build");
                Some(Cow::Owned(tree))
            }
            Input::Field(_) => None,
        };

        let missing = if field.has_missing() {
            (0..field.cell_rows())
                .flat_map(|y| (0..field.cell_cols()).map(move |x| (x, y)))
                .filter(|&(x, y)| field.cell_has_missing(x, y))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            field,
            tree,
            missing,
            opts,
        }
    }

    /// Cells to classify for a pass, row-major.
    fn candidates<M: Pass>(&self, pass: &M) -> Vec<(usize, usize)> {
        let (cols, rows) = (self.field.cell_cols(), self.field.cell_rows());
        match &self.tree {
            Some(tree) => {
                let (lo, hi) = pass.range();
                let mut cells = tree.cells_in_range(lo, hi, self.opts.polygons);
                cells.sort_unstable_by_key(|&(x, y)| (y, x));
                cells
            }
            None => (0..rows)
                .flat_map(|y| (0..cols).map(move |x| (x, y)))
                .collect(),
        }
    }

    fn run<M: Pass>(&self, pass: &M) -> Result<Vec<Path>> {
        let started = Instant::now();
        let cells = self.candidates(pass);
        let paths = if self.opts.polygons {
            self.cell_polygons(pass, &cells)?
        } else {
            self.traced_paths(pass, &cells)?
        };

        let (lo, hi) = pass.range();
        tracing::debug!(
            kind = M::KIND,
            lo,
            hi,
            cells = cells.len(),
            paths = paths.len(),
            elapsed = ?started.elapsed(),
            "pass complete"
        );
        if self.opts.verbose {
            tracing::info!(
                "{} [{}, {}): {} paths from {} candidate cells in {:?}",
                M::KIND,
                lo,
                hi,
                paths.len(),
                cells.len(),
                started.elapsed()
            );
        }
        Ok(paths)
    }

    fn cell_polygons<M: Pass>(&self, pass: &M, cells: &[(usize, usize)]) -> Result<Vec<Path>> {
        let mut out = Vec::new();
        for &(x, y) in cells {
            let Some(cell) = pass.classify(self.field.corners(x, y)) else {
                continue;
            };
            for polygon in pass.geometry(&cell, true)?.polygons {
                let mut ring: Path = polygon.iter().map(|&p| to_grid(p, x, y)).collect();
                if self.opts.linear_ring {
                    ring.push(ring[0]);
                }
                out.push(ring);
            }
        }
        Ok(out)
    }

    fn traced_paths<M: Pass>(&self, pass: &M, cells: &[(usize, usize)]) -> Result<Vec<Path>> {
        let mut out = Vec::new();
        if !self.opts.no_frame && pass.needs_frame(self.field) {
            out.push(frame(self.field, self.opts.linear_ring));
        }

        let classify_started = Instant::now();
        let mut grid: CellGrid<M::Port> =
            CellGrid::new(self.field.cell_cols(), self.field.cell_rows());
        for &(x, y) in &self.missing {
            grid.mark_missing(x, y);
        }
        for &(x, y) in cells {
            let Some(cell) = pass.classify(self.field.corners(x, y)) else {
                continue;
            };
            let geometry = pass.geometry(&cell, false)?;
            if !geometry.edges.is_empty() {
                grid.insert(x, y, CellEdges::new(geometry.edges));
            }
        }
        tracing::debug!(
            pending = grid.pending_cells(),
            elapsed = ?classify_started.elapsed(),
            "cell classification"
        );

        let walk_frame = pass.walks_frame(self.opts);
        let settings = TraceSettings {
            linear_ring: self.opts.linear_ring,
            walk_frame,
            boundary_first: !walk_frame,
        };
        let trace_started = Instant::now();
        let traced = trace_paths(&mut grid, settings)?;
        if traced.broken > 0 {
            tracing::warn!(
                broken = traced.broken,
                "{} paths cut open by missing data",
                traced.broken
            );
        }
        tracing::debug!(
            paths = traced.paths.len(),
            elapsed = ?trace_started.elapsed(),
            "path tracing"
        );

        out.extend(traced.paths);
        Ok(out)
    }
}

/// The grid outline, clockwise from the bottom-left sample.
fn frame(field: &ScalarField, linear_ring: bool) -> Path {
    let (w, h) = ((field.cols() - 1) as f64, (field.rows() - 1) as f64);
    let mut ring = vec![[0.0, 0.0], [0.0, h], [w, h], [w, 0.0]];
    if linear_ring {
        ring.push([0.0, 0.0]);
    }
    ring
}

fn check_finite(name: &'static str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ContourError::non_finite(name, index, values[index])),
        None => Ok(()),
    }
}

/// Isolines of `input` at one threshold.
///
/// Paths keep samples at or above the threshold on their right, so closed rings
/// around high ground run clockwise. Coordinates are in grid units from the
/// bottom-left sample.
///
/// # Example
///
/// ```
/// use iso_marching_squares::{iso_lines, Options, ScalarField};
///
/// let field = ScalarField::new(vec![
///     vec![1.0, 1.0, 1.0, 1.0],
///     vec![1.0, 5.0, 5.0, 1.0],
///     vec![1.0, 5.0, 5.0, 1.0],
///     vec![1.0, 1.0, 1.0, 1.0],
/// ]).unwrap();
///
/// let paths = iso_lines(&field, 3.0, &Options::default()).unwrap();
/// assert_eq!(paths.len(), 1);
/// assert_eq!(paths[0].first(), paths[0].last());
/// ```
///
/// # Errors
///
/// [`ContourError::NonFinite`] for a NaN or infinite threshold.
pub fn iso_lines<'a>(
    input: impl Into<Input<'a>>,
    threshold: f64,
    opts: &Options,
) -> Result<Vec<Path>> {
    let mut levels = iso_lines_multi(input, &[threshold], opts)?;
    Ok(levels.pop().unwrap_or_default())
}

/// Isolines for each threshold, in order.
pub fn iso_lines_multi<'a>(
    input: impl Into<Input<'a>>,
    thresholds: &[f64],
    opts: &Options,
) -> Result<Vec<Vec<Path>>> {
    iso_lines_with(input, thresholds, opts, |_, _| {})
}

/// Like [`iso_lines_multi`], calling `on_pass` with the paths and threshold as
/// each pass finishes.
pub fn iso_lines_with<'a, F>(
    input: impl Into<Input<'a>>,
    thresholds: &[f64],
    opts: &Options,
    mut on_pass: F,
) -> Result<Vec<Vec<Path>>>
where
    F: FnMut(&[Path], f64),
{
    check_finite("threshold", thresholds)?;
    if thresholds.is_empty() {
        return Ok(Vec::new());
    }

    let started = Instant::now();
    let runner = Runner::new(input.into(), thresholds.len(), opts);
    let mut results = Vec::with_capacity(thresholds.len());
    for &threshold in thresholds {
        let paths = runner.run(&LinePass { threshold })?;
        on_pass(&paths, threshold);
        results.push(paths);
    }
    tracing::debug!(
        levels = thresholds.len(),
        quadtree = runner.tree.is_some(),
        elapsed = ?started.elapsed(),
        "isolines complete"
    );
    Ok(results)
}

/// Isobands of `input` for the half-open band `[lower, lower + |width|)`.
///
/// A negative `width` spans the same distance upward from `lower`, so
/// `width = -2.0` contours `[lower, lower + 2.0)` exactly as `width = 2.0` does.
/// The lower bound is always the one passed in.
///
/// Outer rings run clockwise and holes counter-clockwise, so the band region is
/// always on the right of a path.
///
/// # Errors
///
/// [`ContourError::NonFinite`] for a NaN or infinite bound or width.
pub fn iso_bands<'a>(
    input: impl Into<Input<'a>>,
    lower: f64,
    width: f64,
    opts: &Options,
) -> Result<Vec<Path>> {
    let mut levels = iso_bands_multi(input, &[lower], &[width], opts)?;
    Ok(levels.pop().unwrap_or_default())
}

/// Isobands for each lower bound. `widths` holds one width per lower bound, or a
/// single width shared by all of them. Widths are taken by magnitude, as in
/// [`iso_bands`].
pub fn iso_bands_multi<'a>(
    input: impl Into<Input<'a>>,
    lowers: &[f64],
    widths: &[f64],
    opts: &Options,
) -> Result<Vec<Vec<Path>>> {
    iso_bands_with(input, lowers, widths, opts, |_, _, _| {})
}

/// Like [`iso_bands_multi`], calling `on_pass` with the paths and the band's
/// lower and upper bound as each pass finishes.
pub fn iso_bands_with<'a, F>(
    input: impl Into<Input<'a>>,
    lowers: &[f64],
    widths: &[f64],
    opts: &Options,
    mut on_pass: F,
) -> Result<Vec<Vec<Path>>>
where
    F: FnMut(&[Path], f64, f64),
{
    if widths.len() != 1 && widths.len() != lowers.len() {
        return Err(ContourError::LengthMismatch {
            lowers: lowers.len(),
            widths: widths.len(),
        });
    }
    check_finite("lower_bound", lowers)?;
    check_finite("band_width", widths)?;
    if lowers.is_empty() {
        return Ok(Vec::new());
    }

    let started = Instant::now();
    let runner = Runner::new(input.into(), lowers.len(), opts);
    let mut results = Vec::with_capacity(lowers.len());
    for (i, &lower) in lowers.iter().enumerate() {
        let width = if widths.len() == 1 { widths[0] } else { widths[i] };
        let band = Band::new(lower, width);
        let paths = runner.run(&BandPass { band })?;
        on_pass(&paths, band.lower, band.upper);
        results.push(paths);
    }
    tracing::debug!(
        levels = lowers.len(),
        quadtree = runner.tree.is_some(),
        elapsed = ?started.elapsed(),
        "isobands complete"
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{is_closed, signed_area};

    fn field(rows: Vec<Vec<f64>>) -> ScalarField {
        ScalarField::new(rows).unwrap()
    }

    #[test]
    fn test_frame_clockwise() {
        let f = field(vec![vec![0.0; 3]; 2]);
        let ring = frame(&f, true);
        assert_eq!(ring, vec![[0.0, 0.0], [0.0, 1.0], [2.0, 1.0], [2.0, 0.0], [0.0, 0.0]]);
        assert!(signed_area(&ring) < 0.0);
        assert_eq!(frame(&f, false).len(), 4);
    }

    #[test]
    fn test_line_frame_rule() {
        let f = field(vec![vec![2.0, 2.0], vec![2.0, 3.0]]);
        assert!(LinePass { threshold: 2.0 }.needs_frame(&f));
        assert!(LinePass { threshold: 1.0 }.needs_frame(&f));
        assert!(!LinePass { threshold: 2.5 }.needs_frame(&f));

        let flat = field(vec![vec![2.0; 2]; 2]);
        assert!(!LinePass { threshold: 2.0 }.needs_frame(&flat));

        // boundary on the threshold, interior above it
        let plateau = field(vec![
            vec![5.0, 5.0, 5.0],
            vec![5.0, 9.0, 5.0],
            vec![5.0, 5.0, 5.0],
        ]);
        assert!(LinePass { threshold: 5.0 }.needs_frame(&plateau));
    }

    #[test]
    fn test_single_saddle_cell_joins_high_corners() {
        let f = field(vec![vec![10.0, 0.0], vec![0.0, 10.0]]);
        let paths = iso_lines(&f, 5.0, &Options::default()).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(
            paths[0],
            vec![[1.0, 0.5], [0.5, 0.0], [0.0, 0.0], [0.0, 0.5], [0.5, 1.0], [1.0, 1.0], [1.0, 0.5]]
        );
        assert!(is_closed(&paths[0]));
    }

    #[test]
    fn test_band_inside_whole_field_is_frame() {
        let f = field(vec![vec![1.0, 1.5], vec![1.2, 1.8]]);
        let paths = iso_bands(&f, 1.0, 1.0, &Options::default()).unwrap();
        assert_eq!(paths, vec![frame(&f, true)]);

        let opts = Options {
            no_frame: true,
            ..Options::default()
        };
        assert!(iso_bands(&f, 1.0, 1.0, &opts).unwrap().is_empty());
    }

    #[test]
    fn test_validation_before_work() {
        let f = field(vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
        assert!(matches!(
            iso_lines_multi(&f, &[0.5, f64::NAN], &Options::default()),
            Err(ContourError::NonFinite { name: "threshold", index: 1, .. })
        ));
        assert_eq!(
            iso_bands_multi(&f, &[0.0, 1.0, 2.0], &[1.0, 1.0], &Options::default()),
            Err(ContourError::LengthMismatch { lowers: 3, widths: 2 })
        );
        assert!(matches!(
            iso_bands(&f, 0.0, f64::INFINITY, &Options::default()),
            Err(ContourError::NonFinite { name: "band_width", index: 0, .. })
        ));
        assert_eq!(iso_lines_multi(&f, &[], &Options::default()), Ok(Vec::new()));
    }

    #[test]
    fn test_missing_cell_ends_line() {
        let f = field(vec![
            vec![0.0, 0.0, 0.0],
            vec![10.0, 10.0, f64::NAN],
        ]);
        let opts = Options::open_paths();
        let paths = iso_lines(&f, 5.0, &opts).unwrap();
        assert_eq!(paths, vec![vec![[1.0, 0.5], [0.0, 0.5]]]);
    }
}
