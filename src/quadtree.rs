//! QuadTree over the cells of a field.
//!
//! Each node stores the smallest and largest non-NaN corner value of the cells it
//! covers, so a pass can skip every subtree that cannot touch its threshold or
//! band. Building the tree costs one sweep over the field; it pays off when the
//! same field is contoured at several levels.

use crate::error::Result;
use crate::field::ScalarField;

/// One node of the tree, covering `dx` × `dy` cells starting at cell `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadNode {
    pub x: usize,
    pub y: usize,
    pub dx: usize,
    pub dy: usize,
    /// Smallest non-NaN corner value below this node, `+inf` if none.
    pub lower: f64,
    /// Largest non-NaN corner value below this node, `-inf` if none.
    pub upper: f64,
    /// Children A, B, C, D. Empty quadrants are `None`.
    children: [Option<Box<QuadNode>>; 4],
}

/// Quadrant split for one extent: the largest power of two strictly below it.
fn split(extent: usize) -> usize {
    if extent > 1 {
        extent.next_power_of_two() / 2
    } else {
        1
    }
}

impl QuadNode {
    fn build(field: &ScalarField, x: usize, y: usize, dx: usize, dy: usize) -> Self {
        if dx == 1 && dy == 1 {
            let (lower, upper) = field
                .corners(x, y)
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });
            return Self {
                x,
                y,
                dx,
                dy,
                lower,
                upper,
                children: [None, None, None, None],
            };
        }

        let (sx, sy) = (split(dx), split(dy));
        let mut children = [None, None, None, None];
        children[0] = Some(Box::new(Self::build(field, x, y, sx, sy)));
        if dx > sx {
            children[1] = Some(Box::new(Self::build(field, x + sx, y, dx - sx, sy)));
        }
        if dx > sx && dy > sy {
            children[2] = Some(Box::new(Self::build(field, x + sx, y + sy, dx - sx, dy - sy)));
        }
        if dy > sy {
            children[3] = Some(Box::new(Self::build(field, x, y + sy, sx, dy - sy)));
        }

        let (lower, upper) = children
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
                (lo.min(c.lower), hi.max(c.upper))
            });
        Self {
            x,
            y,
            dx,
            dy,
            lower,
            upper,
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Children in construction order A, B, C, D, skipping empty quadrants.
    pub fn children(&self) -> impl Iterator<Item = &QuadNode> {
        self.children.iter().flatten().map(|c| &**c)
    }

    fn collect(&self, lo: f64, hi: f64, subsumed: bool, out: &mut Vec<(usize, usize)>) {
        if self.lower > hi || self.upper < lo {
            return;
        }
        if self.is_leaf() {
            if subsumed || self.lower <= lo || self.upper >= hi {
                out.push((self.x, self.y));
            }
            return;
        }
        // A, B, D, C
        for child in [0, 1, 3, 2].iter().filter_map(|&i| self.children[i].as_deref()) {
            child.collect(lo, hi, subsumed, out);
        }
    }
}

/// A field together with its cell index. Immutable once built, so it can be
/// reused across any number of passes.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadTree {
    field: ScalarField,
    root: QuadNode,
}

impl QuadTree {
    /// Index an already validated field.
    pub fn new(field: ScalarField) -> Self {
        let root = QuadNode::build(&field, 0, 0, field.cell_cols(), field.cell_rows());
        tracing::debug!(
            rows = field.rows(),
            cols = field.cols(),
            lower = root.lower,
            upper = root.upper,
            "built quadtree"
        );
        Self { field, root }
    }

    /// Validate nested rows and index them.
    ///
    /// # Errors
    ///
    /// Same shape errors as [`ScalarField::new`].
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        Ok(Self::new(ScalarField::new(rows)?))
    }

    pub fn field(&self) -> &ScalarField {
        &self.field
    }

    pub fn root(&self) -> &QuadNode {
        &self.root
    }

    /// Cells whose value range may touch `[lo, hi]`.
    ///
    /// Subtrees entirely below `lo` or above `hi` are pruned. A leaf lying
    /// strictly inside the range is reported only when `subsumed` is set, since
    /// such a cell has no crossing but still fills a polygon.
    pub fn cells_in_range(&self, lo: f64, hi: f64, subsumed: bool) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        self.root.collect(lo, hi, subsumed, &mut out);
        out
    }
}

impl From<ScalarField> for QuadTree {
    fn from(field: ScalarField) -> Self {
        Self::new(field)
    }
}
