//! Path tracing over the per-cell edge graph.
//!
//! Every cell of a pass holds the edges its shape produced, keyed by start port.
//! Tracing picks the first pending port in canonical order, follows edges from
//! cell to cell and consumes each one, so every edge lands in exactly one path.
//! When a contour leaves the grid, the tracer walks the grid frame clockwise
//! until a boundary cell offers a pending port on the walked side, then re-enters.
//! Since every edge keeps the contour region on its right, the frame walk closes
//! regions that touch the boundary without further bookkeeping.

use crate::edge::{CellEdges, Direction, Edge, Port};
use crate::error::{ContourError, Result};
use crate::point::{to_grid, Path};

/// A full lap around the frame turns four times; one more means no re-entry
/// and no origin exist on the frame.
pub const MAX_FRAME_TURNS: u8 = 4;

#[derive(Debug, Clone)]
enum Slot<P: Port> {
    /// Not materialized for this pass (filtered out by the QuadTree).
    Vacant,
    /// At least one corner is NaN.
    Missing,
    Live(CellEdges<P>),
}

/// Cell edge sets of one pass, indexed by cell position.
#[derive(Debug, Clone)]
pub struct CellGrid<P: Port> {
    cols: usize,
    rows: usize,
    slots: Vec<Slot<P>>,
    has_missing: bool,
}

impl<P: Port> CellGrid<P> {
    /// An empty grid of `cols` × `rows` cells.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            slots: (0..cols * rows).map(|_| Slot::Vacant).collect(),
            has_missing: false,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Store the edges of cell `(x, y)`.
    pub fn insert(&mut self, x: usize, y: usize, edges: CellEdges<P>) {
        let i = self.index(x, y);
        self.slots[i] = Slot::Live(edges);
    }

    /// Record that cell `(x, y)` has a NaN corner.
    pub fn mark_missing(&mut self, x: usize, y: usize) {
        let i = self.index(x, y);
        self.slots[i] = Slot::Missing;
        self.has_missing = true;
    }

    /// True when any cell of the pass was dropped for missing data.
    pub fn has_missing(&self) -> bool {
        self.has_missing
    }

    pub fn is_missing(&self, x: usize, y: usize) -> bool {
        matches!(self.slots[self.index(x, y)], Slot::Missing)
    }

    /// Number of cells that still hold an untraced edge.
    pub fn pending_cells(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Live(c) if !c.is_drained()))
            .count()
    }

    pub fn is_pending(&self, x: usize, y: usize, port: P) -> bool {
        match &self.slots[self.index(x, y)] {
            Slot::Live(cell) => cell.is_pending(port),
            _ => false,
        }
    }

    fn peek(&self, x: usize, y: usize, port: P) -> Option<&Edge<P>> {
        match &self.slots[self.index(x, y)] {
            Slot::Live(cell) => cell.peek(port),
            _ => None,
        }
    }

    fn take(&mut self, x: usize, y: usize, port: P) -> Option<Edge<P>> {
        let i = self.index(x, y);
        match &mut self.slots[i] {
            Slot::Live(cell) => cell.take(port),
            _ => None,
        }
    }

    /// Checked conversion of a neighbor position.
    fn inside(&self, x: isize, y: isize) -> Option<(usize, usize)> {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            None
        } else {
            Some((x as usize, y as usize))
        }
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }
}

/// Tracing switches for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceSettings {
    /// Repeat the first point at the end of every closed path.
    pub linear_ring: bool,
    /// Follow contours along the grid frame instead of stopping at it.
    pub walk_frame: bool,
    /// Start paths at ports on the grid frame before interior ones, so open
    /// lines are traced from one end to the other.
    pub boundary_first: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathEnd {
    /// Returned to its origin.
    Closed,
    /// Stopped at the grid boundary.
    Open,
    /// Ran into missing data.
    Broken,
}

enum FrameStop<P> {
    Reentry(usize, usize, P),
    Origin,
    Missing,
}

/// Result of tracing one pass.
#[derive(Debug, Clone, Default)]
pub struct Traced {
    pub paths: Vec<Path>,
    /// Paths cut short by NaN cells.
    pub broken: usize,
}

/// Stitch every pending edge of `grid` into paths. Consumes the grid's edges.
///
/// # Errors
///
/// Fails when a move lands on a port with no pending edge or the frame walk
/// overruns its turn cap, unless the pass contains NaN cells, in which case the
/// affected path just ends there.
pub fn trace_paths<P: Port>(grid: &mut CellGrid<P>, settings: TraceSettings) -> Result<Traced> {
    let mut tracer = Tracer {
        grid,
        settings,
        traced: Traced::default(),
    };
    if settings.boundary_first {
        tracer.sweep(true)?;
    }
    tracer.sweep(false)?;
    Ok(tracer.traced)
}

struct Tracer<'a, P: Port> {
    grid: &'a mut CellGrid<P>,
    settings: TraceSettings,
    traced: Traced,
}

impl<'a, P: Port> Tracer<'a, P> {
    fn sweep(&mut self, frame_only: bool) -> Result<()> {
        let (cols, rows) = (self.grid.cols, self.grid.rows);
        for y in 0..rows {
            for x in 0..cols {
                for &port in P::START_ORDER {
                    if frame_only && !port.side().on_frame(x, y, cols, rows) {
                        continue;
                    }
                    if self.grid.is_pending(x, y, port) {
                        let path = self.trace(x, y, port)?;
                        self.traced.paths.push(path);
                    }
                }
            }
        }
        Ok(())
    }

    fn trace(&mut self, i: usize, j: usize, start: P) -> Result<Path> {
        let origin = match self.grid.peek(i, j, start) {
            Some(edge) => to_grid(edge.from, i, j),
            None => return Err(self.missing_edge(i, j, start)),
        };
        let mut path = vec![origin];
        let (mut x, mut y, mut enter) = (i, j, start);

        let end = loop {
            let edge = match self.grid.take(x, y, enter) {
                Some(edge) => edge,
                None if (x, y, enter) == (i, j, start) => break PathEnd::Closed,
                None if self.grid.has_missing() => break PathEnd::Broken,
                None => return Err(self.missing_edge(x, y, enter)),
            };
            path.push(to_grid(edge.to, x, y));

            let (dx, dy, next) = edge.next();
            let (nx, ny) = (x as isize + dx, y as isize + dy);
            if let Some((nx, ny)) = self.grid.inside(nx, ny) {
                if self.grid.is_missing(nx, ny) {
                    break PathEnd::Broken;
                }
                x = nx;
                y = ny;
                enter = next;
                continue;
            }

            if !self.settings.walk_frame {
                break PathEnd::Open;
            }
            let (fx, fy, dir) = Direction::from_exit(nx, ny, self.grid.cols, self.grid.rows);
            match self.walk_frame(&mut path, fx, fy, dir, (i, j, start))? {
                FrameStop::Reentry(rx, ry, port) => {
                    x = rx;
                    y = ry;
                    enter = port;
                }
                FrameStop::Origin => break PathEnd::Closed,
                FrameStop::Missing => break PathEnd::Broken,
            }
        };

        match end {
            PathEnd::Closed if self.settings.linear_ring && path.last() != Some(&origin) => {
                path.push(origin)
            }
            PathEnd::Broken => self.traced.broken += 1,
            _ => {}
        }
        Ok(path)
    }

    /// Walk the frame from boundary cell `(x, y)` heading `dir`, appending the
    /// grid corners passed, until a pending re-entry port or the origin shows up.
    fn walk_frame(
        &mut self,
        path: &mut Path,
        mut x: usize,
        mut y: usize,
        mut dir: Direction,
        (i, j, start): (usize, usize, P),
    ) -> Result<FrameStop<P>> {
        let home = start.side().walk();
        if (x, y) == (i, j) && dir == home {
            return Ok(FrameStop::Origin);
        }

        let mut turns = 0u8;
        loop {
            if self.grid.is_missing(x, y) {
                return Ok(FrameStop::Missing);
            }

            if let Some(&port) = P::reentries(dir)
                .iter()
                .find(|&&p| self.grid.is_pending(x, y, p))
            {
                if let Some(edge) = self.grid.peek(x, y, port) {
                    path.push(to_grid(edge.from, x, y));
                }
                return Ok(FrameStop::Reentry(x, y, port));
            }

            path.push(to_grid(dir.far_corner(), x, y));
            let (dx, dy) = dir.step();
            match self.grid.inside(x as isize + dx, y as isize + dy) {
                Some((nx, ny)) => {
                    x = nx;
                    y = ny;
                }
                None => {
                    dir = dir.turn();
                    turns += 1;
                    if turns > MAX_FRAME_TURNS {
                        if self.grid.has_missing() {
                            return Ok(FrameStop::Missing);
                        }
                        return Err(ContourError::FrameWalkOverflow {
                            x: i,
                            y: j,
                            turns: MAX_FRAME_TURNS,
                        });
                    }
                }
            }

            if (x, y) == (i, j) && dir == home {
                return Ok(FrameStop::Origin);
            }
        }
    }

    fn missing_edge(&self, x: usize, y: usize, port: P) -> ContourError {
        ContourError::MissingEdge {
            x,
            y,
            port: port.label(),
        }
    }
}
