//! Ports, directed edges and the per-cell pending-edge set.
//!
//! A port is a named stretch of a cell side through which a contour enters or
//! leaves the cell. Isolines use one port per side. Isobands split every side in
//! two halves, since both band bounds may cross the same side. An edge runs from
//! its start port to its exit port, and the exit port alone fixes the move into
//! the neighboring cell: step across the exit side and enter through the mirrored
//! port.

use crate::point::Point;
use arrayvec::ArrayVec;
use std::fmt::Debug;

/// Side of a cell. Also names the four sides of the whole grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Bottom,
    Right,
    Top,
    Left,
}

impl Side {
    /// Cell offset `(dx, dy)` of the neighbor across this side.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Side::Bottom => (0, -1),
            Side::Right => (1, 0),
            Side::Top => (0, 1),
            Side::Left => (-1, 0),
        }
    }

    /// Frame-walking direction that runs along this side of the grid.
    pub const fn walk(self) -> Direction {
        match self {
            Side::Bottom => Direction::Left,
            Side::Left => Direction::Up,
            Side::Top => Direction::Right,
            Side::Right => Direction::Down,
        }
    }

    /// True when this side of cell `(x, y)` lies on the grid frame.
    pub fn on_frame(self, x: usize, y: usize, cols: usize, rows: usize) -> bool {
        match self {
            Side::Bottom => y == 0,
            Side::Right => x + 1 == cols,
            Side::Top => y + 1 == rows,
            Side::Left => x == 0,
        }
    }
}

/// Heading of the frame walk. Turning is always clockwise in y-up coordinates,
/// which keeps the contour region on the walker's right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Along the right side of the grid.
    Down,
    /// Along the bottom side.
    Left,
    /// Along the left side.
    Up,
    /// Along the top side.
    Right,
}

impl Direction {
    /// Next heading after hitting a grid corner.
    pub const fn turn(self) -> Self {
        match self {
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
        }
    }

    /// Cell offset of one step.
    pub const fn step(self) -> (isize, isize) {
        match self {
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, 1),
            Direction::Right => (1, 0),
        }
    }

    /// Grid side being walked.
    pub const fn side(self) -> Side {
        match self {
            Direction::Down => Side::Right,
            Direction::Left => Side::Bottom,
            Direction::Up => Side::Left,
            Direction::Right => Side::Top,
        }
    }

    /// Local corner of the current cell reached at the end of one step.
    pub const fn far_corner(self) -> Point {
        match self {
            Direction::Down => [1.0, 0.0],
            Direction::Left => [0.0, 0.0],
            Direction::Up => [0.0, 1.0],
            Direction::Right => [1.0, 1.0],
        }
    }

    /// Clamp a position that just left the grid back onto the boundary cell and
    /// pick the heading that keeps the walk on the frame.
    pub fn from_exit(x: isize, y: isize, cols: usize, rows: usize) -> (usize, usize, Self) {
        let (cols, rows) = (cols as isize, rows as isize);
        let (x, y, dir) = if x >= cols {
            (cols - 1, y, Direction::Down)
        } else if x < 0 {
            (0, y, Direction::Up)
        } else if y >= rows {
            (x, rows - 1, Direction::Right)
        } else {
            (x, 0, Direction::Left)
        };
        (x as usize, y as usize, dir)
    }
}

/// Port vocabulary of one contour family.
pub trait Port: Copy + Eq + Debug + 'static {
    /// Canonical order in which pending ports of a cell start new paths.
    const START_ORDER: &'static [Self];

    /// Bit position in a [`PortMask`].
    fn index(self) -> usize;

    /// Cell side this port lies on.
    fn side(self) -> Side;

    /// Port of the neighboring cell that shares this port's stretch of side.
    fn mirror(self) -> Self;

    /// Ports on the walked side of a cell, in walking order.
    fn reentries(dir: Direction) -> &'static [Self];

    /// Short label for diagnostics.
    fn label(self) -> &'static str;
}

/// Isoline port: one per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinePort {
    Bottom,
    Right,
    Top,
    Left,
}

impl Port for LinePort {
    const START_ORDER: &'static [Self] = &[
        LinePort::Right,
        LinePort::Bottom,
        LinePort::Left,
        LinePort::Top,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn side(self) -> Side {
        match self {
            LinePort::Bottom => Side::Bottom,
            LinePort::Right => Side::Right,
            LinePort::Top => Side::Top,
            LinePort::Left => Side::Left,
        }
    }

    fn mirror(self) -> Self {
        match self {
            LinePort::Bottom => LinePort::Top,
            LinePort::Right => LinePort::Left,
            LinePort::Top => LinePort::Bottom,
            LinePort::Left => LinePort::Right,
        }
    }

    fn reentries(dir: Direction) -> &'static [Self] {
        match dir {
            Direction::Down => &[LinePort::Right],
            Direction::Left => &[LinePort::Bottom],
            Direction::Up => &[LinePort::Left],
            Direction::Right => &[LinePort::Top],
        }
    }

    fn label(self) -> &'static str {
        match self {
            LinePort::Bottom => "bottom",
            LinePort::Right => "right",
            LinePort::Top => "top",
            LinePort::Left => "left",
        }
    }
}

/// Isoband port: half of a side. The first letter names the side, the second
/// the half, so `Bl` is the left half of the bottom side and `Lb` the lower half
/// of the left side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandPort {
    Bl,
    Br,
    Rb,
    Rt,
    Tr,
    Tl,
    Lt,
    Lb,
}

impl BandPort {
    /// True for the half nearer the side's first corner (bottom-left for the
    /// bottom and left sides, bottom-right for the right side, top-left for the
    /// top side), which takes the crossing nearer that corner.
    pub fn is_first_half(self) -> bool {
        matches!(self, BandPort::Bl | BandPort::Rb | BandPort::Tl | BandPort::Lb)
    }
}

impl Port for BandPort {
    const START_ORDER: &'static [Self] = &[
        BandPort::Bl,
        BandPort::Lb,
        BandPort::Lt,
        BandPort::Tl,
        BandPort::Tr,
        BandPort::Rt,
        BandPort::Rb,
        BandPort::Br,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn side(self) -> Side {
        match self {
            BandPort::Bl | BandPort::Br => Side::Bottom,
            BandPort::Rb | BandPort::Rt => Side::Right,
            BandPort::Tr | BandPort::Tl => Side::Top,
            BandPort::Lt | BandPort::Lb => Side::Left,
        }
    }

    fn mirror(self) -> Self {
        match self {
            BandPort::Bl => BandPort::Tl,
            BandPort::Br => BandPort::Tr,
            BandPort::Tl => BandPort::Bl,
            BandPort::Tr => BandPort::Br,
            BandPort::Lb => BandPort::Rb,
            BandPort::Lt => BandPort::Rt,
            BandPort::Rb => BandPort::Lb,
            BandPort::Rt => BandPort::Lt,
        }
    }

    fn reentries(dir: Direction) -> &'static [Self] {
        match dir {
            Direction::Down => &[BandPort::Rt, BandPort::Rb],
            Direction::Left => &[BandPort::Br, BandPort::Bl],
            Direction::Up => &[BandPort::Lb, BandPort::Lt],
            Direction::Right => &[BandPort::Tl, BandPort::Tr],
        }
    }

    fn label(self) -> &'static str {
        match self {
            BandPort::Bl => "bl",
            BandPort::Br => "br",
            BandPort::Rb => "rb",
            BandPort::Rt => "rt",
            BandPort::Tr => "tr",
            BandPort::Tl => "tl",
            BandPort::Lt => "lt",
            BandPort::Lb => "lb",
        }
    }
}

/// A directed contour segment through one cell, in cell-local coordinates.
///
/// The contour region lies on the right of the segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge<P: Port> {
    pub start: P,
    pub exit: P,
    pub from: Point,
    pub to: Point,
}

impl<P: Port> Edge<P> {
    pub fn new(start: P, exit: P, from: Point, to: Point) -> Self {
        Self {
            start,
            exit,
            from,
            to,
        }
    }

    /// Neighbor offset and entry port that continue the contour.
    pub fn next(&self) -> (isize, isize, P) {
        let (dx, dy) = self.exit.side().offset();
        (dx, dy, self.exit.mirror())
    }
}

/// Bitmask of ports that still have an untraced edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortMask(u8);

impl PortMask {
    #[inline]
    pub fn insert<P: Port>(&mut self, port: P) {
        self.0 |= 1 << port.index();
    }

    #[inline]
    pub fn remove<P: Port>(&mut self, port: P) {
        self.0 &= !(1 << port.index());
    }

    #[inline]
    pub fn contains<P: Port>(self, port: P) -> bool {
        self.0 & (1 << port.index()) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Most edges a single cell can carry (the isoband octagon).
pub const MAX_CELL_EDGES: usize = 4;

/// Edges of one cell for one pass, with the set of ports not yet traced.
#[derive(Debug, Clone)]
pub struct CellEdges<P: Port> {
    pending: PortMask,
    edges: ArrayVec<Edge<P>, MAX_CELL_EDGES>,
}

impl<P: Port> CellEdges<P> {
    pub fn new(edges: ArrayVec<Edge<P>, MAX_CELL_EDGES>) -> Self {
        let mut pending = PortMask::default();
        for edge in &edges {
            pending.insert(edge.start);
        }
        Self { pending, edges }
    }

    /// True when the port still has an untraced edge.
    #[inline]
    pub fn is_pending(&self, port: P) -> bool {
        self.pending.contains(port)
    }

    /// True once every edge has been traced.
    #[inline]
    pub fn is_drained(&self) -> bool {
        self.pending.is_empty()
    }

    /// The pending edge starting at `port`, without consuming it.
    pub fn peek(&self, port: P) -> Option<&Edge<P>> {
        if !self.pending.contains(port) {
            return None;
        }
        self.edges.iter().find(|e| e.start == port)
    }

    /// Consume the pending edge starting at `port`.
    pub fn take(&mut self, port: P) -> Option<Edge<P>> {
        let edge = *self.peek(port)?;
        self.pending.remove(port);
        Some(edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_turns_clockwise() {
        let mut dir = Direction::Down;
        let mut seen = vec![dir];
        for _ in 0..3 {
            dir = dir.turn();
            seen.push(dir);
        }
        assert_eq!(
            seen,
            vec![Direction::Down, Direction::Left, Direction::Up, Direction::Right]
        );
        assert_eq!(dir.turn(), Direction::Down);
    }

    #[test]
    fn test_walk_and_side_agree() {
        for side in [Side::Bottom, Side::Right, Side::Top, Side::Left] {
            assert_eq!(side.walk().side(), side);
        }
    }

    #[test]
    fn test_from_exit() {
        assert_eq!(Direction::from_exit(3, 1, 3, 2), (2, 1, Direction::Down));
        assert_eq!(Direction::from_exit(-1, 1, 3, 2), (0, 1, Direction::Up));
        assert_eq!(Direction::from_exit(1, 2, 3, 2), (1, 1, Direction::Right));
        assert_eq!(Direction::from_exit(1, -1, 3, 2), (1, 0, Direction::Left));
    }

    #[test]
    fn test_band_port_mirrors_share_a_side_pair() {
        for &port in BandPort::START_ORDER {
            assert_eq!(port.mirror().mirror(), port);
            let (dx, dy) = port.side().offset();
            let (mx, my) = port.mirror().side().offset();
            assert_eq!((dx + mx, dy + my), (0, 0), "{:?} mirrors across its side", port);
        }
    }

    #[test]
    fn test_reentries_lie_on_walked_side() {
        for dir in [Direction::Down, Direction::Left, Direction::Up, Direction::Right] {
            for port in BandPort::reentries(dir) {
                assert_eq!(port.side(), dir.side());
            }
            for port in LinePort::reentries(dir) {
                assert_eq!(port.side(), dir.side());
            }
        }
    }

    #[test]
    fn test_edge_next_follows_exit() {
        let edge = Edge::new(BandPort::Lb, BandPort::Bl, [0.0, 0.3], [0.4, 0.0]);
        assert_eq!(edge.next(), (0, -1, BandPort::Tl));

        let edge = Edge::new(LinePort::Left, LinePort::Right, [0.0, 0.5], [1.0, 0.5]);
        assert_eq!(edge.next(), (1, 0, LinePort::Left));
    }

    #[test]
    fn test_cell_edges_take_once() {
        let mut edges = ArrayVec::new();
        edges.push(Edge::new(BandPort::Bl, BandPort::Lb, [0.2, 0.0], [0.0, 0.2]));
        edges.push(Edge::new(BandPort::Lt, BandPort::Br, [0.0, 0.8], [0.8, 0.0]));
        let mut cell = CellEdges::new(edges);

        assert!(cell.is_pending(BandPort::Bl));
        assert!(!cell.is_pending(BandPort::Lb), "exit ports are not start ports");
        assert!(cell.take(BandPort::Bl).is_some());
        assert!(cell.take(BandPort::Bl).is_none(), "an edge is consumed once");
        assert!(!cell.is_drained());
        assert_eq!(cell.take(BandPort::Lt).map(|e| e.exit), Some(BandPort::Br));
        assert!(cell.is_drained());
    }
}
