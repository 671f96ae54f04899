//! Isoband shape library.
//!
//! Each of the 81 reachable isoband codes maps to one of 38 shapes (or to a
//! saddle, resolved in [`crate::saddle`]). A shape is static data: the directed
//! edges it contributes to stitched contours and the outline of the filled
//! region inside the cell. Port positions are computed per cell from the corner
//! values, so the tables never depend on the data.
//!
//! All edges keep the band region on their right, so stitched outer rings come
//! out clockwise in y-up coordinates. Outlines are clockwise too.

use crate::cell::{center_average, Band, Cell, Corner, Trit};
use crate::edge::{BandPort, Edge, Port, Side, MAX_CELL_EDGES};
use crate::error::{ContourError, Result};
use crate::interpolation::{linear_a, linear_ab, linear_b};
use crate::point::Point;
use crate::saddle::resolve_band_saddle;
use arrayvec::ArrayVec;

/// Most vertices in one cell outline (the octagon).
pub const MAX_OUTLINE: usize = 8;

/// Closed polygon local to one cell, without a repeated closing point.
pub type CellPolygon = ArrayVec<Point, MAX_OUTLINE>;

/// Outline vertex: either a contour crossing at a port or a cell corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertex<P> {
    Port(P),
    Corner(Corner),
}

/// Static geometry of one case.
#[derive(Debug, Clone, Copy)]
pub struct Geometry<P: 'static> {
    /// Directed edges as `(start port, exit port)`.
    pub edges: &'static [(P, P)],
    /// Filled region outline, clockwise.
    pub outline: &'static [Vertex<P>],
}

impl<P: Port> Geometry<P> {
    /// Append this case's edges or outline to `out`, placing ports with `locate`.
    pub(crate) fn emit(
        &self,
        locate: impl Fn(P) -> Point,
        polygons: bool,
        out: &mut CellGeometry<P>,
    ) {
        if polygons {
            if !self.outline.is_empty() {
                let ring = self
                    .outline
                    .iter()
                    .map(|v| match *v {
                        Vertex::Port(p) => locate(p),
                        Vertex::Corner(c) => c.local(),
                    })
                    .collect();
                out.polygons.push(ring);
            }
        } else {
            for &(start, exit) in self.edges {
                out.edges
                    .push(Edge::new(start, exit, locate(start), locate(exit)));
            }
        }
    }
}

/// What one cell contributes to a pass: edges for tracing, or outlines for
/// polygon output. Only one of the two is filled.
#[derive(Debug, Clone)]
pub struct CellGeometry<P: Port> {
    pub edges: ArrayVec<Edge<P>, MAX_CELL_EDGES>,
    pub polygons: ArrayVec<CellPolygon, 2>,
}

impl<P: Port> Default for CellGeometry<P> {
    fn default() -> Self {
        Self {
            edges: ArrayVec::new(),
            polygons: ArrayVec::new(),
        }
    }
}

impl<P: Port> CellGeometry<P> {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.polygons.is_empty()
    }
}

/// Isoband cell shapes. Suffixes name the corner or sides where the band
/// boundary cuts the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandShape {
    Square,
    TriangleBl,
    TriangleBr,
    TriangleTr,
    TriangleTl,
    TetragonT,
    TetragonR,
    TetragonB,
    TetragonL,
    TetragonBl,
    TetragonBr,
    TetragonTr,
    TetragonTl,
    TetragonLr,
    TetragonTb,
    PentagonTr,
    PentagonTl,
    PentagonBr,
    PentagonBl,
    PentagonTrRl,
    PentagonRbBt,
    PentagonBlLr,
    PentagonLtTb,
    PentagonBlTb,
    PentagonLtRl,
    PentagonTrBt,
    PentagonRbLr,
    HexagonLtTr,
    HexagonBlLt,
    HexagonBlRb,
    HexagonTrRb,
    HexagonLtRb,
    HexagonBlTr,
    HeptagonTr,
    HeptagonBl,
    HeptagonTl,
    HeptagonBr,
    Octagon,
}

use BandPort as P;

const BL: Vertex<BandPort> = Vertex::Port(P::Bl);
const BR: Vertex<BandPort> = Vertex::Port(P::Br);
const RB: Vertex<BandPort> = Vertex::Port(P::Rb);
const RT: Vertex<BandPort> = Vertex::Port(P::Rt);
const TR: Vertex<BandPort> = Vertex::Port(P::Tr);
const TL: Vertex<BandPort> = Vertex::Port(P::Tl);
const LT: Vertex<BandPort> = Vertex::Port(P::Lt);
const LB: Vertex<BandPort> = Vertex::Port(P::Lb);

const SW: Vertex<BandPort> = Vertex::Corner(Corner::BottomLeft);
const SE: Vertex<BandPort> = Vertex::Corner(Corner::BottomRight);
const NE: Vertex<BandPort> = Vertex::Corner(Corner::TopRight);
const NW: Vertex<BandPort> = Vertex::Corner(Corner::TopLeft);

impl BandShape {
    pub fn geometry(self) -> Geometry<BandPort> {
        match self {
            BandShape::Square => Geometry {
                edges: &[],
                outline: &[SW, NW, NE, SE],
            },

            BandShape::TriangleBl => Geometry {
                edges: &[(P::Lb, P::Bl)],
                outline: &[LB, BL, SW],
            },
            BandShape::TriangleBr => Geometry {
                edges: &[(P::Br, P::Rb)],
                outline: &[BR, RB, SE],
            },
            BandShape::TriangleTr => Geometry {
                edges: &[(P::Rt, P::Tr)],
                outline: &[RT, TR, NE],
            },
            BandShape::TriangleTl => Geometry {
                edges: &[(P::Tl, P::Lt)],
                outline: &[LT, NW, TL],
            },

            BandShape::TetragonT => Geometry {
                edges: &[(P::Rt, P::Lt)],
                outline: &[LT, NW, NE, RT],
            },
            BandShape::TetragonR => Geometry {
                edges: &[(P::Br, P::Tr)],
                outline: &[BR, TR, NE, SE],
            },
            BandShape::TetragonB => Geometry {
                edges: &[(P::Lb, P::Rb)],
                outline: &[SW, LB, RB, SE],
            },
            BandShape::TetragonL => Geometry {
                edges: &[(P::Tl, P::Bl)],
                outline: &[SW, NW, TL, BL],
            },
            BandShape::TetragonBl => Geometry {
                edges: &[(P::Bl, P::Lb), (P::Lt, P::Br)],
                outline: &[BL, LB, LT, BR],
            },
            BandShape::TetragonBr => Geometry {
                edges: &[(P::Bl, P::Rt), (P::Rb, P::Br)],
                outline: &[BL, RT, RB, BR],
            },
            BandShape::TetragonTr => Geometry {
                edges: &[(P::Rb, P::Tl), (P::Tr, P::Rt)],
                outline: &[RB, TL, TR, RT],
            },
            BandShape::TetragonTl => Geometry {
                edges: &[(P::Tr, P::Lb), (P::Lt, P::Tl)],
                outline: &[TR, LB, LT, TL],
            },
            BandShape::TetragonLr => Geometry {
                edges: &[(P::Lt, P::Rt), (P::Rb, P::Lb)],
                outline: &[LB, LT, RT, RB],
            },
            BandShape::TetragonTb => Geometry {
                edges: &[(P::Tr, P::Br), (P::Bl, P::Tl)],
                outline: &[BL, TL, TR, BR],
            },

            BandShape::PentagonTr => Geometry {
                edges: &[(P::Tl, P::Rb)],
                outline: &[SW, NW, TL, RB, SE],
            },
            BandShape::PentagonTl => Geometry {
                edges: &[(P::Lb, P::Tr)],
                outline: &[SW, LB, TR, NE, SE],
            },
            BandShape::PentagonBr => Geometry {
                edges: &[(P::Rt, P::Bl)],
                outline: &[SW, NW, NE, RT, BL],
            },
            BandShape::PentagonBl => Geometry {
                edges: &[(P::Br, P::Lt)],
                outline: &[LT, NW, NE, SE, BR],
            },
            BandShape::PentagonTrRl => Geometry {
                edges: &[(P::Tl, P::Rt), (P::Rb, P::Lt)],
                outline: &[LT, NW, TL, RT, RB],
            },
            BandShape::PentagonRbBt => Geometry {
                edges: &[(P::Rt, P::Br), (P::Bl, P::Tr)],
                outline: &[TR, NE, RT, BR, BL],
            },
            BandShape::PentagonBlLr => Geometry {
                edges: &[(P::Br, P::Lb), (P::Lt, P::Rb)],
                outline: &[BR, LB, LT, RB, SE],
            },
            BandShape::PentagonLtTb => Geometry {
                edges: &[(P::Lb, P::Tl), (P::Tr, P::Bl)],
                outline: &[SW, LB, TL, TR, BL],
            },
            BandShape::PentagonBlTb => Geometry {
                edges: &[(P::Bl, P::Lt), (P::Tl, P::Br)],
                outline: &[LT, NW, TL, BR, BL],
            },
            BandShape::PentagonLtRl => Geometry {
                edges: &[(P::Lt, P::Tr), (P::Rt, P::Lb)],
                outline: &[LB, LT, TR, NE, RT],
            },
            BandShape::PentagonTrBt => Geometry {
                edges: &[(P::Br, P::Tl), (P::Tr, P::Rb)],
                outline: &[TL, TR, RB, SE, BR],
            },
            BandShape::PentagonRbLr => Geometry {
                edges: &[(P::Lb, P::Rt), (P::Rb, P::Bl)],
                outline: &[SW, LB, RT, RB, BL],
            },

            BandShape::HexagonLtTr => Geometry {
                edges: &[(P::Lb, P::Tl), (P::Tr, P::Rb)],
                outline: &[SW, LB, TL, TR, RB, SE],
            },
            BandShape::HexagonBlLt => Geometry {
                edges: &[(P::Br, P::Lb), (P::Lt, P::Tr)],
                outline: &[BR, LB, LT, TR, NE, SE],
            },
            BandShape::HexagonBlRb => Geometry {
                edges: &[(P::Bl, P::Lt), (P::Rt, P::Br)],
                outline: &[BL, LT, NW, NE, RT, BR],
            },
            BandShape::HexagonTrRb => Geometry {
                edges: &[(P::Tl, P::Rt), (P::Rb, P::Bl)],
                outline: &[SW, NW, TL, RT, RB, BL],
            },
            BandShape::HexagonLtRb => Geometry {
                edges: &[(P::Lb, P::Tr), (P::Rt, P::Bl)],
                outline: &[SW, LB, TR, NE, RT, BL],
            },
            BandShape::HexagonBlTr => Geometry {
                edges: &[(P::Br, P::Lt), (P::Tl, P::Rb)],
                outline: &[BR, LT, NW, TL, RB, SE],
            },

            BandShape::HeptagonTr => Geometry {
                edges: &[(P::Bl, P::Lb), (P::Lt, P::Tr), (P::Rt, P::Br)],
                outline: &[BL, LB, LT, TR, NE, RT, BR],
            },
            BandShape::HeptagonBl => Geometry {
                edges: &[(P::Lb, P::Tl), (P::Tr, P::Rt), (P::Rb, P::Bl)],
                outline: &[SW, LB, TL, TR, RT, RB, BL],
            },
            BandShape::HeptagonTl => Geometry {
                edges: &[(P::Bl, P::Lt), (P::Tl, P::Rt), (P::Rb, P::Br)],
                outline: &[BL, LT, NW, TL, RT, RB, BR],
            },
            BandShape::HeptagonBr => Geometry {
                edges: &[(P::Br, P::Lb), (P::Lt, P::Tl), (P::Tr, P::Rb)],
                outline: &[BR, LB, LT, TL, TR, RB, SE],
            },

            BandShape::Octagon => Geometry {
                edges: &[
                    (P::Bl, P::Lb),
                    (P::Lt, P::Tl),
                    (P::Tr, P::Rt),
                    (P::Rb, P::Br),
                ],
                outline: &[BL, LB, LT, TL, TR, RT, RB, BR],
            },
        }
    }
}

/// Dispatch result for an isoband code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandCase {
    /// Entirely below or entirely above the band.
    Empty,
    Shape(BandShape),
    /// Ambiguous; the center average picks the shapes.
    Saddle,
}

/// Case table lookup. Returns `None` for codes no corner classification can
/// produce.
pub fn band_case(code: u8) -> Option<BandCase> {
    use BandShape::*;
    let shape = match code {
        0 | 170 => return Some(BandCase::Empty),
        85 => Square,

        169 | 1 => TriangleBl,
        166 | 4 => TriangleBr,
        154 | 16 => TriangleTr,
        106 | 64 => TriangleTl,

        168 | 2 => TetragonBl,
        162 | 8 => TetragonBr,
        138 | 32 => TetragonTr,
        42 | 128 => TetragonTl,

        5 | 165 => TetragonB,
        20 | 150 => TetragonR,
        80 | 90 => TetragonT,
        65 | 105 => TetragonL,
        160 | 10 => TetragonLr,
        130 | 40 => TetragonTb,

        101 | 69 => PentagonTr,
        149 | 21 => PentagonTl,
        86 | 84 => PentagonBl,
        89 | 81 => PentagonBr,
        96 | 74 => PentagonTrRl,
        24 | 146 => PentagonRbBt,
        6 | 164 => PentagonBlLr,
        129 | 41 => PentagonLtTb,
        66 | 104 => PentagonBlTb,
        144 | 26 => PentagonLtRl,
        36 | 134 => PentagonTrBt,
        9 | 161 => PentagonRbLr,

        37 | 133 => HexagonLtTr,
        148 | 22 => HexagonBlLt,
        82 | 88 => HexagonBlRb,
        73 | 97 => HexagonTrRb,
        145 | 25 => HexagonLtRb,
        70 | 100 => HexagonBlTr,

        17 | 68 | 153 | 102 | 152 | 137 | 98 | 38 | 18 | 33 | 72 | 132 | 136 | 34 => {
            return Some(BandCase::Saddle)
        }

        _ => return None,
    };
    Some(BandCase::Shape(shape))
}

/// Place `t` (distance from the side's first corner) on a cell side.
#[inline]
pub(crate) fn on_side(side: Side, t: f64) -> Point {
    match side {
        Side::Bottom => [t, 0.0],
        Side::Right => [1.0, t],
        Side::Top => [t, 1.0],
        Side::Left => [0.0, t],
    }
}

/// Corner indices `(a, b)` spanning a side, `a` being the side's first corner.
#[inline]
pub(crate) const fn side_corners(side: Side) -> (usize, usize) {
    match side {
        Side::Bottom => (0, 1),
        Side::Right => (1, 2),
        Side::Top => (3, 2),
        Side::Left => (0, 3),
    }
}

/// Local position of a band port. A side crossed by both bounds places its
/// first-half port at the crossing nearer the first corner; a side crossed once
/// uses the single crossing whatever the port's half.
fn band_port_point(port: BandPort, cell: &Cell, band: Band) -> Point {
    let side = port.side();
    let (ia, ib) = side_corners(side);
    let (a, b) = (cell.corners[ia], cell.corners[ib]);
    let crossed_twice = matches!(
        (cell.trit(ia), cell.trit(ib)),
        (Trit::Below, Trit::Above) | (Trit::Above, Trit::Below)
    );

    let t = if !crossed_twice {
        linear_ab(a, b, band.lower, band.upper)
    } else if port.is_first_half() {
        linear_a(a, b, band.lower, band.upper)
    } else {
        linear_b(a, b, band.lower, band.upper)
    };
    on_side(side, t)
}

/// Local geometry of one isoband cell.
///
/// # Arguments
///
/// * `cell` - Classified cell
/// * `band` - The band the cell was classified against
/// * `polygons` - Emit filled outlines instead of traceable edges
///
/// # Errors
///
/// Fails with an internal error if the code is not in the case table or a
/// saddle cannot be resolved.
pub fn band_cell(cell: &Cell, band: Band, polygons: bool) -> Result<CellGeometry<BandPort>> {
    let mut out = CellGeometry::default();
    let locate = |port| band_port_point(port, cell, band);

    match band_case(cell.code).ok_or(ContourError::UnknownCellCode(cell.code))? {
        BandCase::Empty => {}
        BandCase::Shape(shape) => shape.geometry().emit(locate, polygons, &mut out),
        BandCase::Saddle => {
            let center = center_average(cell.corners, band.lower, band.upper);
            for shape in resolve_band_saddle(cell.code, center)? {
                shape.geometry().emit(locate, polygons, &mut out);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::signed_area;

    const ALL_SHAPES: [BandShape; 38] = {
        use BandShape::*;
        [
            Square, TriangleBl, TriangleBr, TriangleTr, TriangleTl, TetragonT, TetragonR,
            TetragonB, TetragonL, TetragonBl, TetragonBr, TetragonTr, TetragonTl, TetragonLr,
            TetragonTb, PentagonTr, PentagonTl, PentagonBr, PentagonBl, PentagonTrRl,
            PentagonRbBt, PentagonBlLr, PentagonLtTb, PentagonBlTb, PentagonLtRl, PentagonTrBt,
            PentagonRbLr, HexagonLtTr, HexagonBlLt, HexagonBlRb, HexagonTrRb, HexagonLtRb,
            HexagonBlTr, HeptagonTr, HeptagonBl, HeptagonTl, HeptagonBr, Octagon,
        ]
    };

    /// Codes reachable from four trits.
    fn reachable_codes() -> Vec<u8> {
        let mut codes = Vec::new();
        for x3 in 0..3u8 {
            for x2 in 0..3u8 {
                for x1 in 0..3u8 {
                    for x0 in 0..3u8 {
                        codes.push(x3 << 6 | x2 << 4 | x1 << 2 | x0);
                    }
                }
            }
        }
        codes
    }

    #[test]
    fn test_every_reachable_code_is_dispatched() {
        let codes = reachable_codes();
        assert_eq!(codes.len(), 81);
        for code in codes {
            assert!(band_case(code).is_some(), "code {} must have a case", code);
        }
    }

    #[test]
    fn test_unreachable_codes_are_rejected() {
        let reachable = reachable_codes();
        for code in 0..=255u8 {
            if !reachable.contains(&code) {
                assert_eq!(band_case(code), None, "code {} is unreachable", code);
            }
        }
    }

    #[test]
    fn test_edges_start_and_exit_on_outline() {
        for shape in ALL_SHAPES {
            let geometry = shape.geometry();
            for &(start, exit) in geometry.edges {
                assert!(geometry.outline.contains(&Vertex::Port(start)), "{:?}", shape);
                assert!(geometry.outline.contains(&Vertex::Port(exit)), "{:?}", shape);
                assert_ne!(start.side(), exit.side(), "{:?} edge stays on one side", shape);
            }
        }
    }

    #[test]
    fn test_outline_follows_edges() {
        // every edge is an outline segment walked in the same direction
        for shape in ALL_SHAPES {
            let geometry = shape.geometry();
            let n = geometry.outline.len();
            for &(start, exit) in geometry.edges {
                let i = geometry
                    .outline
                    .iter()
                    .position(|v| *v == Vertex::Port(start))
                    .unwrap();
                assert_eq!(
                    geometry.outline[(i + 1) % n],
                    Vertex::Port(exit),
                    "{:?}: {:?} -> {:?}",
                    shape,
                    start,
                    exit
                );
            }
        }
    }

    #[test]
    fn test_start_ports_are_unique_per_shape() {
        for shape in ALL_SHAPES {
            let edges = shape.geometry().edges;
            for (i, a) in edges.iter().enumerate() {
                for b in &edges[i + 1..] {
                    assert_ne!(a.0, b.0, "{:?}", shape);
                }
            }
        }
    }

    #[test]
    fn test_outlines_are_clockwise() {
        // place every port at the middle of its half so shapes are non-degenerate
        let locate = |port: BandPort| {
            let t = if port.is_first_half() { 0.3 } else { 0.7 };
            on_side(port.side(), t)
        };
        for shape in ALL_SHAPES {
            let mut out = CellGeometry::default();
            shape.geometry().emit(locate, true, &mut out);
            let area = signed_area(&out.polygons[0]);
            assert!(area < 0.0, "{:?} outline must be clockwise, area {}", shape, area);
        }
    }

    #[test]
    fn test_square_cell() {
        let band = Band::new(0.0, 10.0);
        let cell = Cell::isoband([1.0, 2.0, 3.0, 4.0], band).unwrap();
        assert_eq!(cell.code, 85);

        let edges = band_cell(&cell, band, false).unwrap();
        assert!(edges.is_empty(), "a fully inside cell has nothing to trace");

        let polys = band_cell(&cell, band, true).unwrap();
        assert_eq!(polys.polygons.len(), 1);
        assert_eq!(signed_area(&polys.polygons[0]), -1.0);
    }

    #[test]
    fn test_triangle_interpolation() {
        // x0 inside, rest above
        let band = Band::new(0.0, 10.0);
        let cell = Cell::isoband([5.0, 15.0, 20.0, 25.0], band).unwrap();
        assert_eq!(cell.code, 169);

        let geometry = band_cell(&cell, band, false).unwrap();
        assert_eq!(geometry.edges.len(), 1);
        let edge = geometry.edges[0];
        assert_eq!((edge.start, edge.exit), (BandPort::Lb, BandPort::Bl));
        assert!((edge.from[1] - 0.25).abs() < 1e-12, "x0=5 to x3=25 crosses 10 at 0.25");
        assert!((edge.to[0] - 0.5).abs() < 1e-12, "x0=5 to x1=15 crosses 10 at 0.5");
    }

    #[test]
    fn test_double_crossing_is_ordered() {
        // bottom side rises 0 -> 20, left side falls 20 -> 0, band [5, 10)
        let band = Band::new(5.0, 5.0);
        let rising = Cell::isoband([0.0, 20.0, 20.0, 20.0], band).unwrap();
        assert_eq!(rising.code, 168);
        let g = band_cell(&rising, band, true).unwrap();
        let ring = &g.polygons[0];
        // outline [bl, lb, lt, br]
        assert!((ring[0][0] - 0.25).abs() < 1e-12);
        assert!((ring[3][0] - 0.5).abs() < 1e-12);
        assert!(ring[0][0] < ring[3][0], "bl lies left of br");

        let falling = Cell::isoband([20.0, 0.0, 0.0, 0.0], band).unwrap();
        assert_eq!(falling.code, 2);
        let g = band_cell(&falling, band, true).unwrap();
        let ring = &g.polygons[0];
        assert!((ring[0][0] - 0.5).abs() < 1e-12, "bl takes the upper bound first");
        assert!((ring[3][0] - 0.75).abs() < 1e-12);
    }
}
