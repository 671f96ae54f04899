//! Isoline case table.
//!
//! Sixteen codes, two of them saddles. Edges keep the region at or above the
//! threshold on their right, the same orientation isobands use, so traced rings
//! around high ground run clockwise and the frame walk is shared with isobands.

use crate::cell::{center_average, Cell, Corner};
use crate::edge::{LinePort, Port};
use crate::error::{ContourError, Result};
use crate::interpolation::linear;
use crate::point::Point;
use crate::saddle::resolve_line_saddle;
use crate::shape::{on_side, side_corners, CellGeometry, Geometry, Vertex};

/// Isoline cell configurations, named by the corners at or above the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineShape {
    /// Every corner below.
    Empty,
    /// Every corner at or above.
    Full,
    CornerBl,
    CornerBr,
    CornerTr,
    CornerTl,
    HalfBottom,
    HalfRight,
    HalfTop,
    HalfLeft,
    /// All but the top-left corner.
    NotchTl,
    /// All but the bottom-left corner.
    NotchBl,
    /// All but the bottom-right corner.
    NotchBr,
    /// All but the top-right corner.
    NotchTr,
    /// Bottom-left and top-right corners, cut apart by a low center.
    SplitBlTr,
    /// Bottom-left and top-right corners, joined through a high center.
    JoinBlTr,
    /// Bottom-right and top-left corners, cut apart by a low center.
    SplitBrTl,
    /// Bottom-right and top-left corners, joined through a high center.
    JoinBrTl,
}

use LinePort as L;

const B: Vertex<LinePort> = Vertex::Port(L::Bottom);
const R: Vertex<LinePort> = Vertex::Port(L::Right);
const T: Vertex<LinePort> = Vertex::Port(L::Top);
const LF: Vertex<LinePort> = Vertex::Port(L::Left);

const SW: Vertex<LinePort> = Vertex::Corner(Corner::BottomLeft);
const SE: Vertex<LinePort> = Vertex::Corner(Corner::BottomRight);
const NE: Vertex<LinePort> = Vertex::Corner(Corner::TopRight);
const NW: Vertex<LinePort> = Vertex::Corner(Corner::TopLeft);

impl LineShape {
    /// Edges and filled outlines. Split saddles carry two outlines, so they are
    /// returned as two geometries; every other case has one.
    pub fn geometry(self) -> &'static [Geometry<LinePort>] {
        match self {
            LineShape::Empty => &[],
            LineShape::Full => &[Geometry {
                edges: &[],
                outline: &[SW, NW, NE, SE],
            }],

            LineShape::CornerBl => &[Geometry {
                edges: &[(L::Left, L::Bottom)],
                outline: &[LF, B, SW],
            }],
            LineShape::CornerBr => &[Geometry {
                edges: &[(L::Bottom, L::Right)],
                outline: &[B, R, SE],
            }],
            LineShape::CornerTr => &[Geometry {
                edges: &[(L::Right, L::Top)],
                outline: &[R, T, NE],
            }],
            LineShape::CornerTl => &[Geometry {
                edges: &[(L::Top, L::Left)],
                outline: &[T, LF, NW],
            }],

            LineShape::HalfBottom => &[Geometry {
                edges: &[(L::Left, L::Right)],
                outline: &[LF, R, SE, SW],
            }],
            LineShape::HalfRight => &[Geometry {
                edges: &[(L::Bottom, L::Top)],
                outline: &[B, T, NE, SE],
            }],
            LineShape::HalfTop => &[Geometry {
                edges: &[(L::Right, L::Left)],
                outline: &[R, LF, NW, NE],
            }],
            LineShape::HalfLeft => &[Geometry {
                edges: &[(L::Top, L::Bottom)],
                outline: &[T, B, SW, NW],
            }],

            LineShape::NotchTl => &[Geometry {
                edges: &[(L::Left, L::Top)],
                outline: &[LF, T, NE, SE, SW],
            }],
            LineShape::NotchBl => &[Geometry {
                edges: &[(L::Bottom, L::Left)],
                outline: &[B, LF, NW, NE, SE],
            }],
            LineShape::NotchBr => &[Geometry {
                edges: &[(L::Right, L::Bottom)],
                outline: &[R, B, SW, NW, NE],
            }],
            LineShape::NotchTr => &[Geometry {
                edges: &[(L::Top, L::Right)],
                outline: &[T, R, SE, SW, NW],
            }],

            LineShape::SplitBlTr => &[
                Geometry {
                    edges: &[(L::Left, L::Bottom)],
                    outline: &[LF, B, SW],
                },
                Geometry {
                    edges: &[(L::Right, L::Top)],
                    outline: &[R, T, NE],
                },
            ],
            LineShape::JoinBlTr => &[Geometry {
                edges: &[(L::Left, L::Top), (L::Right, L::Bottom)],
                outline: &[LF, T, NE, R, B, SW],
            }],
            LineShape::SplitBrTl => &[
                Geometry {
                    edges: &[(L::Top, L::Left)],
                    outline: &[T, LF, NW],
                },
                Geometry {
                    edges: &[(L::Bottom, L::Right)],
                    outline: &[B, R, SE],
                },
            ],
            LineShape::JoinBrTl => &[Geometry {
                edges: &[(L::Top, L::Right), (L::Bottom, L::Left)],
                outline: &[T, R, SE, B, LF, NW],
            }],
        }
    }
}

/// Dispatch result for an isoline code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCase {
    Shape(LineShape),
    Saddle,
}

/// Case table lookup. Every 4-bit code has an entry.
pub fn line_case(code: u8) -> Option<LineCase> {
    use LineShape::*;
    let shape = match code {
        0 => Empty,
        15 => Full,
        1 => CornerBl,
        2 => CornerBr,
        4 => CornerTr,
        8 => CornerTl,
        3 => HalfBottom,
        6 => HalfRight,
        12 => HalfTop,
        9 => HalfLeft,
        7 => NotchTl,
        14 => NotchBl,
        13 => NotchBr,
        11 => NotchTr,
        5 | 10 => return Some(LineCase::Saddle),
        _ => return None,
    };
    Some(LineCase::Shape(shape))
}

fn line_port_point(port: LinePort, cell: &Cell, threshold: f64) -> Point {
    let side = port.side();
    let (ia, ib) = side_corners(side);
    on_side(side, linear(cell.corners[ia], cell.corners[ib], threshold))
}

/// Local geometry of one isoline cell. With `polygons` set, emits the outline of
/// the part of the cell at or above the threshold.
pub fn line_cell(cell: &Cell, threshold: f64, polygons: bool) -> Result<CellGeometry<LinePort>> {
    let shape = match line_case(cell.code) {
        Some(LineCase::Shape(shape)) => shape,
        Some(LineCase::Saddle) => {
            let center = center_average(cell.corners, threshold, f64::INFINITY);
            resolve_line_saddle(cell.code, center)?
        }
        None => return Err(ContourError::UnknownCellCode(cell.code)),
    };

    let mut out = CellGeometry::default();
    let locate = |port| line_port_point(port, cell, threshold);
    for geometry in shape.geometry() {
        geometry.emit(locate, polygons, &mut out);
    }
    Ok(out)
}
