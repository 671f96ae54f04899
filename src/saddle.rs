//! Saddle resolution.
//!
//! A saddle cell has diagonal corners on opposite sides of a threshold, so its
//! contour can connect either pair. The classified center average decides:
//! the center joins whichever corners share its classification.

use crate::cell::Trit;
use crate::error::{ContourError, Result};
use crate::line_shape::LineShape;
use crate::shape::BandShape;
use arrayvec::ArrayVec;

/// Shapes for an isoband saddle code given the center classification.
///
/// # Errors
///
/// [`ContourError::NotASaddle`] for any code outside the fourteen saddle codes.
pub fn resolve_band_saddle(code: u8, center: Trit) -> Result<ArrayVec<BandShape, 2>> {
    use BandShape::*;

    let shapes: &[BandShape] = match (code, center) {
        // 6-sided: two opposite corners inside the band
        (17, Trit::Below) | (153, Trit::Above) => &[TriangleBl, TriangleTr],
        (17, _) | (153, _) => &[HexagonLtRb],
        (68, Trit::Below) | (102, Trit::Above) => &[TriangleTl, TriangleBr],
        (68, _) | (102, _) => &[HexagonBlTr],

        // 7-sided: one corner inside, opposite corners below and above
        (152, Trit::Above) | (18, Trit::Below) => &[TriangleTr, TetragonBl],
        (152, _) | (18, _) => &[HeptagonTr],
        (137, Trit::Above) | (33, Trit::Below) => &[TriangleBl, TetragonTr],
        (137, _) | (33, _) => &[HeptagonBl],
        (98, Trit::Above) | (72, Trit::Below) => &[TriangleTl, TetragonBr],
        (98, _) | (72, _) => &[HeptagonTl],
        (38, Trit::Above) | (132, Trit::Below) => &[TriangleBr, TetragonTl],
        (38, _) | (132, _) => &[HeptagonBr],

        // 8-sided: corners alternate below and above
        (136, Trit::Below) | (34, Trit::Above) => &[TetragonTl, TetragonBr],
        (136, Trit::Above) | (34, Trit::Below) => &[TetragonBl, TetragonTr],
        (136, Trit::Within) | (34, Trit::Within) => &[Octagon],

        _ => return Err(ContourError::NotASaddle(code)),
    };
    Ok(shapes.iter().copied().collect())
}

/// Shape for an isoline saddle code. `center` comes from classifying the average
/// against `[threshold, inf)`, so anything but `Below` counts as high.
pub fn resolve_line_saddle(code: u8, center: Trit) -> Result<LineShape> {
    let high = center != Trit::Below;
    match (code, high) {
        (5, true) => Ok(LineShape::JoinBlTr),
        (5, false) => Ok(LineShape::SplitBlTr),
        (10, true) => Ok(LineShape::JoinBrTl),
        (10, false) => Ok(LineShape::SplitBrTl),
        _ => Err(ContourError::NotASaddle(code)),
    }
}
