//! Cell classification.
//!
//! A cell is the unit square over four neighboring samples. Its code packs the
//! position of every corner relative to the threshold (isolines, one bit per
//! corner) or band (isobands, one trit per corner in two bits). Corner order is
//! x0 bottom-left, x1 bottom-right, x2 top-right, x3 top-left, and x3 sits in the
//! most significant position.

use crate::point::Point;

/// Position of a value relative to a half-open band `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Trit {
    Below = 0,
    Within = 1,
    Above = 2,
}

impl Trit {
    /// Position of a non-NaN `value` relative to `[lower, upper)`.
    #[inline]
    pub fn classify(value: f64, lower: f64, upper: f64) -> Self {
        if value < lower {
            Trit::Below
        } else if value >= upper {
            Trit::Above
        } else {
            Trit::Within
        }
    }

    #[inline]
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Trit::Below,
            1 => Trit::Within,
            _ => Trit::Above,
        }
    }
}

/// A half-open band `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
}

impl Band {
    /// Band starting at `lower` spanning `|width|`. The sign of `width` is
    /// ignored; a band never extends below `lower`.
    pub fn new(lower: f64, width: f64) -> Self {
        Self {
            lower,
            upper: lower + width.abs(),
        }
    }

    /// Position of `value` relative to this band.
    #[inline]
    pub fn classify(&self, value: f64) -> Trit {
        Trit::classify(value, self.lower, self.upper)
    }

    /// True when `value` lies inside the band. NaN is never inside.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value < self.upper
    }
}

/// Cell corner, in code order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    BottomLeft,
    BottomRight,
    TopRight,
    TopLeft,
}

impl Corner {
    /// Corner position in cell-local coordinates.
    pub const fn local(self) -> Point {
        match self {
            Corner::BottomLeft => [0.0, 0.0],
            Corner::BottomRight => [1.0, 0.0],
            Corner::TopRight => [1.0, 1.0],
            Corner::TopLeft => [0.0, 1.0],
        }
    }
}

/// One classified cell for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Samples `[x0, x1, x2, x3]`.
    pub corners: [f64; 4],
    /// Isoline code `0..=15` or isoband code `0..=170`.
    pub code: u8,
}

impl Cell {
    /// Classify against an isoline threshold. A corner at or above the threshold
    /// sets its bit. Returns `None` when any corner is NaN.
    pub fn isoline(corners: [f64; 4], threshold: f64) -> Option<Self> {
        if corners.iter().any(|v| v.is_nan()) {
            return None;
        }
        let code = corners
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, &v)| if v >= threshold { acc | 1 << i } else { acc });
        Some(Self { corners, code })
    }

    /// Classify against a band. Returns `None` when any corner is NaN.
    pub fn isoband(corners: [f64; 4], band: Band) -> Option<Self> {
        if corners.iter().any(|v| v.is_nan()) {
            return None;
        }
        let code = corners.iter().enumerate().fold(0u8, |acc, (i, &v)| {
            acc | (band.classify(v) as u8) << (2 * i)
        });
        Some(Self { corners, code })
    }

    /// Corner trit of an isoband code, `corner` in `0..4`.
    #[inline]
    pub fn trit(&self, corner: usize) -> Trit {
        Trit::from_bits(self.code >> (2 * corner))
    }

    /// Corner bit of an isoline code, `corner` in `0..4`.
    #[inline]
    pub fn bit(&self, corner: usize) -> bool {
        (self.code >> corner) & 1 == 1
    }
}

/// Classify the mean of the four corners against a band. Saddles resolve their
/// topology on this value; isolines pass `upper = f64::INFINITY`, so `Within`
/// there means at or above the threshold.
pub fn center_average(corners: [f64; 4], lower: f64, upper: f64) -> Trit {
    let average = corners.iter().sum::<f64>() / 4.0;
    Trit::classify(average, lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trit_classify_half_open() {
        assert_eq!(Trit::classify(1.0, 2.0, 4.0), Trit::Below);
        assert_eq!(Trit::classify(2.0, 2.0, 4.0), Trit::Within);
        assert_eq!(Trit::classify(3.9, 2.0, 4.0), Trit::Within);
        assert_eq!(Trit::classify(4.0, 2.0, 4.0), Trit::Above);
    }

    #[test]
    fn test_band_from_negative_width() {
        let band = Band::new(5.0, -2.0);
        assert_eq!(band.upper, 7.0);
        assert!(band.contains(5.0));
        assert!(!band.contains(7.0));
        assert!(!band.contains(f64::NAN));
    }

    #[test]
    fn test_isoline_code_bits() {
        // x0=1 x1=0 x2=1 x3=0 at threshold 0.5 -> bits 0 and 2
        let cell = Cell::isoline([1.0, 0.0, 1.0, 0.0], 0.5).unwrap();
        assert_eq!(cell.code, 5);
        assert!(cell.bit(0));
        assert!(!cell.bit(1));

        // equal to threshold counts as at-or-above
        assert_eq!(Cell::isoline([3.0; 4], 3.0).unwrap().code, 15);
        assert_eq!(Cell::isoline([2.0, 2.0, 2.0, 9.0], 3.0).unwrap().code, 8);
    }

    #[test]
    fn test_isoband_code_msb_first() {
        let band = Band { lower: 1.0, upper: 2.0 };
        // x3 above -> 2 << 6 = 128
        assert_eq!(Cell::isoband([0.0, 0.0, 0.0, 5.0], band).unwrap().code, 128);
        // x0 within -> 1
        assert_eq!(Cell::isoband([1.5, 0.0, 0.0, 0.0], band).unwrap().code, 1);
        // all within -> 85, all above -> 170
        assert_eq!(Cell::isoband([1.5; 4], band).unwrap().code, 85);
        assert_eq!(Cell::isoband([9.0; 4], band).unwrap().code, 170);

        let cell = Cell::isoband([0.0, 1.5, 5.0, 0.0], band).unwrap();
        assert_eq!(cell.code, 0b00_10_01_00);
        assert_eq!(cell.trit(0), Trit::Below);
        assert_eq!(cell.trit(1), Trit::Within);
        assert_eq!(cell.trit(2), Trit::Above);
        assert_eq!(cell.trit(3), Trit::Below);
    }

    #[test]
    fn test_missing_corner_is_absent() {
        assert!(Cell::isoline([1.0, f64::NAN, 1.0, 1.0], 0.5).is_none());
        assert!(Cell::isoband([f64::NAN, 1.0, 1.0, 1.0], Band::new(0.0, 1.0)).is_none());
    }

    #[test]
    fn test_center_average() {
        assert_eq!(center_average([10.0, 0.0, 10.0, 0.0], 5.0, f64::INFINITY), Trit::Within);
        assert_eq!(center_average([10.0, 0.0, 9.0, 0.0], 5.0, f64::INFINITY), Trit::Below);
        assert_eq!(center_average([3.0, 0.0, 3.0, 0.0], 1.0, 1.5), Trit::Above);
    }
}
