//! Linear edge-crossing calculators.
//!
//! Every function returns the distance of a crossing from corner `a` toward
//! corner `b` along a cell side of unit length. Callers only ask for crossings
//! that exist, so `a != b` whenever these are used.

/// Crossing of `level` between `a` and `b`.
#[inline]
pub fn linear(a: f64, b: f64, level: f64) -> f64 {
    (level - a) / (b - a)
}

/// Crossing of whichever band bound separates `a` and `b`, when only one does.
///
/// The band is half-open: a value equal to the upper bound counts as above it,
/// so a corner sitting exactly on the upper bound yields a crossing at that corner.
#[inline]
pub fn linear_ab(a: f64, b: f64, v0: f64, v1: f64) -> f64 {
    let (lo, hi) = if v0 > v1 { (v1, v0) } else { (v0, v1) };

    if a < b {
        if a < lo {
            linear(a, b, lo)
        } else {
            linear(a, b, hi)
        }
    } else if a >= hi {
        linear(a, b, hi)
    } else {
        linear(a, b, lo)
    }
}

/// Crossing nearer `a` when both band bounds cross the side.
#[inline]
pub fn linear_a(a: f64, b: f64, min_v: f64, max_v: f64) -> f64 {
    if a < b {
        linear(a, b, min_v)
    } else {
        linear(a, b, max_v)
    }
}

/// Crossing nearer `b` when both band bounds cross the side.
#[inline]
pub fn linear_b(a: f64, b: f64, min_v: f64, max_v: f64) -> f64 {
    if a < b {
        linear(a, b, max_v)
    } else {
        linear(a, b, min_v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_linear_both_directions() {
        assert!((linear(0.0, 10.0, 5.0) - 0.5).abs() < EPS);
        assert!((linear(10.0, 0.0, 2.5) - 0.75).abs() < EPS);
        assert!((linear(2.0, 6.0, 3.0) - 0.25).abs() < EPS);
    }

    #[test]
    fn test_linear_ab_picks_separating_bound() {
        // rising through the lower bound
        assert!((linear_ab(0.0, 4.0, 2.0, 10.0) - 0.5).abs() < EPS);
        // rising through the upper bound
        assert!((linear_ab(4.0, 14.0, 2.0, 10.0) - 0.6).abs() < EPS);
        // falling through the upper bound
        assert!((linear_ab(14.0, 4.0, 2.0, 10.0) - 0.4).abs() < EPS);
        // falling through the lower bound
        assert!((linear_ab(4.0, 0.0, 2.0, 10.0) - 0.5).abs() < EPS);
        // bounds given in reverse order
        assert!((linear_ab(0.0, 4.0, 10.0, 2.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_linear_ab_upper_bound_is_exclusive() {
        // a sits on the upper bound, so it is above and the crossing is at a
        assert!(linear_ab(10.0, 5.0, 2.0, 10.0).abs() < EPS);
        // b sits on the upper bound
        assert!((linear_ab(5.0, 10.0, 2.0, 10.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_linear_a_b_ordering() {
        // increasing side: lower bound first
        let (a, b) = (linear_a(0.0, 10.0, 2.0, 6.0), linear_b(0.0, 10.0, 2.0, 6.0));
        assert!((a - 0.2).abs() < EPS);
        assert!((b - 0.6).abs() < EPS);
        assert!(a < b);

        // decreasing side: upper bound first
        let (a, b) = (linear_a(10.0, 0.0, 2.0, 6.0), linear_b(10.0, 0.0, 2.0, 6.0));
        assert!((a - 0.4).abs() < EPS);
        assert!((b - 0.8).abs() < EPS);
        assert!(a < b);
    }
}
