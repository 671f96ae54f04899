//! Output geometry: points, paths and ring measurements.

/// A point in fractional grid units, `[x, y]`, origin at the bottom-left sample.
pub type Point = [f64; 2];

/// An ordered run of points. Closed rings repeat their first point at the end.
pub type Path = Vec<Point>;

/// Translate a cell-local point into grid coordinates.
#[inline]
pub(crate) fn to_grid(local: Point, x: usize, y: usize) -> Point {
    [x as f64 + local[0], y as f64 + local[1]]
}

/// Signed shoelace area of a ring. Negative for clockwise rings in y-up
/// coordinates, which is how filled regions come out of the tracer. The ring may
/// or may not repeat its first point.
pub fn signed_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, a) in ring.iter().enumerate() {
        let b = &ring[(i + 1) % ring.len()];
        twice += a[0] * b[1] - b[0] * a[1];
    }
    twice / 2.0
}

/// True when the path has at least two points and ends where it started.
pub fn is_closed(path: &[Point]) -> bool {
    path.len() > 1 && path.first() == path.last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_area_orientation() {
        let clockwise = [[0.0, 0.0], [0.0, 2.0], [2.0, 2.0], [2.0, 0.0]];
        assert_eq!(signed_area(&clockwise), -4.0);

        let mut counter: Vec<Point> = clockwise.to_vec();
        counter.reverse();
        assert_eq!(signed_area(&counter), 4.0);
    }

    #[test]
    fn test_signed_area_closed_ring() {
        let ring = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
        assert_eq!(signed_area(&ring), -0.5);
        assert!(is_closed(&ring));
        assert!(!is_closed(&ring[..3]));
    }

    #[test]
    fn test_to_grid() {
        assert_eq!(to_grid([0.25, 1.0], 3, 4), [3.25, 5.0]);
    }
}
