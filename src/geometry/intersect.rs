use crate::common::{coincident, cross, Point2D};

/// Directions closer to parallel than this (as a sine of the angle between
/// them) are treated as parallel.
const PARALLEL_TOLERANCE: f64 = 1e-12;

/// Intersection of the infinite line through `a` and `b` with the infinite
/// line through `c` and `d`.
///
/// Returns `None` when the lines are parallel (including both vertical), or
/// when either line is given by two coincident points and so has no
/// direction.
pub fn intersect_lines(a: Point2D, b: Point2D, c: Point2D, d: Point2D) -> Option<Point2D> {
    if coincident(a, b) || coincident(c, d) {
        return None;
    }
    let d1 = b - a;
    let d2 = d - c;
    let vertical1 = d1.x == 0.0;
    let vertical2 = d2.x == 0.0;
    if vertical1 && vertical2 {
        return None;
    }
    if vertical1 {
        let slope = d2.y / d2.x;
        return Some(Point2D::new(a.x, c.y + slope * (a.x - c.x)));
    }
    if vertical2 {
        let slope = d1.y / d1.x;
        return Some(Point2D::new(c.x, a.y + slope * (c.x - a.x)));
    }
    // Equal slopes, compared without dividing so steep lines stay exact
    let denominator = cross(d1, d2);
    if denominator.abs() <= PARALLEL_TOLERANCE * d1.hypot() * d2.hypot() {
        return None;
    }
    let t = cross(c - a, d2) / denominator;
    Some(a + d1 * t)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rstest::rstest;

    fn on_line(p: Point2D, a: Point2D, b: Point2D) -> bool {
        let dir = (b - a).normalize();
        cross(dir, p - a).abs() < 1e-6
    }

    #[rstest]
    #[case((0.0, 0.0), (10.0, 10.0), (0.0, 10.0), (10.0, 0.0))]
    #[case((0.0, 0.0), (0.0, 10.0), (-5.0, 3.0), (5.0, 4.0))]
    #[case((-5.0, 3.0), (5.0, 4.0), (2.0, 0.0), (2.0, 10.0))]
    #[case((100.0, 0.0), (100.000001, 500.0), (0.0, 250.0), (300.0, 260.0))]
    #[case((0.0, 0.0), (1e-7, 1000.0), (1.0, 0.0), (1.0 - 1e-7, 1000.0))]
    #[case((312.5, -40.0), (830.25, 702.0), (-18.0, 655.5), (1200.0, -3.0))]
    fn test_intersection_lies_on_both_lines(
        #[case] a: (f64, f64),
        #[case] b: (f64, f64),
        #[case] c: (f64, f64),
        #[case] d: (f64, f64),
    ) {
        let (a, b, c, d) = (a.into(), b.into(), c.into(), d.into());
        let p = intersect_lines(a, b, c, d).unwrap();
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!(on_line(p, a, b), "{p:?} not on first line");
        assert!(on_line(p, c, d), "{p:?} not on second line");
    }

    #[test]
    fn test_known_intersection() {
        let p = intersect_lines(
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(0.0, 10.0),
            Point2D::new(10.0, 0.0),
        )
        .unwrap();
        assert_eq!(p, Point2D::new(5.0, 5.0));
    }

    #[test]
    fn test_parallel() {
        let a = Point2D::new(0.0, 0.0);
        assert_eq!(
            intersect_lines(a, (10.0, 5.0).into(), (0.0, 3.0).into(), (20.0, 13.0).into()),
            None
        );
        // Both vertical
        assert_eq!(
            intersect_lines(a, (0.0, 5.0).into(), (3.0, 3.0).into(), (3.0, 13.0).into()),
            None
        );
        // Zero-length line
        assert_eq!(
            intersect_lines(a, a, (3.0, 3.0).into(), (3.0, 13.0).into()),
            None
        );
    }
}
