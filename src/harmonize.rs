//! Handle balancing for cubic segments.
//!
//! *Tunnify* measures how far each handle reaches toward the point where
//! the segment's two end tangents meet, and gives both handles the same
//! reach. Only handle lengths change; handle directions and on-curve
//! points stay put, so smooth connections remain smooth.

use crate::{
    common::{coincident, distance, lerp, Point2D, EPSILON},
    geometry::intersect_lines,
    shape::Segment,
    GeometryError, NodeKind, Path,
};

/// Reach given to the handle on the side of a retracted (zero-length)
/// handle. Chosen by eye, not derived.
///
/// Once extended, neither handle is retracted, so tunnifying the segment
/// again averages the two reaches like any other segment. From then on
/// further passes leave it alone.
pub const ZERO_HANDLE_NEAR: f64 = 0.43;
/// Reach given to the opposite handle when one handle is retracted
pub const ZERO_HANDLE_FAR: f64 = 0.73;

/// How the two handle reaches are combined into one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HarmonizeMode {
    /// Arithmetic mean of the two fractions
    #[default]
    Mean,
    /// Geometric mean of the handle-to-remainder ratios, converted back to
    /// a fraction with `r / (r + 1)`
    Geometric,
}

/// How many segments or joints a whole-path pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarmonizeReport {
    pub adjusted: usize,
    pub unchanged: usize,
}

impl HarmonizeReport {
    fn record<T>(&mut self, result: &Result<T, GeometryError>) {
        match result {
            Ok(_) => self.adjusted += 1,
            Err(_) => self.unchanged += 1,
        }
    }
}

fn combine(f0: f64, f1: f64, mode: HarmonizeMode) -> Result<f64, GeometryError> {
    match mode {
        HarmonizeMode::Mean => Ok((f0 + f1) / 2.0),
        HarmonizeMode::Geometric => {
            if f0 >= 1.0 || f1 >= 1.0 {
                return Err(GeometryError::DegenerateSegment);
            }
            let ratio = ((f0 / (1.0 - f0)) * (f1 / (1.0 - f1))).sqrt();
            Ok(ratio / (ratio + 1.0))
        }
    }
}

/// Fraction of the way from `anchor` to `target` that `handle` reaches.
/// Fails if the handle points away from the target.
fn reach(anchor: Point2D, handle: Point2D, target: Point2D) -> Result<f64, GeometryError> {
    let span = target - anchor;
    let length = span.hypot();
    if length < EPSILON {
        return Err(GeometryError::DegenerateSegment);
    }
    if (handle - anchor).dot(span) < 0.0 {
        return Err(GeometryError::DegenerateSegment);
    }
    Ok(distance(anchor, handle) / length)
}

/// Balance the handles of the cubic `p0 p1 p2 p3`.
///
/// Returns the new `(p1, p2)`. Parallel tangents give
/// [`GeometryError::ParallelLines`]; coincident end points, two retracted
/// handles, or handles pointing away from the tangent intersection give
/// [`GeometryError::DegenerateSegment`]. The input is never modified.
pub fn tunnify(
    p0: Point2D,
    p1: Point2D,
    p2: Point2D,
    p3: Point2D,
    mode: HarmonizeMode,
) -> Result<(Point2D, Point2D), GeometryError> {
    if coincident(p0, p3) {
        return Err(GeometryError::DegenerateSegment);
    }
    let start_retracted = coincident(p0, p1);
    let end_retracted = coincident(p3, p2);
    match (start_retracted, end_retracted) {
        (true, true) => Err(GeometryError::DegenerateSegment),
        (true, false) => {
            // With p1 on p0, the start tangent runs toward p2
            let meet = intersect_lines(p0, p2, p3, p2).ok_or(GeometryError::ParallelLines)?;
            Ok((
                lerp(p0, meet, ZERO_HANDLE_NEAR),
                lerp(p3, meet, ZERO_HANDLE_FAR),
            ))
        }
        (false, true) => {
            let meet = intersect_lines(p3, p1, p0, p1).ok_or(GeometryError::ParallelLines)?;
            Ok((
                lerp(p0, meet, ZERO_HANDLE_FAR),
                lerp(p3, meet, ZERO_HANDLE_NEAR),
            ))
        }
        (false, false) => {
            let meet = intersect_lines(p0, p1, p3, p2).ok_or(GeometryError::ParallelLines)?;
            let f0 = reach(p0, p1, meet)?;
            let f1 = reach(p3, p2, meet)?;
            let fraction = combine(f0, f1, mode)?;
            Ok((lerp(p0, meet, fraction), lerp(p3, meet, fraction)))
        }
    }
}

/// Balance the handle next to a straight line.
///
/// `line_start`-`node` is the straight segment and the curve continuing
/// from `node` ends with `far_handle`, `far_node`. The curve's handle at
/// `node` is put on the line's direction and given the same reach toward
/// the tangent intersection as `far_handle` has. Returns the new handle.
pub fn harmonize_to_line(
    line_start: Point2D,
    node: Point2D,
    far_handle: Point2D,
    far_node: Point2D,
) -> Result<Point2D, GeometryError> {
    if coincident(line_start, node) || coincident(far_handle, far_node) {
        return Err(GeometryError::DegenerateSegment);
    }
    let meet =
        intersect_lines(line_start, node, far_node, far_handle).ok_or(GeometryError::ParallelLines)?;
    // The curve must continue forward along the line
    if (meet - node).dot(node - line_start) <= 0.0 {
        return Err(GeometryError::DegenerateSegment);
    }
    let fraction = reach(far_node, far_handle, meet)?;
    Ok(lerp(node, meet, fraction))
}

/// Move a smooth node between two curves to its harmonized position.
///
/// `a1 a2` are the handles of the incoming curve and `b1 b2` those of the
/// outgoing one. The node is placed on `a2`-`b1` at `r / (r + 1)`, where
/// `r` is the geometric mean of the handle-span ratios on either side of
/// the intersection of `a1 a2` with `b1 b2`.
pub fn harmonize_joint(
    a1: Point2D,
    a2: Point2D,
    b1: Point2D,
    b2: Point2D,
) -> Result<Point2D, GeometryError> {
    let meet = intersect_lines(a1, a2, b1, b2).ok_or(GeometryError::ParallelLines)?;
    let before = distance(a2, meet);
    let after = distance(b1, b2);
    if before < EPSILON || after < EPSILON {
        return Err(GeometryError::DegenerateSegment);
    }
    let p0 = distance(a1, a2) / before;
    let p1 = distance(meet, b1) / after;
    let ratio = (p0 * p1).sqrt();
    let t = ratio / (ratio + 1.0);
    Ok(lerp(a2, b1, t))
}

/// Tunnify every cubic segment of `path`.
///
/// Segments which cannot be balanced are left alone and counted in the
/// report; only an unreadable path is an error.
pub fn tunnify_path(path: &mut Path, mode: HarmonizeMode) -> Result<HarmonizeReport, GeometryError> {
    let mut report = HarmonizeReport::default();
    let n = path.nodes.len();
    for seg in path.segments()? {
        if let Segment::Cubic(p0, p1, p2, p3) = seg.segment {
            let result = tunnify(p0, p1, p2, p3, mode);
            report.record(&result);
            match result {
                Ok((h1, h2)) => {
                    path.nodes[(seg.start + 1) % n].set_position(h1);
                    path.nodes[(seg.start + 2) % n].set_position(h2);
                }
                Err(e) => log::debug!("Leaving segment at node {}: {}", seg.start, e),
            }
        }
    }
    Ok(report)
}

/// Apply [`harmonize_to_line`] at every smooth node joining a line to a curve.
pub fn harmonize_lines_path(path: &mut Path) -> Result<HarmonizeReport, GeometryError> {
    let mut report = HarmonizeReport::default();
    let segments = path.segments()?;
    if segments.len() < 2 {
        return Ok(report);
    }
    let n = path.nodes.len();
    let pairs = if path.closed {
        segments.len()
    } else {
        segments.len() - 1
    };
    for i in 0..pairs {
        let incoming = segments[i];
        let outgoing = segments[(i + 1) % segments.len()];
        let node_index = outgoing.start;
        if path.nodes[node_index].kind != NodeKind::OnCurveSmooth {
            continue;
        }
        // Read positions afresh; an earlier joint may have moved a handle
        let (line_start, handle_index, far_handle_index, far_node_index) =
            match (incoming.segment, outgoing.segment) {
                (Segment::Line(..), Segment::Cubic(..)) => (
                    incoming.start,
                    (node_index + 1) % n,
                    (node_index + 2) % n,
                    (node_index + 3) % n,
                ),
                (Segment::Cubic(..), Segment::Line(..)) => (
                    (node_index + 1) % n,
                    (node_index + n - 1) % n,
                    (node_index + n - 2) % n,
                    incoming.start,
                ),
                _ => continue,
            };
        let result = harmonize_to_line(
            path.point(line_start),
            path.point(node_index),
            path.point(far_handle_index),
            path.point(far_node_index),
        );
        report.record(&result);
        match result {
            Ok(handle) => path.nodes[handle_index].set_position(handle),
            Err(e) => log::debug!("Leaving line joint at node {}: {}", node_index, e),
        }
    }
    Ok(report)
}

/// Handle indices `[a1, a2, b1, b2]` around a smooth node joining two curves
fn joint_handles(path: &Path, node_index: usize) -> Option<[usize; 4]> {
    if path.nodes.len() < 5 || path.nodes[node_index].kind != NodeKind::OnCurveSmooth {
        return None;
    }
    let a2 = path.prev_index(node_index)?;
    let b1 = path.next_index(node_index)?;
    let a1 = path.prev_index(a2)?;
    let b2 = path.next_index(b1)?;
    let handles = [a1, a2, b1, b2];
    handles
        .iter()
        .all(|&i| path.nodes[i].kind == NodeKind::OffCurve)
        .then_some(handles)
}

/// Apply [`harmonize_joint`] at every smooth node joining two curves
pub fn harmonize_joints_path(path: &mut Path) -> Result<HarmonizeReport, GeometryError> {
    let mut report = HarmonizeReport::default();
    path.segments()?;
    for i in 0..path.nodes.len() {
        let Some([a1, a2, b1, b2]) = joint_handles(path, i) else {
            continue;
        };
        let result = harmonize_joint(
            path.point(a1),
            path.point(a2),
            path.point(b1),
            path.point(b2),
        );
        report.record(&result);
        match result {
            Ok(position) => path.nodes[i].set_position(position),
            Err(e) => log::debug!("Leaving joint at node {}: {}", i, e),
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{common::cross, Node};
    use pretty_assertions::assert_eq;

    fn pt(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    fn close(a: Point2D, b: Point2D) -> bool {
        distance(a, b) < 1e-6
    }

    #[test]
    fn test_tunnify_balances_reach() {
        // Tangents meet at (0, 100)
        let (p0, p3) = (pt(0.0, 0.0), pt(100.0, 100.0));
        let (p1, p2) = tunnify(p0, pt(0.0, 20.0), pt(40.0, 100.0), p3, HarmonizeMode::Mean).unwrap();
        // Reaches of 0.2 and 0.6 average to 0.4
        assert!(close(p1, pt(0.0, 40.0)));
        assert!(close(p2, pt(60.0, 100.0)));
    }

    #[test]
    fn test_tunnify_geometric() {
        let (p0, p3) = (pt(0.0, 0.0), pt(100.0, 100.0));
        let (p1, p2) = tunnify(
            p0,
            pt(0.0, 20.0),
            pt(80.0, 100.0),
            p3,
            HarmonizeMode::Geometric,
        )
        .unwrap();
        // ratios 0.25 and 0.25 -> fraction 0.2
        assert!(close(p1, pt(0.0, 20.0)));
        assert!(close(p2, pt(80.0, 100.0)));
        // A handle reaching all the way to the intersection has no ratio
        assert!(matches!(
            tunnify(p0, pt(0.0, 50.0), pt(0.0, 100.0), p3, HarmonizeMode::Geometric),
            Err(GeometryError::DegenerateSegment)
        ));
    }

    #[test]
    fn test_tunnify_is_idempotent() {
        let (p0, p3) = (pt(12.0, -30.0), pt(310.0, 240.0));
        for mode in [HarmonizeMode::Mean, HarmonizeMode::Geometric] {
            let (p1, p2) = tunnify(p0, pt(40.0, 70.0), pt(250.0, 230.0), p3, mode).unwrap();
            let (q1, q2) = tunnify(p0, p1, p2, p3, mode).unwrap();
            assert!(distance(p1, q1) < 1e-6);
            assert!(distance(p2, q2) < 1e-6);
        }
    }

    #[test]
    fn test_tunnify_keeps_directions() {
        let (p0, h1, h2, p3) = (pt(0.0, 0.0), pt(30.0, 60.0), pt(200.0, 180.0), pt(300.0, 200.0));
        let (p1, p2) = tunnify(p0, h1, h2, p3, HarmonizeMode::Mean).unwrap();
        assert!(cross((h1 - p0).normalize(), p1 - p0).abs() < 1e-9);
        assert!(cross((h2 - p3).normalize(), p2 - p3).abs() < 1e-9);
    }

    #[test]
    fn test_zero_handle() {
        let (p0, p3) = (pt(0.0, 0.0), pt(100.0, 100.0));
        let (p1, p2) = tunnify(p0, p0, pt(0.0, 100.0), p3, HarmonizeMode::Mean).unwrap();
        assert!(close(p1, pt(0.0, 43.0)));
        assert!(close(p2, pt(27.0, 100.0)));
        let (p1, p2) = tunnify(p0, pt(0.0, 100.0), p3, p3, HarmonizeMode::Mean).unwrap();
        assert!(close(p1, pt(0.0, 73.0)));
        assert!(close(p2, pt(57.0, 100.0)));
    }

    #[test]
    fn test_zero_handle_settles_after_second_pass() {
        let (p0, p3) = (pt(0.0, 0.0), pt(100.0, 100.0));
        let (p1, p2) = tunnify(p0, p0, pt(0.0, 100.0), p3, HarmonizeMode::Mean).unwrap();
        // 0.43 and 0.73 average to 0.58 along the same tangents
        let (q1, q2) = tunnify(p0, p1, p2, p3, HarmonizeMode::Mean).unwrap();
        assert!(close(q1, pt(0.0, 58.0)));
        assert!(close(q2, pt(42.0, 100.0)));
        let (r1, r2) = tunnify(p0, q1, q2, p3, HarmonizeMode::Mean).unwrap();
        assert!(close(r1, q1));
        assert!(close(r2, q2));
    }

    #[test]
    fn test_degenerate_segments() {
        let p0 = pt(0.0, 0.0);
        // Parallel tangents
        assert!(matches!(
            tunnify(p0, pt(0.0, 50.0), pt(100.0, 50.0), pt(100.0, 0.0), HarmonizeMode::Mean),
            Err(GeometryError::ParallelLines)
        ));
        // Both handles retracted
        assert!(matches!(
            tunnify(p0, p0, pt(100.0, 0.0), pt(100.0, 0.0), HarmonizeMode::Mean),
            Err(GeometryError::DegenerateSegment)
        ));
        // Handles pointing away from each other (S-shape)
        assert!(matches!(
            tunnify(p0, pt(0.0, 50.0), pt(100.0, 150.0), pt(100.0, 100.0), HarmonizeMode::Mean),
            Err(GeometryError::DegenerateSegment) | Err(GeometryError::ParallelLines)
        ));
    }

    #[test]
    fn test_harmonize_to_line() {
        // Line along x axis into a curve turning up to (200, 100)
        let handle = harmonize_to_line(
            pt(0.0, 0.0),
            pt(100.0, 0.0),
            pt(200.0, 30.0),
            pt(200.0, 100.0),
        )
        .unwrap();
        // Far handle reaches 70 of 100 toward (200, 0)
        assert!(close(handle, pt(170.0, 0.0)));
        // Idempotent: the far handle is not touched, so the result is stable
        let again = harmonize_to_line(
            pt(0.0, 0.0),
            pt(100.0, 0.0),
            pt(200.0, 30.0),
            pt(200.0, 100.0),
        )
        .unwrap();
        assert_eq!(handle, again);
    }

    #[test]
    fn test_harmonize_joint() {
        // Symmetric joint: the node is already in the middle
        let node = harmonize_joint(pt(0.0, 50.0), pt(25.0, 100.0), pt(75.0, 100.0), pt(100.0, 50.0))
            .unwrap();
        assert!(close(node, pt(50.0, 100.0)));
    }

    fn bowl() -> Path {
        Path::new(
            vec![
                Node::new_sharp(0.0, 0.0),
                Node::new_smooth(100.0, 0.0),
                Node::new_offcurve(150.0, 0.0),
                Node::new_offcurve(200.0, 30.0),
                Node::new_sharp(200.0, 100.0),
            ],
            false,
        )
    }

    #[test]
    fn test_lines_path() {
        let mut path = bowl();
        let report = harmonize_lines_path(&mut path).unwrap();
        assert_eq!(report, HarmonizeReport { adjusted: 1, unchanged: 0 });
        assert!(close(path.point(2), pt(170.0, 0.0)));
        assert_eq!(path.point(3), pt(200.0, 30.0));
    }

    #[test]
    fn test_joints_path() {
        let mut path = Path::new(
            vec![
                Node::new_sharp(0.0, 0.0),
                Node::new_offcurve(0.0, 50.0),
                Node::new_offcurve(25.0, 100.0),
                Node::new_smooth(40.0, 100.0),
                Node::new_offcurve(75.0, 100.0),
                Node::new_offcurve(100.0, 50.0),
                Node::new_sharp(100.0, 0.0),
            ],
            false,
        );
        let report = harmonize_joints_path(&mut path).unwrap();
        assert_eq!(report, HarmonizeReport { adjusted: 1, unchanged: 0 });
        assert!(close(path.point(3), pt(50.0, 100.0)));
    }

    #[test]
    fn test_tunnify_path_counts() {
        let mut path = bowl();
        let report = tunnify_path(&mut path, HarmonizeMode::Mean).unwrap();
        assert_eq!(report, HarmonizeReport { adjusted: 1, unchanged: 0 });
        // Reaches were 0.5 and 0.7 of 100
        assert!(close(path.point(2), pt(160.0, 0.0)));
        assert!(close(path.point(3), pt(200.0, 40.0)));
    }
}
