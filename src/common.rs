mod node;
pub use node::{Node, NodeKind};

/// A point in the design space. Outlines use kurbo's point type throughout.
pub type Point2D = kurbo::Point;

/// Distances below this are treated as zero
pub(crate) const EPSILON: f64 = 1e-9;

/// Euclidean distance between two points
pub fn distance(a: Point2D, b: Point2D) -> f64 {
    (b - a).hypot()
}

/// The z component of the cross product of two 2D vectors
pub fn cross(a: kurbo::Vec2, b: kurbo::Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// The point at fraction `t` of the way from `a` to `b`
pub fn lerp(a: Point2D, b: Point2D, t: f64) -> Point2D {
    a + (b - a) * t
}

pub(crate) fn coincident(a: Point2D, b: Point2D) -> bool {
    distance(a, b) < EPSILON
}
