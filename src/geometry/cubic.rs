use crate::common::{cross, lerp, Point2D};

/// Inflections are only reported strictly inside this parameter range, so
/// that a new node never lands on or right next to an existing on-curve point.
pub const INFLECTION_RANGE: (f64, f64) = (0.001, 0.99);

/// Leading coefficients smaller than this are treated as zero
const NEGLIGIBLE: f64 = 1e-9;

/// Evaluate a cubic Bezier at `t` using the Bernstein form
pub fn evaluate(p0: Point2D, p1: Point2D, p2: Point2D, p3: Point2D, t: f64) -> Point2D {
    let mt = 1.0 - t;
    let b0 = mt * mt * mt;
    let b1 = 3.0 * mt * mt * t;
    let b2 = 3.0 * mt * t * t;
    let b3 = t * t * t;
    Point2D::new(
        b0 * p0.x + b1 * p1.x + b2 * p2.x + b3 * p3.x,
        b0 * p0.y + b1 * p1.y + b2 * p2.y + b3 * p3.y,
    )
}

/// Split a cubic at `t` by De Casteljau subdivision
pub fn split_cubic(
    p0: Point2D,
    p1: Point2D,
    p2: Point2D,
    p3: Point2D,
    t: f64,
) -> ([Point2D; 4], [Point2D; 4]) {
    let p01 = lerp(p0, p1, t);
    let p12 = lerp(p1, p2, t);
    let p23 = lerp(p2, p3, t);
    let p012 = lerp(p01, p12, t);
    let p123 = lerp(p12, p23, t);
    let mid = lerp(p012, p123, t);
    ([p0, p01, p012, mid], [mid, p123, p23, p3])
}

/// Parameters at which the curvature of a cubic changes sign.
///
/// The cross product of the first and second derivatives is a quadratic in
/// `t`; its real roots inside [`INFLECTION_RANGE`] are returned in
/// ascending order.
pub fn find_inflections(p0: Point2D, p1: Point2D, p2: Point2D, p3: Point2D) -> Vec<f64> {
    let a = p1 - p0;
    let b = p2 - p1 - a;
    let c = p3 - p2 - a - b * 2.0;

    let c0 = cross(a, b);
    let c1 = cross(a, c);
    let c2 = cross(b, c);

    let mut roots = vec![];
    if c2.abs() > NEGLIGIBLE {
        let discriminant = c1 * c1 - 4.0 * c2 * c0;
        if discriminant >= 0.0 {
            let sq = discriminant.sqrt();
            roots.push((-c1 + sq) / (2.0 * c2));
            if sq > 0.0 {
                roots.push((-c1 - sq) / (2.0 * c2));
            }
        }
    } else if c1 != 0.0 {
        roots.push(-c0 / c1);
    }
    let (low, high) = INFLECTION_RANGE;
    roots.retain(|t| *t > low && *t < high);
    roots.sort_by(f64::total_cmp);
    roots
}
