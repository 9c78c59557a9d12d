use crate::{
    common::{Point2D, EPSILON},
    geometry::evaluate,
    shape::Segment,
};

/// Tuning for the cubic nearest-point search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPointOptions {
    /// Number of uniform intervals sampled before refinement
    pub samples: usize,
    /// Maximum Newton iterations
    pub max_iterations: usize,
    /// Stop refining once a Newton step is smaller than this
    pub step_tolerance: f64,
    /// Finite-difference step for the derivative estimates
    pub h: f64,
}

impl Default for NearestPointOptions {
    fn default() -> Self {
        NearestPointOptions {
            samples: 20,
            max_iterations: 10,
            step_tolerance: 1e-6,
            h: 1e-4,
        }
    }
}

/// Parameter of the point on `segment` closest to `target`
pub fn nearest_t(target: Point2D, segment: &Segment, options: &NearestPointOptions) -> f64 {
    match *segment {
        Segment::Line(p0, p1) => nearest_t_on_line(target, p0, p1),
        Segment::Cubic(p0, p1, p2, p3) => nearest_t_on_cubic(target, [p0, p1, p2, p3], options),
    }
}

/// Projection of `target` onto the segment `p0`-`p1`, clamped to [0, 1].
/// A zero-length segment gives 0.
pub fn nearest_t_on_line(target: Point2D, p0: Point2D, p1: Point2D) -> f64 {
    let dir = p1 - p0;
    let len2 = dir.hypot2();
    if len2 < EPSILON {
        return 0.0;
    }
    ((target - p0).dot(dir) / len2).clamp(0.0, 1.0)
}

/// Closest parameter on a cubic: coarse uniform sampling followed by Newton
/// refinement of the squared distance, with both endpoints as fallbacks.
pub fn nearest_t_on_cubic(
    target: Point2D,
    points: [Point2D; 4],
    options: &NearestPointOptions,
) -> f64 {
    let [p0, p1, p2, p3] = points;
    let dist2 = |t: f64| (evaluate(p0, p1, p2, p3, t) - target).hypot2();

    let samples = options.samples.max(1);
    let mut best_sample = 0.0;
    let mut best_sample_d = f64::INFINITY;
    for i in 0..=samples {
        let t = i as f64 / samples as f64;
        let d = dist2(t);
        if d < best_sample_d {
            best_sample = t;
            best_sample_d = d;
        }
    }

    let h = options.h;
    let mut t = best_sample;
    for _ in 0..options.max_iterations {
        let (before, here, after) = (dist2(t - h), dist2(t), dist2(t + h));
        let first = (after - before) / (2.0 * h);
        let second = (after - 2.0 * here + before) / (h * h);
        if second.abs() < EPSILON || !second.is_finite() {
            log::trace!("Flat second derivative at t={}, keeping it", t);
            break;
        }
        let next = (t - first / second).clamp(0.0, 1.0);
        if !next.is_finite() {
            break;
        }
        let step = (next - t).abs();
        t = next;
        if step < options.step_tolerance {
            break;
        }
    }

    [best_sample, t, 0.0, 1.0]
        .into_iter()
        .map(|candidate| (candidate, dist2(candidate)))
        .fold((best_sample, best_sample_d), |best, candidate| {
            if candidate.1 < best.1 {
                candidate
            } else {
                best
            }
        })
        .0
}
