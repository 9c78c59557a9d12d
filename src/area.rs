//! Slice-based area estimation.
//!
//! The outline is cut into horizontal rows; each row contributes the width
//! of the outline along its centre line times the row height. Outlines are
//! expected to be overlap-free with extrema on nodes.

use kurbo::common::solve_cubic;
use ordered_float::OrderedFloat;

use crate::{master::Outline, GeometryError, Point2D, Segment};

/// Approximate the area enclosed by `outline`, sampling `precision` rows
/// per unit of height.
///
/// A precision of zero is treated as one. Axis-aligned rectangles are
/// measured exactly at any precision.
pub fn slice_area(outline: &Outline, precision: u32) -> Result<f64, GeometryError> {
    let Some(bounds) = outline.bounds()? else {
        return Ok(0.0);
    };
    let step = 1.0 / f64::from(precision.max(1));
    let mut segments = vec![];
    for path in outline.paths.iter() {
        if !path.closed {
            log::debug!("Ignoring open path in area calculation");
            continue;
        }
        segments.extend(path.segments()?.into_iter().map(|s| s.segment));
    }

    let rows = (bounds.height() / step).ceil() as usize;
    let mut area = 0.0;
    let mut crossings: Vec<f64> = vec![];
    for row in 0..rows {
        let bottom = bounds.min_y() + row as f64 * step;
        let top = (bottom + step).min(bounds.max_y());
        let y = (bottom + top) / 2.0;
        crossings.clear();
        for segment in &segments {
            segment_crossings(segment, y, &mut crossings);
        }
        crossings.sort_by_key(|x| OrderedFloat(*x));
        let width: f64 = crossings.chunks_exact(2).map(|pair| pair[1] - pair[0]).sum();
        area += width * (top - bottom);
    }
    log::debug!(
        "Slice area over {} rows at precision {}: {}",
        rows,
        precision,
        area
    );
    Ok(area)
}

/// Crossing parameters closer than this to a cubic's end are taken to be
/// at its end node
const END_TOLERANCE: f64 = 1e-9;

/// Does the half-open y span of `a`-`b` contain `y`? The lower end is in,
/// the upper end is out, so a node shared by two segments is counted once.
fn spans(a: Point2D, b: Point2D, y: f64) -> bool {
    (a.y <= y && y < b.y) || (b.y <= y && y < a.y)
}

/// Push the x coordinate of every point where `segment` crosses the
/// horizontal line at `y`.
fn segment_crossings(segment: &Segment, y: f64, out: &mut Vec<f64>) {
    match *segment {
        Segment::Line(p0, p1) => {
            if spans(p0, p1, y) {
                let t = (y - p0.y) / (p1.y - p0.y);
                out.push(p0.x + t * (p1.x - p0.x));
            }
        }
        Segment::Cubic(p0, p1, p2, p3) => {
            let c0 = p0.y - y;
            let c1 = 3.0 * (p1.y - p0.y);
            let c2 = 3.0 * (p2.y - 2.0 * p1.y + p0.y);
            let c3 = p3.y - 3.0 * p2.y + 3.0 * p1.y - p0.y;
            for t in solve_cubic(c0, c1, c2, c3) {
                // Crossings at an end node follow the same rule as lines
                if t.abs() < END_TOLERANCE {
                    if spans(p0, p3, y) {
                        out.push(p0.x);
                    }
                } else if (1.0 - t).abs() < END_TOLERANCE {
                    if spans(p0, p3, y) {
                        out.push(p3.x);
                    }
                } else if t > 0.0 && t < 1.0 {
                    out.push(segment.eval(t).x);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{Node, Path};
    use rstest::rstest;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Path {
        Path::new(
            vec![
                Node::new_sharp(x0, y0),
                Node::new_sharp(x1, y0),
                Node::new_sharp(x1, y1),
                Node::new_sharp(x0, y1),
            ],
            true,
        )
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(4)]
    #[case(8)]
    fn test_unit_square(#[case] precision: u32) {
        let outline = Outline::new(vec![rect(0.0, 0.0, 100.0, 100.0)]);
        let area = slice_area(&outline, precision).unwrap();
        assert!((area - 10000.0).abs() < 1e-6, "got {area}");
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    fn test_rectangle_off_grid(#[case] precision: u32) {
        let outline = Outline::new(vec![rect(12.5, -7.25, 40.0, 30.5)]);
        let area = slice_area(&outline, precision).unwrap();
        assert!((area - 27.5 * 37.75).abs() < 1e-6, "got {area}");
    }

    #[test]
    fn test_counter() {
        let outline = Outline::new(vec![
            rect(0.0, 0.0, 100.0, 100.0),
            rect(25.0, 25.0, 75.0, 75.0),
        ]);
        let area = slice_area(&outline, 2).unwrap();
        assert!((area - 7500.0).abs() < 1e-6, "got {area}");
    }

    #[test]
    fn test_circle() {
        let k = 55.228_474_983;
        let r = 100.0;
        let circle = Path::new(
            vec![
                Node::new_smooth(r, 0.0),
                Node::new_offcurve(r, k),
                Node::new_offcurve(k, r),
                Node::new_smooth(0.0, r),
                Node::new_offcurve(-k, r),
                Node::new_offcurve(-r, k),
                Node::new_smooth(-r, 0.0),
                Node::new_offcurve(-r, -k),
                Node::new_offcurve(-k, -r),
                Node::new_smooth(0.0, -r),
                Node::new_offcurve(k, -r),
                Node::new_offcurve(r, -k),
            ],
            true,
        );
        let area = slice_area(&Outline::new(vec![circle]), 1).unwrap();
        let expected = std::f64::consts::PI * r * r;
        assert!((area - expected).abs() < expected * 0.005, "got {area}");
    }

    /// A square whose top-left corner is cut by a curve ending on the
    /// row centre y = 50.5, where it meets the left-hand line
    fn curve_meets_line(reversed: bool) -> Path {
        let mut nodes = vec![
            Node::new_sharp(0.0, 0.0),
            Node::new_sharp(100.0, 0.0),
            Node::new_sharp(100.0, 100.0),
            Node::new_offcurve(50.0, 100.0),
            Node::new_offcurve(0.0, 80.0),
            Node::new_sharp(0.0, 50.5),
        ];
        if reversed {
            nodes.reverse();
        }
        Path::new(nodes, true)
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn test_curve_line_junction_on_row(#[case] reversed: bool) {
        use kurbo::Shape as _;
        let path = curve_meets_line(reversed);
        let mut crossings = vec![];
        for seg in path.segments().unwrap() {
            segment_crossings(&seg.segment, 50.5, &mut crossings);
        }
        crossings.sort_by_key(|x| OrderedFloat(*x));
        assert_eq!(crossings, vec![0.0, 100.0]);

        let expected = path.to_kurbo().unwrap().area().abs();
        let outline = Outline::new(vec![path]);
        for precision in [1, 2] {
            let area = slice_area(&outline, precision).unwrap();
            assert!((area - expected).abs() < 5.0, "got {area}, expected {expected}");
        }
    }

    #[test]
    fn test_empty() {
        assert_eq!(slice_area(&Outline::default(), 4).unwrap(), 0.0);
    }
}
