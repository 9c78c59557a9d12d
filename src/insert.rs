//! Adding on-curve nodes to paths without changing their shape.

use crate::{
    common::{distance, Point2D},
    geometry::{find_inflections, nearest_t, NearestPointOptions},
    master::{MasterId, MasterSet},
    GeometryError, Path, Segment,
};

/// Split parameters for one segment, keyed by the node index the segment
/// starts at. Parameters are in descending order.
type SplitPlan = Vec<(usize, Vec<f64>)>;

fn inflection_plan(path: &Path) -> Result<SplitPlan, GeometryError> {
    let mut plan = vec![];
    for seg in path.segments()? {
        if let Segment::Cubic(p0, p1, p2, p3) = seg.segment {
            let mut ts = find_inflections(p0, p1, p2, p3);
            if ts.is_empty() {
                continue;
            }
            ts.reverse();
            plan.push((seg.start, ts));
        }
    }
    Ok(plan)
}

fn segment_starting_at(path: &Path, start: usize) -> Result<usize, GeometryError> {
    path.segments()?
        .iter()
        .position(|s| s.start == start)
        .ok_or(GeometryError::BadPath)
}

/// Carry out a split plan, returning the indices of the new on-curve nodes.
///
/// Segments are split from the last one backwards and each segment from its
/// highest parameter down, so the left-hand piece of every split keeps its
/// start node and the remaining parameters only need rescaling.
fn apply_plan(path: &mut Path, mut plan: SplitPlan) -> Result<Vec<usize>, GeometryError> {
    plan.sort_by_key(|(start, _)| std::cmp::Reverse(*start));
    let mut inserted: Vec<usize> = vec![];
    for entry in 0..plan.len() {
        let ts = plan[entry].1.clone();
        let mut previous = 1.0;
        for t in ts {
            let segment = segment_starting_at(path, plan[entry].0)?;
            let before = path.nodes.len();
            let new_node = path.insert_node(segment, t / previous)?;
            previous = t;

            // Nodes at or after the first inserted one have moved along
            let added = path.nodes.len() - before;
            let first_new = new_node - added / 2;
            for idx in inserted
                .iter_mut()
                .chain(plan.iter_mut().map(|(start, _)| start))
            {
                if *idx >= first_new {
                    *idx += added;
                }
            }
            inserted.push(new_node);
        }
    }
    inserted.sort_unstable();
    Ok(inserted)
}

/// Insert an on-curve node at every inflection of every cubic in `path`.
///
/// Returns the indices of the new nodes in ascending order.
pub fn insert_inflections(path: &mut Path) -> Result<Vec<usize>, GeometryError> {
    let plan = inflection_plan(path)?;
    let inserted = apply_plan(path, plan)?;
    log::debug!("Inserted {} inflection nodes", inserted.len());
    Ok(inserted)
}

/// Insert the inflections found in `source`'s path into the same path of
/// every master in `group`, at the same curve parameters, so the masters
/// stay compatible. Nothing is changed if any master is incompatible.
pub fn insert_inflections_in_masters(
    masters: &mut MasterSet,
    source: &str,
    group: &[MasterId],
    path_index: usize,
) -> Result<Vec<usize>, GeometryError> {
    let targets = masters.compatible_targets(source, group)?;
    let plan = inflection_plan(masters.get(source)?.path(path_index)?)?;
    let inserted = apply_plan(masters.get_mut(source)?.path_mut(path_index)?, plan.clone())?;
    for id in targets.iter() {
        apply_plan(masters.get_mut(id)?.path_mut(path_index)?, plan.clone())?;
    }
    log::info!(
        "Glyph '{}': inserted {} inflection nodes into path {} of {} masters",
        masters.glyph,
        inserted.len(),
        path_index,
        targets.len() + 1
    );
    Ok(inserted)
}

/// Where a path passes closest to a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestHit {
    /// Index of the segment in [`Path::segments`] order
    pub segment: usize,
    /// Parameter along that segment
    pub t: f64,
    /// Distance from the point to the path
    pub distance: f64,
}

/// Find the segment and parameter of `path` closest to `point`.
/// Returns `None` for a path with no segments.
pub fn nearest_on_path(
    path: &Path,
    point: Point2D,
    options: &NearestPointOptions,
) -> Result<Option<NearestHit>, GeometryError> {
    let mut best: Option<NearestHit> = None;
    for (index, seg) in path.segments()?.iter().enumerate() {
        let t = nearest_t(point, &seg.segment, options);
        let hit = NearestHit {
            segment: index,
            t,
            distance: distance(point, seg.segment.eval(t)),
        };
        if best.is_none_or(|b| hit.distance < b.distance) {
            best = Some(hit);
        }
    }
    Ok(best)
}

/// Insert a node on `path` where it passes closest to `point`.
///
/// Returns the new node's index, or `None` if the closest place is an
/// existing on-curve node.
pub fn insert_node_near(
    path: &mut Path,
    point: Point2D,
    options: &NearestPointOptions,
) -> Result<Option<usize>, GeometryError> {
    match nearest_on_path(path, point, options)? {
        Some(hit) if hit.t > 0.0 && hit.t < 1.0 => Ok(Some(path.insert_node(hit.segment, hit.t)?)),
        _ => Ok(None),
    }
}

/// Insert a node near `point` in `source`'s path and at the same segment
/// and parameter in every other master of `group`.
pub fn insert_node_near_in_masters(
    masters: &mut MasterSet,
    source: &str,
    group: &[MasterId],
    path_index: usize,
    point: Point2D,
    options: &NearestPointOptions,
) -> Result<Option<usize>, GeometryError> {
    let targets = masters.compatible_targets(source, group)?;
    let hit = match nearest_on_path(masters.get(source)?.path(path_index)?, point, options)? {
        Some(hit) if hit.t > 0.0 && hit.t < 1.0 => hit,
        _ => return Ok(None),
    };
    let index = masters
        .get_mut(source)?
        .path_mut(path_index)?
        .insert_node(hit.segment, hit.t)?;
    for id in targets.iter() {
        masters
            .get_mut(id)?
            .path_mut(path_index)?
            .insert_node(hit.segment, hit.t)?;
    }
    log::info!(
        "Glyph '{}': inserted node {} at t={:.4} of segment {} in {} masters",
        masters.glyph,
        index,
        hit.t,
        hit.segment,
        targets.len() + 1
    );
    Ok(Some(index))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{geometry::evaluate, master::Outline, Node, NodeKind};
    use pretty_assertions::assert_eq;

    fn open_cubic(points: [(f64, f64); 4]) -> Path {
        let [a, b, c, d] = points;
        Path::new(
            vec![
                Node::new_sharp(a.0, a.1),
                Node::new_offcurve(b.0, b.1),
                Node::new_offcurve(c.0, c.1),
                Node::new_sharp(d.0, d.1),
            ],
            false,
        )
    }

    fn pt(p: (f64, f64)) -> Point2D {
        Point2D::new(p.0, p.1)
    }

    #[test]
    fn test_s_curve_inflection() {
        let mut path = open_cubic([(0.0, 0.0), (0.0, 100.0), (100.0, 0.0), (100.0, 100.0)]);
        let inserted = insert_inflections(&mut path).unwrap();
        assert_eq!(inserted, vec![3]);
        assert_eq!(path.nodes.len(), 7);
        assert_eq!(path.nodes[3].kind, NodeKind::OnCurveSmooth);
        assert!((path.point(3) - Point2D::new(50.0, 50.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_two_inflections() {
        let points = [(0.0, 0.0), (100.0, 50.0), (50.0, 50.0), (100.0, 0.0)];
        let mut path = open_cubic(points);
        let inserted = insert_inflections(&mut path).unwrap();
        assert_eq!(inserted, vec![3, 6]);
        assert_eq!(path.nodes.len(), 10);
        let [a, b, c, d] = points.map(pt);
        let root5 = 5.0_f64.sqrt();
        for (idx, t) in [(3, (5.0 - root5) / 10.0), (6, (5.0 + root5) / 10.0)] {
            assert!((path.point(idx) - evaluate(a, b, c, d, t)).hypot() < 1e-9);
        }
        assert!(path.segments().is_ok());
    }

    #[test]
    fn test_inflection_in_wrapping_segment() {
        // The S-curve closes the path, with its handles at the start of the list
        let mut path = Path::new(
            vec![
                Node::new_offcurve(0.0, 100.0),
                Node::new_offcurve(100.0, 0.0),
                Node::new_sharp(100.0, 100.0),
                Node::new_sharp(0.0, 0.0),
            ],
            true,
        );
        let inserted = insert_inflections(&mut path).unwrap();
        assert_eq!(inserted, vec![2]);
        assert!((path.point(2) - Point2D::new(50.0, 50.0)).hypot() < 1e-9);
        assert_eq!(path.segments().unwrap().len(), 3);
    }

    #[test]
    fn test_no_inflections_in_arc() {
        let mut path = open_cubic([(0.0, 0.0), (0.0, 55.0), (45.0, 100.0), (100.0, 100.0)]);
        let before = path.clone();
        assert!(insert_inflections(&mut path).unwrap().is_empty());
        assert_eq!(path, before);
    }

    #[test]
    fn test_inflections_in_masters() {
        let mut set = MasterSet::new("s");
        set.insert(
            "Light",
            Outline::new(vec![open_cubic([(0.0, 0.0), (0.0, 100.0), (100.0, 0.0), (100.0, 100.0)])]),
        );
        set.insert(
            "Bold",
            Outline::new(vec![open_cubic([(0.0, 0.0), (0.0, 200.0), (200.0, 0.0), (200.0, 200.0)])]),
        );
        let group = set.ids();
        assert_eq!(insert_inflections_in_masters(&mut set, "Light", &group, 0).unwrap(), vec![3]);
        let bold = set.get("Bold").unwrap().path(0).unwrap();
        assert_eq!(bold.nodes.len(), 7);
        assert!((bold.point(3) - Point2D::new(100.0, 100.0)).hypot() < 1e-9);
        assert!(set
            .get("Light")
            .unwrap()
            .is_compatible_with(set.get("Bold").unwrap()));
    }

    #[test]
    fn test_insert_node_near() {
        let mut path = Path::new(
            vec![
                Node::new_sharp(0.0, 0.0),
                Node::new_sharp(100.0, 0.0),
                Node::new_offcurve(100.0, 60.0),
                Node::new_offcurve(0.0, 60.0),
            ],
            true,
        );
        let options = NearestPointOptions::default();
        let hit = nearest_on_path(&path, Point2D::new(50.0, 50.0), &options)
            .unwrap()
            .unwrap();
        assert_eq!(hit.segment, 1);
        assert!((hit.t - 0.5).abs() < 1e-4);
        assert!((hit.distance - 5.0).abs() < 1e-4);

        let idx = insert_node_near(&mut path, Point2D::new(50.0, 50.0), &options)
            .unwrap()
            .unwrap();
        assert_eq!(idx, 4);
        assert!((path.point(4) - Point2D::new(50.0, 45.0)).hypot() < 1e-4);
    }

    #[test]
    fn test_no_insertion_at_endpoint() {
        let mut path = Path::new(
            vec![Node::new_sharp(0.0, 0.0), Node::new_sharp(100.0, 0.0)],
            false,
        );
        let options = NearestPointOptions::default();
        assert_eq!(
            insert_node_near(&mut path, Point2D::new(150.0, -10.0), &options).unwrap(),
            None
        );
        assert_eq!(path.nodes.len(), 2);
        assert_eq!(
            insert_node_near(&mut path, Point2D::new(25.0, 10.0), &options).unwrap(),
            Some(1)
        );
        assert_eq!(path.nodes[1], Node::new_sharp(25.0, 0.0));
    }
}
