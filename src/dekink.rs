//! Keeping smooth connections proportional across masters.
//!
//! A smooth node and its two neighbours lie on one line. If the node sits
//! at different relative positions along that line in different masters,
//! interpolated instances show a kink. Dekinking measures the relative
//! position in one master and reproduces it in the others.

use crate::{
    common::{distance, Point2D, EPSILON},
    master::{MasterId, MasterSet},
    GeometryError, NodeKind, Path,
};

/// Which member of the collinear triplet is being synchronized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripletRole {
    /// The smooth node itself, between its neighbours
    Middle,
    /// The far end of the triplet, next to a smooth node
    End,
}

/// Three collinear nodes around a smooth on-curve node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothTriplet {
    /// The node at the start of the line
    pub start: usize,
    /// The smooth on-curve node
    pub middle: usize,
    /// The node at the end of the line
    pub end: usize,
    /// Whether the moved node is `middle` or `end`
    pub role: TripletRole,
}

impl SmoothTriplet {
    /// Index of the node that gets repositioned
    pub fn moved(&self) -> usize {
        match self.role {
            TripletRole::Middle => self.middle,
            TripletRole::End => self.end,
        }
    }

    /// Position of the middle node along start-end, as a fraction of the span
    pub fn ratio(&self, path: &Path) -> Result<f64, GeometryError> {
        let (a, b, c) = self.points(path);
        let span = distance(a, c);
        if span < EPSILON {
            return Err(GeometryError::DegenerateSegment);
        }
        Ok(distance(a, b) / span)
    }

    /// Where the moved node has to go for the triplet to have `ratio`
    pub fn resolve(&self, path: &Path, ratio: f64) -> Result<Point2D, GeometryError> {
        let (a, b, c) = self.points(path);
        match self.role {
            TripletRole::Middle => Ok(a + (c - a) * ratio),
            TripletRole::End => {
                if ratio < EPSILON {
                    return Err(GeometryError::DegenerateSegment);
                }
                Ok(a + (b - a) / ratio)
            }
        }
    }

    fn points(&self, path: &Path) -> (Point2D, Point2D, Point2D) {
        (
            path.point(self.start),
            path.point(self.middle),
            path.point(self.end),
        )
    }
}

/// Find the collinear triplet that node `node` of path `path_index` belongs to.
///
/// A smooth on-curve node is the middle of its own triplet. Any other node
/// next to a smooth on-curve node is the end of that node's triplet; the
/// triplet is then measured from the far side so the selected node is the
/// one that moves.
pub fn find_triplet(
    path: &Path,
    path_index: usize,
    node: usize,
) -> Result<SmoothTriplet, GeometryError> {
    let not_smooth = GeometryError::NotSmooth {
        path: path_index,
        node,
    };
    let kind = path
        .nodes
        .get(node)
        .ok_or(GeometryError::NodeNotFound {
            path: path_index,
            node,
        })?
        .kind;
    let neighbours = |idx: usize| -> Option<(usize, usize)> {
        Some((path.prev_index(idx)?, path.next_index(idx)?))
    };

    if kind == NodeKind::OnCurveSmooth {
        let (start, end) = neighbours(node).ok_or(not_smooth)?;
        return Ok(SmoothTriplet {
            start,
            middle: node,
            end,
            role: TripletRole::Middle,
        });
    }
    let candidates = [path.prev_index(node), path.next_index(node)];
    for middle in candidates.into_iter().flatten() {
        if path.nodes[middle].kind != NodeKind::OnCurveSmooth {
            continue;
        }
        if let Some((before, after)) = neighbours(middle) {
            let start = if before == node { after } else { before };
            if start == node {
                continue;
            }
            return Ok(SmoothTriplet {
                start,
                middle,
                end: node,
                role: TripletRole::End,
            });
        }
    }
    Err(not_smooth)
}

/// What a dekink did
#[derive(Debug, Clone, PartialEq)]
pub struct DekinkReport {
    /// The ratio measured in the source master
    pub ratio: f64,
    /// Masters whose node was repositioned
    pub updated: Vec<MasterId>,
    /// Masters whose own triplet was degenerate, left as they were
    pub skipped: Vec<MasterId>,
}

/// Reproduce the relative position of a smooth-connection node from
/// `source` in every other master of `group`.
///
/// All masters of the group are checked for compatibility first; if any
/// differs from the source, nothing is changed and
/// [`GeometryError::IncompatibleTopology`] names the offenders.
pub fn dekink(
    masters: &mut MasterSet,
    source: &str,
    group: &[MasterId],
    path_index: usize,
    node: usize,
) -> Result<DekinkReport, GeometryError> {
    let targets = masters.compatible_targets(source, group)?;
    let source_path = masters.get(source)?.path(path_index)?;
    let triplet = find_triplet(source_path, path_index, node)?;
    let ratio = triplet.ratio(source_path)?;
    log::debug!(
        "Glyph '{}': node {} of path {} sits at {:.6} in {}",
        masters.glyph,
        node,
        path_index,
        ratio,
        source
    );

    // Work everything out before touching anything
    let mut moves = vec![];
    let mut skipped = vec![];
    for id in targets {
        let path = masters.get(&id)?.path(path_index)?;
        match triplet.resolve(path, ratio) {
            Ok(position) => moves.push((id, position)),
            Err(e) => {
                log::warn!("Glyph '{}': not dekinking {}: {}", masters.glyph, id, e);
                skipped.push(id);
            }
        }
    }
    let mut updated = vec![];
    for (id, position) in moves {
        masters.get_mut(&id)?.path_mut(path_index)?.nodes[triplet.moved()].set_position(position);
        updated.push(id);
    }
    log::info!(
        "Glyph '{}': dekinked node {} of path {} in {} masters",
        masters.glyph,
        node,
        path_index,
        updated.len()
    );
    Ok(DekinkReport {
        ratio,
        updated,
        skipped,
    })
}

/// Dekink every smooth on-curve node of every path, using `source` as the
/// reference master.
pub fn dekink_all(
    masters: &mut MasterSet,
    source: &str,
    group: &[MasterId],
) -> Result<usize, GeometryError> {
    masters.compatible_targets(source, group)?;
    let smooth_nodes: Vec<(usize, usize)> = masters
        .get(source)?
        .paths
        .iter()
        .enumerate()
        .flat_map(|(p, path)| {
            path.nodes
                .iter()
                .enumerate()
                .filter(|(_, node)| node.kind == NodeKind::OnCurveSmooth)
                .map(move |(n, _)| (p, n))
        })
        .collect();
    let mut count = 0;
    for (path_index, node) in smooth_nodes {
        match dekink(masters, source, group, path_index, node) {
            Ok(_) => count += 1,
            Err(GeometryError::NotSmooth { .. }) | Err(GeometryError::DegenerateSegment) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(count)
}
