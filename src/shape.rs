use crate::{
    common::{lerp, Node, NodeKind, Point2D},
    geometry::{evaluate, split_cubic},
    GeometryError,
};
use serde::{Deserialize, Serialize};

/// A single drawable piece of a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// A straight line between two on-curve points
    Line(Point2D, Point2D),
    /// A cubic Bezier: on-curve, handle, handle, on-curve
    Cubic(Point2D, Point2D, Point2D, Point2D),
}

impl Segment {
    pub fn start(&self) -> Point2D {
        match self {
            Segment::Line(p0, _) | Segment::Cubic(p0, _, _, _) => *p0,
        }
    }

    pub fn end(&self) -> Point2D {
        match self {
            Segment::Line(_, p1) | Segment::Cubic(_, _, _, p1) => *p1,
        }
    }

    /// The point at parameter `t`
    pub fn eval(&self, t: f64) -> Point2D {
        match *self {
            Segment::Line(p0, p1) => lerp(p0, p1, t),
            Segment::Cubic(p0, p1, p2, p3) => evaluate(p0, p1, p2, p3, t),
        }
    }

    /// Split the segment at `t` into two segments of the same kind
    pub fn split(&self, t: f64) -> (Segment, Segment) {
        match *self {
            Segment::Line(p0, p1) => {
                let mid = lerp(p0, p1, t);
                (Segment::Line(p0, mid), Segment::Line(mid, p1))
            }
            Segment::Cubic(p0, p1, p2, p3) => {
                let (l, r) = split_cubic(p0, p1, p2, p3, t);
                (
                    Segment::Cubic(l[0], l[1], l[2], l[3]),
                    Segment::Cubic(r[0], r[1], r[2], r[3]),
                )
            }
        }
    }

    pub fn to_kurbo(&self) -> kurbo::PathSeg {
        match *self {
            Segment::Line(p0, p1) => kurbo::PathSeg::Line(kurbo::Line::new(p0, p1)),
            Segment::Cubic(p0, p1, p2, p3) => {
                kurbo::PathSeg::Cubic(kurbo::CubicBez::new(p0, p1, p2, p3))
            }
        }
    }
}

/// A segment together with where its nodes live in the path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSegment {
    /// Index of the segment's first on-curve node
    pub start: usize,
    pub segment: Segment,
}

impl PathSegment {
    /// Node indices making up this segment, wrapping around closed paths
    pub fn node_indices(&self, node_count: usize) -> Vec<usize> {
        let len = match self.segment {
            Segment::Line(..) => 2,
            Segment::Cubic(..) => 4,
        };
        (0..len).map(|i| (self.start + i) % node_count).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// A path in a glyph outline
pub struct Path {
    #[serde(
        serialize_with = "crate::serde_helpers::serialize_nodes",
        deserialize_with = "crate::serde_helpers::deserialize_nodes"
    )]
    /// A list of nodes in the path
    pub nodes: Vec<Node>,
    /// Whether the path is closed
    pub closed: bool,
}

impl Path {
    pub fn new(nodes: Vec<Node>, closed: bool) -> Self {
        Path { nodes, closed }
    }

    /// Index of the node before `idx`, if any
    pub fn prev_index(&self, idx: usize) -> Option<usize> {
        if idx > 0 {
            Some(idx - 1)
        } else if self.closed && !self.nodes.is_empty() {
            Some(self.nodes.len() - 1)
        } else {
            None
        }
    }

    /// Index of the node after `idx`, if any
    pub fn next_index(&self, idx: usize) -> Option<usize> {
        if idx + 1 < self.nodes.len() {
            Some(idx + 1)
        } else if self.closed && !self.nodes.is_empty() {
            Some(0)
        } else {
            None
        }
    }

    /// Position of node `idx`, if there is one
    pub fn get_point(&self, idx: usize) -> Option<Point2D> {
        self.nodes.get(idx).map(Node::to_kurbo)
    }

    // Callers have already checked `idx` against the node list
    pub(crate) fn point(&self, idx: usize) -> Point2D {
        self.nodes[idx].to_kurbo()
    }

    /// Split the node list into line and cubic segments.
    ///
    /// Each segment runs from an on-curve node to the next one; zero
    /// handles between them make a line and two make a cubic. Any other
    /// count (quadratic runs, stray handles) is a [`GeometryError::BadPath`].
    pub fn segments(&self) -> Result<Vec<PathSegment>, GeometryError> {
        let n = self.nodes.len();
        let on_curves: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.kind.is_on_curve())
            .map(|(i, _)| i)
            .collect();
        if n == 0 {
            return Ok(vec![]);
        }
        if on_curves.is_empty() {
            return Err(GeometryError::BadPath);
        }
        if !self.closed && (on_curves[0] != 0 || on_curves[on_curves.len() - 1] != n - 1) {
            return Err(GeometryError::BadPath);
        }
        let pairs = if self.closed {
            on_curves.len()
        } else {
            on_curves.len() - 1
        };
        let mut segments = Vec::with_capacity(pairs);
        for i in 0..pairs {
            let start = on_curves[i];
            let end = on_curves[(i + 1) % on_curves.len()];
            // A closed path with a single on-curve node wraps onto itself
            let gap = match (end + n - start) % n {
                0 => n,
                gap => gap,
            };
            let segment = match gap {
                1 => Segment::Line(self.point(start), self.point(end)),
                3 => Segment::Cubic(
                    self.point(start),
                    self.point((start + 1) % n),
                    self.point((start + 2) % n),
                    self.point(end),
                ),
                _ => return Err(GeometryError::BadPath),
            };
            segments.push(PathSegment { start, segment });
        }
        Ok(segments)
    }

    /// The 0/1 on-curve/off-curve pattern of the path. Two paths can be
    /// edited index-for-index only if their signatures match.
    pub fn signature(&self) -> Vec<u8> {
        self.nodes
            .iter()
            .map(|node| if node.kind.is_on_curve() { 0 } else { 1 })
            .collect()
    }

    pub fn is_compatible_with(&self, other: &Path) -> bool {
        self.closed == other.closed && self.signature() == other.signature()
    }

    /// Split segment `segment_index` at `t` and insert the new nodes.
    ///
    /// Returns the index of the new on-curve node. A cubic split yields a
    /// smooth node with its two new handles; a line split yields a sharp node.
    pub fn insert_node(&mut self, segment_index: usize, t: f64) -> Result<usize, GeometryError> {
        if !(t > 0.0 && t < 1.0) {
            return Err(GeometryError::DegenerateSegment);
        }
        let segments = self.segments()?;
        let seg = segments
            .get(segment_index)
            .ok_or(GeometryError::SegmentNotFound {
                segment: segment_index,
            })?;
        let n = self.nodes.len();
        match seg.segment.split(t) {
            (Segment::Line(_, mid), _) => {
                let at = seg.start + 1;
                self.nodes.insert(at, Node::new_sharp(mid.x, mid.y));
                Ok(at)
            }
            (Segment::Cubic(_, l1, l2, mid), Segment::Cubic(_, r1, r2, _)) => {
                let h1 = (seg.start + 1) % n;
                let h2 = (seg.start + 2) % n;
                self.nodes[h1].set_position(l1);
                self.nodes[h2].set_position(r2);
                let at = h1 + 1;
                let new_nodes = [
                    Node::new_offcurve(l2.x, l2.y),
                    Node::new_smooth(mid.x, mid.y),
                    Node::new_offcurve(r1.x, r1.y),
                ];
                for (offset, node) in new_nodes.into_iter().enumerate() {
                    self.nodes.insert(at + offset, node);
                }
                Ok(at + 1)
            }
            _ => Err(GeometryError::BadPath),
        }
    }

    /// Converts the `Path` to a [`kurbo::BezPath`].
    pub fn to_kurbo(&self) -> Result<kurbo::BezPath, GeometryError> {
        let mut path = kurbo::BezPath::new();
        let segments = self.segments()?;
        if let Some(first) = segments.first() {
            path.move_to(first.segment.start());
        }
        for seg in segments {
            match seg.segment {
                Segment::Line(_, p1) => path.line_to(p1),
                Segment::Cubic(_, p1, p2, p3) => path.curve_to(p1, p2, p3),
            }
        }
        if self.closed {
            path.close_path()
        }
        Ok(path)
    }
}

#[cfg(feature = "ufo")]
mod ufo {
    use super::*;

    impl From<&norad::Contour> for Path {
        fn from(c: &norad::Contour) -> Self {
            Path {
                nodes: c.points.iter().map(|p| p.into()).collect(),
                closed: c
                    .points
                    .first()
                    .is_none_or(|v| v.typ != norad::PointType::Move),
            }
        }
    }
}

#[cfg(feature = "glyphs")]
mod glyphs {
    use super::*;
    use glyphslib::{common::NodeType as GNodeType, glyphs3::Node as G3Node};

    impl From<&glyphslib::glyphs3::Path> for Path {
        fn from(val: &glyphslib::glyphs3::Path) -> Self {
            Path {
                nodes: val.nodes.iter().map(|n| n.into()).collect(),
                closed: val.closed,
            }
        }
    }

    impl Path {
        /// Nodes in Glyphs 3 form; line and curve on-curves are told apart
        /// by whether a handle precedes them.
        pub fn to_glyphs3_nodes(&self) -> Vec<G3Node> {
            self.nodes
                .iter()
                .enumerate()
                .map(|(i, node)| {
                    let after_handle = self
                        .prev_index(i)
                        .is_some_and(|p| self.nodes[p].kind == NodeKind::OffCurve);
                    G3Node {
                        x: node.x as f32,
                        y: node.y as f32,
                        node_type: match (node.kind, after_handle) {
                            (NodeKind::OffCurve, _) => GNodeType::OffCurve,
                            (NodeKind::OnCurveSharp, false) => GNodeType::Line,
                            (NodeKind::OnCurveSmooth, false) => GNodeType::LineSmooth,
                            (NodeKind::OnCurveSharp, true) => GNodeType::Curve,
                            (NodeKind::OnCurveSmooth, true) => GNodeType::CurveSmooth,
                        },
                        user_data: None,
                    }
                })
                .collect()
        }
    }
}
