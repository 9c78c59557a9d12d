use serde::{Deserialize, Serialize};

use crate::common::Point2D;

/// The role a node plays in its path
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// An on-curve point where the tangent may change direction
    OnCurveSharp,
    /// An on-curve point whose neighbours are collinear with it
    OnCurveSmooth,
    /// A handle controlling the shape of a curve
    OffCurve,
}

impl NodeKind {
    /// Is this an on-curve point?
    pub fn is_on_curve(self) -> bool {
        !matches!(self, NodeKind::OffCurve)
    }

    /// Is this a smooth on-curve point?
    pub fn is_smooth(self) -> bool {
        matches!(self, NodeKind::OnCurveSmooth)
    }
}

/// A point in a path, tagged with its role
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub kind: NodeKind,
}

impl Node {
    pub fn new_sharp(x: f64, y: f64) -> Self {
        Node {
            x,
            y,
            kind: NodeKind::OnCurveSharp,
        }
    }

    pub fn new_smooth(x: f64, y: f64) -> Self {
        Node {
            x,
            y,
            kind: NodeKind::OnCurveSmooth,
        }
    }

    pub fn new_offcurve(x: f64, y: f64) -> Self {
        Node {
            x,
            y,
            kind: NodeKind::OffCurve,
        }
    }

    pub fn to_kurbo(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    pub fn set_position(&mut self, p: Point2D) {
        self.x = p.x;
        self.y = p.y;
    }
}

#[cfg(feature = "ufo")]
mod ufo {
    use super::*;

    impl From<&norad::ContourPoint> for Node {
        fn from(p: &norad::ContourPoint) -> Self {
            Node {
                x: p.x,
                y: p.y,
                kind: match (&p.typ, p.smooth) {
                    (norad::PointType::OffCurve, _) => NodeKind::OffCurve,
                    (_, true) => NodeKind::OnCurveSmooth,
                    (_, false) => NodeKind::OnCurveSharp,
                },
            }
        }
    }
}

#[cfg(feature = "glyphs")]
mod glyphs {
    use super::*;
    use glyphslib::{common::NodeType as GNodeType, glyphs3::Node as G3Node};

    impl From<&G3Node> for Node {
        fn from(val: &G3Node) -> Self {
            Node {
                x: val.x as f64,
                y: val.y as f64,
                kind: match val.node_type {
                    GNodeType::OffCurve => NodeKind::OffCurve,
                    GNodeType::LineSmooth | GNodeType::CurveSmooth | GNodeType::QCurveSmooth => {
                        NodeKind::OnCurveSmooth
                    }
                    GNodeType::Line | GNodeType::Curve | GNodeType::QCurve => {
                        NodeKind::OnCurveSharp
                    }
                },
            }
        }
    }
}
