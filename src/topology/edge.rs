//! Edges: one-dimensional entities bounded by points.
//!
//! An [`Edge`] keeps the requested number of divisions, the node row produced
//! by meshing and back-references to the faces that use it. Its shape is a
//! closed set of kinds ([`EdgeKind`]); resolving the kind against point
//! positions yields an [`EdgeGeometry`] that carries the interpolation.

use std::collections::BTreeSet;

use crate::geometry::arc::CircularSector;
use crate::geometry::interpolation::{linear_positions, polyline_length, polyline_positions};
use crate::geometry::vector::{Pos3d, dist};
use crate::topology::cell_type::CellType;
use crate::topology::handle::{BlockId, EdgeId, ElementTag, FaceId, NodeTag, PointId};

/// Shape of an edge, expressed in terms of the points it references.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EdgeKind {
    /// Straight segment from `p1` to `p2`.
    Line { p1: PointId, p2: PointId },
    /// Circular arc from `p1` to `p2` passing through `mid`.
    CircularArc {
        p1: PointId,
        p2: PointId,
        mid: PointId,
    },
    /// Chain of straight pieces; first and last vertices are the endpoints.
    Polyline { vertices: Vec<PointId> },
}

impl EdgeKind {
    /// Start point.
    pub fn p1(&self) -> Option<PointId> {
        match self {
            EdgeKind::Line { p1, .. } | EdgeKind::CircularArc { p1, .. } => Some(*p1),
            EdgeKind::Polyline { vertices } => vertices.first().copied(),
        }
    }

    /// End point.
    pub fn p2(&self) -> Option<PointId> {
        match self {
            EdgeKind::Line { p2, .. } | EdgeKind::CircularArc { p2, .. } => Some(*p2),
            EdgeKind::Polyline { vertices } => vertices.last().copied(),
        }
    }

    /// Every point the edge references: endpoints first, then the arc
    /// midpoint or the inner polyline vertices.
    pub fn key_points(&self) -> Vec<PointId> {
        match self {
            EdgeKind::Line { p1, p2 } => vec![*p1, *p2],
            EdgeKind::CircularArc { p1, p2, mid } => vec![*p1, *p2, *mid],
            EdgeKind::Polyline { vertices } => match vertices.as_slice() {
                [] => Vec::new(),
                [only] => vec![*only],
                [first, inner @ .., last] => {
                    let mut out = vec![*first, *last];
                    out.extend_from_slice(inner);
                    out
                }
            },
        }
    }

    pub fn cell_type(&self) -> CellType {
        match self {
            EdgeKind::Line { .. } => CellType::Segment,
            EdgeKind::CircularArc { .. } => CellType::QuadraticSegment,
            EdgeKind::Polyline { .. } => CellType::PolyLine,
        }
    }
}

/// Edge shape resolved against point positions.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeGeometry {
    Line(Pos3d, Pos3d),
    Arc(CircularSector),
    Polyline(Vec<Pos3d>),
}

impl EdgeGeometry {
    /// Length of the resolved curve.
    pub fn length(&self) -> f64 {
        match self {
            EdgeGeometry::Line(a, b) => dist(*a, *b),
            EdgeGeometry::Arc(sector) => sector.length(),
            EdgeGeometry::Polyline(vertices) => polyline_length(vertices),
        }
    }

    /// `ndiv + 1` positions from the start point to the end point.
    pub fn positions(&self, ndiv: usize) -> Vec<Pos3d> {
        match self {
            EdgeGeometry::Line(a, b) => linear_positions(*a, *b, ndiv),
            EdgeGeometry::Arc(sector) => sector.positions(ndiv),
            EdgeGeometry::Polyline(vertices) => polyline_positions(vertices, ndiv),
        }
    }
}

/// A one-dimensional entity between two points.
///
/// `ndiv` is the requested division count; once meshed, `nodes` holds
/// `ndiv + 1` node tags from `p1` to `p2` and the count is frozen.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    id: EdgeId,
    kind: EdgeKind,
    ends: (PointId, PointId),
    pub(crate) ndiv: usize,
    pub(crate) nodes: Vec<NodeTag>,
    pub(crate) faces: BTreeSet<FaceId>,
    pub(crate) blocks: BTreeSet<BlockId>,
    pub(crate) elements: Vec<ElementTag>,
}

impl Edge {
    /// `None` when the kind has no endpoints (an empty polyline).
    pub(crate) fn new(id: EdgeId, kind: EdgeKind) -> Option<Self> {
        let ends = (kind.p1()?, kind.p2()?);
        Some(Self {
            id,
            kind,
            ends,
            ndiv: 0,
            nodes: Vec::new(),
            faces: BTreeSet::new(),
            blocks: BTreeSet::new(),
            elements: Vec::new(),
        })
    }

    /// Tag of this edge.
    #[inline]
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Shape of the edge and the points it references.
    pub fn kind(&self) -> &EdgeKind {
        &self.kind
    }

    /// Start point.
    #[inline]
    pub fn p1(&self) -> PointId {
        self.ends.0
    }

    /// End point.
    #[inline]
    pub fn p2(&self) -> PointId {
        self.ends.1
    }

    /// Every point the edge references, endpoints first.
    pub fn key_points(&self) -> Vec<PointId> {
        self.kind.key_points()
    }

    pub fn cell_type(&self) -> CellType {
        self.kind.cell_type()
    }

    /// Requested number of divisions (0 until assigned).
    #[inline]
    pub fn ndiv(&self) -> usize {
        self.ndiv
    }

    /// An edge is meshed once its node row exists; `ndiv` is then frozen.
    pub fn is_meshed(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Node row from `p1` to `p2`, empty before meshing.
    pub fn nodes(&self) -> &[NodeTag] {
        &self.nodes
    }

    /// Node `k` counted from `p1`.
    pub fn node(&self, k: usize) -> Option<NodeTag> {
        self.nodes.get(k).copied()
    }

    /// Node tags from `p1` to `p2`.
    pub fn node_tags_forward(&self) -> Vec<NodeTag> {
        self.nodes.clone()
    }

    /// Node tags from `p2` to `p1`.
    pub fn node_tags_reverse(&self) -> Vec<NodeTag> {
        self.nodes.iter().rev().copied().collect()
    }

    /// Node tags read in the given direction.
    pub fn node_tags(&self, forward: bool) -> Vec<NodeTag> {
        if forward {
            self.node_tags_forward()
        } else {
            self.node_tags_reverse()
        }
    }

    /// Elements generated over this edge.
    pub fn elements(&self) -> &[ElementTag] {
        &self.elements
    }

    /// True if the edge joins `p` and `q`, in either order.
    pub fn has_endpoints(&self, p: PointId, q: PointId) -> bool {
        let (a, b) = (self.p1(), self.p2());
        (a == p && b == q) || (a == q && b == p)
    }

    /// Whether `p` is `p1` or `p2`.
    pub fn is_endpoint(&self, p: PointId) -> bool {
        self.p1() == p || self.p2() == p
    }

    /// The endpoint that is not `p`.
    pub fn opposite_endpoint(&self, p: PointId) -> Option<PointId> {
        if self.p1() == p {
            Some(self.p2())
        } else if self.p2() == p {
            Some(self.p1())
        } else {
            None
        }
    }

    /// Faces using this edge.
    pub fn faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.iter().copied()
    }

    /// Number of faces using this edge; above one the edge is shared.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Whether `face` uses this edge.
    pub fn touches_face(&self, face: FaceId) -> bool {
        self.faces.contains(&face)
    }

    /// Blocks reached through the faces of this edge.
    pub fn blocks(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks.iter().copied()
    }

    /// Whether `block` uses this edge through one of its faces.
    pub fn touches_block(&self, block: BlockId) -> bool {
        self.blocks.contains(&block)
    }
}
