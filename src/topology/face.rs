//! Four-sided faces.
//!
//! A face is a closed loop of four edges. Each side records whether the loop
//! runs along its edge from `p1` to `p2` (`forward`) or backwards, so the
//! vertices of the face are well defined: vertex `i` is where side `i` starts.
//!
//! The node lattice of a face has shape `1 × (n_v+1) × (n_u+1)`, where
//! `n_u` is the division count of sides 0 and 2 and `n_v` that of sides 1 and
//! 3. Face coordinates `(fi, fj)` live at lattice index `(0, fj, fi)`; side 0
//! runs along `fj = 0` with increasing `fi`, side 1 along `fi = n_u`, side 2
//! back along `fj = n_v` and side 3 back down `fi = 0`.

use std::collections::BTreeSet;

use crate::data::lattice::{Lattice, LatticeIndex};
use crate::topology::cell_type::CellType;
use crate::topology::handle::{BlockId, EdgeId, ElementTag, FaceId, NodeTag, PointId};

/// One side of a face: an edge and the direction the loop runs along it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Side {
    pub edge: EdgeId,
    pub forward: bool,
}

impl Side {
    /// Index into the edge's node row of the `k`-th point along the side.
    #[inline]
    pub fn edge_index(self, k: usize, ndiv: usize) -> usize {
        if self.forward { k } else { ndiv - k }
    }
}

/// Face coordinates `(fi, fj)` of the `k`-th point along side `side`.
pub fn side_cell(side: usize, k: usize, n_u: usize, n_v: usize) -> (usize, usize) {
    match side % 4 {
        0 => (k, 0),
        1 => (n_u, k),
        2 => (n_u - k, n_v),
        _ => (0, n_v - k),
    }
}

/// Face coordinates of vertex `vertex`.
pub fn vertex_cell(vertex: usize, n_u: usize, n_v: usize) -> (usize, usize) {
    side_cell(vertex, 0, n_u, n_v)
}

/// A topological surface bounded by a closed loop of four edges.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    id: FaceId,
    sides: [Side; 4],
    vertices: [PointId; 4],
    pub(crate) nodes: Option<Lattice<NodeTag>>,
    pub(crate) blocks: BTreeSet<BlockId>,
    pub(crate) elements: Vec<ElementTag>,
}

impl Face {
    /// `vertices[i]` must be the start point of `sides[i]`.
    pub(crate) fn new(id: FaceId, sides: [Side; 4], vertices: [PointId; 4]) -> Self {
        Self {
            id,
            sides,
            vertices,
            nodes: None,
            blocks: BTreeSet::new(),
            elements: Vec::new(),
        }
    }

    /// Tag of this face.
    #[inline]
    pub fn id(&self) -> FaceId {
        self.id
    }

    /// Always [`CellType::Quadrilateral`].
    pub fn cell_type(&self) -> CellType {
        CellType::Quadrilateral
    }

    /// Side `i` (taken modulo 4).
    #[inline]
    pub fn side(&self, i: usize) -> Side {
        self.sides[i % 4]
    }

    /// The four sides in loop order.
    pub fn sides(&self) -> &[Side; 4] {
        &self.sides
    }

    /// Vertex `i` (taken modulo 4).
    #[inline]
    pub fn vertex(&self, i: usize) -> PointId {
        self.vertices[i % 4]
    }

    /// Loop vertices; vertex `i` is where side `i` starts.
    pub fn vertices(&self) -> &[PointId; 4] {
        &self.vertices
    }

    /// Edges of the sides in loop order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.sides.iter().map(|s| s.edge)
    }

    /// Index of the side that runs along `edge`.
    pub fn side_index(&self, edge: EdgeId) -> Option<usize> {
        self.sides.iter().position(|s| s.edge == edge)
    }

    /// Whether `edge` bounds this face.
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.side_index(edge).is_some()
    }

    /// Start and end points of side `i` as the loop traverses it.
    pub fn traversal(&self, i: usize) -> (PointId, PointId) {
        (self.vertex(i), self.vertex(i + 1))
    }

    /// Index (on `self`) of the first side whose edge also bounds `other`.
    pub fn common_edge(&self, other: &Face) -> Option<usize> {
        self.sides.iter().position(|s| other.contains_edge(s.edge))
    }

    /// `1` when both faces traverse `edge` in the same direction, `-1` when
    /// they traverse it in opposite directions, `0` when either face does not
    /// contain it.
    pub fn sense_of_edge(&self, edge: EdgeId, other: &Face) -> i8 {
        let (Some(i), Some(j)) = (self.side_index(edge), other.side_index(edge)) else {
            return 0;
        };
        let (a, b) = self.traversal(i);
        let (c, d) = other.traversal(j);
        if a == c && b == d {
            1
        } else if a == d && b == c {
            -1
        } else {
            0
        }
    }

    /// Edge on the side opposite to `edge`.
    pub fn homologous_side(&self, edge: EdgeId) -> Option<EdgeId> {
        self.side_index(edge).map(|i| self.side(i + 2).edge)
    }

    /// Node lattice, `None` before meshing.
    pub fn nodes(&self) -> Option<&Lattice<NodeTag>> {
        self.nodes.as_ref()
    }

    /// Whether the face owns its node lattice.
    pub fn is_meshed(&self) -> bool {
        self.nodes.is_some()
    }

    /// Node at face coordinates `(fi, fj)`.
    pub fn node(&self, fi: usize, fj: usize) -> Option<NodeTag> {
        self.nodes.as_ref()?.get((0, fj, fi)).copied()
    }

    /// Lattice index of `node` within this face.
    pub fn node_indices(&self, node: NodeTag) -> Option<LatticeIndex> {
        self.nodes.as_ref()?.position(|&n| n == node)
    }

    /// Elements generated over this face.
    pub fn elements(&self) -> &[ElementTag] {
        &self.elements
    }

    /// Blocks this face is placed in.
    pub fn blocks(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks.iter().copied()
    }

    /// Whether this face is placed in `block`.
    pub fn touches_block(&self, block: BlockId) -> bool {
        self.blocks.contains(&block)
    }
}
