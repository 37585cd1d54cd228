//! Six-faced blocks.
//!
//! Slot 0 holds the base face, slots 1..=4 the side faces (slot `s` shares
//! side `s - 1` of the base) and slot 5 the top face. Block vertices 0..4
//! are the base vertices in base order; vertex `v + 4` sits above vertex `v`.
//!
//! The block lattice has shape `(n_k+1) × (n_j+1) × (n_i+1)` where `i` runs
//! from vertex 0 to vertex 1, `j` from vertex 1 to vertex 2 and `k` from
//! vertex 0 to vertex 4.

use crate::data::lattice::{Lattice, LatticeIndex};
use crate::topology::cell_type::CellType;
use crate::topology::handle::{BlockId, ElementTag, FaceId, NodeTag, PointId};

/// Slot of the base face.
pub const BASE: usize = 0;
/// Slot of the top face.
pub const TOP: usize = 5;
/// Number of face slots in a block.
pub const NUM_SLOTS: usize = 6;

/// Block vertices visited by the face in each slot, as a cycle.
pub const SLOT_CYCLES: [[usize; 4]; NUM_SLOTS] = [
    [0, 1, 2, 3],
    [0, 1, 5, 4],
    [1, 2, 6, 5],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
    [4, 5, 6, 7],
];

/// Block edges as vertex pairs: base sides, verticals, top sides.
pub const BLOCK_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
];

/// Unit `(k, j, i)` lattice coordinates of each block vertex.
pub const VERTEX_CELLS: [(usize, usize, usize); 8] = [
    (0, 0, 0),
    (0, 0, 1),
    (0, 1, 1),
    (0, 1, 0),
    (1, 0, 0),
    (1, 0, 1),
    (1, 1, 1),
    (1, 1, 0),
];

/// Lattice index of block vertex `v` for divisions `(n_i, n_j, n_k)`.
pub fn vertex_index(v: usize, n_i: usize, n_j: usize, n_k: usize) -> LatticeIndex {
    let (k, j, i) = VERTEX_CELLS[v % 8];
    (k * n_k, j * n_j, i * n_i)
}

/// How a face sits in its block slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlockFace {
    pub face: FaceId,
    /// Side of `face` lying on the reference edge.
    pub first: usize,
    /// Whether `face` runs along the reference edge the same way as the
    /// composite numbering.
    pub direct: bool,
    /// Slot and side of the face the orientation was resolved against.
    pub reference: Option<(usize, usize)>,
    /// Block vertex sitting at each face vertex.
    pub corners: [usize; 4],
}

impl BlockFace {
    /// Block vertices at the ends of face side `side`.
    pub fn side_vertices(&self, side: usize) -> (usize, usize) {
        (self.corners[side % 4], self.corners[(side + 1) % 4])
    }

    /// Face side joining block vertices `a` and `b`, in either order.
    pub fn side_between(&self, a: usize, b: usize) -> Option<usize> {
        (0..4).find(|&s| {
            let (u, v) = self.side_vertices(s);
            (u == a && v == b) || (u == b && v == a)
        })
    }
}

/// A topological volume bounded by six faces.
///
/// Faces are placed into slots by the orientation resolver; each placement
/// records how the face lattice maps onto the block lattice. Vertices are
/// filled in as faces are placed.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    id: BlockId,
    pub(crate) faces: [Option<BlockFace>; NUM_SLOTS],
    pub(crate) vertices: [Option<PointId>; 8],
    pub(crate) nodes: Option<Lattice<NodeTag>>,
    pub(crate) elements: Vec<ElementTag>,
}

impl Block {
    pub(crate) fn new(id: BlockId) -> Self {
        Self {
            id,
            faces: [None; NUM_SLOTS],
            vertices: [None; 8],
            nodes: None,
            elements: Vec::new(),
        }
    }

    /// Tag of this block.
    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Always [`CellType::Hexahedron`].
    pub fn cell_type(&self) -> CellType {
        CellType::Hexahedron
    }

    /// Placement in `slot`, if a face occupies it.
    pub fn face(&self, slot: usize) -> Option<&BlockFace> {
        self.faces.get(slot)?.as_ref()
    }

    /// Occupied slots with their placements, base first.
    pub fn placed_faces(&self) -> impl Iterator<Item = (usize, &BlockFace)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(slot, f)| f.as_ref().map(|bf| (slot, bf)))
    }

    /// Faces of the block, in slot order.
    pub fn surfaces(&self) -> Vec<FaceId> {
        self.placed_faces().map(|(_, bf)| bf.face).collect()
    }

    /// Slot holding `face`, if it is placed in this block.
    pub fn slot_of(&self, face: FaceId) -> Option<usize> {
        self.placed_faces()
            .find(|(_, bf)| bf.face == face)
            .map(|(slot, _)| slot)
    }

    /// Number of placed faces.
    pub fn num_faces(&self) -> usize {
        self.placed_faces().count()
    }

    /// First empty slot, if any.
    pub fn missing_slot(&self) -> Option<usize> {
        self.faces.iter().position(Option::is_none)
    }

    /// Whether all six slots are filled.
    pub fn is_complete(&self) -> bool {
        self.missing_slot().is_none()
    }

    /// Point at block vertex `i` once a face has fixed it.
    pub fn vertex(&self, i: usize) -> Option<PointId> {
        self.vertices.get(i).copied().flatten()
    }

    /// The eight block vertices; `None` until a placed face fixes them.
    pub fn vertices(&self) -> &[Option<PointId>; 8] {
        &self.vertices
    }

    /// A placed face and its side running along block edge `i`.
    pub fn edge_side(&self, i: usize) -> Option<(FaceId, usize)> {
        let (a, b) = *BLOCK_EDGES.get(i)?;
        self.placed_faces()
            .find_map(|(_, bf)| bf.side_between(a, b).map(|s| (bf.face, s)))
    }

    /// Node lattice, once meshed.
    pub fn nodes(&self) -> Option<&Lattice<NodeTag>> {
        self.nodes.as_ref()
    }

    /// Whether the block owns its node lattice.
    pub fn is_meshed(&self) -> bool {
        self.nodes.is_some()
    }

    /// Lattice index of `node` within this block.
    pub fn node_indices(&self, node: NodeTag) -> Option<LatticeIndex> {
        self.nodes.as_ref()?.position(|&n| n == node)
    }

    /// Elements generated over this block.
    pub fn elements(&self) -> &[ElementTag] {
        &self.elements
    }
}
