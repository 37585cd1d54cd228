mod orientation_tests;

use crate::context::MeshingContext;
use crate::topology::block::BLOCK_EDGES;
use crate::topology::handle::{BlockId, EdgeId, FaceId, PointId};
use crate::topology::multi_block::MultiBlockTopology;

/// Unit cube with points numbered like the block vertices, edges like
/// [`BLOCK_EDGES`] and faces like the block slots.
pub(super) struct Cube {
    pub topo: MultiBlockTopology,
    pub points: [PointId; 8],
    pub edges: [EdgeId; 12],
    pub faces: [FaceId; 6],
}

pub(super) const FACE_EDGES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [0, 5, 8, 4],
    [1, 6, 9, 5],
    [2, 7, 10, 6],
    [3, 4, 11, 7],
    [8, 9, 10, 11],
];

pub(super) fn cube() -> Cube {
    let mut topo = MultiBlockTopology::new();
    let corners = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ];
    let points = corners.map(|c| topo.add_point(c).unwrap());
    let edges = BLOCK_EDGES.map(|(u, v)| topo.add_line(points[u], points[v]).unwrap());
    let faces = FACE_EDGES.map(|f| topo.add_face(f.map(|i| edges[i])).unwrap());
    Cube {
        topo,
        points,
        edges,
        faces,
    }
}

impl Cube {
    /// Block over `faces`, inserted in the given order.
    pub fn block_of(&mut self, faces: &[usize]) -> BlockId {
        let mut ctx = MeshingContext::default();
        let faces: Vec<_> = faces.iter().map(|&i| self.faces[i]).collect();
        self.topo.add_block_with_faces(&mut ctx, &faces).unwrap()
    }
}
