#![allow(dead_code)]
use multiblock_mesh::{
    algs::reconcile::set_ndiv,
    context::MeshingContext,
    geometry::vector::Pos3d,
    topology::block::BLOCK_EDGES,
    topology::handle::{BlockId, EdgeId, FaceId, PointId},
    topology::multi_block::MultiBlockTopology,
};

/// Edges of each cube face, listed around the loop, in slot order.
pub const FACE_EDGES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [0, 5, 8, 4],
    [1, 6, 9, 5],
    [2, 7, 10, 6],
    [3, 4, 11, 7],
    [8, 9, 10, 11],
];

pub struct Boxed {
    pub topo: MultiBlockTopology,
    pub points: [PointId; 8],
    pub edges: [EdgeId; 12],
    pub faces: [FaceId; 6],
    pub block: BlockId,
}

/// Corners of the axis-aligned box `[0,lx] × [0,ly] × [0,lz]` in block
/// vertex order.
pub fn box_corners(lx: f64, ly: f64, lz: f64) -> [Pos3d; 8] {
    [
        [0.0, 0.0, 0.0],
        [lx, 0.0, 0.0],
        [lx, ly, 0.0],
        [0.0, ly, 0.0],
        [0.0, 0.0, lz],
        [lx, 0.0, lz],
        [lx, ly, lz],
        [0.0, ly, lz],
    ]
}

/// Single block over `corners` with `(n_i, n_j, n_k)` divisions.
pub fn hex_block(corners: [Pos3d; 8], (ni, nj, nk): (usize, usize, usize)) -> Boxed {
    let mut topo = MultiBlockTopology::new();
    let mut ctx = MeshingContext::default();
    let points = corners.map(|c| topo.add_point(c).unwrap());
    let edges = BLOCK_EDGES.map(|(u, v)| topo.add_line(points[u], points[v]).unwrap());
    for (i, &e) in edges.iter().enumerate() {
        let n = match i {
            0 | 2 | 8 | 10 => ni,
            1 | 3 | 9 | 11 => nj,
            _ => nk,
        };
        set_ndiv(&mut topo, &mut ctx, e, n).unwrap();
    }
    let faces = FACE_EDGES.map(|f| topo.add_face(f.map(|i| edges[i])).unwrap());
    let block = topo.add_block_with_faces(&mut ctx, &faces).unwrap();
    assert!(ctx.diagnostics().is_empty());
    Boxed {
        topo,
        points,
        edges,
        faces,
        block,
    }
}

/// Unit cube with `n` divisions along every edge.
pub fn unit_cube(n: usize) -> Boxed {
    hex_block(box_corners(1.0, 1.0, 1.0), (n, n, n))
}

pub fn assert_close(got: Pos3d, want: Pos3d) {
    for d in 0..3 {
        assert!(
            (got[d] - want[d]).abs() < 1e-12,
            "got={got:?}\nwant={want:?}"
        );
    }
}
