//! Topology validation helpers.
//!
//! These checks never mutate the topology. Single-entity checks return the
//! first problem found; [`validate_topology`] walks every face and block and
//! collects all of them.

use crate::mesh_error::MeshError;
use crate::topology::block::{BASE, BLOCK_EDGES, NUM_SLOTS};
use crate::topology::handle::{BlockId, EntityRef, FaceId};
use crate::topology::multi_block::MultiBlockTopology;

/// Block edges that run parallel to the `i`, `j` and `k` lattice directions.
pub const PARALLEL_EDGES: [[usize; 4]; 3] = [[0, 2, 8, 10], [1, 3, 9, 11], [4, 5, 6, 7]];

/// Optional toggles for [`validate_topology`].
#[derive(Debug, Clone, Copy)]
pub struct TopologyValidationOptions {
    /// Opposite face sides must have the same number of divisions.
    pub check_face_ndivs: bool,
    /// Parallel block edges must have the same number of divisions.
    pub check_block_ndivs: bool,
    /// Blocks must have all six faces placed.
    pub require_complete_blocks: bool,
}

impl TopologyValidationOptions {
    /// Enable all topology validation checks.
    pub fn all() -> Self {
        Self {
            check_face_ndivs: true,
            check_block_ndivs: true,
            require_complete_blocks: true,
        }
    }
}

impl Default for TopologyValidationOptions {
    fn default() -> Self {
        Self::all()
    }
}

/// The sides of `face` still chain end to start around the loop.
pub fn check_face_loop(topo: &MultiBlockTopology, face: FaceId) -> Result<(), MeshError> {
    let f = topo.face(face)?;
    for (i, side) in f.sides().iter().enumerate() {
        let edge = topo.edge(side.edge)?;
        let (start, end) = if side.forward {
            (edge.p1(), edge.p2())
        } else {
            (edge.p2(), edge.p1())
        };
        if (start, end) != f.traversal(i) {
            return Err(MeshError::OpenFaceLoop { face, side: i });
        }
    }
    Ok(())
}

/// Opposite sides of `face` agree on their divisions.
pub fn check_face_ndivs(topo: &MultiBlockTopology, face: FaceId) -> Result<(), MeshError> {
    let f = topo.face(face)?;
    for i in 0..2 {
        let a = topo.edge(f.side(i).edge)?.ndiv();
        let b = topo.edge(f.side(i + 2).edge)?.ndiv();
        if a != b {
            return Err(MeshError::NDivMismatch {
                entity: EntityRef::Face(face),
                first: a,
                second: b,
            });
        }
    }
    Ok(())
}

/// Parallel edges of `block` agree on their divisions.
pub fn check_block_ndivs(topo: &MultiBlockTopology, block: BlockId) -> Result<(), MeshError> {
    for group in PARALLEL_EDGES {
        let mut reference: Option<usize> = None;
        for i in group {
            let Some(edge) = topo.block_edge(block, i)? else {
                continue;
            };
            let n = topo.edge(edge)?.ndiv();
            match reference {
                None => reference = Some(n),
                Some(r) if r != n => {
                    return Err(MeshError::NDivMismatch {
                        entity: EntityRef::Block(block),
                        first: r,
                        second: n,
                    });
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

/// Completeness, side/base adjacency, vertex consistency and divisions.
pub fn validate_block(topo: &MultiBlockTopology, block: BlockId) -> Result<(), MeshError> {
    let b = topo.block(block)?;
    if let Some(slot) = b.missing_slot() {
        return Err(MeshError::IncompleteBlock { block, slot });
    }
    let base = match b.face(BASE) {
        Some(bf) => topo.face(bf.face)?,
        None => return Err(MeshError::IncompleteBlock { block, slot: BASE }),
    };
    for slot in 1..NUM_SLOTS - 1 {
        let Some(bf) = b.face(slot) else {
            return Err(MeshError::IncompleteBlock { block, slot });
        };
        let face = topo.face(bf.face)?;
        let shared = face.edges().filter(|&e| base.contains_edge(e)).count();
        if shared != 1 {
            return Err(MeshError::NoCommonEdge {
                block,
                face: bf.face,
                other: base.id(),
            });
        }
    }
    for (i, &(u, v)) in BLOCK_EDGES.iter().enumerate() {
        let (Some(p), Some(q)) = (b.vertex(u), b.vertex(v)) else {
            return Err(MeshError::IncompleteBlock {
                block,
                slot: NUM_SLOTS - 1,
            });
        };
        let Some((face, side)) = b.edge_side(i) else {
            return Err(MeshError::IncompleteBlock {
                block,
                slot: NUM_SLOTS - 1,
            });
        };
        let edge = topo.edge(topo.face(face)?.side(side).edge)?;
        if !edge.has_endpoints(p, q) {
            return Err(MeshError::UnresolvedOrientation { block, face });
        }
    }
    check_block_ndivs(topo, block)
}

/// Runs the selected checks over every face and block, logging and
/// collecting every problem found.
pub fn validate_topology(
    topo: &MultiBlockTopology,
    options: TopologyValidationOptions,
) -> Vec<MeshError> {
    let mut problems = Vec::new();
    for face in topo.face_ids() {
        if let Err(e) = check_face_loop(topo, face) {
            problems.push(e);
        }
        if options.check_face_ndivs {
            if let Err(e) = check_face_ndivs(topo, face) {
                problems.push(e);
            }
        }
    }
    for block in topo.block_ids() {
        let result = if options.require_complete_blocks {
            validate_block(topo, block)
        } else if options.check_block_ndivs {
            check_block_ndivs(topo, block)
        } else {
            Ok(())
        };
        if let Err(e) = result {
            problems.push(e);
        }
    }
    for p in &problems {
        log::warn!("{p}");
    }
    problems
}
