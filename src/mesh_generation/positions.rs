//! Lattice positions and face-to-block index maps.
//!
//! Positions always come from geometry: edges from their curves, faces from
//! a Coons blend of their four sides, blocks from a transfinite blend of the
//! face positions mapped onto the block hull. Stored node positions are only
//! ever compared against them.

use crate::data::lattice::{Lattice, LatticeIndex};
use crate::geometry::interpolation::{transfinite_hex, transfinite_quad};
use crate::geometry::vector::Pos3d;
use crate::mesh_error::MeshError;
use crate::topology::block::{BlockFace, vertex_index};
use crate::topology::face::Side;
use crate::topology::handle::{BlockId, EntityRef, FaceId};
use crate::topology::multi_block::MultiBlockTopology;

/// Division counts `(n_u, n_v)` of a face, checking opposite sides agree.
pub(crate) fn face_divisions(
    topo: &MultiBlockTopology,
    face: FaceId,
) -> Result<(usize, usize), MeshError> {
    let f = topo.face(face)?;
    let ndiv = |s: usize| topo.edge(f.side(s).edge).map(|e| e.ndiv());
    let mut out = [0; 2];
    for (d, slot) in out.iter_mut().enumerate() {
        let (a, b) = (ndiv(d)?, ndiv(d + 2)?);
        if a != b {
            return Err(MeshError::NDivMismatch {
                entity: EntityRef::Face(face),
                first: a,
                second: b,
            });
        }
        *slot = a;
    }
    Ok((out[0], out[1]))
}

/// Edge positions of `side`, read in the direction the face loop runs.
fn side_positions(topo: &MultiBlockTopology, side: Side) -> Result<Vec<Pos3d>, MeshError> {
    let along_edge = topo.edge_positions(side.edge)?;
    let ndiv = along_edge.len().saturating_sub(1);
    Ok((0..=ndiv)
        .map(|k| along_edge[side.edge_index(k, ndiv)])
        .collect())
}

/// Positions of every cell of a face lattice, blended from the geometry of
/// its four sides.
pub(crate) fn face_positions(
    topo: &MultiBlockTopology,
    face: FaceId,
) -> Result<Lattice<Pos3d>, MeshError> {
    let (n_u, n_v) = face_divisions(topo, face)?;
    let f = topo.face(face)?;
    let s0 = side_positions(topo, f.side(0))?;
    let s1 = side_positions(topo, f.side(1))?;
    let s2 = side_positions(topo, f.side(2))?;
    let s3 = side_positions(topo, f.side(3))?;
    let top: Vec<Pos3d> = (0..=n_u).map(|fi| s2[n_u - fi]).collect();
    let left: Vec<Pos3d> = (0..=n_v).map(|fj| s3[n_v - fj]).collect();
    Ok(transfinite_quad(&s0, &s1, &top, &left))
}

/// Positions of every cell of a block lattice with `(n_i, n_j, n_k)`
/// divisions.
///
/// The hull is taken from the geometry of the placed faces, never from the
/// nodes they hold, and the interior is blended from it.
pub(crate) fn block_positions(
    topo: &MultiBlockTopology,
    block: BlockId,
    (n_i, n_j, n_k): (usize, usize, usize),
) -> Result<Lattice<Pos3d>, MeshError> {
    let mut hull = Lattice::filled(n_k + 1, n_j + 1, n_i + 1, [0.0; 3]);
    for (_, placement) in topo.block(block)?.placed_faces() {
        let face = face_positions(topo, placement.face)?;
        let (_, rows, cols) = face.shape();
        let map = FaceMap::new(
            block,
            placement,
            (cols.saturating_sub(1), rows.saturating_sub(1)),
            (n_i, n_j, n_k),
        )?;
        for ((_, fj, fi), &p) in face.indexed_iter() {
            hull[map.cell(fi, fj)] = p;
        }
    }
    Ok(transfinite_hex(&hull))
}

/// Affine map from face coordinates `(fi, fj)` to block lattice indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FaceMap {
    origin: [i64; 3],
    du: [i64; 3],
    dv: [i64; 3],
}

impl FaceMap {
    /// Map for a face placed as `placement`, with `(n_u, n_v)` divisions, in
    /// a block with `(n_i, n_j, n_k)` divisions.
    ///
    /// Each face direction must run along a single block axis over exactly
    /// as many divisions as the face has.
    pub(crate) fn new(
        block: BlockId,
        placement: &BlockFace,
        (n_u, n_v): (usize, usize),
        (n_i, n_j, n_k): (usize, usize, usize),
    ) -> Result<Self, MeshError> {
        let corner = |m: usize| {
            let (k, j, i) = vertex_index(placement.corners[m], n_i, n_j, n_k);
            [k as i64, j as i64, i as i64]
        };
        let origin = corner(0);
        let step = |to: [i64; 3], n: usize| -> Result<[i64; 3], MeshError> {
            let d = [to[0] - origin[0], to[1] - origin[1], to[2] - origin[2]];
            let span: i64 = d.iter().map(|x| x.abs()).sum();
            let axes = d.iter().filter(|&&x| x != 0).count();
            if n == 0 || axes != 1 || span != n as i64 {
                return Err(MeshError::NDivMismatch {
                    entity: EntityRef::Block(block),
                    first: span as usize,
                    second: n,
                });
            }
            let n = n as i64;
            Ok([d[0] / n, d[1] / n, d[2] / n])
        };
        Ok(Self {
            origin,
            du: step(corner(1), n_u)?,
            dv: step(corner(3), n_v)?,
        })
    }

    /// Block lattice index of face cell `(fi, fj)`.
    pub(crate) fn cell(&self, fi: usize, fj: usize) -> LatticeIndex {
        let at = |a: usize| {
            (self.origin[a] + self.du[a] * fi as i64 + self.dv[a] * fj as i64).max(0) as usize
        };
        (at(0), at(1), at(2))
    }
}
