//! Division reconciliation across shared edges.
//!
//! A division count on an edge shared by several faces only ever grows: the
//! value kept is the largest one requested. Meshed edges are frozen. The
//! homologous-edge search walks face opposites breadth-first so a count can
//! be pushed across a whole structured region.

use std::collections::{BTreeSet, VecDeque};

use crate::context::MeshingContext;
use crate::mesh_error::MeshError;
use crate::topology::handle::{EdgeId, FaceId};
use crate::topology::multi_block::MultiBlockTopology;

/// Requests `n` divisions on `edge` and returns the count it ends up with.
///
/// Shared edges keep `max(current, n)`; unshared edges take `n`. A meshed
/// edge rejects any different value with
/// [`MeshError::EdgeAlreadyMeshed`], reported to `ctx`.
pub fn set_ndiv(
    topo: &mut MultiBlockTopology,
    ctx: &mut MeshingContext,
    edge: EdgeId,
    n: usize,
) -> Result<usize, MeshError> {
    let e = topo.edge_mut(edge)?;
    if e.ndiv == n {
        return Ok(n);
    }
    if e.is_meshed() {
        let err = MeshError::EdgeAlreadyMeshed {
            edge,
            ndiv: e.ndiv,
            requested: n,
        };
        return Err(ctx.fail(edge.into(), err));
    }
    let resolved = if e.num_faces() > 1 { e.ndiv.max(n) } else { n };
    if resolved != n && ctx.verbosity > 2 {
        log::debug!(
            "edge {edge} is shared by {} faces; keeping ndiv={resolved} (requested {n})",
            e.num_faces()
        );
    }
    e.ndiv = resolved;
    Ok(resolved)
}

/// Divides `edge` so that no piece is longer than `size`.
pub fn set_element_size(
    topo: &mut MultiBlockTopology,
    ctx: &mut MeshingContext,
    edge: EdgeId,
    size: f64,
) -> Result<usize, MeshError> {
    let n = divisions_for(topo.edge_length(edge)?, size)?;
    set_ndiv(topo, ctx, edge, n)
}

fn divisions_for(length: f64, size: f64) -> Result<usize, MeshError> {
    if !(size.is_finite() && size > 0.0) {
        return Err(MeshError::InvalidGeometry(format!(
            "element size must be positive, got {size}"
        )));
    }
    Ok(((length / size).ceil() as usize).max(1))
}

/// Every edge reachable from `edge` by repeatedly crossing a face to its
/// opposite side, `edge` first, in breadth-first order.
pub fn homologous_edges(topo: &MultiBlockTopology, edge: EdgeId) -> Result<Vec<EdgeId>, MeshError> {
    topo.edge(edge)?;
    let mut seen = BTreeSet::from([edge]);
    let mut order = vec![edge];
    let mut queue = VecDeque::from([edge]);
    while let Some(e) = queue.pop_front() {
        for face in topo.edge(e)?.faces() {
            if let Some(opposite) = topo.face(face)?.homologous_side(e) {
                if seen.insert(opposite) {
                    order.push(opposite);
                    queue.push_back(opposite);
                }
            }
        }
    }
    Ok(order)
}

/// Requests `n` divisions on `edge` and all its homologous edges.
///
/// Frozen edges are reported and skipped; the others are updated.
pub fn set_ndiv_homologous(
    topo: &mut MultiBlockTopology,
    ctx: &mut MeshingContext,
    edge: EdgeId,
    n: usize,
) -> Result<Vec<EdgeId>, MeshError> {
    let group = homologous_edges(topo, edge)?;
    for &e in &group {
        match set_ndiv(topo, ctx, e, n) {
            Ok(_) | Err(MeshError::EdgeAlreadyMeshed { .. }) => {}
            Err(other) => return Err(other),
        }
    }
    Ok(group)
}

/// Raises every group of homologous edges to the largest count in the group.
///
/// Returns the number of edges whose count changed. Frozen edges keep their
/// count and are reported.
pub fn harmonize_divisions(
    topo: &mut MultiBlockTopology,
    ctx: &mut MeshingContext,
) -> Result<usize, MeshError> {
    let mut done = BTreeSet::new();
    let mut changed = 0;
    let all: Vec<EdgeId> = topo.edge_ids().collect();
    for edge in all {
        if done.contains(&edge) {
            continue;
        }
        let group = homologous_edges(topo, edge)?;
        let target = group
            .iter()
            .map(|&e| topo.edge(e).map(|x| x.ndiv()))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .max()
            .unwrap_or(0);
        for &e in &group {
            done.insert(e);
            let current = topo.edge(e)?.ndiv();
            if current == target {
                continue;
            }
            match set_ndiv(topo, ctx, e, target) {
                Ok(_) => changed += 1,
                Err(MeshError::EdgeAlreadyMeshed { .. }) => {}
                Err(other) => return Err(other),
            }
        }
    }
    if ctx.verbosity > 3 {
        log::debug!("harmonized divisions: {changed} edges changed");
    }
    Ok(changed)
}

fn set_pair(
    topo: &mut MultiBlockTopology,
    ctx: &mut MeshingContext,
    face: FaceId,
    side: usize,
    n: usize,
) -> Result<(), MeshError> {
    let f = topo.face(face)?;
    let (a, b) = (f.side(side).edge, f.side(side + 2).edge);
    set_ndiv(topo, ctx, a, n)?;
    set_ndiv(topo, ctx, b, n)?;
    Ok(())
}

/// Sets the divisions of face sides 0 and 2.
pub fn set_face_ndiv_i(
    topo: &mut MultiBlockTopology,
    ctx: &mut MeshingContext,
    face: FaceId,
    n: usize,
) -> Result<(), MeshError> {
    set_pair(topo, ctx, face, 0, n)
}

/// Sets the divisions of face sides 1 and 3.
pub fn set_face_ndiv_j(
    topo: &mut MultiBlockTopology,
    ctx: &mut MeshingContext,
    face: FaceId,
    n: usize,
) -> Result<(), MeshError> {
    set_pair(topo, ctx, face, 1, n)
}

fn set_pair_size(
    topo: &mut MultiBlockTopology,
    ctx: &mut MeshingContext,
    face: FaceId,
    side: usize,
    size: f64,
) -> Result<(), MeshError> {
    let f = topo.face(face)?;
    let (a, b) = (f.side(side).edge, f.side(side + 2).edge);
    let longest = topo.edge_length(a)?.max(topo.edge_length(b)?);
    let n = divisions_for(longest, size)?;
    set_pair(topo, ctx, face, side, n)
}

/// Divides sides 0 and 2 so the longer one has pieces no longer than `size`.
pub fn set_face_element_size_i(
    topo: &mut MultiBlockTopology,
    ctx: &mut MeshingContext,
    face: FaceId,
    size: f64,
) -> Result<(), MeshError> {
    set_pair_size(topo, ctx, face, 0, size)
}

/// Divides sides 1 and 3 so the longer one has pieces no longer than `size`.
pub fn set_face_element_size_j(
    topo: &mut MultiBlockTopology,
    ctx: &mut MeshingContext,
    face: FaceId,
    size: f64,
) -> Result<(), MeshError> {
    set_pair_size(topo, ctx, face, 1, size)
}
