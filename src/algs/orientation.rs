//! Face placement in blocks.
//!
//! When a face is inserted into a block, its slot follows from adjacency:
//! the first face is the base, a face sharing side `s` of the base goes to
//! side slot `s + 1` and a face sharing no base edge is the top. The face's
//! local numbering is then tied to the block's through a reference edge
//! shared with an already placed face: `first` is the face side on that edge
//! and `direct` tells whether the face runs along it the same way. From
//! these the resolver derives the block vertex at every face vertex.

use crate::mesh_error::MeshError;
use crate::topology::block::{BASE, Block, BlockFace, SLOT_CYCLES, TOP};
use crate::topology::face::Face;
use crate::topology::handle::{BlockId, EdgeId, FaceId};
use crate::topology::multi_block::MultiBlockTopology;

/// Slot `face` would occupy in `block`.
pub fn slot_for(topo: &MultiBlockTopology, block: &Block, face: &Face) -> Result<usize, MeshError> {
    let Some(base) = block.face(BASE) else {
        return Ok(BASE);
    };
    let base = topo.face(base.face)?;
    Ok(match base.common_edge(face) {
        Some(side) => side + 1,
        None => TOP,
    })
}

/// Block vertices at the four vertices of a face placed in `slot`.
///
/// Face side `first` runs between block vertices `a` and `b`, from `a` to
/// `b` when `same_sense`, else from `b` to `a`; the remaining corners follow
/// the slot's vertex cycle. `None` if `a`-`b` is not an edge of the slot.
pub fn corner_map(
    slot: usize,
    first: usize,
    same_sense: bool,
    a: usize,
    b: usize,
) -> Option<[usize; 4]> {
    let cycle = SLOT_CYCLES.get(slot)?;
    let (start, next) = if same_sense { (a, b) } else { (b, a) };
    let pos = cycle.iter().position(|&v| v == start)?;
    let step = if cycle[(pos + 1) % 4] == next {
        1
    } else if cycle[(pos + 3) % 4] == next {
        3
    } else {
        return None;
    };
    let mut corners = [0; 4];
    for m in 0..4 {
        corners[(first + m) % 4] = cycle[(pos + step * m) % 4];
    }
    Some(corners)
}

/// Orientation of `face` against a placed reference face sharing `edge`.
fn resolve_against(
    block: BlockId,
    slot: usize,
    face: &Face,
    reference: &Face,
    placed: &BlockFace,
    edge: EdgeId,
) -> Result<(usize, i8, [usize; 4]), MeshError> {
    let unresolved = MeshError::UnresolvedOrientation {
        block,
        face: face.id(),
    };
    let ref_side = reference.side_index(edge).ok_or(unresolved.clone())?;
    let first = face.side_index(edge).ok_or(unresolved.clone())?;
    let sense = reference.sense_of_edge(edge, face);
    if sense != 1 && sense != -1 {
        return Err(unresolved);
    }
    let (a, b) = placed.side_vertices(ref_side);
    let corners = corner_map(slot, first, sense == 1, a, b).ok_or(unresolved)?;
    Ok((first, sense, corners))
}

/// Works out how `face` sits in `slot` of `block` without modifying anything.
pub fn place_face(
    topo: &MultiBlockTopology,
    block: BlockId,
    slot: usize,
    face: FaceId,
) -> Result<BlockFace, MeshError> {
    let b = topo.block(block)?;
    let f = topo.face(face)?;

    if slot == BASE {
        return Ok(BlockFace {
            face,
            first: 0,
            direct: true,
            reference: None,
            corners: SLOT_CYCLES[BASE],
        });
    }

    if slot < TOP {
        let placed = b.face(BASE).ok_or(MeshError::IncompleteBlock { block, slot: BASE })?;
        let base = topo.face(placed.face)?;
        let ref_side = slot - 1;
        let edge = base.side(ref_side).edge;
        if !f.contains_edge(edge) {
            return Err(MeshError::NoCommonEdge {
                block,
                face,
                other: base.id(),
            });
        }
        let (first, sense, corners) = resolve_against(block, slot, f, base, placed, edge)?;
        return Ok(BlockFace {
            face,
            first,
            direct: sense == 1,
            reference: Some((BASE, ref_side)),
            corners,
        });
    }

    // Top face: every placed side face sharing an edge must agree.
    let mut any_side = None;
    let mut chosen: Option<(BlockFace, FaceId)> = None;
    for side_slot in 1..TOP {
        let Some(placed) = b.face(side_slot) else {
            continue;
        };
        let reference = topo.face(placed.face)?;
        any_side.get_or_insert(reference.id());
        let Some(ref_side) = reference.common_edge(f) else {
            continue;
        };
        let edge = reference.side(ref_side).edge;
        let (first, sense, corners) = resolve_against(block, TOP, f, reference, placed, edge)?;
        match &chosen {
            None => {
                chosen = Some((
                    BlockFace {
                        face,
                        first,
                        direct: -sense == 1,
                        reference: Some((side_slot, ref_side)),
                        corners,
                    },
                    reference.id(),
                ));
            }
            Some((bf, ref_face)) if bf.corners != corners => {
                return Err(MeshError::InconsistentTopFace {
                    block,
                    face,
                    first: *ref_face,
                    second: reference.id(),
                });
            }
            Some(_) => {}
        }
    }
    match (chosen, any_side) {
        (Some((bf, _)), _) => Ok(bf),
        (None, Some(other)) => Err(MeshError::NoCommonEdge { block, face, other }),
        (None, None) => Err(MeshError::MissingSideFace { block, face }),
    }
}

/// Checks the points `placement` assigns to block vertices against the ones
/// already known.
fn check_vertices(
    block: &Block,
    face: &Face,
    placement: &BlockFace,
) -> Result<(), MeshError> {
    for (m, &v) in placement.corners.iter().enumerate() {
        let found = face.vertex(m);
        if let Some(expected) = block.vertex(v) {
            if expected != found {
                return Err(MeshError::VertexConflict {
                    block: block.id(),
                    face: face.id(),
                    vertex: v,
                    expected,
                    found,
                });
            }
        }
    }
    Ok(())
}

/// Inserts `face` into `block`: picks the slot, resolves the orientation,
/// checks vertex consistency and records the placement.
///
/// Returns the slot. Re-inserting a face already in the block returns its
/// slot unchanged. On error nothing is modified.
pub fn insert_face(
    topo: &mut MultiBlockTopology,
    block: BlockId,
    face: FaceId,
) -> Result<usize, MeshError> {
    let (slot, placement, edges) = {
        let b = topo.block(block)?;
        let f = topo.face(face)?;
        if let Some(slot) = b.slot_of(face) {
            return Ok(slot);
        }
        let slot = slot_for(topo, b, f)?;
        if b.face(slot).is_some() {
            return Err(MeshError::SlotOccupied { block, slot, face });
        }
        let placement = place_face(topo, block, slot, face)?;
        check_vertices(b, f, &placement)?;
        (slot, placement, f.edges().collect::<Vec<_>>())
    };

    let points: Vec<_> = {
        let f = topo.face(face)?;
        (0..4).map(|m| f.vertex(m)).collect()
    };
    let b = topo.block_mut(block)?;
    b.faces[slot] = Some(placement);
    for (m, &v) in placement.corners.iter().enumerate() {
        b.vertices[v] = Some(points[m]);
    }
    topo.face_mut(face)?.blocks.insert(block);
    for e in edges {
        topo.edge_mut(e)?.blocks.insert(block);
    }
    log::trace!(
        "face {face} placed in slot {slot} of block {block} (first={}, direct={})",
        placement.first,
        placement.direct
    );
    Ok(slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_map_follows_slot_cycle() {
        // side slot 1 = [0, 1, 5, 4]; face side 0 on block edge 0-1
        assert_eq!(corner_map(1, 0, true, 0, 1), Some([0, 1, 5, 4]));
        assert_eq!(corner_map(1, 0, false, 0, 1), Some([1, 0, 4, 5]));
        // reference edge on face side 2
        assert_eq!(corner_map(1, 2, true, 0, 1), Some([5, 4, 0, 1]));
        // top cycle walked backwards
        assert_eq!(corner_map(5, 0, true, 5, 4), Some([5, 4, 7, 6]));
        assert_eq!(corner_map(5, 0, true, 4, 6), None);
    }
}
