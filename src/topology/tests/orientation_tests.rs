use super::cube;
use crate::context::{DiagnosticKind, MeshingContext};
use crate::mesh_error::MeshError;
use crate::topology::block::{BASE, TOP};

#[test]
fn cube_faces_fill_every_slot() {
    let mut c = cube();
    let b = c.block_of(&[0, 1, 2, 3, 4, 5]);
    let block = c.topo.block(b).unwrap();
    assert!(block.is_complete());
    for slot in 0..6 {
        let placed = block.face(slot).unwrap();
        assert_eq!(placed.face, c.faces[slot]);
        assert!(placed.direct, "slot {slot}");
    }
    for v in 0..8 {
        assert_eq!(block.vertex(v), Some(c.points[v]));
    }
    assert_eq!(block.face(BASE).unwrap().reference, None);
    assert_eq!(block.face(1).unwrap().reference, Some((BASE, 0)));
    assert_eq!(block.face(TOP).unwrap().reference, Some((1, 2)));
    for e in c.edges {
        assert!(c.topo.edge(e).unwrap().touches_block(b));
    }
}

#[test]
fn side_face_running_backwards_is_not_direct() {
    let mut c = cube();
    let e = c.edges;
    let reversed = c.topo.add_face([e[4], e[8], e[5], e[0]]).unwrap();
    let b = c.block_of(&[0]);
    let mut ctx = MeshingContext::default();
    let slot = c.topo.insert_face(&mut ctx, b, reversed).unwrap();
    assert_eq!(slot, 1);
    let placed = c.topo.block(b).unwrap().face(1).copied().unwrap();
    assert!(!placed.direct);
    assert_eq!(placed.first, 3);
    assert_eq!(placed.corners, [0, 4, 5, 1]);
    assert_eq!(c.topo.block(b).unwrap().vertex(4), Some(c.points[4]));
}

#[test]
fn reversed_top_face_agrees_with_every_side() {
    let mut c = cube();
    let e = c.edges;
    let top = c.topo.add_face([e[11], e[10], e[9], e[8]]).unwrap();
    let b = c.block_of(&[0, 1, 2, 3, 4]);
    let mut ctx = MeshingContext::default();
    assert_eq!(c.topo.insert_face(&mut ctx, b, top).unwrap(), TOP);
    let placed = c.topo.block(b).unwrap().face(TOP).copied().unwrap();
    assert!(!placed.direct);
    assert_eq!(placed.corners, [4, 7, 6, 5]);
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn reinserting_a_face_keeps_its_slot() {
    let mut c = cube();
    let b = c.block_of(&[0, 1]);
    let before = c.topo.block(b).unwrap().clone();
    let mut ctx = MeshingContext::default();
    assert_eq!(c.topo.insert_face(&mut ctx, b, c.faces[1]).unwrap(), 1);
    assert_eq!(c.topo.block(b).unwrap(), &before);
}

#[test]
fn top_face_before_any_side_is_rejected() {
    let mut c = cube();
    let b = c.block_of(&[0]);
    let mut ctx = MeshingContext::default();
    let err = c.topo.insert_face(&mut ctx, b, c.faces[5]).unwrap_err();
    assert_eq!(
        err,
        MeshError::MissingSideFace {
            block: b,
            face: c.faces[5]
        }
    );
    assert!(c.topo.block(b).unwrap().face(TOP).is_none());
    assert!(!c.topo.face(c.faces[5]).unwrap().touches_block(b));
    assert_eq!(ctx.diagnostics_of(DiagnosticKind::Topology).count(), 1);
}

#[test]
fn twisted_top_face_is_inconsistent() {
    let mut c = cube();
    let p = c.points;
    let e = c.edges;
    let e57 = c.topo.add_line(p[5], p[7]).unwrap();
    let e64 = c.topo.add_line(p[6], p[4]).unwrap();
    let twisted = c.topo.add_face([e[8], e57, e[10], e64]).unwrap();
    let b = c.block_of(&[0, 1, 3]);
    let mut ctx = MeshingContext::default();
    let err = c.topo.insert_face(&mut ctx, b, twisted).unwrap_err();
    assert_eq!(
        err,
        MeshError::InconsistentTopFace {
            block: b,
            face: twisted,
            first: c.faces[1],
            second: c.faces[3],
        }
    );
    assert!(c.topo.block(b).unwrap().face(TOP).is_none());
}

#[test]
fn conflicting_vertex_leaves_face_unplaced() {
    let mut c = cube();
    let p = c.points;
    let e = c.edges;
    let e57 = c.topo.add_line(p[5], p[7]).unwrap();
    let e64 = c.topo.add_line(p[6], p[4]).unwrap();
    let twisted = c.topo.add_face([e[8], e57, e[10], e64]).unwrap();
    let b = c.block_of(&[0, 3]);
    let mut ctx = MeshingContext::default();
    c.topo.insert_face(&mut ctx, b, twisted).unwrap();
    let err = c.topo.insert_face(&mut ctx, b, c.faces[1]).unwrap_err();
    assert_eq!(
        err,
        MeshError::VertexConflict {
            block: b,
            face: c.faces[1],
            vertex: 5,
            expected: p[4],
            found: p[5],
        }
    );
    assert!(c.topo.block(b).unwrap().face(1).is_none());
}

#[test]
fn occupied_slot_is_reported() {
    let mut c = cube();
    let p = c.points;
    let q5 = c.topo.add_point([1.0, 0.0, -1.0]).unwrap();
    let q4 = c.topo.add_point([0.0, 0.0, -1.0]).unwrap();
    let a = c.topo.add_line(p[1], q5).unwrap();
    let m = c.topo.add_line(q5, q4).unwrap();
    let d = c.topo.add_line(q4, p[0]).unwrap();
    let below = c.topo.add_face([c.edges[0], a, m, d]).unwrap();
    let b = c.block_of(&[0, 1]);
    let mut ctx = MeshingContext::default();
    let err = c.topo.insert_face(&mut ctx, b, below).unwrap_err();
    assert_eq!(
        err,
        MeshError::SlotOccupied {
            block: b,
            slot: 1,
            face: below
        }
    );
}
