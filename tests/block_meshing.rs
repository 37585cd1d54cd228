mod util;
use util::*;

use std::collections::BTreeSet;

use multiblock_mesh::algs::reconcile::set_ndiv;
use multiblock_mesh::context::{DiagnosticKind, MeshingContext, MeshingOptions};
use multiblock_mesh::data::mesh::Mesh;
use multiblock_mesh::mesh_error::MeshError;
use multiblock_mesh::mesh_generation::{NoElements, gen_mesh, gen_mesh_all, gen_mesh_with, is_meshed};
use multiblock_mesh::topology::block::{BLOCK_EDGES, vertex_index};
use multiblock_mesh::topology::cell_type::CellType;
use multiblock_mesh::topology::handle::{BlockId, EdgeId, EntityRef, FaceId, NodeTag, PointId};
use multiblock_mesh::topology::multi_block::MultiBlockTopology;

#[test]
fn block_lattice_has_expected_shape() {
    let mut b = hex_block(box_corners(2.0, 3.0, 1.0), (2, 3, 1));
    let mut mesh = Mesh::new();
    let mut ctx = MeshingContext::default();
    gen_mesh(&mut b.topo, &mut mesh, &mut ctx, EntityRef::Block(b.block)).unwrap();

    let block = b.topo.block(b.block).unwrap();
    let nodes = block.nodes().unwrap();
    assert_eq!(nodes.shape(), (2, 4, 3));
    assert_eq!(nodes.len(), 24);
    assert_eq!(mesh.num_nodes(), 24);
    for v in 0..8 {
        let corner = nodes[vertex_index(v, 2, 3, 1)];
        assert_eq!(Some(corner), b.topo.point(b.points[v]).unwrap().node());
    }
    // block-level cells only
    assert_eq!(mesh.num_elements(), 6);
    assert!(mesh.elements().all(|e| e.cell_type == CellType::Hexahedron));
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn unit_cube_end_to_end() {
    let mut b = unit_cube(2);
    let mut mesh = Mesh::new();
    let mut ctx = MeshingContext::default();
    gen_mesh(&mut b.topo, &mut mesh, &mut ctx, EntityRef::Block(b.block)).unwrap();

    assert_eq!(mesh.num_nodes(), 27);
    let nodes = b.topo.block(b.block).unwrap().nodes().unwrap().clone();
    for ((k, j, i), &n) in nodes.indexed_iter() {
        let want = [i as f64 * 0.5, j as f64 * 0.5, k as f64 * 0.5];
        assert_close(mesh.node(n).unwrap().position, want);
    }
    assert_close(mesh.node(nodes[(1, 1, 1)]).unwrap().position, [0.5, 0.5, 0.5]);
    assert!(ctx.diagnostics().is_empty());

    for e in b.edges {
        assert!(is_meshed(&b.topo, EntityRef::Edge(e)).unwrap());
    }
    for f in b.faces {
        assert!(is_meshed(&b.topo, EntityRef::Face(f)).unwrap());
    }
}

#[test]
fn hexahedron_follows_vertex_order() {
    let mut b = unit_cube(1);
    let mut mesh = Mesh::new();
    let mut ctx = MeshingContext::default();
    gen_mesh(&mut b.topo, &mut mesh, &mut ctx, EntityRef::Block(b.block)).unwrap();

    let block = b.topo.block(b.block).unwrap();
    assert_eq!(block.elements().len(), 1);
    let hex = mesh.element(block.elements()[0]).unwrap();
    let expected: Vec<NodeTag> = b
        .points
        .iter()
        .map(|&p| b.topo.point(p).unwrap().node().unwrap())
        .collect();
    assert_eq!(hex.nodes, expected);
}

#[test]
fn boundary_nodes_are_shared() {
    let mut b = unit_cube(3);
    let mut mesh = Mesh::new();
    let mut ctx = MeshingContext::default();
    gen_mesh(&mut b.topo, &mut mesh, &mut ctx, EntityRef::Block(b.block)).unwrap();

    let block_nodes: BTreeSet<NodeTag> = b
        .topo
        .block(b.block)
        .unwrap()
        .nodes()
        .unwrap()
        .iter()
        .copied()
        .collect();
    assert_eq!(block_nodes.len(), 64);
    assert_eq!(mesh.num_nodes(), 64);
    for f in b.faces {
        let face = b.topo.face(f).unwrap();
        assert!(face.nodes().unwrap().iter().all(|n| block_nodes.contains(n)));
        for e in face.edges() {
            let edge_nodes = b.topo.edge(e).unwrap().nodes().to_vec();
            assert!(edge_nodes.iter().all(|n| face.node_indices(*n).is_some()));
        }
    }
}

struct Stack {
    topo: MultiBlockTopology,
    blocks: [BlockId; 2],
}

/// Two unit cubes stacked along z, sharing the middle face.
fn stacked(n: usize) -> Stack {
    let mut topo = MultiBlockTopology::new();
    let mut ctx = MeshingContext::default();
    let corners = box_corners(1.0, 1.0, 1.0);
    let layers: Vec<[PointId; 4]> = (0..3)
        .map(|l| std::array::from_fn(|s| topo.add_point([corners[s][0], corners[s][1], l as f64]).unwrap()))
        .collect();
    let ring: Vec<[EdgeId; 4]> = layers
        .iter()
        .map(|p| std::array::from_fn(|s| topo.add_line(p[s], p[(s + 1) % 4]).unwrap()))
        .collect();
    let verticals: Vec<[EdgeId; 4]> = (0..2)
        .map(|l| std::array::from_fn(|s| topo.add_line(layers[l][s], layers[l + 1][s]).unwrap()))
        .collect();
    for e in topo.edge_ids().collect::<Vec<_>>() {
        set_ndiv(&mut topo, &mut ctx, e, n).unwrap();
    }
    let horizontal: Vec<FaceId> = ring.iter().map(|r| topo.add_face(*r).unwrap()).collect();
    let mut blocks = Vec::new();
    for l in 0..2 {
        let mut faces = vec![horizontal[l]];
        for s in 0..4 {
            let v = &verticals[l];
            faces.push(
                topo.add_face([ring[l][s], v[(s + 1) % 4], ring[l + 1][s], v[s]])
                    .unwrap(),
            );
        }
        faces.push(horizontal[l + 1]);
        blocks.push(topo.add_block_with_faces(&mut ctx, &faces).unwrap());
    }
    assert!(ctx.diagnostics().is_empty());
    Stack {
        topo,
        blocks: [blocks[0], blocks[1]],
    }
}

#[test]
fn stacked_blocks_share_their_common_face() {
    let mut s = stacked(2);
    let mut mesh = Mesh::new();
    let mut ctx = MeshingContext::default();
    gen_mesh_all(&mut s.topo, &mut mesh, &mut ctx).unwrap();

    assert_eq!(mesh.num_nodes(), 45);
    assert!(ctx.diagnostics().is_empty());
    let lower = s.topo.block(s.blocks[0]).unwrap().nodes().unwrap().clone();
    let upper = s.topo.block(s.blocks[1]).unwrap().nodes().unwrap().clone();
    for j in 0..3 {
        for i in 0..3 {
            assert_eq!(lower[(2, j, i)], upper[(0, j, i)]);
        }
    }
    assert_close(mesh.node(upper[(2, 2, 2)]).unwrap().position, [1.0, 1.0, 2.0]);
    assert_eq!(mesh.num_elements(), 16);
}

#[test]
fn incomplete_block_is_rejected() {
    let mut b = unit_cube(2);
    let mut ctx = MeshingContext::default();
    let partial = b.topo.add_block_with_faces(&mut ctx, &b.faces[..5]).unwrap();
    let mut mesh = Mesh::new();
    let err = gen_mesh(&mut b.topo, &mut mesh, &mut ctx, EntityRef::Block(partial)).unwrap_err();
    assert_eq!(
        err,
        MeshError::IncompleteBlock {
            block: partial,
            slot: 5
        }
    );
    assert_eq!(mesh.num_nodes(), 0);
    assert_eq!(ctx.diagnostics_of(DiagnosticKind::Topology).count(), 1);
}

#[test]
fn undivided_edge_cannot_be_meshed() {
    let mut topo = MultiBlockTopology::new();
    let p = topo.add_point([0.0, 0.0, 0.0]).unwrap();
    let q = topo.add_point([1.0, 0.0, 0.0]).unwrap();
    let e = topo.add_line(p, q).unwrap();
    let mut mesh = Mesh::new();
    let mut ctx = MeshingContext::default();
    let err = gen_mesh(&mut topo, &mut mesh, &mut ctx, EntityRef::Edge(e)).unwrap_err();
    assert_eq!(err, MeshError::ZeroDivisions(e));
    assert_eq!(ctx.diagnostics_of(DiagnosticKind::Precondition).count(), 1);
    assert!(!is_meshed(&topo, EntityRef::Edge(e)).unwrap());
}

#[test]
fn mismatched_face_divisions_are_reported() {
    let mut b = unit_cube(2);
    let mut ctx = MeshingContext::default();
    set_ndiv(&mut b.topo, &mut ctx, b.edges[0], 4).unwrap();
    let mut mesh = Mesh::new();
    let err = gen_mesh(&mut b.topo, &mut mesh, &mut ctx, EntityRef::Face(b.faces[0])).unwrap_err();
    assert!(matches!(err, MeshError::NDivMismatch { first: 4, second: 2, .. }));
    assert_eq!(ctx.diagnostics_of(DiagnosticKind::Consistency).count(), 1);
    assert!(!is_meshed(&b.topo, EntityRef::Face(b.faces[0])).unwrap());
}

#[test]
fn element_generation_can_be_switched_off() {
    let mut b = unit_cube(2);
    let mut mesh = Mesh::new();
    let mut ctx = MeshingContext::default();
    gen_mesh_with(&mut b.topo, &mut mesh, &mut ctx, EntityRef::Block(b.block), &NoElements).unwrap();
    assert_eq!(mesh.num_nodes(), 27);
    assert_eq!(mesh.num_elements(), 0);

    let mut c = unit_cube(2);
    let mut mesh = Mesh::new();
    let options = MeshingOptions {
        generate_elements: false,
        ..MeshingOptions::default()
    };
    let mut ctx = MeshingContext::new(options);
    gen_mesh(&mut c.topo, &mut mesh, &mut ctx, EntityRef::Face(c.faces[0])).unwrap();
    assert_eq!(mesh.num_nodes(), 9);
    assert_eq!(mesh.num_elements(), 0);
}

#[test]
fn face_mesh_produces_quads() {
    let mut b = hex_block(box_corners(3.0, 2.0, 1.0), (3, 2, 1));
    let mut mesh = Mesh::new();
    let mut ctx = MeshingContext::default();
    gen_mesh(&mut b.topo, &mut mesh, &mut ctx, EntityRef::Face(b.faces[0])).unwrap();

    let face = b.topo.face(b.faces[0]).unwrap();
    assert_eq!(face.nodes().unwrap().shape(), (1, 3, 4));
    assert_eq!(face.elements().len(), 6);
    assert_eq!(mesh.num_nodes(), 12);
    let n = face.node(3, 2).unwrap();
    assert_close(mesh.node(n).unwrap().position, [3.0, 2.0, 0.0]);
    let inner = face.node(1, 1).unwrap();
    assert_close(mesh.node(inner).unwrap().position, [1.0, 1.0, 0.0]);
}

/// Circle through (0,0,0), (0.5,-0.2,0) and (1,0,0).
const ARC_CENTRE: [f64; 3] = [0.5, 0.525, 0.0];
const ARC_RADIUS: f64 = 0.725;

fn assert_on_arc(p: [f64; 3]) {
    let r = ((p[0] - ARC_CENTRE[0]).powi(2) + (p[1] - ARC_CENTRE[1]).powi(2)).sqrt();
    assert!((r - ARC_RADIUS).abs() < 1e-9, "{p:?} is {r} from the centre");
    assert!(p[2].abs() < 1e-12);
}

#[test]
fn face_with_an_arc_side_follows_the_circle() {
    let mut topo = MultiBlockTopology::new();
    let mut ctx = MeshingContext::default();
    let corners = box_corners(1.0, 1.0, 0.0);
    let p: [PointId; 4] = std::array::from_fn(|v| topo.add_point(corners[v]).unwrap());
    let mid = topo.add_point([0.5, -0.2, 0.0]).unwrap();
    let edges = [
        topo.add_arc(p[0], p[1], mid).unwrap(),
        topo.add_line(p[1], p[2]).unwrap(),
        topo.add_line(p[2], p[3]).unwrap(),
        topo.add_line(p[3], p[0]).unwrap(),
    ];
    for e in edges {
        set_ndiv(&mut topo, &mut ctx, e, 4).unwrap();
    }
    let face = topo.add_face(edges).unwrap();
    let mut mesh = Mesh::new();
    gen_mesh(&mut topo, &mut mesh, &mut ctx, EntityRef::Face(face)).unwrap();

    assert!(ctx.diagnostics().is_empty());
    assert_eq!(mesh.num_nodes(), 25);
    assert_eq!(mesh.num_elements(), 16);
    let f = topo.face(face).unwrap();
    assert_eq!(f.nodes().unwrap().shape(), (1, 5, 5));
    for fi in 0..=4 {
        let n = f.node(fi, 0).unwrap();
        assert_on_arc(mesh.node(n).unwrap().position);
    }
    assert_close(mesh.node(f.node(2, 0).unwrap()).unwrap().position, [0.5, -0.2, 0.0]);
    // the far side stays straight
    assert_close(mesh.node(f.node(2, 4).unwrap()).unwrap().position, [0.5, 1.0, 0.0]);
}

/// Unit cube whose first base edge bows out through (0.5,-0.2,0).
fn bowed_cube(n: usize) -> (MultiBlockTopology, BlockId, EdgeId, [FaceId; 6]) {
    let mut topo = MultiBlockTopology::new();
    let mut ctx = MeshingContext::default();
    let points = box_corners(1.0, 1.0, 1.0).map(|c| topo.add_point(c).unwrap());
    let mid = topo.add_point([0.5, -0.2, 0.0]).unwrap();
    let mut edges = Vec::new();
    for (i, (u, v)) in BLOCK_EDGES.into_iter().enumerate() {
        let e = if i == 0 {
            topo.add_arc(points[u], points[v], mid).unwrap()
        } else {
            topo.add_line(points[u], points[v]).unwrap()
        };
        set_ndiv(&mut topo, &mut ctx, e, n).unwrap();
        edges.push(e);
    }
    let faces = FACE_EDGES.map(|f| topo.add_face(f.map(|i| edges[i])).unwrap());
    let block = topo.add_block_with_faces(&mut ctx, &faces).unwrap();
    assert!(ctx.diagnostics().is_empty());
    (topo, block, edges[0], faces)
}

#[test]
fn block_with_an_arc_edge_blends_its_interior() {
    let (mut topo, block, arc, faces) = bowed_cube(2);
    let mut mesh = Mesh::new();
    let mut ctx = MeshingContext::default();
    gen_mesh(&mut topo, &mut mesh, &mut ctx, EntityRef::Block(block)).unwrap();

    assert!(ctx.diagnostics().is_empty());
    assert_eq!(mesh.num_nodes(), 27);
    for &n in topo.edge(arc).unwrap().nodes() {
        assert_on_arc(mesh.node(n).unwrap().position);
    }
    let nodes = topo.block(block).unwrap().nodes().unwrap().clone();
    assert_close(mesh.node(nodes[(0, 0, 1)]).unwrap().position, [0.5, -0.2, 0.0]);
    // base centre moves by half the bulge, block centre by a quarter
    let base = topo.face(faces[0]).unwrap().node(1, 1).unwrap();
    assert_eq!(nodes[(0, 1, 1)], base);
    let near = |got: [f64; 3], want: [f64; 3]| {
        (0..3).all(|d| (got[d] - want[d]).abs() < 1e-9)
    };
    assert!(near(mesh.node(base).unwrap().position, [0.5, 0.4, 0.0]));
    assert!(near(mesh.node(nodes[(1, 1, 1)]).unwrap().position, [0.5, 0.45, 0.5]));

    // meshing again finds nothing drifted
    gen_mesh(&mut topo, &mut mesh, &mut ctx, EntityRef::Block(block)).unwrap();
    assert!(ctx.diagnostics().is_empty());
}
