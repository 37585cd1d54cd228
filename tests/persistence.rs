mod util;
use util::*;

use multiblock_mesh::algs::reconcile::set_ndiv;
use multiblock_mesh::context::MeshingContext;
use multiblock_mesh::data::mesh::Mesh;
use multiblock_mesh::io::persist::{Field, FieldBuffer, Persistent};
use multiblock_mesh::mesh_error::MeshError;
use multiblock_mesh::mesh_generation::{gen_mesh, is_meshed};
use multiblock_mesh::topology::edge::Edge;
use multiblock_mesh::topology::handle::{EdgeId, EntityRef};
use multiblock_mesh::topology::multi_block::MultiBlockTopology;

fn all_entities(topo: &MultiBlockTopology) -> Vec<EntityRef> {
    let mut out: Vec<EntityRef> = topo.points().map(|p| EntityRef::Point(p.id())).collect();
    out.extend(topo.edge_ids().map(EntityRef::Edge));
    out.extend(topo.face_ids().map(EntityRef::Face));
    out.extend(topo.block_ids().map(EntityRef::Block));
    out
}

#[test]
fn meshed_cube_survives_json_and_bincode() {
    let mut source = unit_cube(2);
    let mut mesh = Mesh::new();
    let mut ctx = MeshingContext::default();
    gen_mesh(&mut source.topo, &mut mesh, &mut ctx, EntityRef::Block(source.block)).unwrap();

    let mut via_json = unit_cube(2);
    let mut via_bincode = unit_cube(2);
    for entity in all_entities(&source.topo) {
        let buf = source.topo.store(entity).unwrap();

        let text = serde_json::to_string(&buf).unwrap();
        let back: FieldBuffer = serde_json::from_str(&text).unwrap();
        via_json.topo.restore(entity, &back).unwrap();

        let bytes = bincode::serialize(&buf).unwrap();
        let back: FieldBuffer = bincode::deserialize(&bytes).unwrap();
        via_bincode.topo.restore(entity, &back).unwrap();
    }

    for restored in [&via_json, &via_bincode] {
        assert!(is_meshed(&restored.topo, EntityRef::Block(restored.block)).unwrap());
        for p in source.points {
            assert_eq!(restored.topo.point(p).unwrap(), source.topo.point(p).unwrap());
        }
        for e in source.edges {
            assert_eq!(restored.topo.edge(e).unwrap(), source.topo.edge(e).unwrap());
        }
        for f in source.faces {
            assert_eq!(restored.topo.face(f).unwrap(), source.topo.face(f).unwrap());
        }
        assert_eq!(
            restored.topo.block(restored.block).unwrap(),
            source.topo.block(source.block).unwrap()
        );
    }
}

#[test]
fn arc_edge_keeps_its_kind() {
    let build = || {
        let mut topo = MultiBlockTopology::new();
        let a = topo.add_point([1.0, 0.0, 0.0]).unwrap();
        let b = topo.add_point([0.0, 1.0, 0.0]).unwrap();
        let m = topo.add_point([0.5f64.sqrt(), 0.5f64.sqrt(), 0.0]).unwrap();
        let e = topo.add_arc(a, b, m).unwrap();
        (topo, e)
    };
    let (mut topo, e) = build();
    let mut mesh = Mesh::new();
    let mut ctx = MeshingContext::default();
    set_ndiv(&mut topo, &mut ctx, e, 4).unwrap();
    gen_mesh(&mut topo, &mut mesh, &mut ctx, EntityRef::Edge(e)).unwrap();
    let buf = topo.store(EntityRef::Edge(e)).unwrap();
    assert_eq!(buf.len(), <Edge as Persistent>::FIELD_COUNT);
    assert_eq!(buf.int(1).unwrap(), 1);

    let (mut twin, _) = build();
    twin.restore(EntityRef::Edge(e), &buf).unwrap();
    assert_eq!(twin.edge(e).unwrap(), topo.edge(e).unwrap());
    assert_eq!(twin.edge(e).unwrap().nodes().len(), 5);
}

#[test]
fn mismatched_buffers_are_rejected() {
    let mut b = unit_cube(1);
    let first = EntityRef::Edge(b.edges[0]);
    let buf = b.topo.store(first).unwrap();
    let err = b.topo.restore(EntityRef::Edge(b.edges[1]), &buf).unwrap_err();
    assert!(matches!(err, MeshError::BadField { offset: 0, .. }));

    let mut moved = b.topo.store(EntityRef::Point(b.points[0])).unwrap();
    moved.set(1, Field::FloatVec(vec![9.0, 9.0, 9.0]));
    let err = b.topo.restore(EntityRef::Point(b.points[0]), &moved).unwrap_err();
    assert!(matches!(err, MeshError::BadField { offset: 1, .. }));

    let mut short = b.topo.store(EntityRef::Face(b.faces[0])).unwrap();
    short.set(1, Field::IntVec(vec![1, 2, 3]));
    assert!(b.topo.restore(EntityRef::Face(b.faces[0]), &short).is_err());

    let missing = EdgeId::new(999).unwrap();
    assert!(matches!(
        b.topo.store(EntityRef::Edge(missing)),
        Err(MeshError::UnknownEntity(_))
    ));
}
