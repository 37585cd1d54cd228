//! Node binding and position checks.
//!
//! A lattice cell covered by a boundary entity takes that entity's node. The
//! node's stored position is compared with the position the composite entity
//! computed for the cell; a squared distance above the link tolerance is
//! reported but the cell stays linked.

use crate::context::{Diagnostic, DiagnosticKind, MeshingContext};
use crate::data::lattice::{Lattice, LatticeIndex};
use crate::data::mesh::Mesh;
use crate::geometry::vector::{Pos3d, dist2};
use crate::mesh_error::MeshError;
use crate::mesh_generation::positions::{block_positions, face_positions};
use crate::topology::handle::{EntityRef, NodeTag};
use crate::topology::multi_block::MultiBlockTopology;

/// Reports a linking diagnostic if `node` lies away from `expected`.
pub(crate) fn check_link(
    ctx: &mut MeshingContext,
    mesh: &Mesh,
    entity: EntityRef,
    other: EntityRef,
    index: LatticeIndex,
    node: NodeTag,
    expected: Pos3d,
) {
    let Ok(stored) = mesh.node(node).map(|n| n.position) else {
        return;
    };
    let d2 = dist2(stored, expected);
    if d2 > ctx.options.link_tolerance {
        ctx.report(
            Diagnostic::new(
                DiagnosticKind::Linking,
                entity,
                format!(
                    "node {node} from {other} sits at {stored:?}, squared distance {d2:e} from computed {expected:?}"
                ),
            )
            .with_other(other)
            .at(index),
        );
    }
}

/// Puts `node` in cell `index`, taken from boundary entity `other`.
///
/// A cell that already holds a different node keeps it and the clash is
/// reported. `expected`, when given, is checked against the node position.
pub(crate) fn bind(
    ctx: &mut MeshingContext,
    mesh: &Mesh,
    cells: &mut Lattice<Option<NodeTag>>,
    index: LatticeIndex,
    node: NodeTag,
    (entity, other): (EntityRef, EntityRef),
    expected: Option<Pos3d>,
) {
    match cells[index] {
        Some(existing) if existing != node => {
            ctx.report(
                Diagnostic::new(
                    DiagnosticKind::Linking,
                    entity,
                    format!("cell already holds node {existing}; {other} provides node {node}"),
                )
                .with_other(other)
                .at(index),
            );
        }
        Some(_) => {}
        None => {
            cells[index] = Some(node);
            if let Some(expected) = expected {
                check_link(ctx, mesh, entity, other, index, node, expected);
            }
        }
    }
}

/// Largest drift between stored node positions and `expected`.
fn drift<'a>(
    mesh: &Mesh,
    pairs: impl Iterator<Item = (LatticeIndex, NodeTag, &'a Pos3d)>,
) -> Result<Option<(LatticeIndex, f64, usize)>, MeshError> {
    let mut worst: Option<(LatticeIndex, f64)> = None;
    let mut count = 0;
    for (idx, node, expected) in pairs {
        let d2 = dist2(mesh.node(node)?.position, *expected);
        if d2.is_nan() || worst.is_none_or(|(_, w)| d2 > w) {
            worst = Some((idx, d2));
        }
        count += 1;
    }
    Ok(worst.map(|(idx, d2)| (idx, d2, count)))
}

/// Re-mesh check: compares an already meshed entity's nodes with its
/// current geometry and reports drift beyond the link tolerance.
pub(crate) fn check_existing_geometry(
    topo: &MultiBlockTopology,
    mesh: &Mesh,
    ctx: &mut MeshingContext,
    entity: EntityRef,
) -> Result<(), MeshError> {
    let worst = match entity {
        EntityRef::Point(p) => {
            let pnt = topo.point(p)?;
            match pnt.node() {
                Some(n) => drift(mesh, std::iter::once(((0, 0, 0), n, &pnt.position())))?,
                None => None,
            }
        }
        EntityRef::Edge(e) => {
            let positions = topo.edge_positions(e)?;
            let nodes = topo.edge(e)?.nodes();
            drift(
                mesh,
                nodes
                    .iter()
                    .zip(&positions)
                    .enumerate()
                    .map(|(i, (&n, p))| ((0, 0, i), n, p)),
            )?
        }
        EntityRef::Face(f) => {
            let positions = face_positions(topo, f)?;
            match topo.face(f)?.nodes() {
                Some(nodes) => drift(
                    mesh,
                    nodes
                        .indexed_iter()
                        .filter_map(|(idx, &n)| positions.get(idx).map(|p| (idx, n, p))),
                )?,
                None => None,
            }
        }
        EntityRef::Block(b) => {
            for f in topo.block(b)?.surfaces() {
                check_existing_geometry(topo, mesh, ctx, EntityRef::Face(f))?;
            }
            match topo.block(b)?.nodes() {
                Some(nodes) => {
                    let divisions = (
                        topo.block_ndiv_i(b)?,
                        topo.block_ndiv_j(b)?,
                        topo.block_ndiv_k(b)?,
                    );
                    let positions = block_positions(topo, b, divisions)?;
                    // hull nodes belong to the faces checked above
                    drift(
                        mesh,
                        nodes
                            .indexed_iter()
                            .filter(|(idx, _)| !nodes.is_boundary(*idx))
                            .filter_map(|(idx, &n)| positions.get(idx).map(|p| (idx, n, p))),
                    )?
                }
                None => None,
            }
        }
    };
    if let Some((idx, d2, checked)) = worst {
        if !(d2 <= ctx.options.link_tolerance) {
            ctx.report(
                Diagnostic::new(
                    DiagnosticKind::GeometryChanged,
                    entity,
                    format!(
                        "geometry changed since meshing: {checked} nodes checked, worst squared drift {d2:e}"
                    ),
                )
                .at(idx),
            );
        }
    }
    Ok(())
}
