//! Structured mesh generation over a multi-block topology.
//!
//! Meshing an entity first meshes its boundary (block → faces → edges →
//! points), then fills its own lattice. Boundary cells reuse the nodes the
//! boundary entities already own; only interior cells get new nodes, so no
//! node is ever duplicated along a shared boundary. Meshing an entity that
//! already has nodes is a no-op apart from an optional geometry check.

pub mod elements;
mod linking;
mod positions;

pub use elements::{ElementGenerator, LinearCells, NoElements};

use crate::context::{Diagnostic, DiagnosticKind, MeshingContext};
use crate::data::lattice::Lattice;
use crate::data::mesh::Mesh;
use crate::geometry::vector::Pos3d;
use crate::mesh_error::MeshError;
use crate::topology::block::{BASE, BlockFace, vertex_index};
use crate::topology::face::side_cell;
use crate::topology::handle::{BlockId, EdgeId, ElementTag, EntityRef, FaceId, NodeTag, PointId};
use crate::topology::multi_block::MultiBlockTopology;
use crate::topology::validation::check_block_ndivs;
use linking::{bind, check_existing_geometry, check_link};
use positions::{FaceMap, block_positions, face_divisions, face_positions};

/// Meshes `entity` and its boundary, generating first-order cells of the
/// entity's own dimension.
pub fn gen_mesh(
    topo: &mut MultiBlockTopology,
    mesh: &mut Mesh,
    ctx: &mut MeshingContext,
    entity: EntityRef,
) -> Result<(), MeshError> {
    let generator = LinearCells::new(entity.dimension());
    gen_mesh_with(topo, mesh, ctx, entity, &generator)
}

/// Meshes `entity` and its boundary with a custom element generator.
///
/// Topology and precondition failures are reported to `ctx` and returned;
/// the entity is then left without a lattice. Linking problems are only
/// reported.
pub fn gen_mesh_with(
    topo: &mut MultiBlockTopology,
    mesh: &mut Mesh,
    ctx: &mut MeshingContext,
    entity: EntityRef,
    generator: &dyn ElementGenerator,
) -> Result<(), MeshError> {
    if !topo.contains(entity) {
        return Err(ctx.fail(entity, MeshError::UnknownEntity(entity)));
    }
    if is_meshed(topo, entity)? {
        if ctx.verbosity > 2 {
            log::debug!("{entity}: nodes already exist");
        }
        if ctx.options.check_existing_geometry {
            check_existing_geometry(topo, mesh, ctx, entity)?;
        }
        return Ok(());
    }
    if ctx.verbosity > 3 {
        log::debug!("meshing {entity}");
    }
    let nodes_before = mesh.num_nodes();
    let mut mesher = Mesher {
        topo,
        mesh,
        ctx,
        generator,
    };
    match entity {
        EntityRef::Point(p) => mesher.mesh_point(p).map(|_| ()),
        EntityRef::Edge(e) => mesher.mesh_edge(e),
        EntityRef::Face(f) => mesher.mesh_face(f),
        EntityRef::Block(b) => mesher.mesh_block(b),
    }?;
    if mesher.ctx.verbosity > 3 {
        log::debug!(
            "{entity} meshed: {} new nodes",
            mesher.mesh.num_nodes() - nodes_before
        );
    }
    Ok(())
}

/// Meshes every block, then every face, edge and point left unmeshed.
///
/// Stops at the first failure.
pub fn gen_mesh_all(
    topo: &mut MultiBlockTopology,
    mesh: &mut Mesh,
    ctx: &mut MeshingContext,
) -> Result<(), MeshError> {
    let mut order: Vec<EntityRef> = topo.block_ids().map(EntityRef::Block).collect();
    order.extend(topo.face_ids().map(EntityRef::Face));
    order.extend(topo.edge_ids().map(EntityRef::Edge));
    order.extend(topo.points().map(|p| EntityRef::Point(p.id())));
    for entity in order {
        if !is_meshed(topo, entity)? {
            gen_mesh(topo, mesh, ctx, entity)?;
        }
    }
    Ok(())
}

/// Whether `entity` already owns its nodes.
pub fn is_meshed(topo: &MultiBlockTopology, entity: EntityRef) -> Result<bool, MeshError> {
    Ok(match entity {
        EntityRef::Point(p) => topo.point(p)?.node().is_some(),
        EntityRef::Edge(e) => topo.edge(e)?.is_meshed(),
        EntityRef::Face(f) => topo.face(f)?.is_meshed(),
        EntityRef::Block(b) => topo.block(b)?.is_meshed(),
    })
}

struct Mesher<'a> {
    topo: &'a mut MultiBlockTopology,
    mesh: &'a mut Mesh,
    ctx: &'a mut MeshingContext,
    generator: &'a dyn ElementGenerator,
}

impl Mesher<'_> {
    fn new_node(&mut self, position: Pos3d) -> Result<NodeTag, MeshError> {
        let tag = self.ctx.next_node_tag()?;
        self.mesh.add_node(tag, position);
        Ok(tag)
    }

    fn elements(
        &mut self,
        entity: EntityRef,
        nodes: &Lattice<NodeTag>,
    ) -> Result<Vec<ElementTag>, MeshError> {
        if !self.ctx.options.generate_elements {
            return Ok(Vec::new());
        }
        let elements = self.generator.generate(self.ctx, entity, nodes)?;
        Ok(elements
            .into_iter()
            .map(|e| self.mesh.add_element(e))
            .collect())
    }

    fn mesh_point(&mut self, p: PointId) -> Result<NodeTag, MeshError> {
        let pnt = self
            .topo
            .point(p)
            .map_err(|e| self.ctx.fail(p.into(), e))?;
        if let Some(node) = pnt.node() {
            return Ok(node);
        }
        let position = pnt.position();
        let tag = self.new_node(position)?;
        self.topo.point_mut(p)?.node = Some(tag);
        Ok(tag)
    }

    fn mesh_edge(&mut self, e: EdgeId) -> Result<(), MeshError> {
        let edge = self.topo.edge(e).map_err(|err| self.ctx.fail(e.into(), err))?;
        if edge.is_meshed() {
            if self.ctx.verbosity > 2 {
                log::debug!("edge {e}: nodes already exist");
            }
            return Ok(());
        }
        let (ndiv, p1, p2) = (edge.ndiv(), edge.p1(), edge.p2());
        if ndiv == 0 {
            return Err(self.ctx.fail(e.into(), MeshError::ZeroDivisions(e)));
        }
        let positions = self
            .topo
            .edge_positions(e)
            .map_err(|err| self.ctx.fail(e.into(), err))?;

        if self.ctx.verbosity > 4 {
            log::trace!("edge {e}: endpoint nodes at points {p1} and {p2}");
        }
        let first = self.mesh_point(p1)?;
        let last = self.mesh_point(p2)?;
        let entity = EntityRef::Edge(e);
        check_link(self.ctx, self.mesh, entity, p1.into(), (0, 0, 0), first, positions[0]);
        check_link(self.ctx, self.mesh, entity, p2.into(), (0, 0, ndiv), last, positions[ndiv]);

        let mut nodes = Vec::with_capacity(ndiv + 1);
        nodes.push(first);
        for &position in &positions[1..ndiv] {
            nodes.push(self.new_node(position)?);
        }
        nodes.push(last);

        let lattice = Lattice::from_row(nodes.clone());
        self.topo.edge_mut(e)?.nodes = nodes;
        let elements = self.elements(entity, &lattice)?;
        self.topo.edge_mut(e)?.elements = elements;
        Ok(())
    }

    fn mesh_face(&mut self, f: FaceId) -> Result<(), MeshError> {
        let face = self.topo.face(f).map_err(|err| self.ctx.fail(f.into(), err))?;
        if face.is_meshed() {
            if self.ctx.verbosity > 2 {
                log::debug!("face {f}: nodes already exist");
            }
            return Ok(());
        }
        let sides = *face.sides();
        for side in sides {
            self.mesh_edge(side.edge)?;
        }
        let (n_u, n_v) = face_divisions(self.topo, f).map_err(|err| self.ctx.fail(f.into(), err))?;
        let positions = face_positions(self.topo, f).map_err(|err| self.ctx.fail(f.into(), err))?;

        let entity = EntityRef::Face(f);
        let mut cells: Lattice<Option<NodeTag>> = Lattice::filled(1, n_v + 1, n_u + 1, None);
        for (s, side) in sides.iter().enumerate() {
            let ndiv = if s % 2 == 0 { n_u } else { n_v };
            let edge_nodes = self.topo.edge(side.edge)?.nodes().to_vec();
            if edge_nodes.len() != ndiv + 1 {
                return Err(self.ctx.fail(entity, MeshError::NotMeshed(side.edge.into())));
            }
            for k in 0..=ndiv {
                let (fi, fj) = side_cell(s, k, n_u, n_v);
                let idx = (0, fj, fi);
                let node = edge_nodes[side.edge_index(k, ndiv)];
                bind(
                    self.ctx,
                    self.mesh,
                    &mut cells,
                    idx,
                    node,
                    (entity, side.edge.into()),
                    Some(positions[idx]),
                );
            }
        }

        let nodes = self.fill_interior(cells, &positions, entity)?;
        self.topo.face_mut(f)?.nodes = Some(nodes.clone());
        let elements = self.elements(entity, &nodes)?;
        self.topo.face_mut(f)?.elements = elements;
        Ok(())
    }

    fn mesh_block(&mut self, b: BlockId) -> Result<(), MeshError> {
        let block = self.topo.block(b).map_err(|err| self.ctx.fail(b.into(), err))?;
        if block.is_meshed() {
            if self.ctx.verbosity > 2 {
                log::debug!("block {b}: nodes already exist");
            }
            return Ok(());
        }
        if let Some(slot) = block.missing_slot() {
            return Err(self.ctx.fail(b.into(), MeshError::IncompleteBlock { block: b, slot }));
        }
        let placements: Vec<BlockFace> = block.placed_faces().map(|(_, bf)| *bf).collect();
        let vertices = *block.vertices();

        for placement in &placements {
            self.mesh_face(placement.face)?;
        }
        let entity = EntityRef::Block(b);
        let divisions = self
            .block_divisions(b)
            .map_err(|err| self.ctx.fail(entity, err))?;
        let (n_i, n_j, n_k) = divisions;

        let positions =
            block_positions(self.topo, b, divisions).map_err(|err| self.ctx.fail(entity, err))?;
        let mut cells: Lattice<Option<NodeTag>> = Lattice::filled(n_k + 1, n_j + 1, n_i + 1, None);
        for placement in &placements {
            let face_nodes = match self.topo.face(placement.face)?.nodes() {
                Some(nodes) => nodes.clone(),
                None => {
                    let err = MeshError::NotMeshed(placement.face.into());
                    return Err(self.ctx.fail(entity, err));
                }
            };
            let (_, rows, cols) = face_nodes.shape();
            let map = FaceMap::new(b, placement, (cols - 1, rows - 1), divisions)
                .map_err(|err| self.ctx.fail(entity, err))?;
            for ((_, fj, fi), &node) in face_nodes.indexed_iter() {
                let idx = map.cell(fi, fj);
                bind(
                    self.ctx,
                    self.mesh,
                    &mut cells,
                    idx,
                    node,
                    (entity, placement.face.into()),
                    Some(positions[idx]),
                );
            }
        }

        if let Some((idx, _)) = cells
            .indexed_iter()
            .find(|(idx, c)| c.is_none() && cells.is_boundary(*idx))
        {
            log::error!("block {b}: hull cell {idx:?} not covered by any face");
            let err = match placements.first() {
                Some(base) => MeshError::UnresolvedOrientation {
                    block: b,
                    face: base.face,
                },
                None => MeshError::IncompleteBlock {
                    block: b,
                    slot: BASE,
                },
            };
            return Err(self.ctx.fail(entity, err));
        }

        // corner cells must hold the vertex points' own nodes
        for (v, point) in vertices.iter().enumerate() {
            let Some(point) = *point else { continue };
            let idx = vertex_index(v, n_i, n_j, n_k);
            let expected = self.topo.point(point)?.node();
            if expected.is_some() && cells[idx] != expected {
                self.ctx.report(
                    Diagnostic::new(
                        DiagnosticKind::Linking,
                        entity,
                        format!("vertex {v} cell does not hold the node of point {point}"),
                    )
                    .with_other(point.into())
                    .at(idx),
                );
            }
        }

        let nodes = self.fill_interior(cells, &positions, entity)?;
        self.topo.block_mut(b)?.nodes = Some(nodes.clone());
        let elements = self.elements(entity, &nodes)?;
        self.topo.block_mut(b)?.elements = elements;
        Ok(())
    }

    fn block_divisions(&self, b: BlockId) -> Result<(usize, usize, usize), MeshError> {
        check_block_ndivs(self.topo, b)?;
        Ok((
            self.topo.block_ndiv_i(b)?,
            self.topo.block_ndiv_j(b)?,
            self.topo.block_ndiv_k(b)?,
        ))
    }

    /// Creates nodes for every unbound cell and returns the full lattice.
    fn fill_interior(
        &mut self,
        mut cells: Lattice<Option<NodeTag>>,
        positions: &Lattice<Pos3d>,
        entity: EntityRef,
    ) -> Result<Lattice<NodeTag>, MeshError> {
        let holes: Vec<_> = cells
            .indexed_iter()
            .filter(|(_, c)| c.is_none())
            .map(|(idx, _)| idx)
            .collect();
        for idx in holes {
            cells[idx] = Some(self.new_node(positions[idx])?);
        }
        cells
            .into_complete()
            .map_err(|_| self.ctx.fail(entity, MeshError::NotMeshed(entity)))
    }
}
