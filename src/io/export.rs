//! Export view for interchange and visualization writers.
//!
//! Writers only need, per topology entity, a cell type identifier, the
//! ordered vertex points and the node tags of its lattice. [`export_cell`]
//! assembles that view; the writers themselves live outside this crate.

use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::handle::{EntityRef, NodeTag, PointId};
use crate::topology::multi_block::MultiBlockTopology;

/// What an export writer needs to know about one entity.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExportCell {
    pub entity: EntityRef,
    pub cell_type: CellType,
    /// Vertex points in the entity's own numbering.
    pub vertices: Vec<PointId>,
    /// Lattice node tags, column index fastest; empty before meshing.
    pub nodes: Vec<NodeTag>,
}

impl ExportCell {
    pub fn vtk_id(&self) -> i32 {
        self.cell_type.vtk_id()
    }

    pub fn med_id(&self) -> Option<i32> {
        self.cell_type.med_id()
    }
}

/// Export view of `entity`.
pub fn export_cell(topo: &MultiBlockTopology, entity: EntityRef) -> Result<ExportCell, MeshError> {
    let (cell_type, vertices, nodes) = match entity {
        EntityRef::Point(p) => {
            let pnt = topo.point(p)?;
            (CellType::Vertex, vec![p], pnt.node().into_iter().collect())
        }
        EntityRef::Edge(e) => {
            let edge = topo.edge(e)?;
            (edge.cell_type(), edge.key_points(), edge.node_tags_forward())
        }
        EntityRef::Face(f) => {
            let face = topo.face(f)?;
            let nodes = face.nodes().map(|l| l.iter().copied().collect()).unwrap_or_default();
            (face.cell_type(), face.vertices().to_vec(), nodes)
        }
        EntityRef::Block(b) => {
            let block = topo.block(b)?;
            let vertices = block
                .vertices()
                .iter()
                .map(|v| v.ok_or(MeshError::IncompleteBlock {
                    block: b,
                    slot: block.missing_slot().unwrap_or_default(),
                }))
                .collect::<Result<Vec<_>, _>>()?;
            let nodes = block.nodes().map(|l| l.iter().copied().collect()).unwrap_or_default();
            (block.cell_type(), vertices, nodes)
        }
    };
    Ok(ExportCell {
        entity,
        cell_type,
        vertices,
        nodes,
    })
}

/// Export views of every entity, blocks first, then faces, edges and points.
pub fn export_all(topo: &MultiBlockTopology) -> Result<Vec<ExportCell>, MeshError> {
    let entities = topo
        .block_ids()
        .map(EntityRef::Block)
        .chain(topo.face_ids().map(EntityRef::Face))
        .chain(topo.edge_ids().map(EntityRef::Edge))
        .chain(topo.points().map(|p| EntityRef::Point(p.id())));
    entities.map(|e| export_cell(topo, e)).collect()
}
