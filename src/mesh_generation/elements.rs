//! Element generation from completed node lattices.
//!
//! The mesher hands every freshly meshed entity's lattice to an
//! [`ElementGenerator`]. [`LinearCells`] connects adjacent lattice nodes into
//! segments, quadrilaterals or hexahedra according to the entity's
//! dimension; [`NoElements`] generates nothing.

use itertools::iproduct;

use crate::context::MeshingContext;
use crate::data::lattice::Lattice;
use crate::data::mesh::Element;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::handle::{EntityRef, NodeTag};

/// Builds elements over a meshed entity's node lattice.
pub trait ElementGenerator {
    /// Elements for `entity`, whose nodes are `nodes`. Tags come from `ctx`.
    fn generate(
        &self,
        ctx: &mut MeshingContext,
        entity: EntityRef,
        nodes: &Lattice<NodeTag>,
    ) -> Result<Vec<Element>, MeshError>;
}

/// Generates no elements.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoElements;

impl ElementGenerator for NoElements {
    fn generate(
        &self,
        _ctx: &mut MeshingContext,
        _entity: EntityRef,
        _nodes: &Lattice<NodeTag>,
    ) -> Result<Vec<Element>, MeshError> {
        Ok(Vec::new())
    }
}

/// First-order cells between adjacent lattice nodes.
///
/// Only entities of the generator's dimension get elements, so meshing a
/// block does not also produce quads on its faces and segments on its edges.
#[derive(Clone, Copy, Debug)]
pub struct LinearCells {
    pub dimension: u8,
}

impl LinearCells {
    /// Cells for entities of `dimension` (1, 2 or 3).
    pub fn new(dimension: u8) -> Self {
        Self { dimension }
    }
}

impl Default for LinearCells {
    fn default() -> Self {
        Self::new(3)
    }
}

impl ElementGenerator for LinearCells {
    fn generate(
        &self,
        ctx: &mut MeshingContext,
        entity: EntityRef,
        nodes: &Lattice<NodeTag>,
    ) -> Result<Vec<Element>, MeshError> {
        if entity.dimension() != self.dimension {
            return Ok(Vec::new());
        }
        let (layers, rows, cols) = nodes.shape();
        let mut out = Vec::new();
        match entity.dimension() {
            1 => {
                for i in 0..cols.saturating_sub(1) {
                    out.push(Element {
                        tag: ctx.next_element_tag()?,
                        cell_type: CellType::Segment,
                        nodes: vec![nodes[(0, 0, i)], nodes[(0, 0, i + 1)]],
                    });
                }
            }
            2 => {
                for (j, i) in iproduct!(0..rows.saturating_sub(1), 0..cols.saturating_sub(1)) {
                    out.push(Element {
                        tag: ctx.next_element_tag()?,
                        cell_type: CellType::Quadrilateral,
                        nodes: vec![
                            nodes[(0, j, i)],
                            nodes[(0, j, i + 1)],
                            nodes[(0, j + 1, i + 1)],
                            nodes[(0, j + 1, i)],
                        ],
                    });
                }
            }
            3 => {
                let cells = iproduct!(
                    0..layers.saturating_sub(1),
                    0..rows.saturating_sub(1),
                    0..cols.saturating_sub(1)
                );
                for (k, j, i) in cells {
                    let quad = |k: usize| {
                        [
                            nodes[(k, j, i)],
                            nodes[(k, j, i + 1)],
                            nodes[(k, j + 1, i + 1)],
                            nodes[(k, j + 1, i)],
                        ]
                    };
                    let mut conn = quad(k).to_vec();
                    conn.extend_from_slice(&quad(k + 1));
                    out.push(Element {
                        tag: ctx.next_element_tag()?,
                        cell_type: CellType::Hexahedron,
                        nodes: conn,
                    });
                }
            }
            _ => {}
        }
        Ok(out)
    }
}
