//! # multiblock-mesh
//!
//! multiblock-mesh builds hexahedral multi-block topologies (points, edges,
//! quadrilateral faces, six-faced blocks) and generates structured node
//! lattices on them for finite-element preprocessing.
//!
//! ## Features
//! - Topology authoring with closed-loop checks and automatic orientation of
//!   faces inside blocks
//! - Division counts reconciled across shared edges and propagated through
//!   opposite edges of quadrilateral faces
//! - Bottom-up structured meshing: point, edge, face and block lattices that
//!   share their boundary nodes exactly
//! - Pluggable element generation over a completed node lattice
//! - Persistence through a fixed-offset field buffer and an export view with
//!   VTK/MED cell identifiers
//!
//! ## Determinism
//!
//! Node and element tags come from the [`MeshingContext`](context::MeshingContext)
//! passed to each call, and every collection that drives iteration order is
//! ordered by tag. Two sessions with the same inputs produce the same tags.
//!
//! ## Indexing
//!
//! Lattice cells are addressed `(layer k, row j, column i)`, all 0-based.
//! Edge nodes run from the first endpoint (`0`) to the second (`ndiv`).

pub mod algs;
pub mod context;
pub mod data;
pub mod geometry;
pub mod io;
pub mod mesh_error;
pub mod mesh_generation;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::reconcile::{
        harmonize_divisions, set_element_size, set_ndiv, set_ndiv_homologous,
    };
    pub use crate::context::{Diagnostic, DiagnosticKind, MeshingContext, MeshingOptions};
    pub use crate::data::lattice::{Lattice, LatticeIndex};
    pub use crate::data::mesh::{Element, Mesh, Node};
    pub use crate::data::sets::{MeshComponentSet, SetRegistry};
    pub use crate::geometry::vector::Pos3d;
    pub use crate::io::export::{ExportCell, export_cell};
    pub use crate::io::persist::{FieldBuffer, Persistent};
    pub use crate::mesh_error::MeshError;
    pub use crate::mesh_generation::{
        ElementGenerator, LinearCells, NoElements, gen_mesh, gen_mesh_all, gen_mesh_with,
        is_meshed,
    };
    pub use crate::topology::cell_type::CellType;
    pub use crate::topology::handle::{
        BlockId, EdgeId, ElementTag, EntityRef, FaceId, NodeTag, PointId,
    };
    pub use crate::topology::multi_block::MultiBlockTopology;
    pub use crate::topology::validation::{TopologyValidationOptions, validate_topology};
}
