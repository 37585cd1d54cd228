//! Multi-block topology: points, edges, faces and blocks.
//!
//! Entities live in a [`MultiBlockTopology`] arena and refer to one another by
//! tag. Composition runs downward (a block lists its faces, a face its edges,
//! an edge its points); back-references run upward and are kept as handle
//! sets.

pub mod block;
pub mod cell_type;
pub mod edge;
pub mod face;
pub mod handle;
pub mod multi_block;
pub mod point;
pub mod validation;

pub use block::{Block, BlockFace};
pub use cell_type::CellType;
pub use edge::{Edge, EdgeGeometry, EdgeKind};
pub use face::{Face, Side};
pub use handle::{BlockId, EdgeId, ElementTag, EntityRef, FaceId, NodeTag, PointId};
pub use multi_block::MultiBlockTopology;
pub use point::Pnt;

#[cfg(test)]
mod tests;
