//! Data module: node lattices, the node/element store and mesh-component sets.

pub mod lattice;
pub mod mesh;
pub mod sets;

pub use lattice::{Lattice, LatticeIndex};
pub use mesh::{Element, Mesh, Node};
pub use sets::{MeshComponentSet, SetRegistry, TOTAL_SET};
