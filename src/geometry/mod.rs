//! Geometry utilities for multiblock-mesh.
//!
//! Positions are plain `[f64; 3]` arrays; this module provides the vector
//! helpers, the three-point circular sector used by arc edges and the
//! interpolation kernels that turn subdivision counts into node positions.

pub mod arc;
pub mod interpolation;
pub mod vector;

pub use arc::CircularSector;
pub use vector::Pos3d;
