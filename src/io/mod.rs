//! Persistence and export collaborators.
//!
//! [`persist`] moves entity state through a fixed-offset field buffer;
//! [`export`] exposes the cell types and node lists that mesh writers consume.

pub mod export;
pub mod persist;

pub use export::{ExportCell, export_all, export_cell};
pub use persist::{Field, FieldBuffer, Persistent};
