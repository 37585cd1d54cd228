//! MeshError: Unified error type for multiblock-mesh public APIs
//!
//! Topology and precondition failures are returned through this type so the
//! authoring layer can fix the geometry and retry. Recoverable inconsistencies
//! found while meshing are reported as [`Diagnostic`](crate::context::Diagnostic)s
//! instead and never abort generation.

use crate::topology::handle::{BlockId, EdgeId, EntityRef, FaceId, NodeTag, PointId};
use thiserror::Error;

/// Unified error type for multiblock-mesh operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// Attempted to construct a tag with a zero value (invalid).
    #[error("tag must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidTag,
    /// The referenced entity does not exist in the topology.
    #[error("unknown entity: {0}")]
    UnknownEntity(EntityRef),
    /// The referenced node does not exist in the mesh.
    #[error("unknown node: {0}")]
    UnknownNode(NodeTag),
    /// Geometry that cannot be interpolated (coincident or collinear points, bad sizes).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// The four edges of a face do not form a closed loop.
    #[error("Topology error: edges of face {face} do not form a closed loop at side {side}")]
    OpenFaceLoop { face: FaceId, side: usize },
    /// Two faces were expected to share an edge but do not.
    #[error("Topology error: face {face} shares no edge with face {other} (block {block})")]
    NoCommonEdge {
        block: BlockId,
        face: FaceId,
        other: FaceId,
    },
    /// Sense comparison of a shared edge gave neither +1 nor -1.
    #[error("Topology error: orientation of face {face} in block {block} could not be resolved")]
    UnresolvedOrientation { block: BlockId, face: FaceId },
    /// A top face was inserted before any side face.
    #[error("Topology error: block {block} needs a side face before its top face {face}")]
    MissingSideFace { block: BlockId, face: FaceId },
    /// The block slot chosen for a face is already occupied.
    #[error("Topology error: slot {slot} of block {block} is already taken; face {face} left unplaced")]
    SlotOccupied {
        block: BlockId,
        slot: usize,
        face: FaceId,
    },
    /// Side faces disagree on how the top face is oriented.
    #[error(
        "Topology error: side faces {first} and {second} of block {block} disagree on the orientation of top face {face}"
    )]
    InconsistentTopFace {
        block: BlockId,
        face: FaceId,
        first: FaceId,
        second: FaceId,
    },
    /// A face maps a block vertex onto a different point than already recorded.
    #[error(
        "Topology error: face {face} puts point {found} at vertex {vertex} of block {block}, expected point {expected}"
    )]
    VertexConflict {
        block: BlockId,
        face: FaceId,
        vertex: usize,
        expected: PointId,
        found: PointId,
    },
    /// The block does not have all six faces placed.
    #[error("Topology error: block {block} has no face in slot {slot}")]
    IncompleteBlock { block: BlockId, slot: usize },
    /// Opposite edges of a face (or block) disagree on their number of divisions.
    #[error("Consistency error: {entity} has incompatible divisions ({first} vs {second})")]
    NDivMismatch {
        entity: EntityRef,
        first: usize,
        second: usize,
    },
    /// An edge must be divided at least once before meshing.
    #[error("Precondition error: edge {0} has zero divisions")]
    ZeroDivisions(EdgeId),
    /// The edge is meshed and its division count is frozen.
    #[error("Consistency error: edge {edge} is already meshed and keeps ndiv={ndiv} (requested {requested})")]
    EdgeAlreadyMeshed {
        edge: EdgeId,
        ndiv: usize,
        requested: usize,
    },
    /// A boundary entity has no node lattice although it was expected to be meshed.
    #[error("Precondition error: {0} has no nodes")]
    NotMeshed(EntityRef),
    /// Persistence buffer is missing a field or holds the wrong kind of value.
    #[error("Persistence error: field {offset}: {reason}")]
    BadField { offset: usize, reason: &'static str },
}
