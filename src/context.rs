//! Meshing session state: options, tag allocators and the diagnostic channel.
//!
//! A [`MeshingContext`] is passed explicitly to every generation call. It
//! replaces process-wide counters: node and element tags are handed out by
//! allocators owned by the context, so two contexts created with the same
//! settings produce the same tag sequence.

use std::fmt;

use crate::mesh_error::MeshError;
use crate::topology::handle::{ElementTag, EntityRef, NodeTag};

/// Default squared-distance tolerance used when linking reused nodes.
pub const DEFAULT_LINK_TOLERANCE: f64 = 1e-4;

/// Tunables for mesh generation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MeshingOptions {
    /// Maximum squared distance between a reused node and the position the
    /// composite entity computes for that lattice cell.
    pub link_tolerance: f64,
    /// Call the element generator once an entity's lattice is complete.
    pub generate_elements: bool,
    /// When asked to mesh an entity that already has nodes, compare the stored
    /// node positions against its current geometry.
    pub check_existing_geometry: bool,
}

impl Default for MeshingOptions {
    fn default() -> Self {
        Self {
            link_tolerance: DEFAULT_LINK_TOLERANCE,
            generate_elements: true,
            check_existing_geometry: true,
        }
    }
}

/// Monotonic tag source.
#[derive(Clone, Debug)]
pub struct TagAllocator {
    next: u64,
}

impl TagAllocator {
    /// Allocator whose first tag is `first` (0 is bumped to 1).
    pub fn starting_at(first: u64) -> Self {
        Self { next: first.max(1) }
    }

    /// Raw value the next call to [`TagAllocator::next_raw`] will return.
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Hands out the next raw tag.
    pub fn next_raw(&mut self) -> u64 {
        let raw = self.next;
        self.next += 1;
        raw
    }
}

impl Default for TagAllocator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

/// Category of a reported problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Missing shared edge, unresolved orientation, incomplete block.
    Topology,
    /// Division mismatch on a frozen edge and similar recoverable conflicts.
    Consistency,
    /// A reused node lies away from the position computed for its lattice cell.
    Linking,
    /// Stored node positions no longer match the geometry of a meshed entity.
    GeometryChanged,
    /// The entity cannot be meshed in its current state.
    Precondition,
}

impl DiagnosticKind {
    /// Whether the generation step that produced this diagnostic was abandoned.
    pub fn is_blocking(self) -> bool {
        matches!(self, DiagnosticKind::Topology | DiagnosticKind::Precondition)
    }
}

/// A problem found while authoring or meshing.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Entity whose operation reported the problem.
    pub entity: EntityRef,
    /// Second entity involved (the boundary entity a node was reused from).
    pub other: Option<EntityRef>,
    /// Lattice index `(layer, row, col)` of the offending cell, if any.
    pub index: Option<(usize, usize, usize)>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, entity: EntityRef, message: impl Into<String>) -> Self {
        Self {
            kind,
            entity,
            other: None,
            index: None,
            message: message.into(),
        }
    }

    /// Builds the diagnostic matching a returned error.
    pub fn from_error(entity: EntityRef, err: &MeshError) -> Self {
        let kind = match err {
            MeshError::NDivMismatch { .. } | MeshError::EdgeAlreadyMeshed { .. } => {
                DiagnosticKind::Consistency
            }
            MeshError::ZeroDivisions(_)
            | MeshError::NotMeshed(_)
            | MeshError::UnknownEntity(_)
            | MeshError::UnknownNode(_)
            | MeshError::InvalidGeometry(_) => DiagnosticKind::Precondition,
            _ => DiagnosticKind::Topology,
        };
        Self::new(kind, entity, err.to_string())
    }

    pub fn with_other(mut self, other: EntityRef) -> Self {
        self.other = Some(other);
        self
    }

    pub fn at(mut self, index: (usize, usize, usize)) -> Self {
        self.index = Some(index);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} [{}", self.kind, self.entity)?;
        if let Some(other) = self.other {
            write!(f, " / {other}")?;
        }
        if let Some((k, j, i)) = self.index {
            write!(f, " @ ({k},{j},{i})")?;
        }
        write!(f, "] {}", self.message)
    }
}

/// Session object threaded through every meshing call.
#[derive(Clone, Debug, Default)]
pub struct MeshingContext {
    /// 0 = silent; higher values enable progressively chattier `log` output.
    pub verbosity: u8,
    pub options: MeshingOptions,
    node_tags: TagAllocator,
    element_tags: TagAllocator,
    diagnostics: Vec<Diagnostic>,
}

impl MeshingContext {
    pub fn new(options: MeshingOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_first_node_tag(mut self, first: u64) -> Self {
        self.node_tags = TagAllocator::starting_at(first);
        self
    }

    pub fn with_first_element_tag(mut self, first: u64) -> Self {
        self.element_tags = TagAllocator::starting_at(first);
        self
    }

    /// Allocates a fresh node tag.
    pub fn next_node_tag(&mut self) -> Result<NodeTag, MeshError> {
        NodeTag::new(self.node_tags.next_raw())
    }

    /// Allocates a fresh element tag.
    pub fn next_element_tag(&mut self) -> Result<ElementTag, MeshError> {
        ElementTag::new(self.element_tags.next_raw())
    }

    /// Records a diagnostic and forwards it to the `log` facade.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.kind.is_blocking() {
            log::error!("{diagnostic}");
        } else {
            log::warn!("{diagnostic}");
        }
        self.diagnostics.push(diagnostic);
    }

    /// Reports `err` against `entity` and hands it back for propagation.
    pub fn fail(&mut self, entity: EntityRef, err: MeshError) -> MeshError {
        self.report(Diagnostic::from_error(entity, &err));
        err
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics of a single kind.
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    /// Removes and returns all recorded diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
