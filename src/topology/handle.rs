//! Strong, zero-cost handles for topology entities, nodes and elements.
//!
//! Every entity of the multi-block topology (point, edge, face, block) and
//! every generated node or element is addressed by an opaque tag. Each tag
//! type wraps a `NonZeroU64` so that 0 stays reserved as an invalid value and
//! `Option<Tag>` costs nothing extra.
//!
//! Handles are `repr(transparent)`, ordered, hashable and serializable, so they
//! can key `BTreeMap` arenas and travel through the persistence channel as
//! plain integers.

use std::{fmt, num::NonZeroU64};

use crate::mesh_error::MeshError;

macro_rules! define_tag {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(NonZeroU64);

        impl $name {
            /// Creates a new tag from a raw `u64` value.
            ///
            /// Returns [`MeshError::InvalidTag`] if `raw == 0`.
            #[inline]
            pub fn new(raw: u64) -> Result<Self, MeshError> {
                NonZeroU64::new(raw).map($name).ok_or(MeshError::InvalidTag)
            }

            /// Returns the inner `u64` value of this tag.
            #[inline]
            pub const fn get(self) -> u64 {
                self.0.get()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.get()).finish()
            }
        }

        /// Prints only the raw integer.
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.get())
            }
        }
    };
}

define_tag!(
    /// Handle of a zero-dimensional topology entity.
    PointId
);
define_tag!(
    /// Handle of a line, arc or polyline edge.
    EdgeId
);
define_tag!(
    /// Handle of a four-sided face.
    FaceId
);
define_tag!(
    /// Handle of a six-faced block.
    BlockId
);
define_tag!(
    /// Tag of a node owned by the analysis model.
    NodeTag
);
define_tag!(
    /// Tag of an element owned by the analysis model.
    ElementTag
);

/// Reference to any topology entity, used by diagnostics and generic queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum EntityRef {
    Point(PointId),
    Edge(EdgeId),
    Face(FaceId),
    Block(BlockId),
}

impl EntityRef {
    /// Topological dimension of the referenced entity.
    pub fn dimension(self) -> u8 {
        match self {
            EntityRef::Point(_) => 0,
            EntityRef::Edge(_) => 1,
            EntityRef::Face(_) => 2,
            EntityRef::Block(_) => 3,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Point(p) => write!(f, "point {p}"),
            EntityRef::Edge(e) => write!(f, "edge {e}"),
            EntityRef::Face(s) => write!(f, "face {s}"),
            EntityRef::Block(b) => write!(f, "block {b}"),
        }
    }
}

impl From<PointId> for EntityRef {
    fn from(p: PointId) -> Self {
        EntityRef::Point(p)
    }
}

impl From<EdgeId> for EntityRef {
    fn from(e: EdgeId) -> Self {
        EntityRef::Edge(e)
    }
}

impl From<FaceId> for EntityRef {
    fn from(s: FaceId) -> Self {
        EntityRef::Face(s)
    }
}

impl From<BlockId> for EntityRef {
    fn from(b: BlockId) -> Self {
        EntityRef::Block(b)
    }
}
