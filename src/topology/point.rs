//! `Pnt`: zero-dimensional topology entity anchored at a 3D position.
//!
//! A point owns at most one node, created lazily the first time an incident
//! entity is meshed, and keeps back-references to the edges that use it.

use std::collections::BTreeSet;

use crate::geometry::vector::Pos3d;
use crate::topology::handle::{EdgeId, NodeTag, PointId};

/// A point of the topology.
///
/// The position is fixed at creation. `node` is set the first time the point
/// or an edge ending at it is meshed.
#[derive(Clone, Debug, PartialEq)]
pub struct Pnt {
    id: PointId,
    position: Pos3d,
    pub(crate) node: Option<NodeTag>,
    pub(crate) edges: BTreeSet<EdgeId>,
}

impl Pnt {
    pub(crate) fn new(id: PointId, position: Pos3d) -> Self {
        Self {
            id,
            position,
            node: None,
            edges: BTreeSet::new(),
        }
    }

    /// Tag of this point.
    #[inline]
    pub fn id(&self) -> PointId {
        self.id
    }

    /// Position; fixed for the life of the point.
    #[inline]
    pub fn position(&self) -> Pos3d {
        self.position
    }

    /// Node generated at this point, if any.
    #[inline]
    pub fn node(&self) -> Option<NodeTag> {
        self.node
    }

    /// Edges that start, end or pass through this point.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().copied()
    }

    /// Whether `edge` uses this point.
    pub fn touches(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_point_has_no_node() {
        let p = Pnt::new(PointId::new(3).unwrap(), [1.0, 2.0, 3.0]);
        assert_eq!(p.id().get(), 3);
        assert_eq!(p.position(), [1.0, 2.0, 3.0]);
        assert!(p.node().is_none());
        assert_eq!(p.edges().count(), 0);
    }
}
