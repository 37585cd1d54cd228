//! Nodes and elements produced by mesh generation.
//!
//! The topology entities only hold tags; the [`Mesh`] owns the node and
//! element records, standing in for the surrounding analysis model.

use std::collections::BTreeMap;

use crate::data::sets::SetRegistry;
use crate::geometry::vector::{Pos3d, centroid, dist2};
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::handle::{ElementTag, NodeTag};

/// Analysis node: a tag and its initial position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub tag: NodeTag,
    pub position: Pos3d,
}

/// Element connecting adjacent lattice nodes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Element {
    pub tag: ElementTag,
    pub cell_type: CellType,
    pub nodes: Vec<NodeTag>,
}

/// Node and element store plus the mesh-component sets.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    nodes: BTreeMap<NodeTag, Node>,
    elements: BTreeMap<ElementTag, Element>,
    pub sets: SetRegistry,
}

impl Mesh {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node and pushes it into every active set.
    pub fn add_node(&mut self, tag: NodeTag, position: Pos3d) -> &Node {
        self.sets.push_node(tag);
        self.nodes.entry(tag).or_insert(Node { tag, position })
    }

    /// Inserts an element and pushes it into every active set.
    pub fn add_element(&mut self, element: Element) -> ElementTag {
        let tag = element.tag;
        self.sets.push_element(tag);
        self.elements.insert(tag, element);
        tag
    }

    /// Node `tag`, or [`MeshError::UnknownNode`].
    pub fn node(&self, tag: NodeTag) -> Result<&Node, MeshError> {
        self.nodes.get(&tag).ok_or(MeshError::UnknownNode(tag))
    }

    pub fn node_mut(&mut self, tag: NodeTag) -> Result<&mut Node, MeshError> {
        self.nodes.get_mut(&tag).ok_or(MeshError::UnknownNode(tag))
    }

    pub fn element(&self, tag: ElementTag) -> Option<&Element> {
        self.elements.get(&tag)
    }

    /// Nodes in tag order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Elements in tag order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements.values()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Positions of an element's nodes, in connectivity order.
    pub fn element_positions(&self, element: &Element) -> Result<Vec<Pos3d>, MeshError> {
        element
            .nodes
            .iter()
            .map(|&n| self.node(n).map(|node| node.position))
            .collect()
    }

    /// Node closest to `p` among `candidates`.
    pub fn nearest_node_in<I>(&self, candidates: I, p: Pos3d) -> Option<NodeTag>
    where
        I: IntoIterator<Item = NodeTag>,
    {
        candidates
            .into_iter()
            .filter_map(|tag| self.nodes.get(&tag))
            .min_by(|a, b| dist2(a.position, p).total_cmp(&dist2(b.position, p)))
            .map(|n| n.tag)
    }

    /// Element whose centroid is closest to `p` among `candidates`.
    pub fn nearest_element_in<I>(&self, candidates: I, p: Pos3d) -> Option<ElementTag>
    where
        I: IntoIterator<Item = ElementTag>,
    {
        candidates
            .into_iter()
            .filter_map(|tag| {
                let e = self.elements.get(&tag)?;
                let c = centroid(&self.element_positions(e).ok()?)?;
                Some((tag, dist2(c, p)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(tag, _)| tag)
    }

    /// Node closest to `p` over the whole mesh.
    pub fn nearest_node(&self, p: Pos3d) -> Option<NodeTag> {
        self.nearest_node_in(self.nodes.keys().copied(), p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nt(raw: u64) -> NodeTag {
        NodeTag::new(raw).unwrap()
    }

    #[test]
    fn add_node_is_idempotent_per_tag() {
        let mut mesh = Mesh::new();
        mesh.add_node(nt(1), [0.0; 3]);
        mesh.add_node(nt(1), [5.0; 3]);
        assert_eq!(mesh.num_nodes(), 1);
        assert_eq!(mesh.node(nt(1)).unwrap().position, [0.0; 3]);
        assert_eq!(mesh.node(nt(2)), Err(MeshError::UnknownNode(nt(2))));
    }

    #[test]
    fn nearest_queries() {
        let mut mesh = Mesh::new();
        mesh.add_node(nt(1), [0.0, 0.0, 0.0]);
        mesh.add_node(nt(2), [1.0, 0.0, 0.0]);
        mesh.add_node(nt(3), [1.0, 1.0, 0.0]);
        assert_eq!(mesh.nearest_node([0.9, 0.1, 0.0]), Some(nt(2)));

        let e = ElementTag::new(1).unwrap();
        mesh.add_element(Element {
            tag: e,
            cell_type: CellType::Segment,
            nodes: vec![nt(1), nt(2)],
        });
        assert_eq!(mesh.nearest_element_in([e], [0.5, 0.0, 0.0]), Some(e));
        assert_eq!(mesh.num_elements(), 1);
    }
}
