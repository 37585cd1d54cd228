//! Named mesh-component sets.
//!
//! A set aggregates generated nodes, elements and nodal constraints under a
//! name. The [`SetRegistry`] keeps track of which sets are *active*: every node
//! or element created while a set is active is pushed into it. The `"total"`
//! set always exists and starts active.

use std::collections::{BTreeMap, BTreeSet};

use crate::data::mesh::Mesh;
use crate::geometry::vector::Pos3d;
use crate::topology::handle::{ElementTag, NodeTag};

/// Name of the set that collects everything.
pub const TOTAL_SET: &str = "total";

/// Degrees of freedom fixed at a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint {
    pub node: NodeTag,
    pub dofs: Vec<usize>,
}

/// Nodes, elements and constraints grouped under a name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshComponentSet {
    name: String,
    nodes: BTreeSet<NodeTag>,
    elements: BTreeSet<ElementTag>,
    constraints: Vec<Constraint>,
}

impl MeshComponentSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_node(&mut self, tag: NodeTag) -> bool {
        self.nodes.insert(tag)
    }

    pub fn add_element(&mut self, tag: ElementTag) -> bool {
        self.elements.insert(tag)
    }

    pub fn contains_node(&self, tag: NodeTag) -> bool {
        self.nodes.contains(&tag)
    }

    pub fn contains_element(&self, tag: ElementTag) -> bool {
        self.elements.contains(&tag)
    }

    /// Tag lookup restricted to this set.
    pub fn find_node(&self, tag: NodeTag) -> Option<NodeTag> {
        self.nodes.get(&tag).copied()
    }

    pub fn find_element(&self, tag: ElementTag) -> Option<ElementTag> {
        self.elements.get(&tag).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeTag> + '_ {
        self.nodes.iter().copied()
    }

    pub fn elements(&self) -> impl Iterator<Item = ElementTag> + '_ {
        self.elements.iter().copied()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Node of this set closest to `p`.
    pub fn nearest_node(&self, mesh: &Mesh, p: Pos3d) -> Option<NodeTag> {
        mesh.nearest_node_in(self.nodes(), p)
    }

    /// Element of this set whose centroid is closest to `p`.
    pub fn nearest_element(&self, mesh: &Mesh, p: Pos3d) -> Option<ElementTag> {
        mesh.nearest_element_in(self.elements(), p)
    }

    /// Fixes `dofs` on every node of the set. Returns the number of constrained nodes.
    pub fn fix(&mut self, dofs: &[usize]) -> usize {
        for &node in &self.nodes {
            self.constraints.push(Constraint {
                node,
                dofs: dofs.to_vec(),
            });
        }
        self.nodes.len()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Adds everything from `other` into this set.
    pub fn extend_from(&mut self, other: &MeshComponentSet) {
        self.nodes.extend(other.nodes.iter().copied());
        self.elements.extend(other.elements.iter().copied());
        self.constraints.extend(other.constraints.iter().cloned());
    }

    /// Empties the set, keeping its name.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.elements.clear();
        self.constraints.clear();
    }
}

/// Registry of named sets and the active subset.
#[derive(Clone, Debug)]
pub struct SetRegistry {
    sets: BTreeMap<String, MeshComponentSet>,
    active: BTreeSet<String>,
}

impl Default for SetRegistry {
    fn default() -> Self {
        let mut sets = BTreeMap::new();
        sets.insert(TOTAL_SET.to_string(), MeshComponentSet::new(TOTAL_SET));
        Self {
            sets,
            active: BTreeSet::from([TOTAL_SET.to_string()]),
        }
    }
}

impl SetRegistry {
    /// Returns the set called `name`, creating it if needed.
    pub fn define(&mut self, name: &str) -> &mut MeshComponentSet {
        self.sets
            .entry(name.to_string())
            .or_insert_with(|| MeshComponentSet::new(name))
    }

    pub fn get(&self, name: &str) -> Option<&MeshComponentSet> {
        self.sets.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut MeshComponentSet> {
        self.sets.get_mut(name)
    }

    pub fn total(&self) -> Option<&MeshComponentSet> {
        self.sets.get(TOTAL_SET)
    }

    /// Marks `name` active, creating it if needed.
    pub fn activate(&mut self, name: &str) {
        self.define(name);
        self.active.insert(name.to_string());
    }

    /// Returns whether the set was active.
    pub fn deactivate(&mut self, name: &str) -> bool {
        self.active.remove(name)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains(name)
    }

    /// Removes a set; `"total"` cannot be removed.
    pub fn remove(&mut self, name: &str) -> Option<MeshComponentSet> {
        if name == TOTAL_SET {
            return None;
        }
        self.active.remove(name);
        self.sets.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sets.keys().map(String::as_str)
    }

    pub(crate) fn push_node(&mut self, tag: NodeTag) {
        for name in &self.active {
            if let Some(set) = self.sets.get_mut(name) {
                set.add_node(tag);
            }
        }
    }

    pub(crate) fn push_element(&mut self, tag: ElementTag) {
        for name in &self.active {
            if let Some(set) = self.sets.get_mut(name) {
                set.add_element(tag);
            }
        }
    }
}
