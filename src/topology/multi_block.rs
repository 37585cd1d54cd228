//! `MultiBlockTopology`: arena owning every point, edge, face and block.
//!
//! Entities are created bottom-up (points, then edges referencing points,
//! faces referencing edges and blocks referencing faces) and addressed by
//! tag. Back-references (point → edges, edge → faces/blocks, face → blocks)
//! are plain handle sets updated on insertion.

use std::collections::BTreeMap;

use crate::algs::orientation;
use crate::context::{MeshingContext, TagAllocator};
use crate::geometry::arc::CircularSector;
use crate::geometry::vector::Pos3d;
use crate::mesh_error::MeshError;
use crate::topology::block::Block;
use crate::topology::edge::{Edge, EdgeGeometry, EdgeKind};
use crate::topology::face::{Face, Side};
use crate::topology::handle::{BlockId, EdgeId, EntityRef, FaceId, NodeTag, PointId};
use crate::topology::point::Pnt;

/// Arena of points, edges, faces and blocks, keyed by tag.
///
/// Iteration is in tag order, so everything built on top of it is
/// deterministic.
#[derive(Clone, Debug, Default)]
pub struct MultiBlockTopology {
    points: BTreeMap<PointId, Pnt>,
    edges: BTreeMap<EdgeId, Edge>,
    faces: BTreeMap<FaceId, Face>,
    blocks: BTreeMap<BlockId, Block>,
    point_tags: TagAllocator,
    edge_tags: TagAllocator,
    face_tags: TagAllocator,
    block_tags: TagAllocator,
}

impl MultiBlockTopology {
    /// Empty topology; tags start at 1 for every kind.
    pub fn new() -> Self {
        Self::default()
    }

    // --- authoring ---

    /// Adds a point at `position`.
    ///
    /// Fails with [`MeshError::InvalidGeometry`] on non-finite coordinates.
    pub fn add_point(&mut self, position: Pos3d) -> Result<PointId, MeshError> {
        if position.iter().any(|c| !c.is_finite()) {
            return Err(MeshError::InvalidGeometry(format!(
                "point position {position:?} is not finite"
            )));
        }
        let id = PointId::new(self.point_tags.next_raw())?;
        self.points.insert(id, Pnt::new(id, position));
        Ok(id)
    }

    /// Straight edge from `p1` to `p2`.
    pub fn add_line(&mut self, p1: PointId, p2: PointId) -> Result<EdgeId, MeshError> {
        self.insert_edge(EdgeKind::Line { p1, p2 })
    }

    /// Circular arc from `p1` to `p2` through `mid`.
    pub fn add_arc(&mut self, p1: PointId, p2: PointId, mid: PointId) -> Result<EdgeId, MeshError> {
        let kind = EdgeKind::CircularArc { p1, p2, mid };
        for p in kind.key_points() {
            self.point(p)?;
        }
        CircularSector::from_three_points(
            self.point(p1)?.position(),
            self.point(mid)?.position(),
            self.point(p2)?.position(),
        )?;
        self.insert_edge(kind)
    }

    /// Polyline through `vertices`; needs at least two of them.
    pub fn add_polyline(&mut self, vertices: &[PointId]) -> Result<EdgeId, MeshError> {
        if vertices.len() < 2 {
            return Err(MeshError::InvalidGeometry(format!(
                "polyline needs at least 2 vertices, got {}",
                vertices.len()
            )));
        }
        self.insert_edge(EdgeKind::Polyline {
            vertices: vertices.to_vec(),
        })
    }

    fn insert_edge(&mut self, kind: EdgeKind) -> Result<EdgeId, MeshError> {
        let key_points = kind.key_points();
        for &p in &key_points {
            self.point(p)?;
        }
        if kind.p1() == kind.p2() {
            return Err(MeshError::InvalidGeometry(
                "edge endpoints must be distinct points".into(),
            ));
        }
        let id = EdgeId::new(self.edge_tags.peek())?;
        let edge = Edge::new(id, kind)
            .ok_or_else(|| MeshError::InvalidGeometry("edge has no endpoints".into()))?;
        self.edge_tags.next_raw();
        for p in key_points {
            if let Some(pnt) = self.points.get_mut(&p) {
                pnt.edges.insert(id);
            }
        }
        self.edges.insert(id, edge);
        Ok(id)
    }

    /// Face bounded by four edges listed around the loop.
    ///
    /// The direction of each side is inferred from shared endpoints; the loop
    /// starts at the end of side 0 that is not shared with side 1.
    pub fn add_face(&mut self, edges: [EdgeId; 4]) -> Result<FaceId, MeshError> {
        let id = FaceId::new(self.face_tags.peek())?;
        for (i, e) in edges.iter().enumerate() {
            if edges[..i].contains(e) {
                return Err(MeshError::InvalidGeometry(format!(
                    "edge {e} appears twice in face {id}"
                )));
            }
        }
        let ends = edges
            .iter()
            .map(|&e| self.edge(e).map(|edge| (edge.p1(), edge.p2())))
            .collect::<Result<Vec<_>, _>>()?;

        let (a0, b0) = ends[0];
        let (a1, b1) = ends[1];
        let first_forward = if b0 == a1 || b0 == b1 {
            true
        } else if a0 == a1 || a0 == b1 {
            false
        } else {
            return Err(MeshError::OpenFaceLoop { face: id, side: 0 });
        };

        let start = if first_forward { a0 } else { b0 };
        let mut current = if first_forward { b0 } else { a0 };
        let mut sides = [Side {
            edge: edges[0],
            forward: first_forward,
        }; 4];
        let mut vertices = [start; 4];
        for s in 1..4 {
            let (a, b) = ends[s];
            vertices[s] = current;
            let forward = if a == current {
                current = b;
                true
            } else if b == current {
                current = a;
                false
            } else {
                return Err(MeshError::OpenFaceLoop { face: id, side: s });
            };
            sides[s] = Side {
                edge: edges[s],
                forward,
            };
        }
        if current != start {
            return Err(MeshError::OpenFaceLoop { face: id, side: 3 });
        }

        self.face_tags.next_raw();
        for e in edges {
            if let Some(edge) = self.edges.get_mut(&e) {
                edge.faces.insert(id);
            }
        }
        self.faces.insert(id, Face::new(id, sides, vertices));
        Ok(id)
    }

    /// Empty block; faces are added with [`MultiBlockTopology::insert_face`].
    pub fn add_block(&mut self) -> Result<BlockId, MeshError> {
        let id = BlockId::new(self.block_tags.next_raw())?;
        self.blocks.insert(id, Block::new(id));
        Ok(id)
    }

    /// Places `face` in `block`, resolving its slot and orientation.
    ///
    /// On failure the error is reported to `ctx` and the face stays unplaced.
    pub fn insert_face(
        &mut self,
        ctx: &mut MeshingContext,
        block: BlockId,
        face: FaceId,
    ) -> Result<usize, MeshError> {
        orientation::insert_face(self, block, face).map_err(|e| ctx.fail(block.into(), e))
    }

    /// Block built from `faces` in insertion order (base first).
    pub fn add_block_with_faces(
        &mut self,
        ctx: &mut MeshingContext,
        faces: &[FaceId],
    ) -> Result<BlockId, MeshError> {
        let block = self.add_block()?;
        for &face in faces {
            self.insert_face(ctx, block, face)?;
        }
        if ctx.verbosity > 3 {
            log::debug!("block {block} created with {} faces", faces.len());
        }
        Ok(block)
    }

    // --- lookup ---

    /// Point `id`, or [`MeshError::UnknownEntity`].
    pub fn point(&self, id: PointId) -> Result<&Pnt, MeshError> {
        self.points
            .get(&id)
            .ok_or(MeshError::UnknownEntity(EntityRef::Point(id)))
    }

    /// Edge `id`, or [`MeshError::UnknownEntity`].
    pub fn edge(&self, id: EdgeId) -> Result<&Edge, MeshError> {
        self.edges
            .get(&id)
            .ok_or(MeshError::UnknownEntity(EntityRef::Edge(id)))
    }

    /// Face `id`, or [`MeshError::UnknownEntity`].
    pub fn face(&self, id: FaceId) -> Result<&Face, MeshError> {
        self.faces
            .get(&id)
            .ok_or(MeshError::UnknownEntity(EntityRef::Face(id)))
    }

    /// Block `id`, or [`MeshError::UnknownEntity`].
    pub fn block(&self, id: BlockId) -> Result<&Block, MeshError> {
        self.blocks
            .get(&id)
            .ok_or(MeshError::UnknownEntity(EntityRef::Block(id)))
    }

    pub(crate) fn point_mut(&mut self, id: PointId) -> Result<&mut Pnt, MeshError> {
        self.points
            .get_mut(&id)
            .ok_or(MeshError::UnknownEntity(EntityRef::Point(id)))
    }

    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge, MeshError> {
        self.edges
            .get_mut(&id)
            .ok_or(MeshError::UnknownEntity(EntityRef::Edge(id)))
    }

    pub(crate) fn face_mut(&mut self, id: FaceId) -> Result<&mut Face, MeshError> {
        self.faces
            .get_mut(&id)
            .ok_or(MeshError::UnknownEntity(EntityRef::Face(id)))
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> Result<&mut Block, MeshError> {
        self.blocks
            .get_mut(&id)
            .ok_or(MeshError::UnknownEntity(EntityRef::Block(id)))
    }

    /// Whether `entity` exists.
    pub fn contains(&self, entity: EntityRef) -> bool {
        match entity {
            EntityRef::Point(p) => self.points.contains_key(&p),
            EntityRef::Edge(e) => self.edges.contains_key(&e),
            EntityRef::Face(f) => self.faces.contains_key(&f),
            EntityRef::Block(b) => self.blocks.contains_key(&b),
        }
    }

    /// Points in tag order.
    pub fn points(&self) -> impl Iterator<Item = &Pnt> + '_ {
        self.points.values()
    }

    /// Edges in tag order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values()
    }

    /// Faces in tag order.
    pub fn faces(&self) -> impl Iterator<Item = &Face> + '_ {
        self.faces.values()
    }

    /// Blocks in tag order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.values()
    }

    /// Edge tags in order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.keys().copied()
    }

    /// Face tags in order.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.keys().copied()
    }

    /// Block tags in order.
    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks.keys().copied()
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Edge joining `p` and `q`, in either direction.
    pub fn find_edge(&self, p: PointId, q: PointId) -> Option<EdgeId> {
        let pnt = self.points.get(&p)?;
        pnt.edges()
            .find(|e| self.edges.get(e).is_some_and(|edge| edge.has_endpoints(p, q)))
    }

    // --- geometry ---

    /// Position of point `p`.
    pub fn position(&self, p: PointId) -> Result<Pos3d, MeshError> {
        self.point(p).map(Pnt::position)
    }

    /// Edge shape resolved against the current point positions.
    pub fn edge_geometry(&self, id: EdgeId) -> Result<EdgeGeometry, MeshError> {
        match self.edge(id)?.kind() {
            EdgeKind::Line { p1, p2 } => Ok(EdgeGeometry::Line(
                self.position(*p1)?,
                self.position(*p2)?,
            )),
            EdgeKind::CircularArc { p1, p2, mid } => {
                Ok(EdgeGeometry::Arc(CircularSector::from_three_points(
                    self.position(*p1)?,
                    self.position(*mid)?,
                    self.position(*p2)?,
                )?))
            }
            EdgeKind::Polyline { vertices } => Ok(EdgeGeometry::Polyline(
                vertices
                    .iter()
                    .map(|&v| self.position(v))
                    .collect::<Result<_, _>>()?,
            )),
        }
    }

    /// Length of edge `id` resolved against current point positions.
    pub fn edge_length(&self, id: EdgeId) -> Result<f64, MeshError> {
        Ok(self.edge_geometry(id)?.length())
    }

    /// `ndiv + 1` positions along the edge for its current division count.
    pub fn edge_positions(&self, id: EdgeId) -> Result<Vec<Pos3d>, MeshError> {
        let ndiv = self.edge(id)?.ndiv();
        Ok(self.edge_geometry(id)?.positions(ndiv))
    }

    /// First node of the edge, or the start point's node before meshing.
    pub fn edge_first_node(&self, id: EdgeId) -> Result<Option<NodeTag>, MeshError> {
        let edge = self.edge(id)?;
        match edge.nodes().first() {
            Some(&n) => Ok(Some(n)),
            None => Ok(self.point(edge.p1())?.node()),
        }
    }

    /// Last node of the edge, or the end point's node before meshing.
    pub fn edge_last_node(&self, id: EdgeId) -> Result<Option<NodeTag>, MeshError> {
        let edge = self.edge(id)?;
        match edge.nodes().last() {
            Some(&n) => Ok(Some(n)),
            None => Ok(self.point(edge.p2())?.node()),
        }
    }

    // --- divisions ---

    /// Divisions along face sides 0 and 2.
    pub fn face_ndiv_i(&self, id: FaceId) -> Result<usize, MeshError> {
        let face = self.face(id)?;
        Ok(self.edge(face.side(0).edge)?.ndiv())
    }

    /// Divisions along face sides 1 and 3.
    pub fn face_ndiv_j(&self, id: FaceId) -> Result<usize, MeshError> {
        let face = self.face(id)?;
        Ok(self.edge(face.side(1).edge)?.ndiv())
    }

    /// Edge of `block` running along block edge `i` (see
    /// [`BLOCK_EDGES`](crate::topology::block::BLOCK_EDGES)).
    pub fn block_edge(&self, block: BlockId, i: usize) -> Result<Option<EdgeId>, MeshError> {
        let Some((face, side)) = self.block(block)?.edge_side(i) else {
            return Ok(None);
        };
        Ok(Some(self.face(face)?.side(side).edge))
    }

    fn block_edge_ndiv(&self, block: BlockId, i: usize) -> Result<usize, MeshError> {
        match self.block_edge(block, i)? {
            Some(e) => Ok(self.edge(e)?.ndiv()),
            None => Err(MeshError::IncompleteBlock {
                block,
                slot: self.block(block)?.missing_slot().unwrap_or_default(),
            }),
        }
    }

    /// Divisions from block vertex 0 to vertex 1.
    pub fn block_ndiv_i(&self, block: BlockId) -> Result<usize, MeshError> {
        self.block_edge_ndiv(block, 0)
    }

    /// Divisions from block vertex 1 to vertex 2.
    pub fn block_ndiv_j(&self, block: BlockId) -> Result<usize, MeshError> {
        self.block_edge_ndiv(block, 1)
    }

    /// Divisions from block vertex 0 to vertex 4.
    pub fn block_ndiv_k(&self, block: BlockId) -> Result<usize, MeshError> {
        self.block_edge_ndiv(block, 4)
    }

    /// Positions of the eight block vertices.
    pub fn block_corner_positions(&self, block: BlockId) -> Result<[Pos3d; 8], MeshError> {
        let b = self.block(block)?;
        let mut out = [[0.0; 3]; 8];
        for (v, slot) in out.iter_mut().enumerate() {
            let p = b.vertex(v).ok_or(MeshError::IncompleteBlock {
                block,
                slot: b.missing_slot().unwrap_or_default(),
            })?;
            *slot = self.position(p)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_loop_orientation_is_inferred() {
        let mut topo = MultiBlockTopology::new();
        let p: Vec<PointId> = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]
            .into_iter()
            .map(|x| topo.add_point(x).unwrap())
            .collect();
        let e0 = topo.add_line(p[0], p[1]).unwrap();
        let e1 = topo.add_line(p[2], p[1]).unwrap();
        let e2 = topo.add_line(p[2], p[3]).unwrap();
        let e3 = topo.add_line(p[0], p[3]).unwrap();
        let f = topo.add_face([e0, e1, e2, e3]).unwrap();

        let face = topo.face(f).unwrap();
        assert_eq!(face.vertices(), &[p[0], p[1], p[2], p[3]]);
        let dirs: Vec<bool> = face.sides().iter().map(|s| s.forward).collect();
        assert_eq!(dirs, vec![true, false, true, false]);
        assert!(topo.edge(e1).unwrap().touches_face(f));
        assert_eq!(topo.find_edge(p[1], p[2]), Some(e1));
    }

    #[test]
    fn open_loop_is_rejected() {
        let mut topo = MultiBlockTopology::new();
        let p: Vec<PointId> = (0..5)
            .map(|i| topo.add_point([i as f64, (i * i) as f64, 0.0]).unwrap())
            .collect();
        let e0 = topo.add_line(p[0], p[1]).unwrap();
        let e1 = topo.add_line(p[1], p[2]).unwrap();
        let e2 = topo.add_line(p[2], p[3]).unwrap();
        let e3 = topo.add_line(p[3], p[4]).unwrap();
        let err = topo.add_face([e0, e1, e2, e3]).unwrap_err();
        assert!(matches!(err, MeshError::OpenFaceLoop { side: 3, .. }));
        assert_eq!(topo.num_faces(), 0);
        assert!(!topo.edge(e0).unwrap().touches_face(FaceId::new(1).unwrap()));
    }

    #[test]
    fn degenerate_edges_are_rejected() {
        let mut topo = MultiBlockTopology::new();
        let a = topo.add_point([0.0; 3]).unwrap();
        let b = topo.add_point([1.0, 0.0, 0.0]).unwrap();
        let c = topo.add_point([2.0, 0.0, 0.0]).unwrap();
        assert!(topo.add_line(a, a).is_err());
        assert!(matches!(
            topo.add_arc(a, c, b),
            Err(MeshError::InvalidGeometry(_))
        ));
        assert!(topo.add_polyline(&[a]).is_err());
        assert!(topo.add_point([f64::NAN, 0.0, 0.0]).is_err());
        let e = topo.add_polyline(&[a, b, c]).unwrap();
        assert_eq!(topo.edge_length(e).unwrap(), 2.0);
        assert!(topo.point(b).unwrap().touches(e));
    }
}
