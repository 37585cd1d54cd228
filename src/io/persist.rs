//! Tag-based persistence of topology entities.
//!
//! Each entity writes its members into a [`FieldBuffer`] at fixed offsets
//! and can restore them from one. The buffer is serde-serializable, so any
//! transport (JSON, bincode, a message channel) can carry it without knowing
//! the entity layout.
//!
//! Offsets:
//!
//! | entity | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 |
//! |---|---|---|---|---|---|---|---|---|
//! | point | tag | position | node | edges | | | | |
//! | edge | tag | kind | key points | ndiv | nodes | faces | blocks | elements |
//! | face | tag | edges | forward flags | vertices | lattice shape | nodes | blocks | elements |
//! | block | tag | slot faces | placements | vertices | lattice shape | nodes | elements | |
//!
//! Absent tags are stored as 0.

use crate::data::lattice::Lattice;
use crate::mesh_error::MeshError;
use crate::topology::block::{Block, BlockFace, NUM_SLOTS};
use crate::topology::edge::{Edge, EdgeKind};
use crate::topology::face::{Face, Side};
use crate::topology::handle::{BlockId, EdgeId, ElementTag, EntityRef, FaceId, NodeTag, PointId};
use crate::topology::multi_block::MultiBlockTopology;
use crate::topology::point::Pnt;

/// One slot of a [`FieldBuffer`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Field {
    #[default]
    Empty,
    Int(i64),
    Float(f64),
    IntVec(Vec<i64>),
    FloatVec(Vec<f64>),
}

/// Fixed-layout record exchanged with the persistence channel.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldBuffer {
    fields: Vec<Field>,
}

impl FieldBuffer {
    pub fn with_len(len: usize) -> Self {
        Self {
            fields: vec![Field::Empty; len],
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Stores `field` at `offset`, growing the buffer if needed.
    pub fn set(&mut self, offset: usize, field: Field) {
        if offset >= self.fields.len() {
            self.fields.resize(offset + 1, Field::Empty);
        }
        self.fields[offset] = field;
    }

    pub fn get(&self, offset: usize) -> Result<&Field, MeshError> {
        self.fields.get(offset).ok_or(MeshError::BadField {
            offset,
            reason: "missing",
        })
    }

    pub fn int(&self, offset: usize) -> Result<i64, MeshError> {
        match self.get(offset)? {
            Field::Int(v) => Ok(*v),
            _ => Err(MeshError::BadField {
                offset,
                reason: "expected an integer",
            }),
        }
    }

    pub fn float(&self, offset: usize) -> Result<f64, MeshError> {
        match self.get(offset)? {
            Field::Float(v) => Ok(*v),
            _ => Err(MeshError::BadField {
                offset,
                reason: "expected a float",
            }),
        }
    }

    pub fn float_vec(&self, offset: usize) -> Result<&[f64], MeshError> {
        match self.get(offset)? {
            Field::FloatVec(v) => Ok(v),
            _ => Err(MeshError::BadField {
                offset,
                reason: "expected a float vector",
            }),
        }
    }

    pub fn int_vec(&self, offset: usize) -> Result<&[i64], MeshError> {
        match self.get(offset)? {
            Field::IntVec(v) => Ok(v),
            _ => Err(MeshError::BadField {
                offset,
                reason: "expected an integer vector",
            }),
        }
    }

    fn set_tags<T: Copy>(&mut self, offset: usize, tags: impl IntoIterator<Item = T>, raw: fn(T) -> u64) {
        self.set(
            offset,
            Field::IntVec(tags.into_iter().map(|t| raw(t) as i64).collect()),
        );
    }

    fn tags<T>(&self, offset: usize, make: fn(u64) -> Result<T, MeshError>) -> Result<Vec<T>, MeshError> {
        self.int_vec(offset)?
            .iter()
            .map(|&v| to_tag(offset, v, make))
            .collect()
    }

    fn lattice(&self, offset: usize) -> Result<Option<Lattice<NodeTag>>, MeshError> {
        let shape = match self.get(offset)? {
            Field::Empty => return Ok(None),
            Field::IntVec(s) if s.len() == 3 => s,
            _ => {
                return Err(MeshError::BadField {
                    offset,
                    reason: "expected a lattice shape",
                });
            }
        };
        let dims = shape
            .iter()
            .map(|&d| usize::try_from(d))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| MeshError::BadField {
                offset,
                reason: "negative lattice extent",
            })?;
        let extent = dims[0]
            .checked_mul(dims[1])
            .and_then(|n| n.checked_mul(dims[2]))
            .ok_or(MeshError::BadField {
                offset,
                reason: "lattice extent overflows",
            })?;
        let nodes = self.tags(offset + 1, NodeTag::new)?;
        if nodes.len() != extent {
            return Err(MeshError::BadField {
                offset: offset + 1,
                reason: "node count does not match lattice shape",
            });
        }
        let mut it = nodes.into_iter();
        Lattice::from_fn(dims[0], dims[1], dims[2], |_| it.next())
            .into_complete()
            .map(Some)
            .map_err(|_| MeshError::BadField {
                offset: offset + 1,
                reason: "node count does not match lattice shape",
            })
    }

    fn set_lattice(&mut self, offset: usize, lattice: Option<&Lattice<NodeTag>>) {
        match lattice {
            Some(l) => {
                let (k, j, i) = l.shape();
                self.set(offset, Field::IntVec(vec![k as i64, j as i64, i as i64]));
                self.set_tags(offset + 1, l.iter().copied(), NodeTag::get);
            }
            None => {
                self.set(offset, Field::Empty);
                self.set(offset + 1, Field::IntVec(Vec::new()));
            }
        }
    }
}

fn to_tag<T>(offset: usize, v: i64, make: fn(u64) -> Result<T, MeshError>) -> Result<T, MeshError> {
    let raw = u64::try_from(v).map_err(|_| MeshError::BadField {
        offset,
        reason: "negative tag",
    })?;
    make(raw)
}

fn optional_tag<T>(
    offset: usize,
    v: i64,
    make: fn(u64) -> Result<T, MeshError>,
) -> Result<Option<T>, MeshError> {
    if v == 0 { Ok(None) } else { to_tag(offset, v, make).map(Some) }
}

/// Entities that can be written to and restored from a [`FieldBuffer`].
pub trait Persistent {
    /// Number of fields the entity occupies.
    const FIELD_COUNT: usize;

    fn send_fields(&self, buf: &mut FieldBuffer) -> Result<(), MeshError>;

    /// Restores members from `buf`. The tag stored at offset 0 must match.
    fn recv_fields(&mut self, buf: &FieldBuffer) -> Result<(), MeshError>;
}

fn check_tag(buf: &FieldBuffer, expected: u64) -> Result<(), MeshError> {
    if buf.int(0)? != expected as i64 {
        return Err(MeshError::BadField {
            offset: 0,
            reason: "tag does not match the receiving entity",
        });
    }
    Ok(())
}

impl Persistent for Pnt {
    const FIELD_COUNT: usize = 4;

    fn send_fields(&self, buf: &mut FieldBuffer) -> Result<(), MeshError> {
        buf.set(0, Field::Int(self.id().get() as i64));
        buf.set(1, Field::FloatVec(self.position().to_vec()));
        buf.set(2, Field::Int(self.node().map_or(0, |n| n.get() as i64)));
        buf.set_tags(3, self.edges(), EdgeId::get);
        Ok(())
    }

    fn recv_fields(&mut self, buf: &FieldBuffer) -> Result<(), MeshError> {
        check_tag(buf, self.id().get())?;
        if buf.float_vec(1)? != self.position().as_slice() {
            return Err(MeshError::BadField {
                offset: 1,
                reason: "point positions are immutable",
            });
        }
        self.node = optional_tag(2, buf.int(2)?, NodeTag::new)?;
        self.edges = buf.tags(3, EdgeId::new)?.into_iter().collect();
        Ok(())
    }
}

const KIND_LINE: i64 = 0;
const KIND_ARC: i64 = 1;
const KIND_POLYLINE: i64 = 2;

impl Persistent for Edge {
    const FIELD_COUNT: usize = 8;

    fn send_fields(&self, buf: &mut FieldBuffer) -> Result<(), MeshError> {
        let (code, points) = match self.kind() {
            EdgeKind::Line { p1, p2 } => (KIND_LINE, vec![*p1, *p2]),
            EdgeKind::CircularArc { p1, p2, mid } => (KIND_ARC, vec![*p1, *p2, *mid]),
            EdgeKind::Polyline { vertices } => (KIND_POLYLINE, vertices.clone()),
        };
        buf.set(0, Field::Int(self.id().get() as i64));
        buf.set(1, Field::Int(code));
        buf.set_tags(2, points, PointId::get);
        buf.set(3, Field::Int(self.ndiv() as i64));
        buf.set_tags(4, self.nodes().iter().copied(), NodeTag::get);
        buf.set_tags(5, self.faces(), FaceId::get);
        buf.set_tags(6, self.blocks(), BlockId::get);
        buf.set_tags(7, self.elements().iter().copied(), ElementTag::get);
        Ok(())
    }

    fn recv_fields(&mut self, buf: &FieldBuffer) -> Result<(), MeshError> {
        check_tag(buf, self.id().get())?;
        let points = buf.tags(2, PointId::new)?;
        let kind = match (buf.int(1)?, points.as_slice()) {
            (KIND_LINE, &[p1, p2]) => EdgeKind::Line { p1, p2 },
            (KIND_ARC, &[p1, p2, mid]) => EdgeKind::CircularArc { p1, p2, mid },
            (KIND_POLYLINE, v) if v.len() >= 2 => EdgeKind::Polyline { vertices: v.to_vec() },
            _ => {
                return Err(MeshError::BadField {
                    offset: 1,
                    reason: "unknown edge kind or wrong point count",
                });
            }
        };
        let ndiv = usize::try_from(buf.int(3)?).map_err(|_| MeshError::BadField {
            offset: 3,
            reason: "negative division count",
        })?;
        let mut restored = Edge::new(self.id(), kind).ok_or(MeshError::BadField {
            offset: 2,
            reason: "edge has no endpoints",
        })?;
        restored.ndiv = ndiv;
        restored.nodes = buf.tags(4, NodeTag::new)?;
        restored.faces = buf.tags(5, FaceId::new)?.into_iter().collect();
        restored.blocks = buf.tags(6, BlockId::new)?.into_iter().collect();
        restored.elements = buf.tags(7, ElementTag::new)?;
        *self = restored;
        Ok(())
    }
}

impl Persistent for Face {
    const FIELD_COUNT: usize = 8;

    fn send_fields(&self, buf: &mut FieldBuffer) -> Result<(), MeshError> {
        buf.set(0, Field::Int(self.id().get() as i64));
        buf.set_tags(1, self.edges(), EdgeId::get);
        buf.set(
            2,
            Field::IntVec(self.sides().iter().map(|s| i64::from(s.forward)).collect()),
        );
        buf.set_tags(3, self.vertices().iter().copied(), PointId::get);
        buf.set_lattice(4, self.nodes());
        buf.set_tags(6, self.blocks(), BlockId::get);
        buf.set_tags(7, self.elements().iter().copied(), ElementTag::get);
        Ok(())
    }

    fn recv_fields(&mut self, buf: &FieldBuffer) -> Result<(), MeshError> {
        check_tag(buf, self.id().get())?;
        let edges = buf.tags(1, EdgeId::new)?;
        let forward = buf.int_vec(2)?;
        let vertices = buf.tags(3, PointId::new)?;
        let (Ok(edges), Ok(vertices)) = (
            <[EdgeId; 4]>::try_from(edges),
            <[PointId; 4]>::try_from(vertices),
        ) else {
            return Err(MeshError::BadField {
                offset: 1,
                reason: "a face has exactly four sides",
            });
        };
        if forward.len() != 4 {
            return Err(MeshError::BadField {
                offset: 2,
                reason: "a face has exactly four sides",
            });
        }
        let sides = std::array::from_fn(|i| Side {
            edge: edges[i],
            forward: forward[i] != 0,
        });
        let mut restored = Face::new(self.id(), sides, vertices);
        restored.nodes = buf.lattice(4)?;
        restored.blocks = buf.tags(6, BlockId::new)?.into_iter().collect();
        restored.elements = buf.tags(7, ElementTag::new)?;
        *self = restored;
        Ok(())
    }
}

const PLACEMENT_INTS: usize = 8;

impl Persistent for Block {
    const FIELD_COUNT: usize = 7;

    fn send_fields(&self, buf: &mut FieldBuffer) -> Result<(), MeshError> {
        buf.set(0, Field::Int(self.id().get() as i64));
        let mut slots = Vec::with_capacity(NUM_SLOTS);
        let mut placements = Vec::with_capacity(NUM_SLOTS * PLACEMENT_INTS);
        for slot in 0..NUM_SLOTS {
            match self.face(slot) {
                Some(bf) => {
                    slots.push(bf.face.get() as i64);
                    let (ref_slot, ref_side) = bf
                        .reference
                        .map_or((-1, -1), |(s, d)| (s as i64, d as i64));
                    placements.extend([bf.first as i64, i64::from(bf.direct), ref_slot, ref_side]);
                    placements.extend(bf.corners.iter().map(|&c| c as i64));
                }
                None => {
                    slots.push(0);
                    placements.extend([0; PLACEMENT_INTS]);
                }
            }
        }
        buf.set(1, Field::IntVec(slots));
        buf.set(2, Field::IntVec(placements));
        buf.set(
            3,
            Field::IntVec(
                self.vertices()
                    .iter()
                    .map(|v| v.map_or(0, |p| p.get() as i64))
                    .collect(),
            ),
        );
        buf.set_lattice(4, self.nodes());
        buf.set_tags(6, self.elements().iter().copied(), ElementTag::get);
        Ok(())
    }

    fn recv_fields(&mut self, buf: &FieldBuffer) -> Result<(), MeshError> {
        check_tag(buf, self.id().get())?;
        let slots = buf.int_vec(1)?;
        let placements = buf.int_vec(2)?;
        let vertices = buf.int_vec(3)?;
        if slots.len() != NUM_SLOTS
            || placements.len() != NUM_SLOTS * PLACEMENT_INTS
            || vertices.len() != 8
        {
            return Err(MeshError::BadField {
                offset: 1,
                reason: "block layout has the wrong size",
            });
        }
        let index = |offset: usize, v: i64| {
            usize::try_from(v).map_err(|_| MeshError::BadField {
                offset,
                reason: "negative index",
            })
        };
        let mut restored = Block::new(self.id());
        for slot in 0..NUM_SLOTS {
            let Some(face) = optional_tag(1, slots[slot], FaceId::new)? else {
                continue;
            };
            let p = &placements[slot * PLACEMENT_INTS..(slot + 1) * PLACEMENT_INTS];
            let reference = if p[2] < 0 {
                None
            } else {
                Some((index(2, p[2])?, index(2, p[3])?))
            };
            restored.faces[slot] = Some(BlockFace {
                face,
                first: index(2, p[0])?,
                direct: p[1] != 0,
                reference,
                corners: [
                    index(2, p[4])?,
                    index(2, p[5])?,
                    index(2, p[6])?,
                    index(2, p[7])?,
                ],
            });
        }
        for (v, &raw) in vertices.iter().enumerate() {
            restored.vertices[v] = optional_tag(3, raw, PointId::new)?;
        }
        restored.nodes = buf.lattice(4)?;
        restored.elements = buf.tags(6, ElementTag::new)?;
        *self = restored;
        Ok(())
    }
}

fn send<T: Persistent>(entity: &T) -> Result<FieldBuffer, MeshError> {
    let mut buf = FieldBuffer::with_len(T::FIELD_COUNT);
    entity.send_fields(&mut buf)?;
    Ok(buf)
}

impl MultiBlockTopology {
    /// Writes `entity` into a fresh buffer.
    pub fn store(&self, entity: EntityRef) -> Result<FieldBuffer, MeshError> {
        match entity {
            EntityRef::Point(p) => send(self.point(p)?),
            EntityRef::Edge(e) => send(self.edge(e)?),
            EntityRef::Face(f) => send(self.face(f)?),
            EntityRef::Block(b) => send(self.block(b)?),
        }
    }

    /// Restores `entity` from `buf`.
    pub fn restore(&mut self, entity: EntityRef, buf: &FieldBuffer) -> Result<(), MeshError> {
        match entity {
            EntityRef::Point(p) => self.point_mut(p)?.recv_fields(buf),
            EntityRef::Edge(e) => self.edge_mut(e)?.recv_fields(buf),
            EntityRef::Face(f) => self.face_mut(f)?.recv_fields(buf),
            EntityRef::Block(b) => self.block_mut(b)?.recv_fields(buf),
        }
    }
}
