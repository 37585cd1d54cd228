//! Cell type metadata for topology entities and generated elements.
//!
//! The export collaborators only need an identifier per entity; VTK and MED
//! (Salome) numbering are provided here.

/// Cell types produced by the multi-block mesher.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CellType {
    /// 0D vertex.
    #[default]
    Vertex,
    /// 1D two-node segment.
    Segment,
    /// 1D three-node segment (circular arc through its midpoint).
    QuadraticSegment,
    /// 1D chain of segments.
    PolyLine,
    /// 2D tensor-product cell (quad).
    Quadrilateral,
    /// 3D tensor-product cell (hex).
    Hexahedron,
}

impl CellType {
    /// Returns the topological dimension of the cell.
    pub fn dimension(self) -> u8 {
        match self {
            CellType::Vertex => 0,
            CellType::Segment | CellType::QuadraticSegment | CellType::PolyLine => 1,
            CellType::Quadrilateral => 2,
            CellType::Hexahedron => 3,
        }
    }

    /// Number of vertices of the linear cell, when fixed.
    pub fn vertex_count(self) -> Option<usize> {
        match self {
            CellType::Vertex => Some(1),
            CellType::Segment => Some(2),
            CellType::QuadraticSegment => Some(3),
            CellType::PolyLine => None,
            CellType::Quadrilateral => Some(4),
            CellType::Hexahedron => Some(8),
        }
    }

    /// Legacy VTK cell type identifier.
    pub fn vtk_id(self) -> i32 {
        match self {
            CellType::Vertex => 1,
            CellType::Segment => 3,
            CellType::PolyLine => 4,
            CellType::Quadrilateral => 9,
            CellType::Hexahedron => 12,
            CellType::QuadraticSegment => 21,
        }
    }

    /// MED geometry type identifier, if MED has one.
    pub fn med_id(self) -> Option<i32> {
        match self {
            CellType::Vertex => Some(1),
            CellType::Segment => Some(102),
            CellType::QuadraticSegment => Some(103),
            CellType::Quadrilateral => Some(204),
            CellType::Hexahedron => Some(308),
            CellType::PolyLine => None,
        }
    }
}
