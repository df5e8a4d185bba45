//! Polytope kind and dimensionality metadata.
//!
//! Surface meshes store polygons and volumetric meshes store tetrahedra; both
//! are exposed through a single "polytope" tier tagged with a [`Dimension`]
//! so generic algorithms can treat them uniformly.

/// Dimensionality tag of a mesh's top-level polytopes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Dimension {
    /// Polygons embedded in 3D.
    Surface,
    /// Tetrahedral cells.
    Volume,
}

impl Dimension {
    /// Topological dimension of the polytope tier (2 or 3).
    pub fn topological(self) -> u8 {
        match self {
            Dimension::Surface => 2,
            Dimension::Volume => 3,
        }
    }
}

/// Common polytope kinds.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CellType {
    /// 2D simplex.
    Triangle,
    /// 2D four-sided polygon.
    Quadrilateral,
    /// 2D polygon with `n` vertices (`n >= 5`, or any arity in a polygonal mesh).
    Polygon(usize),
    /// 3D simplex.
    Tetrahedron,
}

impl CellType {
    /// Classifies a surface polygon by its vertex count.
    pub fn from_arity(n: usize) -> Self {
        match n {
            3 => CellType::Triangle,
            4 => CellType::Quadrilateral,
            n => CellType::Polygon(n),
        }
    }

    /// Dimensionality tag of this kind.
    pub fn dimension(self) -> Dimension {
        match self {
            CellType::Triangle | CellType::Quadrilateral | CellType::Polygon(_) => {
                Dimension::Surface
            }
            CellType::Tetrahedron => Dimension::Volume,
        }
    }

    /// Number of corner vertices.
    pub fn num_verts(self) -> usize {
        match self {
            CellType::Triangle => 3,
            CellType::Quadrilateral | CellType::Tetrahedron => 4,
            CellType::Polygon(n) => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_round_trip() {
        assert_eq!(CellType::from_arity(3), CellType::Triangle);
        assert_eq!(CellType::from_arity(4), CellType::Quadrilateral);
        assert_eq!(CellType::from_arity(6), CellType::Polygon(6));
        assert_eq!(CellType::from_arity(6).num_verts(), 6);
    }

    #[test]
    fn dimension_tags() {
        assert_eq!(CellType::Quadrilateral.dimension(), Dimension::Surface);
        assert_eq!(CellType::Tetrahedron.dimension(), Dimension::Volume);
        assert_eq!(Dimension::Volume.topological(), 3);
    }
}
