//! Shape policies for surface meshes.
//!
//! A [`SurfaceMesh`](crate::mesh::surface::SurfaceMesh) is generic over a
//! zero-sized policy that decides which polygon arities it accepts. Triangle
//! and quad meshes fix the arity; polygonal meshes accept any simple loop of
//! three or more vertices.

use crate::mesh_error::MeshError;

/// Arity constraint applied by the mutation engine and the incidence builder.
pub trait ShapePolicy: Clone + Copy + Default + std::fmt::Debug + Send + Sync + 'static {
    /// Human-readable name used in error messages.
    const NAME: &'static str;
    /// Fixed number of vertices per polygon, or `None` for variable arity.
    const ARITY: Option<usize>;

    /// Checks that a polygon with `n` corners is acceptable.
    fn check_arity(n: usize) -> Result<(), MeshError> {
        if n < 3 {
            return Err(MeshError::DegeneratePoly { found: n });
        }
        match Self::ARITY {
            Some(expected) if expected != n => Err(MeshError::ArityMismatch {
                shape: Self::NAME,
                expected,
                found: n,
            }),
            _ => Ok(()),
        }
    }
}

/// Triangle meshes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Triangular;

impl ShapePolicy for Triangular {
    const NAME: &'static str = "triangle";
    const ARITY: Option<usize> = Some(3);
}

/// Quad meshes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Quadrilateral;

impl ShapePolicy for Quadrilateral {
    const NAME: &'static str = "quad";
    const ARITY: Option<usize> = Some(4);
}

/// General polygon meshes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Polygonal;

impl ShapePolicy for Polygonal {
    const NAME: &'static str = "polygon";
    const ARITY: Option<usize> = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_arity_rejects_other_sizes() {
        assert!(Triangular::check_arity(3).is_ok());
        assert_eq!(
            Triangular::check_arity(4),
            Err(MeshError::ArityMismatch {
                shape: "triangle",
                expected: 3,
                found: 4
            })
        );
        assert!(Quadrilateral::check_arity(4).is_ok());
    }

    #[test]
    fn variable_arity_still_needs_three() {
        assert!(Polygonal::check_arity(7).is_ok());
        assert_eq!(
            Polygonal::check_arity(2),
            Err(MeshError::DegeneratePoly { found: 2 })
        );
    }
}
