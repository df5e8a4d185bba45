//! Construction and maintenance options shared by all mesh types.

use crate::geometry::tessellate::TessellationMode;

/// How the incidence builder reacts to non-manifold edges (more than two
/// incident polygons) or faces (more than two incident cells).
///
/// Construction never fails on non-manifold input; the classifier reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NonManifoldHandling {
    /// Accept silently.
    #[default]
    Ignore,
    /// Log a warning per non-manifold entity.
    Warn,
}

/// Options for a mesh instance.
#[derive(Debug, Clone, Copy)]
pub struct MeshOptions {
    /// Reaction to non-manifold entities found while building incidence.
    pub non_manifold: NonManifoldHandling,
    /// Triangulation strategy for the per-polygon tessellation cache.
    pub tessellation: TessellationMode,
    /// Validate every invariant after construction and after each mutation,
    /// panicking on the first violation. Costs a full table scan per call.
    pub check_invariants: bool,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            non_manifold: NonManifoldHandling::Ignore,
            tessellation: TessellationMode::Auto,
            check_invariants: false,
        }
    }
}

impl MeshOptions {
    /// Warn on non-manifold input and check invariants on every mutation.
    pub fn strict() -> Self {
        Self {
            non_manifold: NonManifoldHandling::Warn,
            tessellation: TessellationMode::Auto,
            check_invariants: true,
        }
    }
}
