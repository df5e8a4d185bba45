//! Mesh containers.
//!
//! - [`surface::SurfaceMesh`]: polygon meshes (triangles, quads, general
//!   polygons) with a full vertex/edge/polygon incidence table.
//! - [`tetmesh::Tetmesh`]: tetrahedral meshes with vertex/edge/face/cell
//!   incidence and surface extraction.
//! - [`polytope::MeshTopology`]: the shared view used by [`crate::algs`].

pub mod options;
pub mod polytope;
pub mod surface;
pub mod tetmesh;

pub use options::{MeshOptions, NonManifoldHandling};
pub use polytope::{MeshTopology, Polytope};
pub use surface::{Polygonmesh, Quadmesh, SurfaceMesh, SurfaceSoup, Trimesh};
pub use tetmesh::Tetmesh;
