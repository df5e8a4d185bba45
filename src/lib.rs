#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-incidence
//!
//! mesh-incidence is a topology engine for polygon and tetrahedral meshes. It
//! keeps every incidence relation (vertex/edge/polygon for surfaces,
//! vertex/edge/face/cell for volumes) in explicit tables that stay consistent
//! under local edits, so adjacency queries are plain slice lookups.
//!
//! ## Features
//! - Triangle, quad and general polygon meshes sharing one generic container
//! - Tetrahedral meshes with derived faces and boundary surface extraction
//! - Ordered one-rings, boundary loops and manifold/boundary classification
//! - Swap-with-last removal that rewrites every reference exactly once
//! - Per-entity payloads (`V`, `E`, `P` / `F`, `C`) carried through every edit
//! - Invariant checking in debug builds, or always with
//!   [`MeshOptions::check_invariants`](mesh::options::MeshOptions)
//!
//! ## Ids are positions
//!
//! Entity handles ([`VertId`](topology::ids::VertId),
//! [`PolyId`](topology::ids::PolyId), …) index dense arrays. Removing an
//! entity moves the last one of its tier into the freed slot, so ids held
//! across a removal must be re-fetched.
//!
//! ## Usage
//!
//! ```
//! use mesh_incidence::prelude::*;
//!
//! let verts = vec![
//!     Vec3::new(0.0, 0.0, 0.0),
//!     Vec3::new(1.0, 0.0, 0.0),
//!     Vec3::new(1.0, 1.0, 0.0),
//!     Vec3::new(0.0, 1.0, 0.0),
//! ];
//! let quad = vec![[0, 1, 2, 3].map(VertId::new).to_vec()];
//! let mesh = Quadmesh::<()>::new(verts, quad)?;
//! assert_eq!(mesh.num_edges(), 4);
//! assert!((mesh.poly_area(PolyId::new(0)) - 1.0).abs() < 1e-12);
//! # Ok::<(), MeshError>(())
//! ```
//!
//! ## Invariant checking
//! Enable the `check-invariants` feature (or `strict-invariants`) to validate
//! every table after each mutation in release builds too.

pub mod algs;
pub mod debug_invariants;
pub mod geometry;
pub mod mesh;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::{component_labels, connected_components, flood_fill};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::{AngleUnit, Bbox, TessellationMode, TexChannel, Vec3};
    pub use crate::mesh::surface::{BoundaryLoop, CriticalPoint, OrderedRing};
    pub use crate::mesh::tetmesh::SurfaceExport;
    pub use crate::mesh::{
        MeshOptions, MeshTopology, NonManifoldHandling, Polygonmesh, Polytope, Quadmesh,
        SurfaceMesh, SurfaceSoup, Tetmesh, Trimesh,
    };
    pub use crate::mesh_error::{MeshError, RingError};
    pub use crate::topology::{
        CellId, CellType, Dimension, EdgeId, EntityId, FaceId, InvalidateCache, PolyId,
        ShapePolicy, VertId,
    };
}
