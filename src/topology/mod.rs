//! Building blocks shared by the surface and volumetric meshes.
//!
//! This module provides:
//! - Strong entity handles ([`ids`]) for vertices, edges, polygons, faces and cells
//! - Polytope kind / dimensionality tags ([`cell_type`]) and surface shape policies ([`shape`])
//! - The deduplicating simplex lookup used to discover edges and faces ([`simplex_table`])
//! - Adjacency-row helpers used by the mutation engines ([`rows`])
//! - Cache invalidation for lazily computed aggregates ([`cache`])

pub mod cache;
pub mod cell_type;
pub mod ids;
pub mod rows;
pub mod shape;
pub mod simplex_table;

pub use cache::InvalidateCache;
pub use cell_type::{CellType, Dimension};
pub use ids::{CellId, EdgeId, EntityId, FaceId, PolyId, VertId};
pub use shape::{Polygonal, Quadrilateral, ShapePolicy, Triangular};
pub use simplex_table::SimplexTable;
