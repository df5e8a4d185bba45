//! Generic algorithms over [`MeshTopology`](crate::mesh::polytope::MeshTopology).

pub mod components;

pub use components::{component_labels, connected_components, flood_fill};
