//! MeshError: unified error type for mesh-incidence public APIs
//!
//! Mutations validate their preconditions up front and report violations
//! through [`MeshError`] without touching the mesh. Ordered ring traversal has
//! its own [`RingError`], since a vertex whose star is not a single fan is an
//! expected (and queryable) mesh state rather than a programming error.

use thiserror::Error;

use crate::topology::ids::{CellId, EdgeId, FaceId, PolyId, VertId};

/// Unified error type for mesh construction and mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A vertex id at or beyond the vertex count.
    #[error("vertex {vid} out of range (num_verts = {len})")]
    VertOutOfRange { vid: VertId, len: usize },
    /// An edge id at or beyond the edge count.
    #[error("edge {eid} out of range (num_edges = {len})")]
    EdgeOutOfRange { eid: EdgeId, len: usize },
    /// A polygon id at or beyond the polygon count.
    #[error("polygon {pid} out of range (num_polys = {len})")]
    PolyOutOfRange { pid: PolyId, len: usize },
    /// A face id at or beyond the face count.
    #[error("face {fid} out of range (num_faces = {len})")]
    FaceOutOfRange { fid: FaceId, len: usize },
    /// A cell id at or beyond the cell count.
    #[error("cell {cid} out of range (num_cells = {len})")]
    CellOutOfRange { cid: CellId, len: usize },
    /// A polygon with fewer than three vertices.
    #[error("polygon needs at least 3 vertices, got {found}")]
    DegeneratePoly { found: usize },
    /// A polygon or cell listing the same vertex twice.
    #[error("vertex {vid} appears more than once in the same element")]
    RepeatedVertex { vid: VertId },
    /// The shape policy of the mesh fixes the arity and the input disagrees.
    #[error("{shape} mesh expects {expected} vertices per polygon, got {found}")]
    ArityMismatch {
        shape: &'static str,
        expected: usize,
        found: usize,
    },
    /// Compaction of a vertex still used by a polygon or cell.
    #[error("vertex {vid} is still referenced by {count} element(s)")]
    VertStillReferenced { vid: VertId, count: usize },
    /// Compaction of an edge still used by a polygon or cell.
    #[error("edge {eid} is still referenced by {count} element(s)")]
    EdgeStillReferenced { eid: EdgeId, count: usize },
    /// An edge was requested between a vertex and itself.
    #[error("edge endpoints must differ (got {vid} twice)")]
    SelfLoop { vid: VertId },
    /// An edge or polygon query that expected an incidence which is not there.
    #[error("vertex {vid} is not a corner of polygon {pid}")]
    VertNotInPoly { vid: VertId, pid: PolyId },
    /// Separate attribute channels do not line up with the polygon list.
    #[error("channel `{channel}` has {found} entries, expected {expected}")]
    ChannelLengthMismatch {
        channel: &'static str,
        expected: usize,
        found: usize,
    },
    /// A derived table disagrees with the primal definitions.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Why an ordered one-ring could not be produced for a vertex.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RingError {
    /// The vertex has no incident polygon.
    #[error("vertex {0} is isolated")]
    Isolated(VertId),
    /// A spoke edge is shared by more than two polygons.
    #[error("vertex {vid}: spoke edge {eid} is non-manifold")]
    NonManifoldEdge { vid: VertId, eid: EdgeId },
    /// More than two boundary spokes: the vertex joins several boundary fans.
    #[error("vertex {vid} has {count} boundary edges (expected 0 or 2)")]
    TooManyBoundaryEdges { vid: VertId, count: usize },
    /// Two polygons around the vertex disagree on the winding direction.
    #[error("vertex {vid}: polygons {p0} and {p1} have inconsistent winding")]
    InconsistentWinding { vid: VertId, p0: PolyId, p1: PolyId },
    /// The incident polygons split into more than one fan.
    #[error("vertex {vid}: walked {walked} of {total} incident polygons")]
    NotASingleFan {
        vid: VertId,
        walked: usize,
        total: usize,
    },
}
