//! Generic polygonal surface mesh.
//!
//! [`SurfaceMesh`] stores vertex positions and polygons (ordered loops of
//! vertex ids, counter-clockwise about the outward normal) and keeps every
//! derived table in sync:
//!
//! | table | row type | meaning |
//! |-------|----------|---------|
//! | `v2v` | `Vec<VertId>` | vertices sharing an edge |
//! | `v2e` | `Vec<EdgeId>` | edges touching the vertex |
//! | `v2p` | `Vec<PolyId>` | polygons with the vertex as a corner |
//! | `e2p` | `Vec<PolyId>` | polygons bounded by the edge |
//! | `p2e` | `Vec<EdgeId>` | `p2e[p][i]` joins corners `i` and `i + 1` |
//! | `p2p` | `Vec<PolyId>` | polygons sharing an edge with exactly two polygons |
//!
//! The mesh is generic over a [`ShapePolicy`] that fixes (or frees) the polygon
//! arity, and over opaque per-vertex, per-edge and per-polygon payloads
//! `V`, `E`, `P` that the topology code moves around but never inspects.
//!
//! # Id stability
//! Removal uses swap-with-last compaction: the last entity of the tier moves
//! into the freed slot and every reference to it is rewritten. Ids held across
//! a structural mutation must be re-fetched.

mod build;
mod classify;
mod invariants;
mod measure;
mod mutation;
mod normals;
mod ring;

pub use build::SurfaceSoup;
pub use classify::CriticalPoint;
pub use ring::{BoundaryLoop, OrderedRing};

use std::marker::PhantomData;

use once_cell::sync::OnceCell;

use crate::geometry::bbox::Bbox;
use crate::geometry::vec3::Vec3;
use crate::mesh::options::MeshOptions;
use crate::mesh_error::MeshError;
use crate::topology::cache::{InvalidateCache, reset};
use crate::topology::ids::{EdgeId, PolyId, VertId};
use crate::topology::shape::{Polygonal, Quadrilateral, ShapePolicy, Triangular};
use crate::topology::simplex_table::SimplexTable;

/// Triangle mesh.
pub type Trimesh<V = (), E = (), P = ()> = SurfaceMesh<Triangular, V, E, P>;
/// Quad mesh.
pub type Quadmesh<V = (), E = (), P = ()> = SurfaceMesh<Quadrilateral, V, E, P>;
/// General polygon mesh.
pub type Polygonmesh<V = (), E = (), P = ()> = SurfaceMesh<Polygonal, V, E, P>;

/// Lazily computed mesh-level aggregates, dropped on every change.
#[derive(Clone, Debug, Default)]
pub(crate) struct Aggregates {
    pub(crate) bbox: OnceCell<Bbox>,
    pub(crate) area: OnceCell<f64>,
}

/// Polygonal surface mesh with incrementally maintained incidence tables.
#[derive(Clone, Debug)]
pub struct SurfaceMesh<S: ShapePolicy = Polygonal, V = (), E = (), P = ()> {
    pub(crate) options: MeshOptions,

    pub(crate) verts: Vec<Vec3>,
    pub(crate) polys: Vec<Vec<VertId>>,
    pub(crate) edges: SimplexTable<EdgeId, 2>,

    pub(crate) v_uvw: Vec<Vec3>,
    pub(crate) v_normal: Vec<Vec3>,
    pub(crate) v_data: Vec<V>,
    pub(crate) e_data: Vec<E>,
    pub(crate) p_data: Vec<P>,
    pub(crate) p_normal: Vec<Vec3>,
    pub(crate) p_tess: Vec<Vec<[VertId; 3]>>,

    pub(crate) v2v: Vec<Vec<VertId>>,
    pub(crate) v2e: Vec<Vec<EdgeId>>,
    pub(crate) v2p: Vec<Vec<PolyId>>,
    pub(crate) e2p: Vec<Vec<PolyId>>,
    pub(crate) p2e: Vec<Vec<EdgeId>>,
    pub(crate) p2p: Vec<Vec<PolyId>>,

    pub(crate) aggregates: Aggregates,
    _shape: PhantomData<S>,
}

impl<S: ShapePolicy, V, E, P> Default for SurfaceMesh<S, V, E, P> {
    fn default() -> Self {
        Self {
            options: MeshOptions::default(),
            verts: Vec::new(),
            polys: Vec::new(),
            edges: SimplexTable::new(),
            v_uvw: Vec::new(),
            v_normal: Vec::new(),
            v_data: Vec::new(),
            e_data: Vec::new(),
            p_data: Vec::new(),
            p_normal: Vec::new(),
            p_tess: Vec::new(),
            v2v: Vec::new(),
            v2e: Vec::new(),
            v2p: Vec::new(),
            e2p: Vec::new(),
            p2e: Vec::new(),
            p2p: Vec::new(),
            aggregates: Aggregates::default(),
            _shape: PhantomData,
        }
    }
}

impl<S: ShapePolicy, V, E, P> InvalidateCache for SurfaceMesh<S, V, E, P> {
    #[inline]
    fn invalidate_cache(&mut self) {
        if reset(&mut self.aggregates.bbox) | reset(&mut self.aggregates.area) {
            log::trace!("dropped cached aggregates");
        }
    }
}

impl<S: ShapePolicy, V, E, P> SurfaceMesh<S, V, E, P> {
    /// Options this mesh was built with.
    pub fn options(&self) -> &MeshOptions {
        &self.options
    }

    /// Replaces the options. A new tessellation mode rebuilds the
    /// tessellation and normal caches.
    pub fn set_options(&mut self, options: MeshOptions) {
        let retessellate = options.tessellation != self.options.tessellation;
        self.options = options;
        if retessellate {
            self.update_normals();
            self.invalidate_cache();
        }
    }

    // ---------------------------------------------------------------------
    // Counts
    // ---------------------------------------------------------------------

    #[inline]
    pub fn num_verts(&self) -> usize {
        self.verts.len()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn num_polys(&self) -> usize {
        self.polys.len()
    }

    /// Number of corners of `pid`.
    #[inline]
    pub fn verts_per_poly(&self, pid: PolyId) -> usize {
        self.polys[pid.idx()].len()
    }

    pub fn vert_ids(&self) -> impl Iterator<Item = VertId> + use<S, V, E, P> {
        (0..self.verts.len()).map(VertId::new)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + use<S, V, E, P> {
        (0..self.edges.len()).map(EdgeId::new)
    }

    pub fn poly_ids(&self) -> impl Iterator<Item = PolyId> + use<S, V, E, P> {
        (0..self.polys.len()).map(PolyId::new)
    }

    // ---------------------------------------------------------------------
    // Range checks
    // ---------------------------------------------------------------------

    pub(crate) fn check_vert(&self, vid: VertId) -> Result<(), MeshError> {
        if vid.idx() < self.verts.len() {
            Ok(())
        } else {
            Err(MeshError::VertOutOfRange {
                vid,
                len: self.verts.len(),
            })
        }
    }

    pub(crate) fn check_edge(&self, eid: EdgeId) -> Result<(), MeshError> {
        if eid.idx() < self.edges.len() {
            Ok(())
        } else {
            Err(MeshError::EdgeOutOfRange {
                eid,
                len: self.edges.len(),
            })
        }
    }

    pub(crate) fn check_poly(&self, pid: PolyId) -> Result<(), MeshError> {
        if pid.idx() < self.polys.len() {
            Ok(())
        } else {
            Err(MeshError::PolyOutOfRange {
                pid,
                len: self.polys.len(),
            })
        }
    }

    /// Validates a candidate polygon against the shape policy and the current
    /// vertex count.
    pub(crate) fn check_poly_verts(&self, vlist: &[VertId]) -> Result<(), MeshError> {
        check_loop::<S>(vlist, self.verts.len())
    }

    // ---------------------------------------------------------------------
    // Vertices
    // ---------------------------------------------------------------------

    /// Position of `vid`.
    ///
    /// # Panics
    /// Panics if `vid` is out of range; see [`Self::try_vert`].
    #[inline]
    pub fn vert(&self, vid: VertId) -> Vec3 {
        self.verts[vid.idx()]
    }

    pub fn try_vert(&self, vid: VertId) -> Result<Vec3, MeshError> {
        self.check_vert(vid)?;
        Ok(self.verts[vid.idx()])
    }

    /// Texture coordinate of `vid`.
    #[inline]
    pub fn vert_uvw(&self, vid: VertId) -> Vec3 {
        self.v_uvw[vid.idx()]
    }

    pub fn vert_set_uvw(&mut self, vid: VertId, uvw: Vec3) -> Result<(), MeshError> {
        self.check_vert(vid)?;
        self.v_uvw[vid.idx()] = uvw;
        Ok(())
    }

    #[inline]
    pub fn vert_data(&self, vid: VertId) -> &V {
        &self.v_data[vid.idx()]
    }

    #[inline]
    pub fn vert_data_mut(&mut self, vid: VertId) -> &mut V {
        &mut self.v_data[vid.idx()]
    }

    // ---------------------------------------------------------------------
    // Edges
    // ---------------------------------------------------------------------

    /// Endpoints of `eid`, in the orientation the edge was first discovered.
    #[inline]
    pub fn edge_vert_ids(&self, eid: EdgeId) -> [VertId; 2] {
        self.edges.get(eid)
    }

    pub fn try_edge_vert_ids(&self, eid: EdgeId) -> Result<[VertId; 2], MeshError> {
        self.check_edge(eid)?;
        Ok(self.edges.get(eid))
    }

    /// Endpoint `offset` (0 or 1) of `eid`.
    #[inline]
    pub fn edge_vert_id(&self, eid: EdgeId, offset: usize) -> VertId {
        self.edges.get(eid)[offset]
    }

    #[inline]
    pub fn edge_vert(&self, eid: EdgeId, offset: usize) -> Vec3 {
        self.vert(self.edge_vert_id(eid, offset))
    }

    /// The edge joining `v0` and `v1`, if any.
    #[inline]
    pub fn edge_id(&self, v0: VertId, v1: VertId) -> Option<EdgeId> {
        self.edges.find([v0, v1])
    }

    pub fn edge_contains_vert(&self, eid: EdgeId, vid: VertId) -> bool {
        self.edges.get(eid).contains(&vid)
    }

    /// Endpoint of `eid` that is not `vid`.
    pub fn vert_opposite_to(&self, eid: EdgeId, vid: VertId) -> Option<VertId> {
        let [a, b] = self.edges.get(eid);
        if a == vid {
            Some(b)
        } else if b == vid {
            Some(a)
        } else {
            None
        }
    }

    #[inline]
    pub fn edge_data(&self, eid: EdgeId) -> &E {
        &self.e_data[eid.idx()]
    }

    #[inline]
    pub fn edge_data_mut(&mut self, eid: EdgeId) -> &mut E {
        &mut self.e_data[eid.idx()]
    }

    // ---------------------------------------------------------------------
    // Polygons
    // ---------------------------------------------------------------------

    /// Corner loop of `pid` (same as `adj_p2v`).
    #[inline]
    pub fn poly_verts(&self, pid: PolyId) -> &[VertId] {
        &self.polys[pid.idx()]
    }

    pub fn try_poly_verts(&self, pid: PolyId) -> Result<&[VertId], MeshError> {
        self.check_poly(pid)?;
        Ok(&self.polys[pid.idx()])
    }

    #[inline]
    pub fn poly_vert_id(&self, pid: PolyId, offset: usize) -> VertId {
        self.polys[pid.idx()][offset]
    }

    #[inline]
    pub fn poly_vert(&self, pid: PolyId, offset: usize) -> Vec3 {
        self.vert(self.poly_vert_id(pid, offset))
    }

    /// Corner positions of `pid`, in loop order.
    pub fn poly_vlist(&self, pid: PolyId) -> Vec<Vec3> {
        self.polys[pid.idx()].iter().map(|&v| self.vert(v)).collect()
    }

    /// Position of `vid` in the loop of `pid`.
    pub fn poly_vert_offset(&self, pid: PolyId, vid: VertId) -> Option<usize> {
        self.polys[pid.idx()].iter().position(|&v| v == vid)
    }

    pub fn poly_contains_vert(&self, pid: PolyId, vid: VertId) -> bool {
        self.polys[pid.idx()].contains(&vid)
    }

    pub fn poly_contains_edge(&self, pid: PolyId, eid: EdgeId) -> bool {
        self.p2e[pid.idx()].contains(&eid)
    }

    #[inline]
    pub fn poly_data(&self, pid: PolyId) -> &P {
        &self.p_data[pid.idx()]
    }

    #[inline]
    pub fn poly_data_mut(&mut self, pid: PolyId) -> &mut P {
        &mut self.p_data[pid.idx()]
    }

    // ---------------------------------------------------------------------
    // Adjacency
    // ---------------------------------------------------------------------

    #[inline]
    pub fn adj_v2v(&self, vid: VertId) -> &[VertId] {
        &self.v2v[vid.idx()]
    }

    #[inline]
    pub fn adj_v2e(&self, vid: VertId) -> &[EdgeId] {
        &self.v2e[vid.idx()]
    }

    #[inline]
    pub fn adj_v2p(&self, vid: VertId) -> &[PolyId] {
        &self.v2p[vid.idx()]
    }

    #[inline]
    pub fn adj_e2p(&self, eid: EdgeId) -> &[PolyId] {
        &self.e2p[eid.idx()]
    }

    /// Edges of `pid`; entry `i` joins corners `i` and `i + 1`.
    #[inline]
    pub fn adj_p2e(&self, pid: PolyId) -> &[EdgeId] {
        &self.p2e[pid.idx()]
    }

    #[inline]
    pub fn adj_p2p(&self, pid: PolyId) -> &[PolyId] {
        &self.p2p[pid.idx()]
    }

    #[inline]
    pub fn adj_p2v(&self, pid: PolyId) -> &[VertId] {
        &self.polys[pid.idx()]
    }

    // ---------------------------------------------------------------------
    // Raw arrays for external collaborators (renderers, writers)
    // ---------------------------------------------------------------------

    #[inline]
    pub fn vector_verts(&self) -> &[Vec3] {
        &self.verts
    }

    /// Positions as a flat `[x0, y0, z0, x1, …]` slice, without copying.
    #[inline]
    pub fn vector_coords(&self) -> &[f64] {
        bytemuck::cast_slice(&self.verts)
    }

    #[inline]
    pub fn vector_polys(&self) -> &[Vec<VertId>] {
        &self.polys
    }

    /// Edges as vertex pairs, indexed by edge id.
    #[inline]
    pub fn vector_edges(&self) -> &[[VertId; 2]] {
        self.edges.as_slice()
    }
}

/// Validates a polygon loop: arity per policy, ids in range, no repeats.
pub(crate) fn check_loop<S: ShapePolicy>(vlist: &[VertId], num_verts: usize) -> Result<(), MeshError> {
    S::check_arity(vlist.len())?;
    for (i, &v) in vlist.iter().enumerate() {
        if v.idx() >= num_verts {
            return Err(MeshError::VertOutOfRange {
                vid: v,
                len: num_verts,
            });
        }
        if vlist[..i].contains(&v) {
            return Err(MeshError::RepeatedVertex { vid: v });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
