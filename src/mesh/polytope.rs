//! Dimension-agnostic view of the top-level entities of a mesh.
//!
//! Surface meshes expose polygons, volumetric meshes expose cells. Generic
//! code (see [`crate::algs`]) works through [`MeshTopology`], which tags the
//! mesh with its [`Dimension`] and uses an associated id type for the top
//! entity tier.

use crate::geometry::vec3::Vec3;
use crate::mesh::surface::SurfaceMesh;
use crate::mesh::tetmesh::Tetmesh;
use crate::topology::cell_type::{CellType, Dimension};
use crate::topology::ids::{CellId, EdgeId, EntityId, PolyId, VertId};
use crate::topology::shape::ShapePolicy;

/// Borrowed view of one top-level entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polytope<'a> {
    Polygon(&'a [VertId]),
    Tetrahedron(&'a [VertId; 4]),
}

impl<'a> Polytope<'a> {
    pub fn dimension(&self) -> Dimension {
        match self {
            Polytope::Polygon(_) => Dimension::Surface,
            Polytope::Tetrahedron(_) => Dimension::Volume,
        }
    }

    pub fn verts(&self) -> &'a [VertId] {
        match *self {
            Polytope::Polygon(v) => v,
            Polytope::Tetrahedron(v) => v,
        }
    }

    pub fn kind(&self) -> CellType {
        match self {
            Polytope::Polygon(v) => CellType::from_arity(v.len()),
            Polytope::Tetrahedron(_) => CellType::Tetrahedron,
        }
    }
}

/// Common query surface of [`SurfaceMesh`] and [`Tetmesh`].
pub trait MeshTopology {
    /// Id of the top-level entity: [`PolyId`] or [`CellId`].
    type Poly: EntityId;

    fn dimension(&self) -> Dimension;

    fn num_verts(&self) -> usize;
    fn num_edges(&self) -> usize;
    fn num_polys(&self) -> usize;

    fn vert(&self, vid: VertId) -> Vec3;
    fn polytope(&self, pid: Self::Poly) -> Polytope<'_>;

    fn adj_vert2poly(&self, vid: VertId) -> &[Self::Poly];
    fn adj_edge2poly(&self, eid: EdgeId) -> &[Self::Poly];
    fn adj_poly2poly(&self, pid: Self::Poly) -> &[Self::Poly];

    /// Area of a polygon or volume of a cell.
    fn poly_measure(&self, pid: Self::Poly) -> f64;

    /// Barycentric weights of `p`, one per vertex of `pid`.
    fn poly_bary_coords(&self, pid: Self::Poly, p: Vec3) -> Option<Vec<f64>>;

    fn poly_verts(&self, pid: Self::Poly) -> &[VertId] {
        self.polytope(pid).verts()
    }

    fn poly_kind(&self, pid: Self::Poly) -> CellType {
        self.polytope(pid).kind()
    }

    fn poly_vert_id(&self, pid: Self::Poly, offset: usize) -> VertId {
        self.poly_verts(pid)[offset]
    }

    fn poly_vert(&self, pid: Self::Poly, offset: usize) -> Vec3 {
        self.vert(self.poly_vert_id(pid, offset))
    }

    fn poly_centroid(&self, pid: Self::Poly) -> Vec3 {
        let verts = self.poly_verts(pid);
        verts.iter().map(|&v| self.vert(v)).sum::<Vec3>() / verts.len() as f64
    }

    fn poly_ids(&self) -> impl Iterator<Item = Self::Poly> {
        (0..self.num_polys()).map(Self::Poly::from_idx)
    }

    /// Total area (surface) or volume (tetmesh).
    fn total_measure(&self) -> f64 {
        self.poly_ids().map(|p| self.poly_measure(p)).sum()
    }
}

impl<S: ShapePolicy, V, E, P> MeshTopology for SurfaceMesh<S, V, E, P> {
    type Poly = PolyId;

    fn dimension(&self) -> Dimension {
        Dimension::Surface
    }

    fn num_verts(&self) -> usize {
        SurfaceMesh::num_verts(self)
    }

    fn num_edges(&self) -> usize {
        SurfaceMesh::num_edges(self)
    }

    fn num_polys(&self) -> usize {
        SurfaceMesh::num_polys(self)
    }

    fn vert(&self, vid: VertId) -> Vec3 {
        SurfaceMesh::vert(self, vid)
    }

    fn polytope(&self, pid: PolyId) -> Polytope<'_> {
        Polytope::Polygon(SurfaceMesh::poly_verts(self, pid))
    }

    fn adj_vert2poly(&self, vid: VertId) -> &[PolyId] {
        self.adj_v2p(vid)
    }

    fn adj_edge2poly(&self, eid: EdgeId) -> &[PolyId] {
        self.adj_e2p(eid)
    }

    fn adj_poly2poly(&self, pid: PolyId) -> &[PolyId] {
        self.adj_p2p(pid)
    }

    fn poly_measure(&self, pid: PolyId) -> f64 {
        self.poly_area(pid)
    }

    fn poly_bary_coords(&self, pid: PolyId, p: Vec3) -> Option<Vec<f64>> {
        SurfaceMesh::poly_bary_coords(self, pid, p)
    }
}

impl<V, E, F, C> MeshTopology for Tetmesh<V, E, F, C> {
    type Poly = CellId;

    fn dimension(&self) -> Dimension {
        Dimension::Volume
    }

    fn num_verts(&self) -> usize {
        Tetmesh::num_verts(self)
    }

    fn num_edges(&self) -> usize {
        Tetmesh::num_edges(self)
    }

    fn num_polys(&self) -> usize {
        self.num_cells()
    }

    fn vert(&self, vid: VertId) -> Vec3 {
        Tetmesh::vert(self, vid)
    }

    fn polytope(&self, cid: CellId) -> Polytope<'_> {
        Polytope::Tetrahedron(self.cell_verts(cid))
    }

    fn adj_vert2poly(&self, vid: VertId) -> &[CellId] {
        self.adj_v2c(vid)
    }

    fn adj_edge2poly(&self, eid: EdgeId) -> &[CellId] {
        self.adj_e2c(eid)
    }

    fn adj_poly2poly(&self, cid: CellId) -> &[CellId] {
        self.adj_c2c(cid)
    }

    fn poly_measure(&self, cid: CellId) -> f64 {
        self.cell_volume(cid)
    }

    fn poly_bary_coords(&self, cid: CellId, p: Vec3) -> Option<Vec<f64>> {
        self.cell_bary_coords(cid, p).map(Vec::from)
    }
}
