//! Tetrahedral volume mesh.
//!
//! Cells are stored as four vertex ids. Edges (6 per cell) and triangular
//! faces (4 per cell) are derived and deduplicated through simplex tables, and
//! the following incidence tables are kept in sync:
//!
//! | from \ to | vert | edge | face | cell |
//! |-----------|------|------|------|------|
//! | vert      | `v2v` | `v2e` | `v2f` | `v2c` |
//! | edge      |       |       | `e2f` | `e2c` |
//! | face      |       | `f2e` | `f2f` | `f2c` |
//! | cell      |       | `c2e` | `c2f` | `c2c` |
//!
//! Local numbering follows [`TET_EDGES`](crate::geometry::metrics::TET_EDGES)
//! and [`TET_FACES`](crate::geometry::metrics::TET_FACES): `c2e[c][i]` and
//! `c2f[c][i]` are the `i`-th local edge and face of cell `c`. `f2f` links
//! surface faces sharing an edge; interior faces have an empty row.
//!
//! Cells are stored positively oriented: one given with negative signed
//! volume has its last two corners swapped on insertion. A face keeps the
//! winding of its first incident cell, outward from it, so surface faces
//! always point out of the volume.

mod build;
mod export;
mod invariants;
mod mutation;
mod query;

pub use export::SurfaceExport;

use once_cell::sync::OnceCell;

use crate::geometry::bbox::Bbox;
use crate::geometry::metrics::tet_signed_volume;
use crate::geometry::vec3::Vec3;
use crate::mesh::options::MeshOptions;
use crate::mesh_error::MeshError;
use crate::topology::cache::{InvalidateCache, reset};
use crate::topology::ids::{CellId, EdgeId, FaceId, VertId};
use crate::topology::simplex_table::SimplexTable;

#[derive(Clone, Debug, Default)]
pub(crate) struct Aggregates {
    pub(crate) bbox: OnceCell<Bbox>,
    pub(crate) volume: OnceCell<f64>,
}

/// Tetrahedral mesh with payloads per vertex, edge, face and cell.
#[derive(Clone, Debug)]
pub struct Tetmesh<V = (), E = (), F = (), C = ()> {
    pub(crate) options: MeshOptions,

    pub(crate) verts: Vec<Vec3>,
    pub(crate) cells: Vec<[VertId; 4]>,
    pub(crate) edges: SimplexTable<EdgeId, 2>,
    pub(crate) faces: SimplexTable<FaceId, 3>,

    pub(crate) v_uvw: Vec<Vec3>,
    pub(crate) v_data: Vec<V>,
    pub(crate) e_data: Vec<E>,
    pub(crate) f_data: Vec<F>,
    pub(crate) c_data: Vec<C>,
    pub(crate) f_normal: Vec<Vec3>,

    pub(crate) v2v: Vec<Vec<VertId>>,
    pub(crate) v2e: Vec<Vec<EdgeId>>,
    pub(crate) v2f: Vec<Vec<FaceId>>,
    pub(crate) v2c: Vec<Vec<CellId>>,
    pub(crate) e2f: Vec<Vec<FaceId>>,
    pub(crate) e2c: Vec<Vec<CellId>>,
    pub(crate) f2e: Vec<[EdgeId; 3]>,
    pub(crate) f2f: Vec<Vec<FaceId>>,
    pub(crate) f2c: Vec<Vec<CellId>>,
    pub(crate) c2e: Vec<[EdgeId; 6]>,
    pub(crate) c2f: Vec<[FaceId; 4]>,
    pub(crate) c2c: Vec<Vec<CellId>>,

    pub(crate) aggregates: Aggregates,
}

impl<V, E, F, C> Default for Tetmesh<V, E, F, C> {
    fn default() -> Self {
        Self {
            options: MeshOptions::default(),
            verts: Vec::new(),
            cells: Vec::new(),
            edges: SimplexTable::new(),
            faces: SimplexTable::new(),
            v_uvw: Vec::new(),
            v_data: Vec::new(),
            e_data: Vec::new(),
            f_data: Vec::new(),
            c_data: Vec::new(),
            f_normal: Vec::new(),
            v2v: Vec::new(),
            v2e: Vec::new(),
            v2f: Vec::new(),
            v2c: Vec::new(),
            e2f: Vec::new(),
            e2c: Vec::new(),
            f2e: Vec::new(),
            f2f: Vec::new(),
            f2c: Vec::new(),
            c2e: Vec::new(),
            c2f: Vec::new(),
            c2c: Vec::new(),
            aggregates: Aggregates::default(),
        }
    }
}

impl<V, E, F, C> InvalidateCache for Tetmesh<V, E, F, C> {
    #[inline]
    fn invalidate_cache(&mut self) {
        if reset(&mut self.aggregates.bbox) | reset(&mut self.aggregates.volume) {
            log::trace!("dropped cached aggregates");
        }
    }
}

impl<V, E, F, C> Tetmesh<V, E, F, C> {
    pub fn options(&self) -> &MeshOptions {
        &self.options
    }

    #[inline]
    pub fn num_verts(&self) -> usize {
        self.verts.len()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn vert_ids(&self) -> impl Iterator<Item = VertId> + use<V, E, F, C> {
        (0..self.verts.len()).map(VertId::new)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + use<V, E, F, C> {
        (0..self.edges.len()).map(EdgeId::new)
    }

    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + use<V, E, F, C> {
        (0..self.faces.len()).map(FaceId::new)
    }

    pub fn cell_ids(&self) -> impl Iterator<Item = CellId> + use<V, E, F, C> {
        (0..self.cells.len()).map(CellId::new)
    }

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

    pub(crate) fn check_face(&self, fid: FaceId) -> Result<(), MeshError> {
        if fid.idx() < self.faces.len() {
            Ok(())
        } else {
            Err(MeshError::FaceOutOfRange {
                fid,
                len: self.faces.len(),
            })
        }
    }

    pub(crate) fn check_cell(&self, cid: CellId) -> Result<(), MeshError> {
        if cid.idx() < self.cells.len() {
            Ok(())
        } else {
            Err(MeshError::CellOutOfRange {
                cid,
                len: self.cells.len(),
            })
        }
    }

    // ---------------------------------------------------------------------
    // Vertices
    // ---------------------------------------------------------------------

    #[inline]
    pub fn vert(&self, vid: VertId) -> Vec3 {
        self.verts[vid.idx()]
    }

    pub fn try_vert(&self, vid: VertId) -> Result<Vec3, MeshError> {
        self.check_vert(vid)?;
        Ok(self.verts[vid.idx()])
    }

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

    #[inline]
    pub fn edge_vert_ids(&self, eid: EdgeId) -> [VertId; 2] {
        self.edges.get(eid)
    }

    #[inline]
    pub fn edge_id(&self, v0: VertId, v1: VertId) -> Option<EdgeId> {
        self.edges.find([v0, v1])
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
    // Faces
    // ---------------------------------------------------------------------

    /// Corners of `fid`, wound outward from its first incident cell.
    #[inline]
    pub fn face_verts(&self, fid: FaceId) -> [VertId; 3] {
        self.faces.get(fid)
    }

    pub fn try_face_verts(&self, fid: FaceId) -> Result<[VertId; 3], MeshError> {
        self.check_face(fid)?;
        Ok(self.faces.get(fid))
    }

    #[inline]
    pub fn face_vert_id(&self, fid: FaceId, offset: usize) -> VertId {
        self.faces.get(fid)[offset]
    }

    #[inline]
    pub fn face_vert(&self, fid: FaceId, offset: usize) -> Vec3 {
        self.vert(self.face_vert_id(fid, offset))
    }

    #[inline]
    pub fn face_id(&self, tri: [VertId; 3]) -> Option<FaceId> {
        self.faces.find(tri)
    }

    #[inline]
    pub fn face_data(&self, fid: FaceId) -> &F {
        &self.f_data[fid.idx()]
    }

    #[inline]
    pub fn face_data_mut(&mut self, fid: FaceId) -> &mut F {
        &mut self.f_data[fid.idx()]
    }

    // ---------------------------------------------------------------------
    // Cells
    // ---------------------------------------------------------------------

    #[inline]
    pub fn cell_verts(&self, cid: CellId) -> &[VertId; 4] {
        &self.cells[cid.idx()]
    }

    pub fn try_cell_verts(&self, cid: CellId) -> Result<&[VertId; 4], MeshError> {
        self.check_cell(cid)?;
        Ok(&self.cells[cid.idx()])
    }

    #[inline]
    pub fn cell_vert_id(&self, cid: CellId, offset: usize) -> VertId {
        self.cells[cid.idx()][offset]
    }

    #[inline]
    pub fn cell_vert(&self, cid: CellId, offset: usize) -> Vec3 {
        self.vert(self.cell_vert_id(cid, offset))
    }

    /// Corner positions of `cid`.
    pub fn cell_vlist(&self, cid: CellId) -> [Vec3; 4] {
        self.cells[cid.idx()].map(|v| self.vert(v))
    }

    #[inline]
    pub fn cell_data(&self, cid: CellId) -> &C {
        &self.c_data[cid.idx()]
    }

    #[inline]
    pub fn cell_data_mut(&mut self, cid: CellId) -> &mut C {
        &mut self.c_data[cid.idx()]
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
    pub fn adj_v2f(&self, vid: VertId) -> &[FaceId] {
        &self.v2f[vid.idx()]
    }

    #[inline]
    pub fn adj_v2c(&self, vid: VertId) -> &[CellId] {
        &self.v2c[vid.idx()]
    }

    #[inline]
    pub fn adj_e2f(&self, eid: EdgeId) -> &[FaceId] {
        &self.e2f[eid.idx()]
    }

    #[inline]
    pub fn adj_e2c(&self, eid: EdgeId) -> &[CellId] {
        &self.e2c[eid.idx()]
    }

    #[inline]
    pub fn adj_f2e(&self, fid: FaceId) -> &[EdgeId; 3] {
        &self.f2e[fid.idx()]
    }

    #[inline]
    pub fn adj_f2f(&self, fid: FaceId) -> &[FaceId] {
        &self.f2f[fid.idx()]
    }

    #[inline]
    pub fn adj_f2c(&self, fid: FaceId) -> &[CellId] {
        &self.f2c[fid.idx()]
    }

    #[inline]
    pub fn adj_c2e(&self, cid: CellId) -> &[EdgeId; 6] {
        &self.c2e[cid.idx()]
    }

    #[inline]
    pub fn adj_c2f(&self, cid: CellId) -> &[FaceId; 4] {
        &self.c2f[cid.idx()]
    }

    #[inline]
    pub fn adj_c2c(&self, cid: CellId) -> &[CellId] {
        &self.c2c[cid.idx()]
    }

    #[inline]
    pub fn vector_verts(&self) -> &[Vec3] {
        &self.verts
    }

    #[inline]
    pub fn vector_coords(&self) -> &[f64] {
        bytemuck::cast_slice(&self.verts)
    }

    #[inline]
    pub fn vector_cells(&self) -> &[[VertId; 4]] {
        &self.cells
    }
}

/// Reorders `tet` so its signed volume is not negative, swapping the last
/// two corners when needed. Local faces are then wound outward.
pub(crate) fn orient_tet(tet: [VertId; 4], verts: &[Vec3]) -> [VertId; 4] {
    let [a, b, c, d] = tet.map(|v| verts[v.idx()]);
    if tet_signed_volume(a, b, c, d) < 0.0 {
        [tet[0], tet[1], tet[3], tet[2]]
    } else {
        tet
    }
}

/// Validates a cell: ids in range and pairwise distinct.
pub(crate) fn check_tet(tet: &[VertId; 4], num_verts: usize) -> Result<(), MeshError> {
    for (i, &v) in tet.iter().enumerate() {
        if v.idx() >= num_verts {
            return Err(MeshError::VertOutOfRange {
                vid: v,
                len: num_verts,
            });
        }
        if tet[..i].contains(&v) {
            return Err(MeshError::RepeatedVertex { vid: v });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
