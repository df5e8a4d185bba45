//! Local edits on tetrahedral meshes.
//!
//! Same contract as the surface mesh: preconditions are checked first, and
//! removal compacts every tier through swap-with-last. Removing a cell also
//! drops the faces and edges it leaves without an incident cell; vertices are
//! only removed explicitly.

use std::collections::BTreeSet;

use super::{check_tet, orient_tet, Tetmesh};
use crate::debug_invariants::DebugInvariants;
use crate::geometry::vec3::Vec3;
use crate::mesh_error::MeshError;
use crate::topology::cache::InvalidateCache;
use crate::topology::ids::{CellId, EdgeId, FaceId, VertId};
use crate::topology::rows::{affected, map_row, remove_value, swap_map};

impl<V, E, F, C> Tetmesh<V, E, F, C>
where
    V: Default,
    E: Default,
    F: Default,
    C: Default,
{
    pub fn vert_add(&mut self, pos: Vec3) -> VertId {
        let vid = VertId::new(self.verts.len());
        self.verts.push(pos);
        self.v_uvw.push(Vec3::ZERO);
        self.v_data.push(V::default());
        self.v2v.push(Vec::new());
        self.v2e.push(Vec::new());
        self.v2f.push(Vec::new());
        self.v2c.push(Vec::new());
        log::trace!("vert_add {vid} at {pos}");
        self.after_mutation();
        vid
    }

    /// Appends a cell, sharing existing edges and faces. A negatively
    /// oriented cell is stored with its last two corners swapped.
    pub fn cell_add(&mut self, tet: [VertId; 4]) -> Result<CellId, MeshError> {
        check_tet(&tet, self.verts.len())?;
        let tet = orient_tet(tet, &self.verts);
        let cid = CellId::new(self.cells.len());
        self.cells.push(tet);
        self.c_data.push(C::default());
        self.attach_cell(cid);

        let ce = self.c2e[cid.idx()];
        let cf = self.c2f[cid.idx()];
        self.refresh_around(&ce, &cf);
        for fid in cf {
            self.update_f_normal(fid);
            if self.f2c[fid.idx()].len() > 2 {
                self.report_non_manifold(fid);
            }
        }
        log::trace!("cell_add {cid} {tet:?}");
        self.after_mutation();
        Ok(cid)
    }
}

impl<V, E, F, C> Tetmesh<V, E, F, C> {
    /// Moves a vertex and refreshes the normals of its faces.
    pub fn vert_set_pos(&mut self, vid: VertId, pos: Vec3) -> Result<(), MeshError> {
        self.check_vert(vid)?;
        self.verts[vid.idx()] = pos;
        for fid in self.v2f[vid.idx()].clone() {
            self.update_f_normal(fid);
        }
        self.after_mutation();
        Ok(())
    }

    /// Removes a cell with the faces and edges it leaves unreferenced.
    pub fn cell_remove(&mut self, cid: CellId) -> Result<(), MeshError> {
        self.check_cell(cid)?;
        self.cell_remove_impl(cid);
        self.after_mutation();
        Ok(())
    }

    /// Removes a batch of cells given by their ids before the call.
    pub fn cells_remove(&mut self, cids: &[CellId]) -> Result<(), MeshError> {
        for &cid in cids {
            self.check_cell(cid)?;
        }
        let sorted: BTreeSet<CellId> = cids.iter().copied().collect();
        for &cid in sorted.iter().rev() {
            self.cell_remove_impl(cid);
        }
        self.after_mutation();
        Ok(())
    }

    /// Removes a vertex together with every incident cell.
    pub fn vert_remove(&mut self, vid: VertId) -> Result<(), MeshError> {
        self.check_vert(vid)?;
        let cids: BTreeSet<CellId> = self.v2c[vid.idx()].iter().copied().collect();
        for &cid in cids.iter().rev() {
            self.cell_remove_impl(cid);
        }
        self.vert_remove_impl(vid);
        self.after_mutation();
        Ok(())
    }

    /// Removes a vertex that no cell references.
    pub fn vert_remove_unreferenced(&mut self, vid: VertId) -> Result<(), MeshError> {
        self.check_vert(vid)?;
        let count = self.v2c[vid.idx()].len();
        if count > 0 {
            return Err(MeshError::VertStillReferenced { vid, count });
        }
        self.vert_remove_impl(vid);
        self.after_mutation();
        Ok(())
    }

    pub fn vert_switch_id(&mut self, v0: VertId, v1: VertId) -> Result<(), MeshError> {
        self.check_vert(v0)?;
        self.check_vert(v1)?;
        self.swap_verts(v0, v1);
        self.after_mutation();
        Ok(())
    }

    pub fn face_switch_id(&mut self, f0: FaceId, f1: FaceId) -> Result<(), MeshError> {
        self.check_face(f0)?;
        self.check_face(f1)?;
        self.swap_faces(f0, f1);
        self.after_mutation();
        Ok(())
    }

    pub fn cell_switch_id(&mut self, c0: CellId, c1: CellId) -> Result<(), MeshError> {
        self.check_cell(c0)?;
        self.check_cell(c1)?;
        self.swap_cells(c0, c1);
        self.after_mutation();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    pub(crate) fn after_mutation(&mut self) {
        self.invalidate_cache();
        self.check_after_edit(self.options.check_invariants, "tetmesh");
    }

    /// Recomputes c2c for the cells on `cf` and f2f for the faces on `ce`.
    fn refresh_around(&mut self, ce: &[EdgeId; 6], cf: &[FaceId; 4]) {
        let cells: BTreeSet<CellId> = cf
            .iter()
            .flat_map(|f| self.f2c[f.idx()].iter().copied())
            .collect();
        for cid in cells {
            self.c2c[cid.idx()] = self.c2c_row(cid);
        }
        let faces: BTreeSet<FaceId> = ce
            .iter()
            .flat_map(|e| self.e2f[e.idx()].iter().copied())
            .collect();
        for fid in faces {
            self.f2f[fid.idx()] = self.f2f_row(fid);
        }
    }

    fn cell_remove_impl(&mut self, cid: CellId) {
        let tet = self.cells[cid.idx()];
        let ce = self.c2e[cid.idx()];
        let cf = self.c2f[cid.idx()];
        for v in tet {
            remove_value(&mut self.v2c[v.idx()], &cid);
        }
        for e in ce {
            remove_value(&mut self.e2c[e.idx()], &cid);
        }
        for f in cf {
            remove_value(&mut self.f2c[f.idx()], &cid);
        }
        self.c2c[cid.idx()].clear();
        for f in cf {
            if !self.f2c[f.idx()].is_empty() {
                self.orient_face(f);
            }
        }
        self.refresh_around(&ce, &cf);

        let last = CellId::new(self.cells.len() - 1);
        self.swap_cells(cid, last);
        self.cells.pop();
        self.c_data.pop();
        self.c2e.pop();
        self.c2f.pop();
        self.c2c.pop();

        // cell swaps leave face and edge ids alone, so `cf` and `ce` still hold
        let orphan_faces: BTreeSet<FaceId> = cf
            .into_iter()
            .filter(|f| self.f2c[f.idx()].is_empty())
            .collect();
        for &fid in orphan_faces.iter().rev() {
            self.face_remove_impl(fid);
        }
        let orphan_edges: BTreeSet<EdgeId> = ce
            .into_iter()
            .filter(|e| self.e2c[e.idx()].is_empty())
            .collect();
        for &eid in orphan_edges.iter().rev() {
            self.edge_remove_impl(eid);
        }
        log::trace!("cell_remove {cid} {tet:?}");
    }

    fn face_remove_impl(&mut self, fid: FaceId) {
        debug_assert!(self.f2c[fid.idx()].is_empty());
        for v in self.faces.get(fid) {
            remove_value(&mut self.v2f[v.idx()], &fid);
        }
        for e in self.f2e[fid.idx()] {
            remove_value(&mut self.e2f[e.idx()], &fid);
        }
        for g in std::mem::take(&mut self.f2f[fid.idx()]) {
            remove_value(&mut self.f2f[g.idx()], &fid);
        }

        let last = FaceId::new(self.faces.len() - 1);
        self.swap_faces(fid, last);
        self.faces.pop();
        self.f2e.pop();
        self.f2f.pop();
        self.f2c.pop();
        self.f_data.pop();
        self.f_normal.pop();
    }

    fn edge_remove_impl(&mut self, eid: EdgeId) {
        debug_assert!(self.e2c[eid.idx()].is_empty() && self.e2f[eid.idx()].is_empty());
        let [a, b] = self.edges.get(eid);
        remove_value(&mut self.v2e[a.idx()], &eid);
        remove_value(&mut self.v2e[b.idx()], &eid);
        remove_value(&mut self.v2v[a.idx()], &b);
        remove_value(&mut self.v2v[b.idx()], &a);

        let last = EdgeId::new(self.edges.len() - 1);
        self.swap_edges(eid, last);
        self.edges.pop();
        self.e2f.pop();
        self.e2c.pop();
        self.e_data.pop();
    }

    /// Compacts a vertex no cell references. Without cells it has no edge or
    /// face either.
    fn vert_remove_impl(&mut self, vid: VertId) {
        debug_assert!(self.v2c[vid.idx()].is_empty() && self.v2e[vid.idx()].is_empty());
        let last = VertId::new(self.verts.len() - 1);
        self.swap_verts(vid, last);
        self.verts.pop();
        self.v_uvw.pop();
        self.v_data.pop();
        self.v2v.pop();
        self.v2e.pop();
        self.v2f.pop();
        self.v2c.pop();
        log::trace!("vert_remove {vid}");
    }

    pub(crate) fn swap_verts(&mut self, v0: VertId, v1: VertId) {
        if v0 == v1 {
            return;
        }
        let f = swap_map(v0, v1);
        let cells = affected(&self.v2c, [v0, v1], []);
        let faces = affected(&self.v2f, [v0, v1], []);
        let edges = affected(&self.v2e, [v0, v1], []);
        let verts = affected(&self.v2v, [v0, v1], [v0, v1]);

        let (i, j) = (v0.idx(), v1.idx());
        self.verts.swap(i, j);
        self.v_uvw.swap(i, j);
        self.v_data.swap(i, j);
        self.v2v.swap(i, j);
        self.v2e.swap(i, j);
        self.v2f.swap(i, j);
        self.v2c.swap(i, j);

        for cid in cells {
            map_row(&mut self.cells[cid.idx()], f);
        }
        for fid in faces {
            self.faces.remap(fid, f);
        }
        for eid in edges {
            self.edges.remap(eid, f);
        }
        for vid in verts {
            map_row(&mut self.v2v[vid.idx()], f);
        }
    }

    pub(crate) fn swap_edges(&mut self, e0: EdgeId, e1: EdgeId) {
        if e0 == e1 {
            return;
        }
        let f = swap_map(e0, e1);
        let verts: BTreeSet<VertId> = self
            .edges
            .get(e0)
            .into_iter()
            .chain(self.edges.get(e1))
            .collect();
        let faces = affected(&self.e2f, [e0, e1], []);
        let cells = affected(&self.e2c, [e0, e1], []);

        self.edges.swap(e0, e1);
        self.e2f.swap(e0.idx(), e1.idx());
        self.e2c.swap(e0.idx(), e1.idx());
        self.e_data.swap(e0.idx(), e1.idx());

        for vid in verts {
            map_row(&mut self.v2e[vid.idx()], f);
        }
        for fid in faces {
            map_row(&mut self.f2e[fid.idx()], f);
        }
        for cid in cells {
            map_row(&mut self.c2e[cid.idx()], f);
        }
    }

    pub(crate) fn swap_faces(&mut self, f0: FaceId, f1: FaceId) {
        if f0 == f1 {
            return;
        }
        let f = swap_map(f0, f1);
        let verts: BTreeSet<VertId> = self
            .faces
            .get(f0)
            .into_iter()
            .chain(self.faces.get(f1))
            .collect();
        let edges: BTreeSet<EdgeId> = self.f2e[f0.idx()]
            .into_iter()
            .chain(self.f2e[f1.idx()])
            .collect();
        let cells = affected(&self.f2c, [f0, f1], []);
        let faces = affected(&self.f2f, [f0, f1], [f0, f1]);

        let (i, j) = (f0.idx(), f1.idx());
        self.faces.swap(f0, f1);
        self.f2e.swap(i, j);
        self.f2f.swap(i, j);
        self.f2c.swap(i, j);
        self.f_data.swap(i, j);
        self.f_normal.swap(i, j);

        for vid in verts {
            map_row(&mut self.v2f[vid.idx()], f);
        }
        for eid in edges {
            map_row(&mut self.e2f[eid.idx()], f);
        }
        for cid in cells {
            map_row(&mut self.c2f[cid.idx()], f);
        }
        for fid in faces {
            map_row(&mut self.f2f[fid.idx()], f);
        }
    }

    pub(crate) fn swap_cells(&mut self, c0: CellId, c1: CellId) {
        if c0 == c1 {
            return;
        }
        let f = swap_map(c0, c1);
        let (i, j) = (c0.idx(), c1.idx());
        let verts: BTreeSet<VertId> = self.cells[i].into_iter().chain(self.cells[j]).collect();
        let edges: BTreeSet<EdgeId> = self.c2e[i].into_iter().chain(self.c2e[j]).collect();
        let faces: BTreeSet<FaceId> = self.c2f[i].into_iter().chain(self.c2f[j]).collect();
        let cells = affected(&self.c2c, [c0, c1], [c0, c1]);

        self.cells.swap(i, j);
        self.c_data.swap(i, j);
        self.c2e.swap(i, j);
        self.c2f.swap(i, j);
        self.c2c.swap(i, j);

        for vid in verts {
            map_row(&mut self.v2c[vid.idx()], f);
        }
        for eid in edges {
            map_row(&mut self.e2c[eid.idx()], f);
        }
        for fid in faces {
            map_row(&mut self.f2c[fid.idx()], f);
        }
        for cid in cells {
            map_row(&mut self.c2c[cid.idx()], f);
        }
    }
}
