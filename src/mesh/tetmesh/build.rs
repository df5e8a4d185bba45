//! Incidence builder for tetrahedral meshes.

use super::{check_tet, orient_tet, Tetmesh};
use crate::geometry::metrics::{triangle_normal, TET_EDGES, TET_FACES, TET_FACE_EDGES};
use crate::geometry::vec3::Vec3;
use crate::mesh::options::{MeshOptions, NonManifoldHandling};
use crate::mesh_error::MeshError;
use crate::topology::cache::InvalidateCache;
use crate::topology::ids::{CellId, EdgeId, FaceId, VertId};
use crate::topology::rows::insert_unique;

impl<V, E, F, C> Tetmesh<V, E, F, C>
where
    V: Default,
    E: Default,
    F: Default,
    C: Default,
{
    pub fn new(verts: Vec<Vec3>, cells: Vec<[VertId; 4]>) -> Result<Self, MeshError> {
        Self::with_options(verts, cells, MeshOptions::default())
    }

    pub fn with_options(
        verts: Vec<Vec3>,
        cells: Vec<[VertId; 4]>,
        options: MeshOptions,
    ) -> Result<Self, MeshError> {
        let mut mesh = Self {
            options,
            ..Self::default()
        };
        mesh.init(verts, cells)?;
        Ok(mesh)
    }

    /// Builds from flat `[x, y, z, …]` coordinates and flat 4-tuples of
    /// vertex indices, as produced by most volume mesh readers.
    pub fn from_flat(coords: &[f64], cells: &[usize]) -> Result<Self, MeshError> {
        if coords.len() % 3 != 0 {
            return Err(MeshError::ChannelLengthMismatch {
                channel: "coords",
                expected: coords.len() / 3 * 3,
                found: coords.len(),
            });
        }
        if cells.len() % 4 != 0 {
            return Err(MeshError::ChannelLengthMismatch {
                channel: "cells",
                expected: cells.len() / 4 * 4,
                found: cells.len(),
            });
        }
        let verts = coords
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        let cells = cells
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]].map(VertId::new))
            .collect();
        Self::new(verts, cells)
    }

    /// Replaces the content of the mesh and rebuilds every table. Cells are
    /// validated first; on error the mesh is unchanged. Negatively oriented
    /// cells are stored with their last two corners swapped.
    pub fn init(&mut self, verts: Vec<Vec3>, cells: Vec<[VertId; 4]>) -> Result<(), MeshError> {
        for tet in &cells {
            check_tet(tet, verts.len())?;
        }
        self.clear();

        let nv = verts.len();
        self.verts = verts;
        self.v_uvw = vec![Vec3::ZERO; nv];
        self.v_data = std::iter::repeat_with(V::default).take(nv).collect();
        self.v2v = vec![Vec::new(); nv];
        self.v2e = vec![Vec::new(); nv];
        self.v2f = vec![Vec::new(); nv];
        self.v2c = vec![Vec::new(); nv];

        let nc = cells.len();
        self.c_data = std::iter::repeat_with(C::default).take(nc).collect();
        self.cells = cells
            .into_iter()
            .map(|tet| orient_tet(tet, &self.verts))
            .collect();
        for cid in (0..nc).map(CellId::new) {
            self.attach_cell(cid);
        }

        for cid in self.cell_ids() {
            self.c2c[cid.idx()] = self.c2c_row(cid);
        }
        for fid in self.face_ids() {
            self.f2f[fid.idx()] = self.f2f_row(fid);
            self.update_f_normal(fid);
            if self.f2c[fid.idx()].len() > 2 {
                self.report_non_manifold(fid);
            }
        }

        log::debug!(
            "built tetmesh: {} verts, {} edges, {} faces, {} cells",
            self.num_verts(),
            self.num_edges(),
            self.num_faces(),
            self.num_cells()
        );
        self.after_mutation();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.verts.clear();
        self.cells.clear();
        self.edges.clear();
        self.faces.clear();
        self.v_uvw.clear();
        self.v_data.clear();
        self.e_data.clear();
        self.f_data.clear();
        self.c_data.clear();
        self.f_normal.clear();
        self.v2v.clear();
        self.v2e.clear();
        self.v2f.clear();
        self.v2c.clear();
        self.e2f.clear();
        self.e2c.clear();
        self.f2e.clear();
        self.f2f.clear();
        self.f2c.clear();
        self.c2e.clear();
        self.c2f.clear();
        self.c2c.clear();
        self.invalidate_cache();
    }

    /// Wires cell `cid` (the last one in `cells`) into the edge, face and
    /// vertex tables, appending its `c2e`, `c2f` and `c2c` rows. The derived
    /// `c2c` and `f2f` rows are left for the caller to refresh.
    pub(crate) fn attach_cell(&mut self, cid: CellId) {
        debug_assert_eq!(cid.idx(), self.c2e.len());
        let tet = self.cells[cid.idx()];
        for &v in &tet {
            self.v2c[v.idx()].push(cid);
        }

        let ce = TET_EDGES.map(|[a, b]| self.edge_find_or_add(tet[a], tet[b]));
        for &eid in &ce {
            self.e2c[eid.idx()].push(cid);
        }

        let mut cf = [FaceId::new(0); 4];
        for (i, ([a, b, c], sides)) in TET_FACES.iter().zip(TET_FACE_EDGES).enumerate() {
            let fid = self.face_find_or_add([tet[*a], tet[*b], tet[*c]], sides.map(|k| ce[k]));
            self.f2c[fid.idx()].push(cid);
            cf[i] = fid;
        }

        self.c2e.push(ce);
        self.c2f.push(cf);
        self.c2c.push(Vec::new());
    }

    pub(crate) fn edge_find_or_add(&mut self, a: VertId, b: VertId) -> EdgeId {
        let (eid, fresh) = self.edges.insert([a, b]);
        if fresh {
            self.e2f.push(Vec::new());
            self.e2c.push(Vec::new());
            self.e_data.push(E::default());
            self.v2e[a.idx()].push(eid);
            self.v2e[b.idx()].push(eid);
            insert_unique(&mut self.v2v[a.idx()], b);
            insert_unique(&mut self.v2v[b.idx()], a);
        }
        eid
    }

    /// `sides[k]` must be the edge joining `tri[k]` and `tri[k + 1]`.
    fn face_find_or_add(&mut self, tri: [VertId; 3], sides: [EdgeId; 3]) -> FaceId {
        let (fid, fresh) = self.faces.insert(tri);
        if fresh {
            self.f2c.push(Vec::new());
            self.f2f.push(Vec::new());
            self.f_data.push(F::default());
            self.f_normal.push(Vec3::ZERO);
            self.f2e.push(sides);
            for e in sides {
                self.e2f[e.idx()].push(fid);
            }
            for v in tri {
                self.v2f[v.idx()].push(fid);
            }
        }
        fid
    }
}

impl<V, E, F, C> Tetmesh<V, E, F, C> {
    /// Cells across each face shared by exactly two cells.
    pub(crate) fn c2c_row(&self, cid: CellId) -> Vec<CellId> {
        let mut row = Vec::new();
        for &fid in &self.c2f[cid.idx()] {
            if let [a, b] = self.f2c[fid.idx()][..] {
                insert_unique(&mut row, if a == cid { b } else { a });
            }
        }
        row
    }

    /// Surface faces sharing an edge with surface face `fid`.
    pub(crate) fn f2f_row(&self, fid: FaceId) -> Vec<FaceId> {
        let mut row = Vec::new();
        if !self.face_is_on_srf(fid) {
            return row;
        }
        for &eid in &self.f2e[fid.idx()] {
            for &g in &self.e2f[eid.idx()] {
                if g != fid && self.face_is_on_srf(g) {
                    insert_unique(&mut row, g);
                }
            }
        }
        row
    }

    pub(crate) fn update_f_normal(&mut self, fid: FaceId) {
        let [a, b, c] = self.faces.get(fid);
        self.f_normal[fid.idx()] = triangle_normal(self.vert(a), self.vert(b), self.vert(c));
    }

    /// Re-winds `fid` outward from its first incident cell and refreshes its
    /// normal.
    pub(crate) fn orient_face(&mut self, fid: FaceId) {
        if let Some(&cid) = self.f2c[fid.idx()].first() {
            if let Some(k) = self.c2f[cid.idx()].iter().position(|&f| f == fid) {
                let tet = self.cells[cid.idx()];
                let ce = self.c2e[cid.idx()];
                let [a, b, c] = TET_FACES[k];
                self.faces.reorient(fid, [tet[a], tet[b], tet[c]]);
                self.f2e[fid.idx()] = TET_FACE_EDGES[k].map(|i| ce[i]);
            }
        }
        self.update_f_normal(fid);
    }

    pub(crate) fn report_non_manifold(&self, fid: FaceId) {
        if self.options.non_manifold == NonManifoldHandling::Warn {
            log::warn!(
                "non-manifold face {fid} {:?} shared by {} cells",
                self.faces.get(fid),
                self.f2c[fid.idx()].len()
            );
        }
    }
}
