//! Local edits that keep every surface table consistent.
//!
//! Each public operation validates its preconditions before touching the
//! mesh, so an `Err` means nothing changed. Removal compacts through
//! swap-with-last: the victim is detached, swapped with the last entity of its
//! tier (rewriting every reference exactly once) and popped.

use std::collections::BTreeSet;

use itertools::Itertools;

use super::SurfaceMesh;
use crate::debug_invariants::DebugInvariants;
use crate::geometry::vec3::Vec3;
use crate::mesh_error::MeshError;
use crate::topology::cache::InvalidateCache;
use crate::topology::ids::{EdgeId, PolyId, VertId};
use crate::topology::rows::{affected, insert_unique, map_row, remove_value, swap_map};
use crate::topology::shape::ShapePolicy;

impl<S, V, E, P> SurfaceMesh<S, V, E, P>
where
    S: ShapePolicy,
    V: Default,
    E: Default,
    P: Default,
{
    /// Appends an isolated vertex.
    pub fn vert_add(&mut self, pos: Vec3) -> VertId {
        let vid = VertId::new(self.verts.len());
        self.verts.push(pos);
        self.v_uvw.push(Vec3::ZERO);
        self.v_normal.push(Vec3::ZERO);
        self.v_data.push(V::default());
        self.v2v.push(Vec::new());
        self.v2e.push(Vec::new());
        self.v2p.push(Vec::new());
        log::trace!("vert_add {vid} at {pos}");
        self.after_mutation();
        vid
    }

    /// Returns the edge joining `v0` and `v1`, creating it (with no incident
    /// polygon) if it does not exist yet.
    pub fn edge_add(&mut self, v0: VertId, v1: VertId) -> Result<EdgeId, MeshError> {
        self.check_vert(v0)?;
        self.check_vert(v1)?;
        if v0 == v1 {
            return Err(MeshError::SelfLoop { vid: v0 });
        }
        let eid = self.edge_find_or_add(v0, v1);
        log::trace!("edge_add {eid} ({v0}, {v1})");
        self.after_mutation();
        Ok(eid)
    }

    /// Appends a polygon, sharing existing edges and creating missing ones.
    pub fn poly_add(&mut self, vlist: &[VertId]) -> Result<PolyId, MeshError> {
        self.check_poly_verts(vlist)?;

        let pid = PolyId::new(self.polys.len());
        self.polys.push(vlist.to_vec());
        self.p_data.push(P::default());
        self.p_normal.push(Vec3::ZERO);
        self.p_tess.push(Vec::new());
        self.p2e.push(Vec::with_capacity(vlist.len()));
        self.p2p.push(Vec::new());

        for &v in vlist {
            self.v2p[v.idx()].push(pid);
        }
        for (a, b) in vlist.iter().copied().circular_tuple_windows() {
            let eid = self.edge_find_or_add(a, b);
            self.e2p[eid.idx()].push(pid);
            self.p2e[pid.idx()].push(eid);
            if self.e2p[eid.idx()].len() > 2 {
                self.report_non_manifold(eid);
            }
        }
        let edges = self.p2e[pid.idx()].clone();
        self.refresh_p2p_along(&edges);

        self.update_p_tessellation(pid);
        self.update_p_normal(pid);
        for &v in vlist {
            self.update_v_normal(v);
        }
        log::trace!("poly_add {pid} {vlist:?}");
        self.after_mutation();
        Ok(pid)
    }
}

impl<S: ShapePolicy, V, E, P> SurfaceMesh<S, V, E, P> {
    /// Moves a vertex and refreshes the caches of its incident polygons.
    pub fn vert_set_pos(&mut self, vid: VertId, pos: Vec3) -> Result<(), MeshError> {
        self.check_vert(vid)?;
        self.verts[vid.idx()] = pos;
        let mut touched = BTreeSet::new();
        for pid in self.v2p[vid.idx()].clone() {
            self.update_p_tessellation(pid);
            self.update_p_normal(pid);
            touched.extend(self.polys[pid.idx()].iter().copied());
        }
        for v in touched {
            self.update_v_normal(v);
        }
        self.after_mutation();
        Ok(())
    }

    /// Removes a polygon and every edge left without incident polygons.
    pub fn poly_remove(&mut self, pid: PolyId) -> Result<(), MeshError> {
        self.check_poly(pid)?;
        self.poly_remove_impl(pid, true);
        self.after_mutation();
        Ok(())
    }

    /// Removes a polygon but keeps its edges, even those left dangling.
    pub fn poly_remove_unreferenced(&mut self, pid: PolyId) -> Result<(), MeshError> {
        self.check_poly(pid)?;
        self.poly_remove_impl(pid, false);
        self.after_mutation();
        Ok(())
    }

    /// Removes a batch of polygons. Duplicates are ignored; ids refer to the
    /// mesh before the call.
    pub fn polys_remove(&mut self, pids: &[PolyId]) -> Result<(), MeshError> {
        for &pid in pids {
            self.check_poly(pid)?;
        }
        // descending, so compaction never moves a polygon still to be removed
        let sorted: BTreeSet<PolyId> = pids.iter().copied().collect();
        for &pid in sorted.iter().rev() {
            self.poly_remove_impl(pid, true);
        }
        self.after_mutation();
        Ok(())
    }

    /// Removes an edge together with every polygon bounded by it.
    pub fn edge_remove(&mut self, eid: EdgeId) -> Result<(), MeshError> {
        self.check_edge(eid)?;
        let pids = self.e2p[eid.idx()].clone();
        if pids.is_empty() {
            self.edge_remove_impl(eid);
            self.after_mutation();
            Ok(())
        } else {
            // the edge is orphaned by the last removal and dropped with it
            self.polys_remove(&pids)
        }
    }

    /// Removes an edge that no polygon references.
    pub fn edge_remove_unreferenced(&mut self, eid: EdgeId) -> Result<(), MeshError> {
        self.check_edge(eid)?;
        let count = self.e2p[eid.idx()].len();
        if count > 0 {
            return Err(MeshError::EdgeStillReferenced { eid, count });
        }
        self.edge_remove_impl(eid);
        self.after_mutation();
        Ok(())
    }

    /// Removes a vertex with all incident polygons and edges.
    ///
    /// Incident polygons are removed first (highest id first), then any
    /// dangling edge, and finally the vertex itself is compacted.
    pub fn vert_remove(&mut self, vid: VertId) -> Result<(), MeshError> {
        self.check_vert(vid)?;
        let pids: BTreeSet<PolyId> = self.v2p[vid.idx()].iter().copied().collect();
        for &pid in pids.iter().rev() {
            self.poly_remove_impl(pid, true);
        }
        self.vert_remove_impl(vid);
        self.after_mutation();
        Ok(())
    }

    /// Removes a vertex that no polygon references. Dangling edges at the
    /// vertex are dropped with it.
    pub fn vert_remove_unreferenced(&mut self, vid: VertId) -> Result<(), MeshError> {
        self.check_vert(vid)?;
        let count = self.v2p[vid.idx()].len();
        if count > 0 {
            return Err(MeshError::VertStillReferenced { vid, count });
        }
        self.vert_remove_impl(vid);
        self.after_mutation();
        Ok(())
    }

    /// Reverses the corner order of `pid`, flipping its normal.
    pub fn poly_flip_winding_order(&mut self, pid: PolyId) -> Result<(), MeshError> {
        self.check_poly(pid)?;
        self.polys[pid.idx()].reverse();
        self.rebuild_p2e_order(pid);
        self.update_p_tessellation(pid);
        self.update_p_normal(pid);
        for v in self.polys[pid.idx()].clone() {
            self.update_v_normal(v);
        }
        log::trace!("poly_flip_winding_order {pid}");
        self.after_mutation();
        Ok(())
    }

    /// Exchanges the ids of two vertices.
    pub fn vert_switch_id(&mut self, v0: VertId, v1: VertId) -> Result<(), MeshError> {
        self.check_vert(v0)?;
        self.check_vert(v1)?;
        self.swap_verts(v0, v1);
        self.after_mutation();
        Ok(())
    }

    /// Exchanges the ids of two edges.
    pub fn edge_switch_id(&mut self, e0: EdgeId, e1: EdgeId) -> Result<(), MeshError> {
        self.check_edge(e0)?;
        self.check_edge(e1)?;
        self.swap_edges(e0, e1);
        self.after_mutation();
        Ok(())
    }

    /// Exchanges the ids of two polygons.
    pub fn poly_switch_id(&mut self, p0: PolyId, p1: PolyId) -> Result<(), MeshError> {
        self.check_poly(p0)?;
        self.check_poly(p1)?;
        self.swap_polys(p0, p1);
        self.after_mutation();
        Ok(())
    }

    /// Scales the mesh uniformly about its bounding-box centre so that its
    /// total area becomes one. Meshes with zero area are left unchanged.
    pub fn normalize_area(&mut self) {
        let area = self.mesh_area();
        if area <= f64::EPSILON {
            return;
        }
        let center = self.bbox().center();
        let s = area.sqrt().recip();
        for p in &mut self.verts {
            *p = center + (*p - center) * s;
        }
        log::debug!("normalize_area: scaled by {s}");
        self.after_mutation();
    }

    // ---------------------------------------------------------------------
    // Internals: no range checks, no invariant pass
    // ---------------------------------------------------------------------

    /// Runs after every public mutation.
    pub(crate) fn after_mutation(&mut self) {
        self.invalidate_cache();
        self.check_after_edit(self.options.check_invariants, "surface mesh");
    }

    /// p2p row of `pid`: polygons across each edge shared by exactly two.
    pub(crate) fn p2p_row(&self, pid: PolyId) -> Vec<PolyId> {
        let mut row = Vec::new();
        for &eid in &self.p2e[pid.idx()] {
            if let [a, b] = self.e2p[eid.idx()][..] {
                let other = if a == pid { b } else { a };
                insert_unique(&mut row, other);
            }
        }
        row
    }

    /// Recomputes the p2p rows of every polygon on the given edges.
    fn refresh_p2p_along(&mut self, edges: &[EdgeId]) {
        let polys: BTreeSet<PolyId> = edges
            .iter()
            .flat_map(|e| self.e2p[e.idx()].iter().copied())
            .collect();
        for pid in polys {
            self.p2p[pid.idx()] = self.p2p_row(pid);
        }
    }

    /// Re-derives `p2e[pid]` so entry `i` joins corners `i` and `i + 1`.
    fn rebuild_p2e_order(&mut self, pid: PolyId) {
        let corners = &self.polys[pid.idx()];
        let row: Vec<EdgeId> = corners
            .iter()
            .copied()
            .circular_tuple_windows()
            .filter_map(|(a, b)| self.edges.find([a, b]))
            .collect();
        self.p2e[pid.idx()] = row;
    }

    fn poly_remove_impl(&mut self, pid: PolyId, drop_dangling: bool) {
        let edges = std::mem::take(&mut self.p2e[pid.idx()]);
        for &eid in &edges {
            remove_value(&mut self.e2p[eid.idx()], &pid);
        }
        for &v in &self.polys[pid.idx()] {
            remove_value(&mut self.v2p[v.idx()], &pid);
        }
        self.p2p[pid.idx()].clear();
        self.refresh_p2p_along(&edges);

        let corners = self.polys[pid.idx()].clone();
        if drop_dangling {
            let dangling: BTreeSet<EdgeId> = edges
                .iter()
                .copied()
                .filter(|e| self.e2p[e.idx()].is_empty())
                .collect();
            for &eid in dangling.iter().rev() {
                self.edge_remove_impl(eid);
            }
        }

        let last = PolyId::new(self.polys.len() - 1);
        self.swap_polys(pid, last);
        self.polys.pop();
        self.p_data.pop();
        self.p_normal.pop();
        self.p_tess.pop();
        self.p2e.pop();
        self.p2p.pop();

        for v in corners {
            self.update_v_normal(v);
        }
        log::trace!("poly_remove {pid}");
    }

    /// Detaches and compacts an edge with no incident polygon.
    fn edge_remove_impl(&mut self, eid: EdgeId) {
        debug_assert!(self.e2p[eid.idx()].is_empty());
        let [a, b] = self.edges.get(eid);
        remove_value(&mut self.v2e[a.idx()], &eid);
        remove_value(&mut self.v2e[b.idx()], &eid);
        remove_value(&mut self.v2v[a.idx()], &b);
        remove_value(&mut self.v2v[b.idx()], &a);

        let last = EdgeId::new(self.edges.len() - 1);
        self.swap_edges(eid, last);
        self.edges.pop();
        self.e2p.pop();
        self.e_data.pop();
        log::trace!("edge_remove {eid} ({a}, {b})");
    }

    /// Drops the dangling edges of `vid` and compacts it. The vertex must not
    /// be a polygon corner.
    fn vert_remove_impl(&mut self, vid: VertId) {
        debug_assert!(self.v2p[vid.idx()].is_empty());
        let dangling: BTreeSet<EdgeId> = self.v2e[vid.idx()].iter().copied().collect();
        for &eid in dangling.iter().rev() {
            self.edge_remove_impl(eid);
        }

        let last = VertId::new(self.verts.len() - 1);
        self.swap_verts(vid, last);
        self.verts.pop();
        self.v_uvw.pop();
        self.v_normal.pop();
        self.v_data.pop();
        self.v2v.pop();
        self.v2e.pop();
        self.v2p.pop();
        log::trace!("vert_remove {vid}");
    }

    pub(crate) fn swap_verts(&mut self, v0: VertId, v1: VertId) {
        if v0 == v1 {
            return;
        }
        let f = swap_map(v0, v1);
        let polys = affected(&self.v2p, [v0, v1], []);
        let edges = affected(&self.v2e, [v0, v1], []);
        let verts = affected(&self.v2v, [v0, v1], [v0, v1]);

        let (i, j) = (v0.idx(), v1.idx());
        self.verts.swap(i, j);
        self.v_uvw.swap(i, j);
        self.v_normal.swap(i, j);
        self.v_data.swap(i, j);
        self.v2v.swap(i, j);
        self.v2e.swap(i, j);
        self.v2p.swap(i, j);

        for pid in polys {
            map_row(&mut self.polys[pid.idx()], f);
            for tri in &mut self.p_tess[pid.idx()] {
                *tri = tri.map(f);
            }
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
        let polys = affected(&self.e2p, [e0, e1], []);

        self.edges.swap(e0, e1);
        self.e2p.swap(e0.idx(), e1.idx());
        self.e_data.swap(e0.idx(), e1.idx());

        for vid in verts {
            map_row(&mut self.v2e[vid.idx()], f);
        }
        for pid in polys {
            map_row(&mut self.p2e[pid.idx()], f);
        }
    }

    pub(crate) fn swap_polys(&mut self, p0: PolyId, p1: PolyId) {
        if p0 == p1 {
            return;
        }
        let f = swap_map(p0, p1);
        let verts: BTreeSet<VertId> = self.polys[p0.idx()]
            .iter()
            .chain(&self.polys[p1.idx()])
            .copied()
            .collect();
        let edges: BTreeSet<EdgeId> = self.p2e[p0.idx()]
            .iter()
            .chain(&self.p2e[p1.idx()])
            .copied()
            .collect();
        let polys = affected(&self.p2p, [p0, p1], [p0, p1]);

        let (i, j) = (p0.idx(), p1.idx());
        self.polys.swap(i, j);
        self.p_data.swap(i, j);
        self.p_normal.swap(i, j);
        self.p_tess.swap(i, j);
        self.p2e.swap(i, j);
        self.p2p.swap(i, j);

        for vid in verts {
            map_row(&mut self.v2p[vid.idx()], f);
        }
        for eid in edges {
            map_row(&mut self.e2p[eid.idx()], f);
        }
        for pid in polys {
            map_row(&mut self.p2p[pid.idx()], f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::surface::{Polygonmesh, Quadmesh, Trimesh};

    fn v(i: usize) -> VertId {
        VertId::new(i)
    }

    fn fan() -> Trimesh {
        let verts = vec![
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
        ];
        let polys = vec![
            vec![v(0), v(1), v(2)],
            vec![v(0), v(2), v(3)],
            vec![v(0), v(3), v(4)],
            vec![v(0), v(4), v(1)],
        ];
        Trimesh::new(verts, polys).unwrap()
    }

    /// 3 x 2 quads, each tagged with its original id.
    fn tagged_strip() -> Quadmesh<(), (), u32> {
        let mut verts = Vec::new();
        for j in 0..3 {
            for i in 0..4 {
                verts.push(Vec3::new(i as f64, j as f64, 0.0));
            }
        }
        let id = |i: usize, j: usize| v(j * 4 + i);
        let mut polys = Vec::new();
        for j in 0..2 {
            for i in 0..3 {
                polys.push(vec![id(i, j), id(i + 1, j), id(i + 1, j + 1), id(i, j + 1)]);
            }
        }
        let mut m = Quadmesh::new(verts, polys).unwrap();
        for q in 0..m.num_polys() {
            *m.poly_data_mut(PolyId::new(q)) = q as u32;
        }
        m
    }

    #[test]
    fn batch_removal_uses_ids_before_the_call() {
        let original = tagged_strip();
        let mut m = tagged_strip();
        let batch = [4, 1, 5, 1].map(PolyId::new);
        m.polys_remove(&batch).unwrap();

        assert_eq!(m.num_polys(), 3);
        let mut kept: Vec<u32> = m.poly_ids().map(|q| *m.poly_data(q)).collect();
        kept.sort_unstable();
        assert_eq!(kept, vec![0, 2, 3]);
        for q in m.poly_ids() {
            let src = PolyId::new(*m.poly_data(q) as usize);
            assert_eq!(m.poly_verts(q), original.poly_verts(src));
        }
        m.validate_invariants().unwrap();

        // one bad id rejects the whole batch
        let before = m.num_polys();
        let err = m.polys_remove(&[PolyId::new(0), PolyId::new(9)]).unwrap_err();
        assert!(matches!(err, MeshError::PolyOutOfRange { .. }));
        assert_eq!(m.num_polys(), before);
    }

    #[test]
    fn poly_add_shares_edges() {
        let mut m = Trimesh::<()>::default();
        for p in [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE] {
            m.vert_add(p);
        }
        m.poly_add(&[v(0), v(1), v(2)]).unwrap();
        m.poly_add(&[v(1), v(3), v(2)]).unwrap();
        assert_eq!(m.num_edges(), 5);
        assert_eq!(m.adj_p2p(PolyId::new(0)), &[PolyId::new(1)]);
        m.validate_invariants().unwrap();
    }

    #[test]
    fn poly_add_rejects_bad_input_without_side_effects() {
        let mut m = fan();
        let before = (m.num_verts(), m.num_edges(), m.num_polys());
        assert_eq!(
            m.poly_add(&[v(0), v(1)]),
            Err(MeshError::DegeneratePoly { found: 2 })
        );
        assert_eq!(
            m.poly_add(&[v(0), v(1), v(1)]),
            Err(MeshError::RepeatedVertex { vid: v(1) })
        );
        assert!(matches!(
            m.poly_add(&[v(0), v(1), v(9)]),
            Err(MeshError::VertOutOfRange { .. })
        ));
        assert_eq!(before, (m.num_verts(), m.num_edges(), m.num_polys()));
    }

    #[test]
    fn poly_remove_drops_orphan_edges() {
        let mut m = fan();
        m.poly_remove(PolyId::new(0)).unwrap();
        assert_eq!(m.num_polys(), 3);
        // edge (1,2) is gone, spokes (0,1) and (0,2) survive
        assert_eq!(m.num_edges(), 7);
        assert!(m.edge_id(v(1), v(2)).is_none());
        m.validate_invariants().unwrap();
    }

    #[test]
    fn poly_remove_unreferenced_keeps_edges() {
        let mut m = fan();
        m.poly_remove_unreferenced(PolyId::new(0)).unwrap();
        assert_eq!(m.num_edges(), 8);
        let e = m.edge_id(v(1), v(2)).unwrap();
        assert!(m.adj_e2p(e).is_empty());
        m.edge_remove_unreferenced(e).unwrap();
        assert_eq!(m.num_edges(), 7);
        m.validate_invariants().unwrap();
    }

    #[test]
    fn edge_remove_takes_polys_with_it() {
        let mut m = fan();
        let e = m.edge_id(v(0), v(2)).unwrap();
        m.edge_remove(e).unwrap();
        assert_eq!(m.num_polys(), 2);
        assert!(m.edge_id(v(0), v(2)).is_none());
        m.validate_invariants().unwrap();
    }

    #[test]
    fn edge_remove_unreferenced_refuses_used_edge() {
        let mut m = fan();
        let e = m.edge_id(v(0), v(1)).unwrap();
        assert_eq!(
            m.edge_remove_unreferenced(e),
            Err(MeshError::EdgeStillReferenced { eid: e, count: 2 })
        );
    }

    #[test]
    fn vert_remove_unreferenced_refuses_used_vertex() {
        let mut m = fan();
        assert_eq!(
            m.vert_remove_unreferenced(v(0)),
            Err(MeshError::VertStillReferenced { vid: v(0), count: 4 })
        );
        let iso = m.vert_add(Vec3::splat(5.0));
        m.vert_remove_unreferenced(iso).unwrap();
        assert_eq!(m.num_verts(), 5);
    }

    #[test]
    fn vert_remove_relabels_last_vertex() {
        let mut m = fan();
        m.vert_remove(v(2)).unwrap();
        assert_eq!(m.num_verts(), 4);
        assert_eq!(m.num_polys(), 2);
        assert_eq!(m.vert(v(2)), Vec3::new(0.0, -1.0, 0.0));
        let mut nbrs = m.adj_v2v(v(2)).to_vec();
        nbrs.sort();
        assert_eq!(nbrs, vec![v(0), v(1), v(3)]);
        m.validate_invariants().unwrap();
    }

    #[test]
    fn dangling_edge_lifecycle() {
        let mut m = fan();
        let e = m.edge_add(v(1), v(3)).unwrap();
        assert_eq!(m.num_edges(), 9);
        assert_eq!(m.edge_add(v(3), v(1)).unwrap(), e);
        assert_eq!(m.edge_add(v(1), v(1)), Err(MeshError::SelfLoop { vid: v(1) }));
        m.validate_invariants().unwrap();
        m.edge_remove(e).unwrap();
        assert_eq!(m.num_edges(), 8);
        assert!(!m.adj_v2v(v(1)).contains(&v(3)));
    }

    #[test]
    fn switch_ids_are_involutions() {
        let mut m = fan();
        let reference = m.clone();
        m.vert_switch_id(v(0), v(4)).unwrap();
        m.validate_invariants().unwrap();
        assert_eq!(m.vert(v(4)), Vec3::ZERO);
        m.vert_switch_id(v(0), v(4)).unwrap();
        assert_eq!(m.vector_polys(), reference.vector_polys());

        m.edge_switch_id(EdgeId::new(0), EdgeId::new(7)).unwrap();
        m.validate_invariants().unwrap();
        m.poly_switch_id(PolyId::new(0), PolyId::new(3)).unwrap();
        m.validate_invariants().unwrap();
        assert_eq!(m.poly_verts(PolyId::new(0)), &[v(0), v(4), v(1)]);
    }

    #[test]
    fn flip_winding_keeps_p2e_order() {
        let mut m = Polygonmesh::<()>::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
            vec![vec![v(0), v(1), v(2), v(3)]],
        )
        .unwrap();
        let pid = PolyId::new(0);
        m.poly_flip_winding_order(pid).unwrap();
        assert_eq!(m.poly_verts(pid), &[v(3), v(2), v(1), v(0)]);
        assert!((m.poly_normal(pid) - Vec3::NEG_Z).length() < 1e-12);
        m.validate_invariants().unwrap();
    }

    #[test]
    fn normalize_area_scales_to_one() {
        let mut m = fan();
        m.normalize_area();
        assert!((m.mesh_area() - 1.0).abs() < 1e-12);
    }
}
