//! Per-polygon tessellation and normal caches.
//!
//! The caches are refreshed locally by the mutation engine; the `update_*`
//! methods are public so callers that edit positions in bulk can refresh once
//! at the end.

use super::SurfaceMesh;
use crate::geometry::metrics::triangle_area_vector;
use crate::geometry::tessellate::tessellate;
use crate::geometry::vec3::{normalize_or_zero, Vec3};
use crate::topology::ids::{PolyId, VertId};
use crate::topology::shape::ShapePolicy;

impl<S: ShapePolicy, V, E, P> SurfaceMesh<S, V, E, P> {
    /// Triangles of `pid` as vertex-id triples, `n - 2` of them.
    #[inline]
    pub fn poly_tessellation(&self, pid: PolyId) -> &[[VertId; 3]] {
        &self.p_tess[pid.idx()]
    }

    /// Unit normal of `pid`, or zero for a zero-area polygon.
    #[inline]
    pub fn poly_normal(&self, pid: PolyId) -> Vec3 {
        self.p_normal[pid.idx()]
    }

    /// Unit normal of `vid`, or zero for an isolated vertex.
    #[inline]
    pub fn vert_normal(&self, vid: VertId) -> Vec3 {
        self.v_normal[vid.idx()]
    }

    pub fn update_p_tessellation(&mut self, pid: PolyId) {
        let corners = &self.polys[pid.idx()];
        let points: Vec<Vec3> = corners.iter().map(|&v| self.verts[v.idx()]).collect();
        let tris = tessellate(&points, self.options.tessellation)
            .into_iter()
            .map(|[a, b, c]| [corners[a], corners[b], corners[c]])
            .collect();
        self.p_tess[pid.idx()] = tris;
    }

    /// Area-weighted average of the tessellation triangle normals.
    pub fn update_p_normal(&mut self, pid: PolyId) {
        let sum: Vec3 = self.p_tess[pid.idx()]
            .iter()
            .map(|&[a, b, c]| triangle_area_vector(self.vert(a), self.vert(b), self.vert(c)))
            .sum();
        self.p_normal[pid.idx()] = normalize_or_zero(sum);
    }

    /// Average of the incident polygon normals, weighted by corner angle.
    pub fn update_v_normal(&mut self, vid: VertId) {
        let sum: Vec3 = self.v2p[vid.idx()]
            .iter()
            .filter_map(|&pid| {
                let offset = self.poly_vert_offset(pid, vid)?;
                Some(self.corner_angle(pid, offset) * self.p_normal[pid.idx()])
            })
            .sum();
        self.v_normal[vid.idx()] = normalize_or_zero(sum);
    }

    pub fn update_p_tessellations(&mut self) {
        for pid in self.poly_ids() {
            self.update_p_tessellation(pid);
        }
    }

    pub fn update_p_normals(&mut self) {
        for pid in self.poly_ids() {
            self.update_p_normal(pid);
        }
    }

    pub fn update_v_normals(&mut self) {
        for vid in self.vert_ids() {
            self.update_v_normal(vid);
        }
    }

    /// Tessellations, then polygon normals, then vertex normals.
    pub fn update_normals(&mut self) {
        self.update_p_tessellations();
        self.update_p_normals();
        self.update_v_normals();
    }
}
