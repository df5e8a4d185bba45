//! Areas, lengths, angles and volumes of surface meshes.

use super::SurfaceMesh;
use crate::geometry::bbox::Bbox;
use crate::geometry::metrics::{bary_is_inside, triangle_area, triangle_bary_coords};
use crate::geometry::vec3::{angle_between, AngleUnit, Vec3};
use crate::topology::ids::{EdgeId, PolyId, VertId};
use crate::topology::shape::ShapePolicy;

impl<S: ShapePolicy, V, E, P> SurfaceMesh<S, V, E, P> {
    // ---------------------------------------------------------------------
    // Edges
    // ---------------------------------------------------------------------

    pub fn edge_length(&self, eid: EdgeId) -> f64 {
        let [a, b] = self.edges.get(eid);
        self.vert(a).distance(self.vert(b))
    }

    pub fn edge_avg_length(&self) -> f64 {
        if self.edges.is_empty() {
            return 0.0;
        }
        self.edge_ids().map(|e| self.edge_length(e)).sum::<f64>() / self.edges.len() as f64
    }

    pub fn edge_min_length(&self) -> f64 {
        self.edge_ids()
            .map(|e| self.edge_length(e))
            .fold(f64::INFINITY, f64::min)
    }

    pub fn edge_max_length(&self) -> f64 {
        self.edge_ids().map(|e| self.edge_length(e)).fold(0.0, f64::max)
    }

    // ---------------------------------------------------------------------
    // Polygons
    // ---------------------------------------------------------------------

    /// Sum of the tessellation triangle areas.
    pub fn poly_area(&self, pid: PolyId) -> f64 {
        self.p_tess[pid.idx()]
            .iter()
            .map(|&[a, b, c]| triangle_area(self.vert(a), self.vert(b), self.vert(c)))
            .sum()
    }

    #[inline]
    pub fn poly_mass(&self, pid: PolyId) -> f64 {
        self.poly_area(pid)
    }

    pub fn poly_perimeter(&self, pid: PolyId) -> f64 {
        self.p2e[pid.idx()].iter().map(|&e| self.edge_length(e)).sum()
    }

    /// Average of the corner positions.
    pub fn poly_centroid(&self, pid: PolyId) -> Vec3 {
        let corners = &self.polys[pid.idx()];
        corners.iter().map(|&v| self.vert(v)).sum::<Vec3>() / corners.len() as f64
    }

    /// Interior angle of `pid` at corner `vid`, or `None` if `vid` is not a
    /// corner of `pid`.
    pub fn poly_angle_at_vert(&self, pid: PolyId, vid: VertId, unit: AngleUnit) -> Option<f64> {
        let offset = self.poly_vert_offset(pid, vid)?;
        Some(unit.from_rad(self.corner_angle(pid, offset)))
    }

    /// Angle in radians at corner `offset` of `pid`.
    pub(crate) fn corner_angle(&self, pid: PolyId, offset: usize) -> f64 {
        let corners = &self.polys[pid.idx()];
        let n = corners.len();
        let here = self.vert(corners[offset]);
        let next = self.vert(corners[(offset + 1) % n]);
        let prev = self.vert(corners[(offset + n - 1) % n]);
        angle_between(next - here, prev - here)
    }

    /// Barycentric coordinates of `p` with respect to the corners of `pid`.
    ///
    /// The point is located in the tessellation triangle that contains its
    /// projection; weights of the corners outside that triangle are zero.
    /// Returns `None` if no triangle contains the point or the polygon is
    /// degenerate.
    pub fn poly_bary_coords(&self, pid: PolyId, p: Vec3) -> Option<Vec<f64>> {
        let corners = &self.polys[pid.idx()];
        for &[a, b, c] in &self.p_tess[pid.idx()] {
            let Some(w) = triangle_bary_coords(self.vert(a), self.vert(b), self.vert(c), p) else {
                continue;
            };
            if !bary_is_inside(&w, 1e-9) {
                continue;
            }
            let mut out = vec![0.0; corners.len()];
            for (vid, weight) in [a, b, c].into_iter().zip(w) {
                if let Some(k) = corners.iter().position(|&x| x == vid) {
                    out[k] = weight;
                }
            }
            return Some(out);
        }
        None
    }

    // ---------------------------------------------------------------------
    // Vertices
    // ---------------------------------------------------------------------

    /// Share of the incident polygon areas owned by `vid` (each polygon split
    /// evenly among its corners).
    pub fn vert_area(&self, vid: VertId) -> f64 {
        self.v2p[vid.idx()]
            .iter()
            .map(|&p| self.poly_area(p) / self.verts_per_poly(p) as f64)
            .sum()
    }

    #[inline]
    pub fn vert_mass(&self, vid: VertId) -> f64 {
        self.vert_area(vid)
    }

    // ---------------------------------------------------------------------
    // Mesh aggregates
    // ---------------------------------------------------------------------

    pub fn bbox(&self) -> Bbox {
        *self
            .aggregates
            .bbox
            .get_or_init(|| Bbox::from_points(self.verts.iter()))
    }

    pub fn mesh_area(&self) -> f64 {
        *self
            .aggregates
            .area
            .get_or_init(|| self.poly_ids().map(|p| self.poly_area(p)).sum())
    }

    /// Enclosed volume, from signed tetrahedra against the origin.
    ///
    /// `None` when the surface has a boundary, a non-manifold edge or no
    /// polygon at all.
    pub fn mesh_volume(&self) -> Option<f64> {
        if self.polys.is_empty() || !self.is_watertight() || !self.is_manifold() {
            return None;
        }
        let six_vol: f64 = self
            .p_tess
            .iter()
            .flatten()
            .map(|&[a, b, c]| self.vert(a).dot(self.vert(b).cross(self.vert(c))))
            .sum();
        Some(six_vol / 6.0)
    }
}
