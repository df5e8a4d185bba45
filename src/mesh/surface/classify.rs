//! Read-only topological classification of surface entities.

use super::SurfaceMesh;
use crate::geometry::vec3::{angle_between, TexChannel};
use crate::topology::ids::{EdgeId, PolyId, VertId};
use crate::topology::shape::ShapePolicy;

/// Critical point classification of a scalar field sampled at the vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CriticalPoint {
    Regular,
    Minimum,
    Maximum,
    Saddle,
}

impl<S: ShapePolicy, V, E, P> SurfaceMesh<S, V, E, P> {
    // ---------------------------------------------------------------------
    // Edges
    // ---------------------------------------------------------------------

    /// Exactly one incident polygon.
    #[inline]
    pub fn edge_is_boundary(&self, eid: EdgeId) -> bool {
        self.e2p[eid.idx()].len() == 1
    }

    /// Two incident polygons, or one if `boundaries_allowed`.
    pub fn edge_is_manifold(&self, eid: EdgeId, boundaries_allowed: bool) -> bool {
        match self.e2p[eid.idx()].len() {
            2 => true,
            1 => boundaries_allowed,
            _ => false,
        }
    }

    /// Angle between the normals of the two polygons sharing `eid`.
    pub fn edge_crease_angle(&self, eid: EdgeId) -> Option<f64> {
        match self.e2p[eid.idx()][..] {
            [p, q] => Some(angle_between(self.poly_normal(p), self.poly_normal(q))),
            _ => None,
        }
    }

    /// Whether some polygon is bounded by both edges.
    pub fn edges_share_poly(&self, e0: EdgeId, e1: EdgeId) -> bool {
        self.poly_shared(e0, e1).is_some()
    }

    /// A polygon bounded by both `e0` and `e1`.
    pub fn poly_shared(&self, e0: EdgeId, e1: EdgeId) -> Option<PolyId> {
        let other = &self.e2p[e1.idx()];
        self.e2p[e0.idx()].iter().copied().find(|p| other.contains(p))
    }

    /// Edges with more than two incident polygons.
    pub fn non_manifold_edges(&self) -> Vec<EdgeId> {
        self.edge_ids().filter(|&e| self.e2p[e.idx()].len() > 2).collect()
    }

    /// Edges with exactly one incident polygon, in id order.
    pub fn boundary_edges(&self) -> Vec<EdgeId> {
        self.edge_ids().filter(|&e| self.edge_is_boundary(e)).collect()
    }

    // ---------------------------------------------------------------------
    // Vertices
    // ---------------------------------------------------------------------

    pub fn vert_is_boundary(&self, vid: VertId) -> bool {
        self.v2e[vid.idx()].iter().any(|&e| self.edge_is_boundary(e))
    }

    /// No incident edge at all.
    pub fn vert_is_isolated(&self, vid: VertId) -> bool {
        self.v2e[vid.idx()].is_empty() && self.v2p[vid.idx()].is_empty()
    }

    pub fn vert_boundary_edges(&self, vid: VertId) -> Vec<EdgeId> {
        self.v2e[vid.idx()]
            .iter()
            .copied()
            .filter(|&e| self.edge_is_boundary(e))
            .collect()
    }

    /// Classifies `vid` against its ordered one-ring using the texture
    /// `channel` as scalar field.
    ///
    /// Neighbours with the same value as `vid` carry no sign and are skipped;
    /// extrema are strict. Sign changes are counted along the ring, plus the
    /// wrap-around pair when the ring is closed.
    ///
    /// `None` when the ring is undefined (isolated or non-manifold vertex,
    /// inconsistent winding) or has fewer than three vertices.
    pub fn vert_critical_point(&self, vid: VertId, channel: TexChannel) -> Option<CriticalPoint> {
        let ring = self.vert_ordered_one_ring(vid).ok()?;
        if ring.verts.len() < 3 {
            return None;
        }
        let f = channel.of(self.vert_uvw(vid));
        let signs: Vec<Option<bool>> = ring
            .verts
            .iter()
            .map(|&v| {
                let g = channel.of(self.vert_uvw(v));
                (g != f).then_some(g > f)
            })
            .collect();
        if signs.iter().all(|&s| s == Some(true)) {
            return Some(CriticalPoint::Minimum);
        }
        if signs.iter().all(|&s| s == Some(false)) {
            return Some(CriticalPoint::Maximum);
        }
        let above: Vec<bool> = signs.into_iter().flatten().collect();
        let mut changes = above.windows(2).filter(|w| w[0] != w[1]).count();
        if ring.closed && above.first() != above.last() {
            changes += 1;
        }
        Some(if changes >= 4 {
            CriticalPoint::Saddle
        } else {
            CriticalPoint::Regular
        })
    }

    /// At least four sign changes of `f(ring_i) - f(vid)` around the ring.
    pub fn vert_is_saddle(&self, vid: VertId, channel: TexChannel) -> Option<bool> {
        self.vert_critical_point(vid, channel)
            .map(|k| k == CriticalPoint::Saddle)
    }

    /// Local minimum, local maximum or saddle.
    pub fn vert_is_critical_p(&self, vid: VertId, channel: TexChannel) -> Option<bool> {
        self.vert_critical_point(vid, channel)
            .map(|k| k != CriticalPoint::Regular)
    }

    // ---------------------------------------------------------------------
    // Polygons
    // ---------------------------------------------------------------------

    /// Whether any edge of `pid` is a boundary edge.
    pub fn poly_is_boundary(&self, pid: PolyId) -> bool {
        self.p2e[pid.idx()].iter().any(|&e| self.edge_is_boundary(e))
    }

    /// An edge bounding both polygons.
    pub fn edge_shared(&self, p0: PolyId, p1: PolyId) -> Option<EdgeId> {
        let other = &self.p2e[p1.idx()];
        self.p2e[p0.idx()].iter().copied().find(|e| other.contains(e))
    }

    /// Adjacent in the p2p sense (through an edge shared by exactly two).
    pub fn polys_are_adjacent(&self, p0: PolyId, p1: PolyId) -> bool {
        self.p2p[p0.idx()].contains(&p1)
    }

    /// Polygons other than `pid` bounded by `eid`.
    pub fn polys_adjacent_along(&self, pid: PolyId, eid: EdgeId) -> Vec<PolyId> {
        self.e2p[eid.idx()]
            .iter()
            .copied()
            .filter(|&p| p != pid)
            .collect()
    }

    /// The polygon across manifold edge `eid` from `pid`.
    pub fn poly_opposite_to(&self, eid: EdgeId, pid: PolyId) -> Option<PolyId> {
        match self.e2p[eid.idx()][..] {
            [a, b] if a == pid => Some(b),
            [a, b] if b == pid => Some(a),
            _ => None,
        }
    }

    /// True if `curr` immediately follows `prev` in the corner loop of `pid`.
    pub fn poly_verts_are_ccw(&self, pid: PolyId, curr: VertId, prev: VertId) -> bool {
        let corners = &self.polys[pid.idx()];
        let n = corners.len();
        match corners.iter().position(|&v| v == prev) {
            Some(k) => corners[(k + 1) % n] == curr,
            None => false,
        }
    }

    // ---------------------------------------------------------------------
    // Global
    // ---------------------------------------------------------------------

    /// `V - E + F`.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_verts() as i64 - self.num_edges() as i64 + self.num_polys() as i64
    }

    /// No edge shared by more than two polygons.
    pub fn is_manifold(&self) -> bool {
        self.e2p.iter().all(|row| row.len() <= 2)
    }

    /// Every edge has at least two incident polygons.
    pub fn is_watertight(&self) -> bool {
        self.e2p.iter().all(|row| row.len() >= 2)
    }

    /// Genus of a closed manifold surface, `None` otherwise.
    ///
    /// Sums over connected components: `χ = 2·components - 2·genus`.
    pub fn genus(&self) -> Option<i64> {
        if self.polys.is_empty() || !self.is_watertight() || !self.is_manifold() {
            return None;
        }
        // isolated vertices would count as extra components of χ
        if self.vert_ids().any(|v| self.v2p[v.idx()].is_empty()) {
            return None;
        }
        let components = crate::algs::components::connected_components(self).len() as i64;
        Some((2 * components - self.euler_characteristic()) / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vec3::Vec3;
    use crate::mesh::surface::Trimesh;

    fn v(i: usize) -> VertId {
        VertId::new(i)
    }

    /// Square split into 4 triangles around a centre vertex.
    fn fan_with_field(values: [f64; 5]) -> Trimesh {
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
        let mut m = Trimesh::new(verts, polys).unwrap();
        for (i, f) in values.into_iter().enumerate() {
            m.vert_set_uvw(v(i), Vec3::new(f, 0.0, 0.0)).unwrap();
        }
        m
    }

    #[test]
    fn boundary_and_manifold_flags() {
        let m = fan_with_field([0.0; 5]);
        let spoke = m.edge_id(v(0), v(1)).unwrap();
        let rim = m.edge_id(v(1), v(2)).unwrap();
        assert!(!m.edge_is_boundary(spoke));
        assert!(m.edge_is_boundary(rim));
        assert!(m.edge_is_manifold(rim, true));
        assert!(!m.edge_is_manifold(rim, false));
        assert!(!m.vert_is_boundary(v(0)));
        assert!(m.vert_is_boundary(v(1)));
        assert_eq!(m.vert_boundary_edges(v(1)).len(), 2);
        assert_eq!(m.euler_characteristic(), 1);
        assert_eq!(m.edge_crease_angle(spoke), Some(0.0));
        assert_eq!(m.edge_crease_angle(rim), None);
        assert!(m.is_manifold());
        assert!(!m.is_watertight());
        assert_eq!(m.genus(), None);
    }

    #[test]
    fn polygon_relations() {
        let m = fan_with_field([0.0; 5]);
        let (p0, p1, p2) = (PolyId::new(0), PolyId::new(1), PolyId::new(2));
        let spoke = m.edge_id(v(0), v(2)).unwrap();
        assert_eq!(m.edge_shared(p0, p1), Some(spoke));
        assert_eq!(m.edge_shared(p0, p2), None);
        assert!(m.polys_are_adjacent(p0, p1));
        assert!(!m.polys_are_adjacent(p0, p2));
        assert_eq!(m.poly_opposite_to(spoke, p0), Some(p1));
        assert_eq!(m.polys_adjacent_along(p0, spoke), vec![p1]);
        assert!(m.poly_verts_are_ccw(p0, v(2), v(1)));
        assert!(!m.poly_verts_are_ccw(p0, v(1), v(2)));
        let rim = m.edge_id(v(1), v(2)).unwrap();
        assert_eq!(m.poly_shared(spoke, rim), Some(p0));
        assert!(m.poly_is_boundary(p0));
    }

    #[test]
    fn saddle_needs_four_sign_changes() {
        let m = fan_with_field([0.0, 1.0, -1.0, 1.0, -1.0]);
        assert_eq!(m.vert_is_saddle(v(0), TexChannel::U), Some(true));
        assert_eq!(m.vert_critical_point(v(0), TexChannel::U), Some(CriticalPoint::Saddle));

        let m = fan_with_field([0.0, 1.0, 1.0, -1.0, -1.0]);
        assert_eq!(m.vert_is_saddle(v(0), TexChannel::U), Some(false));
        assert_eq!(m.vert_is_critical_p(v(0), TexChannel::U), Some(false));

        let m = fan_with_field([-1.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(m.vert_critical_point(v(0), TexChannel::U), Some(CriticalPoint::Minimum));
        assert_eq!(m.vert_is_critical_p(v(0), TexChannel::U), Some(true));
    }

    #[test]
    fn ties_carry_no_sign() {
        // ring values 1, 0, 1, 0 around f = 0: only two positive samples
        let m = fan_with_field([0.0, 1.0, 0.0, 1.0, 0.0]);
        assert_eq!(m.vert_is_saddle(v(0), TexChannel::U), Some(false));
        assert_eq!(m.vert_critical_point(v(0), TexChannel::U), Some(CriticalPoint::Regular));

        // a tie between two opposite signs still counts as one change
        let m = fan_with_field([0.0, 1.0, 0.0, -1.0, 0.0]);
        assert_eq!(m.vert_critical_point(v(0), TexChannel::U), Some(CriticalPoint::Regular));

        // extrema are strict
        let m = fan_with_field([0.0, 1.0, 1.0, 0.0, 1.0]);
        assert_eq!(m.vert_is_critical_p(v(0), TexChannel::U), Some(false));
    }

    #[test]
    fn open_rings_do_not_wrap() {
        // half fan: boundary vertex 0 with ring 1, 2, 3, 4
        let verts = vec![
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
        ];
        let polys = vec![
            vec![v(0), v(1), v(2)],
            vec![v(0), v(2), v(3)],
            vec![v(0), v(3), v(4)],
        ];
        let mut m = Trimesh::<()>::new(verts, polys).unwrap();
        for (i, f) in [0.0, 1.0, -1.0, 1.0, -1.0].into_iter().enumerate() {
            m.vert_set_uvw(v(i), Vec3::new(f, 0.0, 0.0)).unwrap();
        }
        assert!(!m.vert_ordered_one_ring(v(0)).unwrap().closed);
        // three changes along the ring; the wrap pair would make it four
        assert_eq!(m.vert_is_saddle(v(0), TexChannel::U), Some(false));
    }

    #[test]
    fn saddle_undefined_for_small_rings() {
        // boundary corner of a single triangle: ring of two vertices
        let m = Trimesh::<()>::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![vec![v(0), v(1), v(2)]],
        )
        .unwrap();
        assert_eq!(m.vert_is_saddle(v(0), TexChannel::U), None);
    }
}
