//! Measure kernel: closed-form formulas for triangles and tetrahedra.
//!
//! The reference tetrahedron uses the vertex ordering `[v0, v1, v2, v3]` with
//! positive signed volume `(v1-v0)·((v2-v0)×(v3-v0)) / 6`. For such a
//! tetrahedron the faces in [`TET_FACES`] are wound counter-clockwise when
//! seen from outside, and face `i` is opposite vertex [`TET_FACE_OPPOSITE`]`[i]`.
//!
//! Degenerate input never panics: zero-area triangles have a zero normal and
//! barycentric queries on flat elements return `None`.

use crate::geometry::vec3::{Vec3, angle_between, normalize_or_zero};

const EPS: f64 = 1e-12;

/// Outward-facing triangles of a positively oriented tetrahedron.
pub const TET_FACES: [[usize; 3]; 4] = [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
/// Local vertex opposite each entry of [`TET_FACES`].
pub const TET_FACE_OPPOSITE: [usize; 4] = [3, 2, 1, 0];
/// The six edges of a tetrahedron as local vertex pairs.
pub const TET_EDGES: [[usize; 2]; 6] = [[0, 1], [1, 2], [2, 0], [0, 3], [1, 3], [2, 3]];
/// For each entry of [`TET_FACES`], the [`TET_EDGES`] index of its sides
/// `(f0, f1)`, `(f1, f2)`, `(f2, f0)`.
pub const TET_FACE_EDGES: [[usize; 3]; 4] = [[2, 1, 0], [0, 4, 3], [3, 5, 2], [1, 5, 4]];
/// [`TET_EDGES`] index of the edge sharing no vertex with each edge.
pub const TET_EDGE_OPPOSITE: [usize; 6] = [5, 3, 4, 1, 2, 0];

/// Area vector of a triangle (direction = normal, length = twice the area).
#[inline]
pub fn triangle_area_vector(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a)
}

#[inline]
pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f64 {
    0.5 * triangle_area_vector(a, b, c).length()
}

/// Unit normal of a counter-clockwise triangle, or zero if degenerate.
#[inline]
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    normalize_or_zero(triangle_area_vector(a, b, c))
}

/// Newell area vector of a closed polygon loop.
///
/// For planar loops its length is twice the polygon area; for non-planar
/// loops it is the best-fit plane normal scaled by the projected area.
pub fn newell_normal(points: &[Vec3]) -> Vec3 {
    let n = points.len();
    let mut acc = Vec3::ZERO;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        acc.x += (p.y - q.y) * (p.z + q.z);
        acc.y += (p.z - q.z) * (p.x + q.x);
        acc.z += (p.x - q.x) * (p.y + q.y);
    }
    acc
}

/// Barycentric coordinates of `p` with respect to triangle `(a, b, c)`.
///
/// `p` is projected onto the triangle's plane. Returns `None` for degenerate
/// triangles.
pub fn triangle_bary_coords(a: Vec3, b: Vec3, c: Vec3, p: Vec3) -> Option<[f64; 3]> {
    let n = triangle_area_vector(a, b, c);
    let area2 = n.length_squared();
    if area2 <= EPS * EPS {
        return None;
    }
    let wa = triangle_area_vector(b, c, p).dot(n) / area2;
    let wb = triangle_area_vector(c, a, p).dot(n) / area2;
    Some([wa, wb, 1.0 - wa - wb])
}

/// Signed volume of tetrahedron `(a, b, c, d)`; positive when `d` lies on the
/// side of `(a, b, c)` that `(b-a)×(c-a)` points to.
#[inline]
pub fn tet_signed_volume(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> f64 {
    (b - a).dot((c - a).cross(d - a)) / 6.0
}

#[inline]
pub fn tet_volume(v: &[Vec3; 4]) -> f64 {
    tet_signed_volume(v[0], v[1], v[2], v[3]).abs()
}

/// Outward unit normal of local face `face` (see [`TET_FACES`]).
///
/// The result is outward regardless of the tetrahedron's orientation.
pub fn tet_face_normal(v: &[Vec3; 4], face: usize) -> Vec3 {
    let [i, j, k] = TET_FACES[face];
    let n = triangle_normal(v[i], v[j], v[k]);
    if tet_signed_volume(v[0], v[1], v[2], v[3]) < 0.0 {
        -n
    } else {
        n
    }
}

pub fn tet_face_area(v: &[Vec3; 4], face: usize) -> f64 {
    let [i, j, k] = TET_FACES[face];
    triangle_area(v[i], v[j], v[k])
}

/// Interior dihedral angle (radians) between two local faces.
pub fn tet_dihedral_angle(v: &[Vec3; 4], face0: usize, face1: usize) -> f64 {
    let n0 = tet_face_normal(v, face0);
    let n1 = tet_face_normal(v, face1);
    std::f64::consts::PI - angle_between(n0, n1)
}

/// Barycentric coordinates of `p` in the tetrahedron, or `None` if it is flat.
pub fn tet_bary_coords(v: &[Vec3; 4], p: Vec3) -> Option<[f64; 4]> {
    let vol = tet_signed_volume(v[0], v[1], v[2], v[3]);
    if vol.abs() <= EPS {
        return None;
    }
    let w0 = tet_signed_volume(p, v[1], v[2], v[3]) / vol;
    let w1 = tet_signed_volume(v[0], p, v[2], v[3]) / vol;
    let w2 = tet_signed_volume(v[0], v[1], p, v[3]) / vol;
    Some([w0, w1, w2, 1.0 - w0 - w1 - w2])
}

/// True if every weight is within `[-tol, 1 + tol]`.
pub fn bary_is_inside(weights: &[f64], tol: f64) -> bool {
    weights.iter().all(|&w| w >= -tol && w <= 1.0 + tol)
}
