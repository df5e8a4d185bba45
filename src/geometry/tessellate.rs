//! Triangulation of a single polygon loop.
//!
//! Used for robust area and normal estimation of polygons and handed to
//! renderers as-is. The triangulation never changes mesh topology: it only
//! produces local corner-index triples.
//!
//! Convex loops (and triangles) get a fan from corner 0, so a planar quad
//! `[0, 1, 2, 3]` yields `[[0, 1, 2], [0, 2, 3]]`. Non-convex loops are
//! projected onto their Newell plane and ear-clipped.

use crate::geometry::metrics::newell_normal;
use crate::geometry::vec3::Vec3;

const EPS: f64 = 1e-12;

/// Strategy for polygons with more than three corners.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TessellationMode {
    /// Fan for convex loops, ear clipping otherwise.
    #[default]
    Auto,
    /// Always fan from corner 0.
    Fan,
}

/// Fan triangulation of an `n`-gon from corner 0.
pub fn fan(n: usize) -> Vec<[usize; 3]> {
    (1..n.saturating_sub(1)).map(|i| [0, i, i + 1]).collect()
}

/// Triangulates the loop `points`, returning local corner indices.
pub fn tessellate(points: &[Vec3], mode: TessellationMode) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    if n == 3 || mode == TessellationMode::Fan {
        return fan(n);
    }
    let Some(flat) = project_to_plane(points) else {
        return fan(n);
    };
    if is_convex(&flat) {
        fan(n)
    } else {
        ear_clip(&flat)
    }
}

/// Projects the loop onto its best-fit plane so that a counter-clockwise loop
/// (about its Newell normal) stays counter-clockwise in 2D.
fn project_to_plane(points: &[Vec3]) -> Option<Vec<[f64; 2]>> {
    let n = newell_normal(points).try_normalize()?;
    let u = n.any_orthonormal_vector();
    let v = n.cross(u);
    Some(points.iter().map(|p| [p.dot(u), p.dot(v)]).collect())
}

#[inline]
fn cross2(o: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

fn is_convex(flat: &[[f64; 2]]) -> bool {
    let n = flat.len();
    (0..n).all(|i| cross2(flat[(i + n - 1) % n], flat[i], flat[(i + 1) % n]) >= -EPS)
}

fn point_in_triangle(p: [f64; 2], a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> bool {
    cross2(a, b, p) >= -EPS && cross2(b, c, p) >= -EPS && cross2(c, a, p) >= -EPS
}

/// Ear clipping of a counter-clockwise simple polygon.
///
/// If no ear can be found (self-intersecting or degenerate input) the
/// remaining corners are fanned, so the result always has `n - 2` triangles.
fn ear_clip(flat: &[[f64; 2]]) -> Vec<[usize; 3]> {
    let mut left: Vec<usize> = (0..flat.len()).collect();
    let mut tris = Vec::with_capacity(flat.len() - 2);
    let mut i = 0usize;
    let mut misses = 0usize;

    while left.len() > 3 {
        let m = left.len();
        let (ia, ib, ic) = (left[(i + m - 1) % m], left[i % m], left[(i + 1) % m]);
        let (a, b, c) = (flat[ia], flat[ib], flat[ic]);

        let convex = cross2(a, b, c) > EPS;
        let empty = convex
            && left
                .iter()
                .filter(|&&j| j != ia && j != ib && j != ic)
                .all(|&j| !point_in_triangle(flat[j], a, b, c));

        if empty {
            tris.push([ia, ib, ic]);
            left.remove(i % m);
            misses = 0;
            if i >= left.len() {
                i = 0;
            }
        } else {
            i = (i + 1) % m;
            misses += 1;
            if misses > m {
                break;
            }
        }
    }

    if left.len() >= 3 {
        for [a, b, c] in fan(left.len()) {
            tris.push([left[a], left[b], left[c]]);
        }
    }
    tris
}
