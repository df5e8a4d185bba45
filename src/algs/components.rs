//! Connected components over the top-level entity tier.
//!
//! Two polygons (cells) are connected when they are `adj_poly2poly` neighbours:
//! polygons sharing a manifold edge, or cells sharing a face. Components
//! therefore split along non-manifold edges and faces.

use std::collections::VecDeque;

use crate::mesh::polytope::MeshTopology;
use crate::topology::ids::EntityId;

/// Component label per polygon (cell), numbered in order of the lowest id in
/// each component. Returns the labels and the number of components.
pub fn component_labels<M: MeshTopology>(mesh: &M) -> (Vec<usize>, usize) {
    let n = mesh.num_polys();
    let mut label = vec![usize::MAX; n];
    let mut count = 0;
    let mut queue = VecDeque::new();
    for seed in 0..n {
        if label[seed] != usize::MAX {
            continue;
        }
        label[seed] = count;
        queue.push_back(M::Poly::from_idx(seed));
        while let Some(p) = queue.pop_front() {
            for &q in mesh.adj_poly2poly(p) {
                if label[q.idx()] == usize::MAX {
                    label[q.idx()] = count;
                    queue.push_back(q);
                }
            }
        }
        count += 1;
    }
    (label, count)
}

/// Polygons (cells) grouped by component, each group in ascending id order.
pub fn connected_components<M: MeshTopology>(mesh: &M) -> Vec<Vec<M::Poly>> {
    let (label, count) = component_labels(mesh);
    let mut groups = vec![Vec::new(); count];
    for (i, &c) in label.iter().enumerate() {
        groups[c].push(M::Poly::from_idx(i));
    }
    groups
}

/// Polygons (cells) reachable from `seed` without crossing an adjacency for
/// which `blocked(from, to)` holds. Returned in breadth-first order.
pub fn flood_fill<M, F>(mesh: &M, seed: M::Poly, blocked: F) -> Vec<M::Poly>
where
    M: MeshTopology,
    F: Fn(M::Poly, M::Poly) -> bool,
{
    let mut seen = vec![false; mesh.num_polys()];
    let mut out = Vec::new();
    let mut queue = VecDeque::from([seed]);
    seen[seed.idx()] = true;
    while let Some(p) = queue.pop_front() {
        out.push(p);
        for &q in mesh.adj_poly2poly(p) {
            if !seen[q.idx()] && !blocked(p, q) {
                seen[q.idx()] = true;
                queue.push_back(q);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vec3::Vec3;
    use crate::mesh::surface::Trimesh;
    use crate::topology::ids::{PolyId, VertId};

    fn v(i: usize) -> VertId {
        VertId::new(i)
    }

    fn two_islands() -> Trimesh {
        let off = Vec3::new(5.0, 0.0, 0.0);
        let verts = vec![
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Vec3::ONE,
            off,
            off + Vec3::X,
            off + Vec3::Y,
        ];
        let polys = vec![
            vec![v(0), v(1), v(2)],
            vec![v(4), v(5), v(6)],
            vec![v(1), v(3), v(2)],
        ];
        Trimesh::new(verts, polys).unwrap()
    }

    #[test]
    fn labels_follow_lowest_id() {
        let m = two_islands();
        let (labels, count) = component_labels(&m);
        assert_eq!(count, 2);
        assert_eq!(labels, vec![0, 1, 0]);
        let groups = connected_components(&m);
        assert_eq!(groups[0], vec![PolyId::new(0), PolyId::new(2)]);
        assert_eq!(groups[1], vec![PolyId::new(1)]);
    }

    #[test]
    fn flood_fill_respects_blocker() {
        let m = two_islands();
        let all = flood_fill(&m, PolyId::new(0), |_, _| false);
        assert_eq!(all, vec![PolyId::new(0), PolyId::new(2)]);
        let alone = flood_fill(&m, PolyId::new(0), |_, q| q == PolyId::new(2));
        assert_eq!(alone, vec![PolyId::new(0)]);
    }
}
