//! Angularly ordered one-rings and boundary loops.
//!
//! The one-ring walk relies on the `p2e` ordering: entry `k` of a polygon's
//! edge row joins corners `k` and `k + 1`. For a vertex at corner `k` the
//! polygon is entered through its *leading* spoke `p2e[k]` (towards the next
//! corner) and left through its *trailing* spoke `p2e[k - 1]` (from the
//! previous corner). The walk crosses each trailing spoke into the polygon on
//! the other side, which must lead with the same spoke.

use hashbrown::{HashMap, HashSet};

use super::SurfaceMesh;
use crate::mesh_error::RingError;
use crate::topology::ids::{EdgeId, PolyId, VertId};
use crate::topology::shape::ShapePolicy;

/// Star of a vertex in winding order.
///
/// For an interior vertex the fan is closed and `verts`, `polys` and `edges`
/// have the same length. For a boundary vertex the walk starts at one boundary
/// spoke and ends at the other, so `edges.len() == polys.len() + 1`. In both
/// cases `verts[i]` is the far endpoint of `edges[i]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderedRing {
    pub verts: Vec<VertId>,
    pub polys: Vec<PolyId>,
    pub edges: Vec<EdgeId>,
    /// Edges of the ring polygons not touching the centre, in walk order.
    pub link: Vec<EdgeId>,
    pub closed: bool,
}

/// A chain of boundary edges, oriented like the polygons they bound.
///
/// Closed loops have as many vertices as edges; open chains (only possible
/// around non-manifold configurations) have one more vertex than edges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundaryLoop {
    pub verts: Vec<VertId>,
    pub edges: Vec<EdgeId>,
    pub closed: bool,
}

/// Corner data of one polygon around the centre vertex.
#[derive(Clone, Copy)]
struct Corner {
    offset: usize,
    next: VertId,
    prev: VertId,
    lead: EdgeId,
    trail: EdgeId,
}

impl<S: ShapePolicy, V, E, P> SurfaceMesh<S, V, E, P> {
    fn corner(&self, pid: PolyId, vid: VertId) -> Option<Corner> {
        let corners = &self.polys[pid.idx()];
        let n = corners.len();
        let offset = corners.iter().position(|&v| v == vid)?;
        let edges = &self.p2e[pid.idx()];
        Some(Corner {
            offset,
            next: corners[(offset + 1) % n],
            prev: corners[(offset + n - 1) % n],
            lead: edges[offset],
            trail: edges[(offset + n - 1) % n],
        })
    }

    /// Walks the polygons around `vid` in winding order.
    pub fn vert_ordered_one_ring(&self, vid: VertId) -> Result<OrderedRing, RingError> {
        let incident = &self.v2p[vid.idx()];
        if incident.is_empty() {
            return Err(RingError::Isolated(vid));
        }

        let mut boundary_spokes = Vec::new();
        for &eid in &self.v2e[vid.idx()] {
            match self.e2p[eid.idx()].len() {
                1 => boundary_spokes.push(eid),
                n if n > 2 => return Err(RingError::NonManifoldEdge { vid, eid }),
                // dangling spokes do not belong to the fan
                _ => {}
            }
        }

        let corner_of = |pid: PolyId| self.corner(pid, vid).ok_or(RingError::Isolated(vid));

        let start = match boundary_spokes[..] {
            [] => incident[0],
            [e0, e1] => {
                let (p0, p1) = (self.e2p[e0.idx()][0], self.e2p[e1.idx()][0]);
                if corner_of(p0)?.lead == e0 {
                    p0
                } else if corner_of(p1)?.lead == e1 {
                    p1
                } else {
                    return Err(RingError::InconsistentWinding { vid, p0, p1 });
                }
            }
            _ => {
                return Err(RingError::TooManyBoundaryEdges {
                    vid,
                    count: boundary_spokes.len(),
                })
            }
        };

        let mut ring = OrderedRing::default();
        let mut visited: HashSet<PolyId> = HashSet::with_capacity(incident.len());
        let mut cur = start;
        loop {
            let c = corner_of(cur)?;
            ring.verts.push(c.next);
            ring.edges.push(c.lead);
            ring.polys.push(cur);
            visited.insert(cur);
            let row = &self.p2e[cur.idx()];
            let n = row.len();
            ring.link.extend((1..n - 1).map(|i| row[(c.offset + i) % n]));

            let across = self.e2p[c.trail.idx()]
                .iter()
                .copied()
                .find(|&p| p != cur);
            let Some(q) = across else {
                ring.verts.push(c.prev);
                ring.edges.push(c.trail);
                ring.closed = false;
                break;
            };
            if corner_of(q)?.next != c.prev {
                return Err(RingError::InconsistentWinding { vid, p0: cur, p1: q });
            }
            if q == start {
                ring.closed = true;
                break;
            }
            if visited.contains(&q) {
                return Err(RingError::NotASingleFan {
                    vid,
                    walked: ring.polys.len(),
                    total: incident.len(),
                });
            }
            cur = q;
        }

        if ring.polys.len() != incident.len() {
            return Err(RingError::NotASingleFan {
                vid,
                walked: ring.polys.len(),
                total: incident.len(),
            });
        }
        Ok(ring)
    }

    pub fn vert_ordered_vert_ring(&self, vid: VertId) -> Result<Vec<VertId>, RingError> {
        Ok(self.vert_ordered_one_ring(vid)?.verts)
    }

    pub fn vert_ordered_poly_ring(&self, vid: VertId) -> Result<Vec<PolyId>, RingError> {
        Ok(self.vert_ordered_one_ring(vid)?.polys)
    }

    pub fn vert_ordered_edge_ring(&self, vid: VertId) -> Result<Vec<EdgeId>, RingError> {
        Ok(self.vert_ordered_one_ring(vid)?.edges)
    }

    pub fn vert_ordered_edge_link(&self, vid: VertId) -> Result<Vec<EdgeId>, RingError> {
        Ok(self.vert_ordered_one_ring(vid)?.link)
    }

    /// Chains every boundary edge into loops.
    ///
    /// Each boundary edge is oriented as in its polygon, so loops run with the
    /// mesh winding. Where several loops touch at a vertex the walk takes the
    /// lowest-id unused edge; a loop is closed as soon as it returns to its
    /// first vertex.
    pub fn boundary_loops(&self) -> Vec<BoundaryLoop> {
        let mut outgoing: HashMap<VertId, Vec<(VertId, EdgeId)>> = HashMap::new();
        let mut in_degree: HashMap<VertId, usize> = HashMap::new();
        let mut half_edges = Vec::new();
        for eid in self.boundary_edges() {
            let pid = self.e2p[eid.idx()][0];
            let Some(k) = self.p2e[pid.idx()].iter().position(|&e| e == eid) else {
                continue;
            };
            let corners = &self.polys[pid.idx()];
            let (tail, head) = (corners[k], corners[(k + 1) % corners.len()]);
            outgoing.entry(tail).or_default().push((head, eid));
            *in_degree.entry(head).or_default() += 1;
            half_edges.push((tail, head, eid));
        }

        // open chains first, from tails nothing flows into
        let mut starts: Vec<(VertId, VertId, EdgeId)> = half_edges
            .iter()
            .copied()
            .filter(|(tail, _, _)| !in_degree.contains_key(tail))
            .collect();
        starts.extend(half_edges.iter().copied());

        let mut used: HashSet<EdgeId> = HashSet::with_capacity(half_edges.len());
        let mut loops = Vec::new();
        for (first, head, eid) in starts {
            if used.contains(&eid) {
                continue;
            }
            let mut lp = BoundaryLoop::default();
            let (mut tail, mut head, mut edge) = (first, head, eid);
            loop {
                used.insert(edge);
                lp.verts.push(tail);
                lp.edges.push(edge);
                if head == first {
                    lp.closed = true;
                    break;
                }
                let next = outgoing
                    .get(&head)
                    .and_then(|out| out.iter().find(|(_, e)| !used.contains(e)));
                match next {
                    Some(&(h, e)) => {
                        tail = head;
                        head = h;
                        edge = e;
                    }
                    None => {
                        lp.verts.push(head);
                        break;
                    }
                }
            }
            loops.push(lp);
        }
        loops
    }

    /// Vertices of every boundary loop, loop after loop.
    pub fn get_boundary_vertices(&self) -> Vec<VertId> {
        self.boundary_loops()
            .into_iter()
            .flat_map(|lp| lp.verts)
            .collect()
    }

    /// Boundary edges as oriented vertex pairs, loop after loop.
    pub fn get_boundary_edges(&self) -> Vec<(VertId, VertId)> {
        let mut out = Vec::new();
        for lp in self.boundary_loops() {
            let n = lp.verts.len();
            for i in 0..lp.edges.len() {
                out.push((lp.verts[i], lp.verts[(i + 1) % n]));
            }
        }
        out
    }
}
