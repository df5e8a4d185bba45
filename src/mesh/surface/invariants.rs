//! Full consistency check of the surface tables against the primal arrays.

use itertools::Itertools;

use super::{check_loop, SurfaceMesh};
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::ids::PolyId;
use crate::topology::shape::ShapePolicy;

macro_rules! ensure {
    ($cond:expr, $($fmt:tt)*) => {
        if !$cond {
            return Err(MeshError::InvariantViolation(format!($($fmt)*)));
        }
    };
}

impl<S: ShapePolicy, V, E, P> SurfaceMesh<S, V, E, P> {
    fn check_sizes(&self) -> Result<(), MeshError> {
        let nv = self.verts.len();
        for (name, len) in [
            ("v_uvw", self.v_uvw.len()),
            ("v_normal", self.v_normal.len()),
            ("v_data", self.v_data.len()),
            ("v2v", self.v2v.len()),
            ("v2e", self.v2e.len()),
            ("v2p", self.v2p.len()),
        ] {
            ensure!(len == nv, "{name} has {len} rows for {nv} vertices");
        }
        let ne = self.edges.len();
        for (name, len) in [("e2p", self.e2p.len()), ("e_data", self.e_data.len())] {
            ensure!(len == ne, "{name} has {len} rows for {ne} edges");
        }
        let np = self.polys.len();
        for (name, len) in [
            ("p_data", self.p_data.len()),
            ("p_normal", self.p_normal.len()),
            ("p_tess", self.p_tess.len()),
            ("p2e", self.p2e.len()),
            ("p2p", self.p2p.len()),
        ] {
            ensure!(len == np, "{name} has {len} rows for {np} polygons");
        }
        Ok(())
    }

    fn check_edges(&self) -> Result<(), MeshError> {
        ensure!(self.edges.is_consistent(), "edge lookup out of sync with edge array");
        let nv = self.verts.len();
        for (eid, [a, b]) in self.edges.iter() {
            ensure!(a != b, "edge {eid} is a self loop at {a}");
            ensure!(
                a.idx() < nv && b.idx() < nv,
                "edge {eid} references a vertex out of range"
            );
            for (x, y) in [(a, b), (b, a)] {
                ensure!(
                    self.v2e[x.idx()].contains(&eid),
                    "v2e[{x}] is missing edge {eid}"
                );
                ensure!(self.v2v[x.idx()].contains(&y), "v2v[{x}] is missing {y}");
            }
        }
        for vid in self.vert_ids() {
            for &eid in &self.v2e[vid.idx()] {
                ensure!(eid.idx() < self.edges.len(), "v2e[{vid}] lists unknown edge {eid}");
                ensure!(
                    self.edge_contains_vert(eid, vid),
                    "v2e[{vid}] lists edge {eid} not touching it"
                );
            }
            ensure!(
                self.v2e[vid.idx()].iter().all_unique(),
                "v2e[{vid}] has duplicates"
            );
            for &u in &self.v2v[vid.idx()] {
                ensure!(
                    self.edges.find([vid, u]).is_some(),
                    "v2v[{vid}] lists {u} without an edge"
                );
            }
            ensure!(
                self.v2v[vid.idx()].len() == self.v2e[vid.idx()].len(),
                "v2v[{vid}] and v2e[{vid}] disagree in size"
            );
        }
        Ok(())
    }

    fn check_polys(&self) -> Result<(), MeshError> {
        let nv = self.verts.len();
        let mut incidence = 0usize;
        for pid in self.poly_ids() {
            let corners = &self.polys[pid.idx()];
            check_loop::<S>(corners, nv)
                .map_err(|e| MeshError::InvariantViolation(format!("polygon {pid}: {e}")))?;
            incidence += corners.len();

            let row = &self.p2e[pid.idx()];
            ensure!(row.len() == corners.len(), "p2e[{pid}] has wrong length");
            for (k, (a, b)) in corners.iter().copied().circular_tuple_windows().enumerate() {
                let eid = self.edges.find([a, b]);
                ensure!(
                    eid == Some(row[k]),
                    "p2e[{pid}][{k}] is not the edge ({a}, {b})"
                );
                ensure!(
                    self.e2p[row[k].idx()].contains(&pid),
                    "e2p[{}] is missing polygon {pid}",
                    row[k]
                );
            }
            for &v in corners {
                ensure!(
                    self.v2p[v.idx()].contains(&pid),
                    "v2p[{v}] is missing polygon {pid}"
                );
            }

            let expected: Vec<PolyId> = self.p2p_row(pid).into_iter().sorted().collect();
            let actual: Vec<PolyId> = self.p2p[pid.idx()].iter().copied().sorted().collect();
            ensure!(
                expected == actual,
                "p2p[{pid}] is {actual:?}, expected {expected:?}"
            );

            let tris = &self.p_tess[pid.idx()];
            ensure!(
                tris.len() == corners.len() - 2,
                "polygon {pid} has {} tessellation triangles",
                tris.len()
            );
            ensure!(
                tris.iter().flatten().all(|v| corners.contains(v)),
                "tessellation of {pid} references a foreign vertex"
            );
        }

        let e2p_total: usize = self.e2p.iter().map(Vec::len).sum();
        ensure!(
            e2p_total == incidence,
            "e2p holds {e2p_total} entries for {incidence} polygon sides"
        );
        let v2p_total: usize = self.v2p.iter().map(Vec::len).sum();
        ensure!(
            v2p_total == incidence,
            "v2p holds {v2p_total} entries for {incidence} polygon corners"
        );
        for eid in self.edge_ids() {
            for &pid in &self.e2p[eid.idx()] {
                ensure!(pid.idx() < self.polys.len(), "e2p[{eid}] lists unknown polygon {pid}");
                ensure!(
                    self.p2e[pid.idx()].contains(&eid),
                    "e2p[{eid}] lists {pid} which does not use it"
                );
            }
        }
        for vid in self.vert_ids() {
            for &pid in &self.v2p[vid.idx()] {
                ensure!(pid.idx() < self.polys.len(), "v2p[{vid}] lists unknown polygon {pid}");
                ensure!(
                    self.polys[pid.idx()].contains(&vid),
                    "v2p[{vid}] lists {pid} which does not use it"
                );
            }
        }
        Ok(())
    }
}

impl<S: ShapePolicy, V, E, P> DebugInvariants for SurfaceMesh<S, V, E, P> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "SurfaceMesh");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        self.check_sizes()?;
        self.check_edges()?;
        self.check_polys()
    }
}
