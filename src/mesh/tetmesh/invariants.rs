//! Consistency check of the tetmesh tables against the cell array.

use itertools::Itertools;

use super::{check_tet, Tetmesh};
use crate::debug_invariants::DebugInvariants;
use crate::geometry::metrics::{TET_EDGES, TET_FACES};
use crate::mesh_error::MeshError;
use crate::topology::ids::EntityId;

macro_rules! ensure {
    ($cond:expr, $($fmt:tt)*) => {
        if !$cond {
            return Err(MeshError::InvariantViolation(format!($($fmt)*)));
        }
    };
}

/// Same entries, any order.
fn same_set<I: EntityId>(a: &[I], b: &[I]) -> bool {
    a.len() == b.len() && a.iter().copied().sorted().eq(b.iter().copied().sorted())
}

impl<V, E, F, C> Tetmesh<V, E, F, C> {
    fn check_sizes(&self) -> Result<(), MeshError> {
        let nv = self.verts.len();
        for (name, len) in [
            ("v_uvw", self.v_uvw.len()),
            ("v_data", self.v_data.len()),
            ("v2v", self.v2v.len()),
            ("v2e", self.v2e.len()),
            ("v2f", self.v2f.len()),
            ("v2c", self.v2c.len()),
        ] {
            ensure!(len == nv, "{name} has {len} rows for {nv} vertices");
        }
        let ne = self.edges.len();
        for (name, len) in [
            ("e_data", self.e_data.len()),
            ("e2f", self.e2f.len()),
            ("e2c", self.e2c.len()),
        ] {
            ensure!(len == ne, "{name} has {len} rows for {ne} edges");
        }
        let nf = self.faces.len();
        for (name, len) in [
            ("f_data", self.f_data.len()),
            ("f_normal", self.f_normal.len()),
            ("f2e", self.f2e.len()),
            ("f2f", self.f2f.len()),
            ("f2c", self.f2c.len()),
        ] {
            ensure!(len == nf, "{name} has {len} rows for {nf} faces");
        }
        let nc = self.cells.len();
        for (name, len) in [
            ("c_data", self.c_data.len()),
            ("c2e", self.c2e.len()),
            ("c2f", self.c2f.len()),
            ("c2c", self.c2c.len()),
        ] {
            ensure!(len == nc, "{name} has {len} rows for {nc} cells");
        }
        Ok(())
    }

    fn check_cells(&self) -> Result<(), MeshError> {
        let nv = self.verts.len();
        for cid in self.cell_ids() {
            let tet = self.cells[cid.idx()];
            check_tet(&tet, nv)
                .map_err(|e| MeshError::InvariantViolation(format!("cell {cid}: {e}")))?;
            for (k, [a, b]) in TET_EDGES.into_iter().enumerate() {
                let eid = self.c2e[cid.idx()][k];
                ensure!(
                    self.edges.find([tet[a], tet[b]]) == Some(eid),
                    "c2e[{cid}][{k}] is not the edge ({}, {})",
                    tet[a],
                    tet[b]
                );
                ensure!(self.e2c[eid.idx()].contains(&cid), "e2c[{eid}] is missing cell {cid}");
            }
            for (k, [a, b, c]) in TET_FACES.into_iter().enumerate() {
                let fid = self.c2f[cid.idx()][k];
                ensure!(
                    self.faces.find([tet[a], tet[b], tet[c]]) == Some(fid),
                    "c2f[{cid}][{k}] is not local face {k}"
                );
                ensure!(self.f2c[fid.idx()].contains(&cid), "f2c[{fid}] is missing cell {cid}");
            }
            for v in tet {
                ensure!(self.v2c[v.idx()].contains(&cid), "v2c[{v}] is missing cell {cid}");
            }
            ensure!(
                same_set(&self.c2c[cid.idx()], &self.c2c_row(cid)),
                "c2c[{cid}] is stale"
            );
        }

        let nc = self.cells.len();
        let v2c_total: usize = self.v2c.iter().map(Vec::len).sum();
        ensure!(v2c_total == 4 * nc, "v2c holds {v2c_total} entries for {nc} cells");
        let e2c_total: usize = self.e2c.iter().map(Vec::len).sum();
        ensure!(e2c_total == 6 * nc, "e2c holds {e2c_total} entries for {nc} cells");
        let f2c_total: usize = self.f2c.iter().map(Vec::len).sum();
        ensure!(f2c_total == 4 * nc, "f2c holds {f2c_total} entries for {nc} cells");
        Ok(())
    }

    fn check_faces(&self) -> Result<(), MeshError> {
        ensure!(self.faces.is_consistent(), "face lookup out of sync with face array");
        for (fid, tri) in self.faces.iter() {
            let owners = &self.f2c[fid.idx()];
            ensure!(!owners.is_empty(), "face {fid} has no incident cell");

            let first = owners[0];
            let k = self.c2f[first.idx()].iter().position(|&f| f == fid);
            let Some(k) = k else {
                return Err(MeshError::InvariantViolation(format!(
                    "f2c[{fid}] lists {first} which does not use it"
                )));
            };
            let tet = self.cells[first.idx()];
            let [a, b, c] = TET_FACES[k];
            ensure!(
                tri == [tet[a], tet[b], tet[c]],
                "face {fid} is not wound outward from cell {first}"
            );

            for (i, eid) in self.f2e[fid.idx()].into_iter().enumerate() {
                ensure!(
                    self.edges.find([tri[i], tri[(i + 1) % 3]]) == Some(eid),
                    "f2e[{fid}][{i}] is not the edge ({}, {})",
                    tri[i],
                    tri[(i + 1) % 3]
                );
                ensure!(self.e2f[eid.idx()].contains(&fid), "e2f[{eid}] is missing face {fid}");
            }
            for v in tri {
                ensure!(self.v2f[v.idx()].contains(&fid), "v2f[{v}] is missing face {fid}");
            }
            ensure!(
                same_set(&self.f2f[fid.idx()], &self.f2f_row(fid)),
                "f2f[{fid}] is stale"
            );
        }
        let nf = self.faces.len();
        let e2f_total: usize = self.e2f.iter().map(Vec::len).sum();
        ensure!(e2f_total == 3 * nf, "e2f holds {e2f_total} entries for {nf} faces");
        let v2f_total: usize = self.v2f.iter().map(Vec::len).sum();
        ensure!(v2f_total == 3 * nf, "v2f holds {v2f_total} entries for {nf} faces");
        Ok(())
    }

    fn check_edges(&self) -> Result<(), MeshError> {
        ensure!(self.edges.is_consistent(), "edge lookup out of sync with edge array");
        for (eid, [a, b]) in self.edges.iter() {
            ensure!(!self.e2c[eid.idx()].is_empty(), "edge {eid} has no incident cell");
            for (x, y) in [(a, b), (b, a)] {
                ensure!(self.v2e[x.idx()].contains(&eid), "v2e[{x}] is missing edge {eid}");
                ensure!(self.v2v[x.idx()].contains(&y), "v2v[{x}] is missing {y}");
            }
        }
        let ne = self.edges.len();
        let v2e_total: usize = self.v2e.iter().map(Vec::len).sum();
        ensure!(v2e_total == 2 * ne, "v2e holds {v2e_total} entries for {ne} edges");
        let v2v_total: usize = self.v2v.iter().map(Vec::len).sum();
        ensure!(v2v_total == 2 * ne, "v2v holds {v2v_total} entries for {ne} edges");
        Ok(())
    }
}

impl<V, E, F, C> DebugInvariants for Tetmesh<V, E, F, C> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Tetmesh");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        self.check_sizes()?;
        self.check_edges()?;
        self.check_faces()?;
        self.check_cells()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vec3::Vec3;
    use crate::topology::ids::{FaceId, VertId};

    fn unit_tet() -> Tetmesh {
        Tetmesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z],
            vec![[0, 1, 2, 3].map(VertId::new)],
        )
        .unwrap()
    }

    #[test]
    fn fresh_mesh_is_consistent() {
        unit_tet().validate_invariants().unwrap();
    }

    #[test]
    fn detects_flipped_face() {
        let mut m = unit_tet();
        let [a, b, c] = m.faces.get(FaceId::new(0));
        m.faces.reorient(FaceId::new(0), [a, c, b]);
        assert!(matches!(
            m.validate_invariants(),
            Err(MeshError::InvariantViolation(_))
        ));
    }

    #[test]
    fn detects_missing_transpose() {
        let mut m = unit_tet();
        m.v2c[2].clear();
        assert!(m.validate_invariants().is_err());
    }
}
