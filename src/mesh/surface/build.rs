//! Incidence builder for surface meshes.
//!
//! Every polygon emits one candidate edge per consecutive corner pair. The
//! candidates are deduplicated through the edge table, so the whole build is
//! linear in the number of polygon corners.

use itertools::Itertools;

use super::{check_loop, SurfaceMesh};
use crate::geometry::vec3::{normalize_or_zero, Vec3};
use crate::mesh::options::{MeshOptions, NonManifoldHandling};
use crate::mesh_error::MeshError;
use crate::topology::cache::InvalidateCache;
use crate::topology::ids::{EdgeId, PolyId, VertId};
use crate::topology::rows::insert_unique;
use crate::topology::shape::ShapePolicy;

/// Raw loader output with separate texture and normal channels.
///
/// `poly_tex[p][k]` / `poly_normals[p][k]` index into `tex` / `normals` for
/// corner `k` of polygon `p`. An empty index list means the channel is either
/// absent (empty values) or already per-vertex (one value per vertex).
#[derive(Clone, Debug, Default)]
pub struct SurfaceSoup {
    pub verts: Vec<Vec3>,
    pub polys: Vec<Vec<VertId>>,
    pub tex: Vec<Vec3>,
    pub poly_tex: Vec<Vec<usize>>,
    pub normals: Vec<Vec3>,
    pub poly_normals: Vec<Vec<usize>>,
}

impl<S, V, E, P> SurfaceMesh<S, V, E, P>
where
    S: ShapePolicy,
    V: Default,
    E: Default,
    P: Default,
{
    /// Builds a mesh from vertex positions and polygon loops.
    pub fn new(verts: Vec<Vec3>, polys: Vec<Vec<VertId>>) -> Result<Self, MeshError> {
        Self::with_options(verts, polys, MeshOptions::default())
    }

    pub fn with_options(
        verts: Vec<Vec3>,
        polys: Vec<Vec<VertId>>,
        options: MeshOptions,
    ) -> Result<Self, MeshError> {
        let mut mesh = Self {
            options,
            ..Self::default()
        };
        mesh.init(verts, polys)?;
        Ok(mesh)
    }

    /// Builds a mesh from loader output with per-corner attribute channels.
    pub fn from_soup(soup: SurfaceSoup, options: MeshOptions) -> Result<Self, MeshError> {
        let mut mesh = Self {
            options,
            ..Self::default()
        };
        mesh.init_with_channels(soup)?;
        Ok(mesh)
    }

    /// Replaces the content of the mesh and rebuilds every table.
    ///
    /// All polygons are validated before anything is touched, so an error
    /// leaves the previous content in place.
    pub fn init(&mut self, verts: Vec<Vec3>, polys: Vec<Vec<VertId>>) -> Result<(), MeshError> {
        for poly in &polys {
            check_loop::<S>(poly, verts.len())?;
        }
        self.clear();

        let nv = verts.len();
        self.verts = verts;
        self.v_uvw = vec![Vec3::ZERO; nv];
        self.v_normal = vec![Vec3::ZERO; nv];
        self.v_data = std::iter::repeat_with(V::default).take(nv).collect();
        self.v2v = vec![Vec::new(); nv];
        self.v2e = vec![Vec::new(); nv];
        self.v2p = vec![Vec::new(); nv];

        let np = polys.len();
        self.p_data = std::iter::repeat_with(P::default).take(np).collect();
        self.p_normal = vec![Vec3::ZERO; np];
        self.p_tess = vec![Vec::new(); np];
        self.p2e = vec![Vec::new(); np];
        self.p2p = vec![Vec::new(); np];
        self.polys = polys;

        for pid in (0..np).map(PolyId::new) {
            let corners = self.polys[pid.idx()].clone();
            for &v in &corners {
                self.v2p[v.idx()].push(pid);
            }
            for (a, b) in corners.iter().copied().circular_tuple_windows() {
                let eid = self.edge_find_or_add(a, b);
                self.e2p[eid.idx()].push(pid);
                self.p2e[pid.idx()].push(eid);
            }
        }

        for eid in (0..self.edges.len()).map(EdgeId::new) {
            let incident = &self.e2p[eid.idx()];
            match incident.len() {
                2 => {
                    let (p, q) = (incident[0], incident[1]);
                    insert_unique(&mut self.p2p[p.idx()], q);
                    insert_unique(&mut self.p2p[q.idx()], p);
                }
                n if n > 2 => self.report_non_manifold(eid),
                _ => {}
            }
        }

        self.update_normals();
        log::debug!(
            "built {} mesh: {} verts, {} edges, {} polys",
            S::NAME,
            self.num_verts(),
            self.num_edges(),
            self.num_polys()
        );
        self.after_mutation();
        Ok(())
    }

    /// Like [`Self::init`], resolving per-corner texture and normal indices to
    /// per-vertex values.
    ///
    /// When two corners of the same vertex point at different values the first
    /// one wins; the conflict is logged at `debug` level. Supplied normals
    /// replace the computed vertex normals.
    pub fn init_with_channels(&mut self, soup: SurfaceSoup) -> Result<(), MeshError> {
        let SurfaceSoup {
            verts,
            polys,
            tex,
            poly_tex,
            normals,
            poly_normals,
        } = soup;
        for poly in &polys {
            check_loop::<S>(poly, verts.len())?;
        }
        check_channel("tex", &polys, &tex, &poly_tex, verts.len())?;
        check_channel("normals", &polys, &normals, &poly_normals, verts.len())?;

        let uvw = resolve_channel("tex", &polys, &tex, &poly_tex, verts.len());
        let nor = resolve_channel("normals", &polys, &normals, &poly_normals, verts.len());

        self.init(verts, polys)?;
        if let Some(uvw) = uvw {
            for (slot, value) in self.v_uvw.iter_mut().zip(uvw) {
                if let Some(value) = value {
                    *slot = value;
                }
            }
        }
        if let Some(nor) = nor {
            for (slot, value) in self.v_normal.iter_mut().zip(nor) {
                if let Some(value) = value {
                    *slot = normalize_or_zero(value);
                }
            }
        }
        Ok(())
    }

    /// Drops every entity, table and cache. Options are kept.
    pub fn clear(&mut self) {
        self.verts.clear();
        self.polys.clear();
        self.edges.clear();
        self.v_uvw.clear();
        self.v_normal.clear();
        self.v_data.clear();
        self.e_data.clear();
        self.p_data.clear();
        self.p_normal.clear();
        self.p_tess.clear();
        self.v2v.clear();
        self.v2e.clear();
        self.v2p.clear();
        self.e2p.clear();
        self.p2e.clear();
        self.p2p.clear();
        self.invalidate_cache();
    }

    /// Returns the edge joining `a` and `b`, creating a dangling one if needed.
    pub(crate) fn edge_find_or_add(&mut self, a: VertId, b: VertId) -> EdgeId {
        let (eid, fresh) = self.edges.insert([a, b]);
        if fresh {
            self.e2p.push(Vec::new());
            self.e_data.push(E::default());
            self.v2e[a.idx()].push(eid);
            self.v2e[b.idx()].push(eid);
            insert_unique(&mut self.v2v[a.idx()], b);
            insert_unique(&mut self.v2v[b.idx()], a);
        }
        eid
    }
}

impl<S, V, E, P> SurfaceMesh<S, V, E, P>
where
    S: ShapePolicy,
    V: Clone + Default,
    E: Clone + Default,
    P: Clone + Default,
{
    /// Appends a copy of `other`, shifting its vertex ids past the current
    /// vertex count. Payloads and texture coordinates are carried over.
    pub fn append(&mut self, other: &SurfaceMesh<S, V, E, P>) -> Result<(), MeshError> {
        let offset = self.num_verts();
        for vid in other.vert_ids() {
            let nv = self.vert_add(other.vert(vid));
            self.v_uvw[nv.idx()] = other.v_uvw[vid.idx()];
            self.v_data[nv.idx()] = other.v_data[vid.idx()].clone();
        }
        let shift = |v: VertId| VertId::new(v.idx() + offset);
        for pid in other.poly_ids() {
            let vlist: Vec<VertId> = other.poly_verts(pid).iter().map(|&v| shift(v)).collect();
            let np = self.poly_add(&vlist)?;
            self.p_data[np.idx()] = other.p_data[pid.idx()].clone();
        }
        for (eid, [a, b]) in other.edges.iter() {
            let ne = self.edge_find_or_add(shift(a), shift(b));
            self.e_data[ne.idx()] = other.e_data[eid.idx()].clone();
        }
        log::debug!(
            "appended {} verts, {} polys",
            other.num_verts(),
            other.num_polys()
        );
        Ok(())
    }
}

impl<S: ShapePolicy, V, E, P> SurfaceMesh<S, V, E, P> {
    pub(crate) fn report_non_manifold(&self, eid: EdgeId) {
        if self.options.non_manifold == NonManifoldHandling::Warn {
            let [a, b] = self.edges.get(eid);
            log::warn!(
                "non-manifold edge {eid} ({a}, {b}) shared by {} polygons",
                self.e2p[eid.idx()].len()
            );
        }
    }
}

fn check_channel(
    channel: &'static str,
    polys: &[Vec<VertId>],
    values: &[Vec3],
    corners: &[Vec<usize>],
    num_verts: usize,
) -> Result<(), MeshError> {
    if corners.is_empty() {
        if !values.is_empty() && values.len() != num_verts {
            return Err(MeshError::ChannelLengthMismatch {
                channel,
                expected: num_verts,
                found: values.len(),
            });
        }
        return Ok(());
    }
    if corners.len() != polys.len() {
        return Err(MeshError::ChannelLengthMismatch {
            channel,
            expected: polys.len(),
            found: corners.len(),
        });
    }
    for (poly, row) in polys.iter().zip(corners) {
        if poly.len() != row.len() {
            return Err(MeshError::ChannelLengthMismatch {
                channel,
                expected: poly.len(),
                found: row.len(),
            });
        }
        if let Some(&bad) = row.iter().find(|&&i| i >= values.len()) {
            return Err(MeshError::ChannelLengthMismatch {
                channel,
                expected: values.len(),
                found: bad + 1,
            });
        }
    }
    Ok(())
}

/// Per-vertex values for a channel, `None` when the channel is absent.
fn resolve_channel(
    channel: &'static str,
    polys: &[Vec<VertId>],
    values: &[Vec3],
    corners: &[Vec<usize>],
    num_verts: usize,
) -> Option<Vec<Option<Vec3>>> {
    if values.is_empty() {
        return None;
    }
    if corners.is_empty() {
        return Some(values.iter().copied().map(Some).collect());
    }
    let mut out = vec![None; num_verts];
    for (poly, row) in polys.iter().zip(corners) {
        for (&vid, &i) in poly.iter().zip(row) {
            let value = values[i];
            match out[vid.idx()] {
                None => out[vid.idx()] = Some(value),
                Some(prev) if prev != value => {
                    log::debug!("{channel}: vertex {vid} has conflicting corner values, keeping {prev}");
                }
                Some(_) => {}
            }
        }
    }
    Some(out)
}
