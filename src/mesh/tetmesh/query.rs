//! Classification and measures for tetrahedral meshes.

use super::Tetmesh;
use crate::geometry::bbox::Bbox;
use crate::geometry::metrics::{
    tet_bary_coords, tet_dihedral_angle, tet_face_area, tet_face_normal, tet_signed_volume,
    tet_volume, triangle_area, TET_EDGE_OPPOSITE, TET_FACE_OPPOSITE,
};
use crate::geometry::vec3::{AngleUnit, TexChannel, Vec3};
use crate::topology::ids::{CellId, EdgeId, FaceId, VertId};

impl<V, E, F, C> Tetmesh<V, E, F, C> {
    // ---------------------------------------------------------------------
    // Surface classification
    // ---------------------------------------------------------------------

    /// Exactly one incident cell.
    #[inline]
    pub fn face_is_on_srf(&self, fid: FaceId) -> bool {
        self.f2c[fid.idx()].len() == 1
    }

    pub fn edge_is_on_srf(&self, eid: EdgeId) -> bool {
        self.e2f[eid.idx()].iter().any(|&f| self.face_is_on_srf(f))
    }

    pub fn vert_is_on_srf(&self, vid: VertId) -> bool {
        self.v2f[vid.idx()].iter().any(|&f| self.face_is_on_srf(f))
    }

    /// Whether any face of `cid` lies on the surface.
    pub fn cell_is_on_srf(&self, cid: CellId) -> bool {
        self.c2f[cid.idx()].iter().any(|&f| self.face_is_on_srf(f))
    }

    pub fn surface_faces(&self) -> Vec<FaceId> {
        self.face_ids().filter(|&f| self.face_is_on_srf(f)).collect()
    }

    /// No face shared by more than two cells.
    pub fn is_manifold(&self) -> bool {
        self.f2c.iter().all(|row| row.len() <= 2)
    }

    /// `V - E + F - C`.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_verts() as i64 - self.num_edges() as i64 + self.num_faces() as i64
            - self.num_cells() as i64
    }

    /// Texture channel value at `vid` below every neighbour.
    pub fn vert_is_local_min(&self, vid: VertId, channel: TexChannel) -> bool {
        let f = channel.of(self.vert_uvw(vid));
        let nbrs = &self.v2v[vid.idx()];
        !nbrs.is_empty() && nbrs.iter().all(|&u| channel.of(self.vert_uvw(u)) > f)
    }

    /// Texture channel value at `vid` above every neighbour.
    pub fn vert_is_local_max(&self, vid: VertId, channel: TexChannel) -> bool {
        let f = channel.of(self.vert_uvw(vid));
        let nbrs = &self.v2v[vid.idx()];
        !nbrs.is_empty() && nbrs.iter().all(|&u| channel.of(self.vert_uvw(u)) < f)
    }

    pub fn vert_is_critical_p(&self, vid: VertId, channel: TexChannel) -> bool {
        self.vert_is_local_min(vid, channel) || self.vert_is_local_max(vid, channel)
    }

    // ---------------------------------------------------------------------
    // Faces
    // ---------------------------------------------------------------------

    /// Unit normal of the stored winding; outward for surface faces.
    #[inline]
    pub fn face_normal(&self, fid: FaceId) -> Vec3 {
        self.f_normal[fid.idx()]
    }

    pub fn face_area(&self, fid: FaceId) -> f64 {
        let [a, b, c] = self.faces.get(fid);
        triangle_area(self.vert(a), self.vert(b), self.vert(c))
    }

    pub fn face_centroid(&self, fid: FaceId) -> Vec3 {
        let [a, b, c] = self.faces.get(fid);
        (self.vert(a) + self.vert(b) + self.vert(c)) / 3.0
    }

    pub fn face_contains_vert(&self, fid: FaceId, vid: VertId) -> bool {
        self.faces.get(fid).contains(&vid)
    }

    /// Surface faces sharing an edge. Always false for interior faces.
    pub fn faces_are_adjacent(&self, f0: FaceId, f1: FaceId) -> bool {
        self.f2f[f0.idx()].contains(&f1)
    }

    // ---------------------------------------------------------------------
    // Cells
    // ---------------------------------------------------------------------

    pub fn cell_contains_vert(&self, cid: CellId, vid: VertId) -> bool {
        self.cells[cid.idx()].contains(&vid)
    }

    pub fn cell_contains_face(&self, cid: CellId, fid: FaceId) -> bool {
        self.c2f[cid.idx()].contains(&fid)
    }

    pub fn cell_vert_offset(&self, cid: CellId, vid: VertId) -> Option<usize> {
        self.cells[cid.idx()].iter().position(|&v| v == vid)
    }

    /// Local face `face` of `cid`.
    #[inline]
    pub fn cell_face_id(&self, cid: CellId, face: usize) -> FaceId {
        self.c2f[cid.idx()][face]
    }

    /// Edge of `cid` joining `v0` and `v1`.
    pub fn cell_edge_id(&self, cid: CellId, v0: VertId, v1: VertId) -> Option<EdgeId> {
        let eid = self.edges.find([v0, v1])?;
        self.c2e[cid.idx()].contains(&eid).then_some(eid)
    }

    pub fn cell_centroid(&self, cid: CellId) -> Vec3 {
        self.cell_vlist(cid).iter().sum::<Vec3>() / 4.0
    }

    pub fn cell_signed_volume(&self, cid: CellId) -> f64 {
        let [a, b, c, d] = self.cell_vlist(cid);
        tet_signed_volume(a, b, c, d)
    }

    pub fn cell_volume(&self, cid: CellId) -> f64 {
        tet_volume(&self.cell_vlist(cid))
    }

    #[inline]
    pub fn cell_mass(&self, cid: CellId) -> f64 {
        self.cell_volume(cid)
    }

    /// Outward unit normal of local face `face`.
    pub fn cell_face_normal(&self, cid: CellId, face: usize) -> Vec3 {
        tet_face_normal(&self.cell_vlist(cid), face)
    }

    pub fn cell_face_area(&self, cid: CellId, face: usize) -> f64 {
        tet_face_area(&self.cell_vlist(cid), face)
    }

    /// Interior dihedral angle between two local faces.
    pub fn cell_dihedral_angle(&self, cid: CellId, f0: usize, f1: usize, unit: AngleUnit) -> f64 {
        unit.from_rad(tet_dihedral_angle(&self.cell_vlist(cid), f0, f1))
    }

    /// Barycentric coordinates of `p`, or `None` for a flat cell.
    pub fn cell_bary_coords(&self, cid: CellId, p: Vec3) -> Option<[f64; 4]> {
        tet_bary_coords(&self.cell_vlist(cid), p)
    }

    /// The vertex of `cid` not on face `fid`.
    pub fn cell_vert_opposite_to(&self, cid: CellId, fid: FaceId) -> Option<VertId> {
        let k = self.c2f[cid.idx()].iter().position(|&f| f == fid)?;
        Some(self.cells[cid.idx()][TET_FACE_OPPOSITE[k]])
    }

    /// The face of `cid` not touching `vid`.
    pub fn cell_face_opposite_to(&self, cid: CellId, vid: VertId) -> Option<FaceId> {
        let offset = self.cell_vert_offset(cid, vid)?;
        let k = TET_FACE_OPPOSITE.iter().position(|&o| o == offset)?;
        Some(self.c2f[cid.idx()][k])
    }

    /// The edge of `cid` sharing no vertex with `eid`.
    pub fn cell_edge_opposite_to(&self, cid: CellId, eid: EdgeId) -> Option<EdgeId> {
        let row = &self.c2e[cid.idx()];
        let k = row.iter().position(|&e| e == eid)?;
        Some(row[TET_EDGE_OPPOSITE[k]])
    }

    /// A face owned by both cells.
    pub fn cell_shared_face(&self, c0: CellId, c1: CellId) -> Option<FaceId> {
        let other = &self.c2f[c1.idx()];
        self.c2f[c0.idx()].iter().copied().find(|f| other.contains(f))
    }

    /// The cell on the other side of face `fid`.
    pub fn cell_adjacent_through_face(&self, cid: CellId, fid: FaceId) -> Option<CellId> {
        match self.f2c[fid.idx()][..] {
            [a, b] if a == cid => Some(b),
            [a, b] if b == cid => Some(a),
            _ => None,
        }
    }

    // ---------------------------------------------------------------------
    // Edges and vertices
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

    /// A quarter of the volume of every incident cell.
    pub fn vert_volume(&self, vid: VertId) -> f64 {
        self.v2c[vid.idx()]
            .iter()
            .map(|&c| self.cell_volume(c) / 4.0)
            .sum()
    }

    #[inline]
    pub fn vert_mass(&self, vid: VertId) -> f64 {
        self.vert_volume(vid)
    }

    // ---------------------------------------------------------------------
    // Aggregates
    // ---------------------------------------------------------------------

    pub fn bbox(&self) -> Bbox {
        *self
            .aggregates
            .bbox
            .get_or_init(|| Bbox::from_points(self.verts.iter()))
    }

    /// Sum of the (unsigned) cell volumes.
    pub fn mesh_volume(&self) -> f64 {
        *self
            .aggregates
            .volume
            .get_or_init(|| self.cell_ids().map(|c| self.cell_volume(c)).sum())
    }
}
