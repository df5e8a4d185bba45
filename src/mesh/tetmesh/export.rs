//! Extraction of the boundary surface of a tetrahedral mesh.

use hashbrown::HashMap;

use super::Tetmesh;
use crate::mesh::surface::Trimesh;
use crate::mesh_error::MeshError;
use crate::topology::ids::{FaceId, VertId};

/// Boundary surface of a [`Tetmesh`] together with the maps back to it.
#[derive(Clone, Debug)]
pub struct SurfaceExport {
    /// Outward-wound triangles, one per surface face.
    pub mesh: Trimesh,
    /// Face of the volume mesh that produced each triangle.
    pub poly_to_face: Vec<FaceId>,
    /// Volume vertex → surface vertex.
    pub vert_to_srf: HashMap<VertId, VertId>,
    /// Surface vertex → volume vertex.
    pub srf_to_vert: Vec<VertId>,
}

impl<V, E, F, C> Tetmesh<V, E, F, C> {
    /// Builds a triangle mesh from the surface faces, keeping only the
    /// vertices they use. Surface vertices are numbered in order of first
    /// use, texture coordinates are carried over.
    pub fn export_surface(&self) -> Result<SurfaceExport, MeshError> {
        let poly_to_face = self.surface_faces();
        let mut vert_to_srf = HashMap::new();
        let mut srf_to_vert = Vec::new();
        let mut polys = Vec::with_capacity(poly_to_face.len());
        for &fid in &poly_to_face {
            let tri = self.faces.get(fid).map(|v| {
                *vert_to_srf.entry(v).or_insert_with(|| {
                    srf_to_vert.push(v);
                    VertId::new(srf_to_vert.len() - 1)
                })
            });
            polys.push(tri.to_vec());
        }

        let verts = srf_to_vert.iter().map(|&v| self.vert(v)).collect();
        let mut mesh = Trimesh::with_options(verts, polys, self.options)?;
        for (i, &v) in srf_to_vert.iter().enumerate() {
            mesh.vert_set_uvw(VertId::new(i), self.vert_uvw(v))?;
        }
        log::debug!(
            "export_surface: {} of {} faces, {} of {} verts",
            poly_to_face.len(),
            self.num_faces(),
            srf_to_vert.len(),
            self.num_verts()
        );
        Ok(SurfaceExport {
            mesh,
            poly_to_face,
            vert_to_srf,
            srf_to_vert,
        })
    }
}
