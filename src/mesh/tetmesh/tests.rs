use super::*;
use crate::debug_invariants::DebugInvariants;
use crate::geometry::vec3::{AngleUnit, TexChannel};

fn v(i: usize) -> VertId {
    VertId::new(i)
}

fn tet(ids: [usize; 4]) -> [VertId; 4] {
    ids.map(VertId::new)
}

fn unit_tet() -> Tetmesh {
    Tetmesh::new(
        vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z],
        vec![tet([0, 1, 2, 3])],
    )
    .unwrap()
}

/// Unit tet plus a second cell on its slanted face.
fn two_tets() -> Tetmesh {
    Tetmesh::new(
        vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z, Vec3::ONE],
        vec![tet([0, 1, 2, 3]), tet([1, 2, 3, 4])],
    )
    .unwrap()
}

#[test]
fn single_tet_counts() {
    let m = unit_tet();
    assert_eq!(
        (m.num_verts(), m.num_edges(), m.num_faces(), m.num_cells()),
        (4, 6, 4, 1)
    );
    assert_eq!(m.euler_characteristic(), 1);
    assert!(m.face_ids().all(|f| m.face_is_on_srf(f)));
    assert!(m.vert_ids().all(|u| m.vert_is_on_srf(u)));
    assert!(m.face_ids().all(|f| m.adj_f2f(f).len() == 3));
    assert!((m.mesh_volume() - 1.0 / 6.0).abs() < 1e-12);
    assert!(m.is_manifold());
    m.validate_invariants().unwrap();
}

#[test]
fn surface_faces_point_outward() {
    let m = two_tets();
    for fid in m.surface_faces() {
        let cid = m.adj_f2c(fid)[0];
        let out = m.face_centroid(fid) - m.cell_centroid(cid);
        assert!(m.face_normal(fid).dot(out) > 0.0, "face {fid} points inward");
    }
}

#[test]
fn inverted_cells_are_stored_positive() {
    let verts = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
    let batch = Tetmesh::<()>::new(verts.clone(), vec![tet([0, 2, 1, 3])]).unwrap();
    let mut incremental = Tetmesh::<()>::default();
    for &p in &verts {
        incremental.vert_add(p);
    }
    incremental.cell_add(tet([0, 2, 1, 3])).unwrap();

    for m in [&batch, &incremental] {
        let c = CellId::new(0);
        assert!(m.cell_signed_volume(c) > 0.0);
        assert_eq!(m.cell_verts(c), &tet([0, 2, 3, 1]));
        for fid in m.face_ids() {
            let out = m.face_centroid(fid) - m.cell_centroid(c);
            assert!(m.face_normal(fid).dot(out) > 0.0, "face {fid} points inward");
        }
        let vol = m.export_surface().unwrap().mesh.mesh_volume().unwrap();
        assert!((vol - 1.0 / 6.0).abs() < 1e-12);
        m.validate_invariants().unwrap();
    }
}

#[test]
fn local_tables_line_up() {
    let m = unit_tet();
    let c = CellId::new(0);
    for k in 0..6 {
        let [a, b] = m.edge_vert_ids(m.adj_c2e(c)[k]);
        let [x, y] = crate::geometry::metrics::TET_EDGES[k];
        assert!([a, b] == [v(x), v(y)] || [a, b] == [v(y), v(x)]);
    }
    for k in 0..4 {
        let fid = m.cell_face_id(c, k);
        let opposite = m.cell_vert_opposite_to(c, fid).unwrap();
        assert!(!m.face_contains_vert(fid, opposite));
        assert_eq!(m.cell_face_opposite_to(c, opposite), Some(fid));
    }
    let e01 = m.cell_edge_id(c, v(0), v(1)).unwrap();
    let e23 = m.cell_edge_id(c, v(2), v(3)).unwrap();
    assert_eq!(m.cell_edge_opposite_to(c, e01), Some(e23));
}

#[test]
fn shared_face_links_cells() {
    let m = two_tets();
    assert_eq!(
        (m.num_verts(), m.num_edges(), m.num_faces(), m.num_cells()),
        (5, 9, 7, 2)
    );
    assert_eq!(m.euler_characteristic(), 1);
    let (c0, c1) = (CellId::new(0), CellId::new(1));
    let shared = m.face_id([v(3), v(1), v(2)]).unwrap();
    assert_eq!(m.cell_shared_face(c0, c1), Some(shared));
    assert_eq!(m.cell_adjacent_through_face(c0, shared), Some(c1));
    assert_eq!(m.adj_c2c(c0), &[c1]);
    assert!(!m.face_is_on_srf(shared));
    assert!(m.adj_f2f(shared).is_empty());
    // adjacency is along surface edges, not cell ownership
    let bottom = m.face_id([v(0), v(2), v(1)]).unwrap();
    let side = m.face_id([v(0), v(1), v(3)]).unwrap();
    assert!(m.faces_are_adjacent(bottom, side));
    assert!(!m.faces_are_adjacent(bottom, shared));
    assert!(!m.faces_are_adjacent(shared, bottom));
    assert_eq!(m.surface_faces().len(), 6);
    assert_eq!(m.cell_vert_opposite_to(c0, shared), Some(v(0)));
    assert!((m.mesh_volume() - 0.5).abs() < 1e-12);
    assert!(m.vert_ids().all(|u| m.vert_is_on_srf(u)));
    m.validate_invariants().unwrap();
}

#[test]
fn measures_of_unit_tet() {
    let m = unit_tet();
    let c = CellId::new(0);
    assert!((m.cell_signed_volume(c) - 1.0 / 6.0).abs() < 1e-12);
    assert!((m.cell_face_normal(c, 0) + Vec3::Z).length() < 1e-12);
    assert!((m.cell_face_area(c, 0) - 0.5).abs() < 1e-12);
    assert!((m.cell_dihedral_angle(c, 0, 2, AngleUnit::Deg) - 90.0).abs() < 1e-9);
    let w = m.cell_bary_coords(c, Vec3::splat(0.25)).unwrap();
    assert!(w.iter().all(|x| (x - 0.25).abs() < 1e-12));
    assert!((m.vert_volume(v(0)) - 1.0 / 24.0).abs() < 1e-12);
    assert!((m.edge_max_length() - 2f64.sqrt()).abs() < 1e-12);
    assert!((m.edge_min_length() - 1.0).abs() < 1e-12);
    assert_eq!(m.bbox().max, Vec3::ONE);
}

#[test]
fn local_extrema_on_texture_channel() {
    let mut m = two_tets();
    for u in m.vert_ids().collect::<Vec<_>>() {
        let height = m.vert(u).length();
        m.vert_set_uvw(u, Vec3::new(height, 0.0, 0.0)).unwrap();
    }
    assert!(m.vert_is_local_min(v(0), TexChannel::U));
    assert!(m.vert_is_local_max(v(4), TexChannel::U));
    assert!(!m.vert_is_critical_p(v(1), TexChannel::U));
}

#[test]
fn incremental_build_matches_batch() {
    let mut m = unit_tet();
    let v4 = m.vert_add(Vec3::ONE);
    let c1 = m.cell_add(tet([1, 2, 3, 4])).unwrap();
    assert_eq!(v4, v(4));
    assert_eq!(c1, CellId::new(1));
    let batch = two_tets();
    assert_eq!(m.num_edges(), batch.num_edges());
    assert_eq!(m.num_faces(), batch.num_faces());
    assert_eq!(m.adj_c2c(CellId::new(0)), &[c1]);
    assert_eq!(m.surface_faces().len(), 6);
    m.validate_invariants().unwrap();
}

#[test]
fn cell_add_rejects_bad_input() {
    let mut m = unit_tet();
    assert_eq!(
        m.cell_add(tet([0, 1, 1, 2])),
        Err(MeshError::RepeatedVertex { vid: v(1) })
    );
    assert!(matches!(
        m.cell_add(tet([0, 1, 2, 9])),
        Err(MeshError::VertOutOfRange { .. })
    ));
    assert_eq!(m.num_cells(), 1);
}

#[test]
fn cell_remove_reorients_exposed_face() {
    let mut m = two_tets();
    let shared = m.face_id([v(1), v(2), v(3)]).unwrap();
    let before = m.face_normal(shared);
    m.cell_remove(CellId::new(0)).unwrap();

    assert_eq!(
        (m.num_verts(), m.num_edges(), m.num_faces(), m.num_cells()),
        (5, 6, 4, 1)
    );
    let shared = m.face_id([v(1), v(2), v(3)]).unwrap();
    assert!(m.face_is_on_srf(shared));
    assert!((m.face_normal(shared) + before).length() < 1e-12);
    assert_eq!(m.cell_verts(CellId::new(0)), &tet([1, 2, 3, 4]));
    assert!(m.adj_v2c(v(0)).is_empty());
    m.validate_invariants().unwrap();

    m.vert_remove_unreferenced(v(0)).unwrap();
    assert_eq!(m.num_verts(), 4);
    assert_eq!(m.vert(v(0)), Vec3::ONE);
    m.validate_invariants().unwrap();
}

#[test]
fn vert_remove_takes_cells() {
    let mut m = two_tets();
    assert_eq!(
        m.vert_remove_unreferenced(v(4)),
        Err(MeshError::VertStillReferenced { vid: v(4), count: 1 })
    );
    m.vert_remove(v(4)).unwrap();
    assert_eq!(
        (m.num_verts(), m.num_edges(), m.num_faces(), m.num_cells()),
        (4, 6, 4, 1)
    );
    assert!(m.face_ids().all(|f| m.face_is_on_srf(f)));
    m.validate_invariants().unwrap();

    m.cells_remove(&[CellId::new(0), CellId::new(0)]).unwrap();
    assert_eq!((m.num_edges(), m.num_faces(), m.num_cells()), (0, 0, 0));
    assert_eq!(m.num_verts(), 4);
}

#[test]
fn switch_ids_keep_tables_consistent() {
    let mut m = two_tets();
    let volume = m.mesh_volume();
    m.cell_switch_id(CellId::new(0), CellId::new(1)).unwrap();
    m.validate_invariants().unwrap();
    assert_eq!(m.cell_verts(CellId::new(1)), &tet([0, 1, 2, 3]));

    m.vert_switch_id(v(0), v(4)).unwrap();
    m.validate_invariants().unwrap();
    assert_eq!(m.vert(v(4)), Vec3::ZERO);

    m.face_switch_id(FaceId::new(0), FaceId::new(6)).unwrap();
    m.validate_invariants().unwrap();
    assert!((m.mesh_volume() - volume).abs() < 1e-12);
}

#[test]
fn vert_set_pos_refreshes_normals() {
    let mut m = unit_tet();
    m.vert_set_pos(v(3), Vec3::new(0.0, 0.0, 2.0)).unwrap();
    assert!((m.mesh_volume() - 1.0 / 3.0).abs() < 1e-12);
    for fid in m.surface_faces() {
        let out = m.face_centroid(fid) - m.cell_centroid(CellId::new(0));
        assert!(m.face_normal(fid).dot(out) > 0.0);
    }
}

#[test]
fn from_flat_checks_lengths() {
    let coords = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
    let m = Tetmesh::<()>::from_flat(&coords, &[0, 1, 2, 3]).unwrap();
    assert_eq!(m.num_cells(), 1);
    assert_eq!(m.vector_coords(), &coords);
    assert!(matches!(
        Tetmesh::<()>::from_flat(&coords[..11], &[0, 1, 2, 3]),
        Err(MeshError::ChannelLengthMismatch { channel: "coords", .. })
    ));
    assert!(matches!(
        Tetmesh::<()>::from_flat(&coords, &[0, 1, 2]),
        Err(MeshError::ChannelLengthMismatch { channel: "cells", .. })
    ));
}

#[test]
fn export_surface_is_closed_and_outward() {
    let mut m = two_tets();
    m.vert_set_uvw(v(4), Vec3::new(0.5, 0.0, 0.0)).unwrap();
    let out = m.export_surface().unwrap();
    let srf = &out.mesh;
    assert_eq!(srf.num_polys(), 6);
    assert_eq!(srf.num_verts(), 5);
    assert_eq!(srf.euler_characteristic(), 2);
    assert!(srf.is_watertight());
    let vol = srf.mesh_volume().unwrap();
    assert!((vol - 0.5).abs() < 1e-12);
    for (i, &fid) in out.poly_to_face.iter().enumerate() {
        assert!(m.face_is_on_srf(fid));
        let pid = crate::topology::ids::PolyId::new(i);
        assert!((srf.poly_normal(pid) - m.face_normal(fid)).length() < 1e-12);
    }
    let s4 = out.vert_to_srf[&v(4)];
    assert_eq!(out.srf_to_vert[s4.idx()], v(4));
    assert_eq!(srf.vert_uvw(s4), Vec3::new(0.5, 0.0, 0.0));
}
