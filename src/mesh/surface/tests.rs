use super::*;
use crate::debug_invariants::DebugInvariants;
use crate::mesh::options::NonManifoldHandling;

fn v(i: usize) -> VertId {
    VertId::new(i)
}

fn unit_quad() -> Quadmesh {
    Quadmesh::new(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        vec![vec![v(0), v(1), v(2), v(3)]],
    )
    .unwrap()
}

#[test]
fn unit_quad_scenario() {
    let m = unit_quad();
    let pid = PolyId::new(0);
    assert_eq!(m.num_verts(), 4);
    assert_eq!(m.num_edges(), 4);
    assert_eq!(m.num_polys(), 1);
    assert!(m.edge_ids().all(|e| m.edge_is_boundary(e)));
    assert!((m.poly_area(pid) - 1.0).abs() < 1e-12);
    assert_eq!(
        m.poly_tessellation(pid),
        &[[v(0), v(1), v(2)], [v(0), v(2), v(3)]]
    );
    assert!((m.poly_normal(pid) - Vec3::Z).length() < 1e-12);
    assert!(m.vert_ids().all(|u| (m.vert_normal(u) - Vec3::Z).length() < 1e-12));
    assert_eq!(m.euler_characteristic(), 1);
    m.validate_invariants().unwrap();
}

#[test]
fn p2e_rows_follow_corner_order() {
    let m = unit_quad();
    let row = m.adj_p2e(PolyId::new(0));
    for k in 0..4 {
        assert_eq!(m.edge_id(v(k), v((k + 1) % 4)), Some(row[k]));
    }
}

#[test]
fn arity_is_enforced_by_shape() {
    let err = Trimesh::<()>::new(
        vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE],
        vec![vec![v(0), v(1), v(2), v(3)]],
    )
    .unwrap_err();
    assert_eq!(
        err,
        MeshError::ArityMismatch {
            shape: "triangle",
            expected: 3,
            found: 4
        }
    );
    let err = Polygonmesh::<()>::new(vec![Vec3::ZERO, Vec3::X], vec![vec![v(0), v(1), v(5)]])
        .unwrap_err();
    assert_eq!(err, MeshError::VertOutOfRange { vid: v(5), len: 2 });
}

#[test]
fn failed_init_keeps_previous_content() {
    let mut m = unit_quad();
    let res = m.init(vec![Vec3::ZERO], vec![vec![v(0), v(0), v(0), v(0)]]);
    assert_eq!(res, Err(MeshError::RepeatedVertex { vid: v(0) }));
    assert_eq!(m.num_polys(), 1);
}

#[test]
fn try_accessors_report_range() {
    let m = unit_quad();
    assert_eq!(m.try_vert(v(2)).unwrap(), Vec3::new(1.0, 1.0, 0.0));
    assert_eq!(
        m.try_vert(v(4)),
        Err(MeshError::VertOutOfRange { vid: v(4), len: 4 })
    );
    assert!(m.try_edge_vert_ids(EdgeId::new(9)).is_err());
    assert!(m.try_poly_verts(PolyId::new(1)).is_err());
}

#[test]
#[should_panic]
fn plain_accessor_panics_out_of_range() {
    let m = unit_quad();
    let _ = m.vert(v(10));
}

#[test]
fn flat_coordinate_view() {
    let m = unit_quad();
    let coords = m.vector_coords();
    assert_eq!(coords.len(), 12);
    assert_eq!(&coords[6..9], &[1.0, 1.0, 0.0]);
    assert_eq!(m.vector_edges().len(), 4);
}

#[test]
fn non_manifold_edge_is_accepted() {
    let options = MeshOptions {
        non_manifold: NonManifoldHandling::Warn,
        ..MeshOptions::default()
    };
    let m = Trimesh::<()>::with_options(
        vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z, Vec3::NEG_Y],
        vec![
            vec![v(0), v(1), v(2)],
            vec![v(1), v(0), v(3)],
            vec![v(1), v(0), v(4)],
        ],
        options,
    )
    .unwrap();
    let e = m.edge_id(v(0), v(1)).unwrap();
    assert_eq!(m.adj_e2p(e).len(), 3);
    assert!(!m.edge_is_manifold(e, true));
    assert_eq!(m.non_manifold_edges(), vec![e]);
    // no polygon pair is adjacent across a non-manifold edge
    assert!(m.poly_ids().all(|p| m.adj_p2p(p).is_empty()));
    m.validate_invariants().unwrap();
}

#[test]
fn channels_resolve_first_corner() {
    let soup = SurfaceSoup {
        verts: vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE],
        polys: vec![vec![v(0), v(1), v(2)], vec![v(1), v(3), v(2)]],
        tex: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
        ],
        // corner (poly 1, vertex 2) disagrees with (poly 0, vertex 2)
        poly_tex: vec![vec![0, 1, 2], vec![1, 3, 4]],
        normals: vec![Vec3::new(0.0, 0.0, 2.0)],
        poly_normals: vec![vec![0, 0, 0], vec![0, 0, 0]],
    };
    let m = Trimesh::<()>::from_soup(soup, MeshOptions::default()).unwrap();
    assert_eq!(m.vert_uvw(v(2)), Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(m.vert_uvw(v(3)), Vec3::new(1.0, 1.0, 0.0));
    assert_eq!(m.vert_normal(v(1)), Vec3::Z);
}

#[test]
fn channels_must_line_up() {
    let soup = SurfaceSoup {
        verts: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        polys: vec![vec![v(0), v(1), v(2)]],
        tex: vec![Vec3::ZERO],
        poly_tex: vec![vec![0, 0]],
        ..SurfaceSoup::default()
    };
    let err = Trimesh::<()>::from_soup(soup, MeshOptions::default()).unwrap_err();
    assert_eq!(
        err,
        MeshError::ChannelLengthMismatch {
            channel: "tex",
            expected: 3,
            found: 2
        }
    );

    let soup = SurfaceSoup {
        verts: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        polys: vec![vec![v(0), v(1), v(2)]],
        tex: vec![Vec3::ZERO; 2],
        ..SurfaceSoup::default()
    };
    assert!(Trimesh::<()>::from_soup(soup, MeshOptions::default()).is_err());
}

#[test]
fn channels_do_not_hide_bad_vertex_ids() {
    let soup = SurfaceSoup {
        verts: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        polys: vec![vec![v(0), v(1), v(7)]],
        tex: vec![Vec3::ZERO],
        poly_tex: vec![vec![0, 0, 0]],
        ..SurfaceSoup::default()
    };
    let err = Trimesh::<()>::from_soup(soup, MeshOptions::default()).unwrap_err();
    assert_eq!(err, MeshError::VertOutOfRange { vid: v(7), len: 3 });
}

#[test]
fn append_shifts_ids_and_keeps_payloads() {
    let mut a = Quadmesh::<u32, (), &'static str>::new(
        vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
        vec![vec![v(0), v(1), v(2), v(3)]],
    )
    .unwrap();
    let mut b = a.clone();
    *b.vert_data_mut(v(3)) = 7;
    *b.poly_data_mut(PolyId::new(0)) = "second";
    b.vert_set_pos(v(0), Vec3::new(0.0, 0.0, 1.0)).unwrap();

    a.append(&b).unwrap();
    assert_eq!(a.num_verts(), 8);
    assert_eq!(a.num_edges(), 8);
    assert_eq!(a.num_polys(), 2);
    assert_eq!(a.poly_verts(PolyId::new(1)), &[v(4), v(5), v(6), v(7)]);
    assert_eq!(*a.vert_data(v(7)), 7);
    assert_eq!(*a.poly_data(PolyId::new(1)), "second");
    assert_eq!(a.vert(v(4)), Vec3::new(0.0, 0.0, 1.0));
    a.validate_invariants().unwrap();
}

#[test]
fn clear_empties_everything() {
    let mut m = unit_quad();
    m.clear();
    assert_eq!((m.num_verts(), m.num_edges(), m.num_polys()), (0, 0, 0));
    assert!(m.bbox().is_empty());
    m.validate_invariants().unwrap();
}

#[test]
fn aggregates_are_invalidated() {
    let mut m = unit_quad();
    assert!((m.mesh_area() - 1.0).abs() < 1e-12);
    m.vert_set_pos(v(2), Vec3::new(2.0, 2.0, 0.0)).unwrap();
    assert!((m.mesh_area() - 2.0).abs() < 1e-12);
    assert_eq!(m.bbox().max, Vec3::new(2.0, 2.0, 0.0));
}
