use mesh_incidence::prelude::*;

fn v(i: usize) -> VertId {
    VertId::new(i)
}

/// `n^3` unit cubes, each split into six tetrahedra around its main diagonal.
/// Every cube uses the same diagonal direction, so shared faces match. Odd
/// paths give negatively oriented cells, which the mesh reorders.
fn cube_grid(n: usize) -> Tetmesh {
    let side = n + 1;
    let id = |i: usize, j: usize, k: usize| (k * side + j) * side + i;
    let mut verts = Vec::new();
    for k in 0..side {
        for j in 0..side {
            for i in 0..side {
                verts.push(Vec3::new(i as f64, j as f64, k as f64));
            }
        }
    }
    let axes = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];
    let paths = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
    let mut cells = Vec::new();
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                for path in paths {
                    let mut at = [i, j, k];
                    let mut tet = [v(id(i, j, k)); 4];
                    for (step, &axis) in path.iter().take(2).enumerate() {
                        for d in 0..3 {
                            at[d] += axes[axis][d];
                        }
                        tet[step + 1] = v(id(at[0], at[1], at[2]));
                    }
                    tet[3] = v(id(i + 1, j + 1, k + 1));
                    cells.push(tet);
                }
            }
        }
    }
    Tetmesh::new(verts, cells).unwrap()
}

#[test]
fn single_cube_counts() {
    let m = cube_grid(1);
    assert_eq!(
        (m.num_verts(), m.num_edges(), m.num_faces(), m.num_cells()),
        (8, 19, 18, 6)
    );
    assert_eq!(m.euler_characteristic(), 1);
    assert_eq!(m.surface_faces().len(), 12);
    assert!((m.mesh_volume() - 1.0).abs() < 1e-12);
    assert!(m.cell_ids().all(|c| m.cell_signed_volume(c) > 0.0));
    m.validate_invariants().unwrap();
}

#[test]
fn grid_surface_export_is_a_sphere() {
    let m = cube_grid(2);
    let out = m.export_surface().unwrap();
    let srf = &out.mesh;
    // 6 sides x 4 squares x 2 triangles
    assert_eq!(srf.num_polys(), 48);
    assert_eq!(srf.num_verts(), 26);
    assert_eq!(srf.euler_characteristic(), 2);
    assert_eq!(srf.genus(), Some(0));
    assert!((srf.mesh_volume().unwrap() - 8.0).abs() < 1e-9);
    assert!((srf.mesh_area() - 24.0).abs() < 1e-9);
    // the centre vertex (1, 1, 1) is interior
    let centre = v(13);
    assert!(!m.vert_is_on_srf(centre));
    assert!(!out.vert_to_srf.contains_key(&centre));
}

#[test]
fn cells_are_one_component_and_split_when_carved() {
    let mut m = cube_grid(1);
    assert_eq!(connected_components(&m).len(), 1);
    let c = CellId::new(0);
    let shared = m.adj_c2c(c).to_vec();
    assert!(!shared.is_empty());
    for &other in &shared {
        let f = m.cell_shared_face(c, other).unwrap();
        assert_eq!(m.cell_adjacent_through_face(c, f), Some(other));
    }
    m.cells_remove(&[CellId::new(1), CellId::new(3), CellId::new(5)])
        .unwrap();
    assert_eq!(m.num_cells(), 3);
    assert!((m.mesh_volume() - 0.5).abs() < 1e-12);
    m.validate_invariants().unwrap();
}

#[test]
fn generic_topology_view() {
    fn describe<M: MeshTopology>(m: &M) -> (Dimension, usize, f64) {
        (m.dimension(), m.num_polys(), m.total_measure())
    }
    let m = cube_grid(1);
    let (dim, n, vol) = describe(&m);
    assert_eq!(dim, Dimension::Volume);
    assert_eq!(n, 6);
    assert!((vol - 1.0).abs() < 1e-12);
    let srf = m.export_surface().unwrap().mesh;
    let (dim, n, area) = describe(&srf);
    assert_eq!(dim, Dimension::Surface);
    assert_eq!(n, 12);
    assert!((area - 6.0).abs() < 1e-12);
}
