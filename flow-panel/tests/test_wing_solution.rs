//! Wakeless solutions on flat lifting surfaces
//!
//! A thin plate at incidence has a closed-form sanity profile: the doublet
//! distribution is symmetric chordwise and spanwise, the suction side sits
//! ahead of mid-chord and the boundary condition holds to solver precision.

use approx::assert_relative_eq;
use flow_panel::core::mesh::{flat_plate_mesh, flat_plate_triangle_mesh};
use flow_panel::core::{Freestream, Mesh, PanelSolver, PressureModel, Vec3D};

const N_CHORD: usize = 4;
const N_SPAN: usize = 6;

fn plate_at(alpha: f64) -> (Mesh, flow_panel::AeroSolution) {
    let mesh = flat_plate_mesh(1.0, 4.0, N_CHORD, N_SPAN).unwrap();
    let solution = PanelSolver::default()
        .with_freestream(Freestream::new(1.0, alpha, 0.0))
        .solve(&mesh)
        .unwrap();
    (mesh, solution)
}

#[test]
fn test_plate_at_zero_incidence_is_undisturbed() {
    // two triangles in the xy-plane, flow along +x
    let vertices = vec![
        Vec3D::new(0.0, 0.0, 0.0),
        Vec3D::new(1.0, 0.0, 0.0),
        Vec3D::new(1.0, 1.0, 0.0),
        Vec3D::new(0.0, 1.0, 0.0),
    ];
    let mesh = Mesh::new(vertices, &[vec![0, 1, 2], vec![0, 2, 3]], &[]).unwrap();
    let solution = PanelSolver::default().solve(&mesh).unwrap();

    for (&sigma, &mu) in solution.source.iter().zip(&solution.doublet) {
        assert_eq!(sigma, 0.0);
        assert_eq!(mu, 0.0);
    }
    for v in &solution.surface.velocity {
        assert_relative_eq!(v.x, 1.0, epsilon = 1e-12);
    }
    assert_eq!(solution.solves[0].iterations, 0);
}

#[test]
fn test_panel_facing_the_flow() {
    // unit square in the yz-plane with its normal along +x
    let vertices = vec![
        Vec3D::new(0.0, 0.0, 0.0),
        Vec3D::new(0.0, 1.0, 0.0),
        Vec3D::new(0.0, 1.0, 1.0),
        Vec3D::new(0.0, 0.0, 1.0),
    ];
    let mesh = Mesh::new(vertices, &[vec![0, 1, 2, 3]], &[]).unwrap();
    assert_relative_eq!(mesh.normals()[0].x, 1.0, epsilon = 1e-14);

    let solution = PanelSolver::default().solve(&mesh).unwrap();
    assert_relative_eq!(solution.source[0], -1.0, epsilon = 1e-14);
    assert!(solution.max_transpiration() < 1e-8);
}

#[test]
fn test_plate_pressure_distribution() {
    let (_, solution) = plate_at(5.0);
    let row = |i: usize, j: usize| i * N_SPAN + j;

    assert_relative_eq!(solution.source[0], -(5.0f64.to_radians().sin()), epsilon = 1e-12);
    assert!(solution.max_transpiration() < 1e-6);

    for j in 0..N_SPAN {
        let front = solution.surface.cp[row(0, j)];
        let back = solution.surface.cp[row(N_CHORD - 1, j)];
        assert!(front < 0.0, "leading-edge cp {front} at strip {j}");
        assert!(back > 0.0, "trailing-edge cp {back} at strip {j}");
    }

    // the sheet has no thickness, so the doublet is symmetric fore and aft
    for i in 0..N_CHORD {
        for j in 0..N_SPAN {
            let mu = solution.doublet[row(i, j)];
            assert_relative_eq!(mu, solution.doublet[row(i, N_SPAN - 1 - j)], epsilon = 1e-8);
            assert_relative_eq!(mu, solution.doublet[row(N_CHORD - 1 - i, j)], epsilon = 1e-8);
            assert!(mu < 0.0);
        }
    }
    assert_relative_eq!(solution.doublet[row(0, 0)], -0.0314, epsilon = 2e-3);
    assert_relative_eq!(solution.doublet[row(1, 2)], -0.0467, epsilon = 2e-3);
}

#[test]
fn test_triangulated_plate() {
    let mesh = flat_plate_triangle_mesh(1.0, 4.0, N_CHORD, N_SPAN).unwrap();
    let solution = PanelSolver::default()
        .with_freestream(Freestream::new(1.0, 5.0, 0.0))
        .solve(&mesh)
        .unwrap();

    assert_eq!(solution.num_panels(), 2 * N_CHORD * N_SPAN);
    assert!(solution.max_transpiration() < 1e-6);
    assert!(solution.doublet.iter().all(|mu| mu.is_finite()));
    assert!(solution.doublet.iter().sum::<f64>() < 0.0);
}

#[test]
fn test_vertex_fields_cover_the_mesh() {
    let (mesh, solution) = plate_at(3.0);
    assert_eq!(solution.vertices.doublet.len(), mesh.num_vertices());

    // corner vertex 0 touches only panel 0
    assert_relative_eq!(solution.vertices.doublet[0], solution.doublet[0], epsilon = 1e-14);
    assert_relative_eq!(solution.vertices.cp[0], solution.surface.cp[0], epsilon = 1e-14);
}

#[test]
fn test_field_velocity_far_away_is_freestream() {
    let (_, solution) = plate_at(5.0);
    let v_inf = solution.freestream.velocity();

    let far = solution.velocity_at(Vec3D::new(500.0, 300.0, 200.0));
    assert!((far - v_inf).norm() < 1e-5);

    let points = [
        Vec3D::new(0.5, 0.0, 0.3),
        Vec3D::new(-0.2, 1.0, -0.1),
        Vec3D::new(2.0, -1.5, 0.5),
    ];
    let listed = solution.velocity_list(&points);
    for (p, v) in points.iter().zip(&listed) {
        assert_eq!(*v, solution.velocity_at(*p));
    }
}

#[test]
fn test_pressure_model_choice() {
    let mesh = flat_plate_mesh(1.0, 4.0, N_CHORD, N_SPAN).unwrap();
    let solver = PanelSolver::default().with_freestream(Freestream::new(2.0, 5.0, 0.0));
    let ratio = solver.clone().solve(&mesh).unwrap();
    let bernoulli = solver
        .with_pressure_model(PressureModel::Bernoulli)
        .solve(&mesh)
        .unwrap();

    for (i, v) in ratio.surface.velocity.iter().enumerate() {
        let q = v.norm() / 2.0;
        assert_relative_eq!(ratio.surface.cp[i], 1.0 - q, epsilon = 1e-12);
        assert_relative_eq!(bernoulli.surface.cp[i], 1.0 - q * q, epsilon = 1e-12);
    }
}
