//! GMRES on dense, diagonally weighted systems shaped like panel influence matrices

use flow_solvers::{
    CsrMatrix, DiagonalPreconditioner, GmresConfig, gmres, gmres_preconditioned_with_guess,
    gmres_with_guess,
};
use ndarray::Array1;

/// Dense matrix with a dominant self term and 1/r² decaying coupling
fn influence_like_triplets(n: usize) -> Vec<(usize, usize, f64)> {
    let mut triplets = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let value = if i == j {
                0.5 + 0.01 * i as f64
            } else {
                let d = (i as f64 - j as f64).abs();
                -0.05 / (d * d) * if j > i { 1.0 } else { 0.7 }
            };
            triplets.push((i, j, value));
        }
    }
    triplets
}

fn residual(a: &CsrMatrix, x: &Array1<f64>, b: &Array1<f64>) -> f64 {
    let r = &a.matvec(x) - b;
    r.iter().map(|v| v * v).sum::<f64>().sqrt() / b.iter().map(|v| v * v).sum::<f64>().sqrt()
}

#[test]
fn test_dense_system_converges() {
    let n = 40;
    let a = CsrMatrix::from_triplets(n, n, influence_like_triplets(n));
    assert_eq!(a.nnz(), n * n);

    let b = Array1::from_iter((0..n).map(|i| -((i as f64) * 0.3).cos()));
    let solution = gmres(&a, &b, &GmresConfig::default());

    assert!(solution.converged);
    assert!(residual(&a, &solution.x, &b) < 1e-9);
}

#[test]
fn test_warm_start_reduces_iterations() {
    let n = 40;
    let a = CsrMatrix::from_triplets(n, n, influence_like_triplets(n));
    let b = Array1::from_iter((0..n).map(|i| 1.0 + 0.01 * i as f64));
    let config = GmresConfig::default();

    let cold = gmres(&a, &b, &config);
    assert!(cold.converged);

    // Slightly perturbed right-hand side, as between two wake steps
    let b2 = &b * 1.001;
    let warm = gmres_with_guess(&a, &b2, Some(&cold.x), &config);
    let fresh = gmres(&a, &b2, &config);

    assert!(warm.converged);
    assert!(warm.iterations <= fresh.iterations);
}

#[test]
fn test_preconditioned_matches_plain() {
    let n = 25;
    let a = CsrMatrix::from_triplets(n, n, influence_like_triplets(n));
    let b = Array1::from_iter((0..n).map(|i| (i as f64).sin()));
    let config = GmresConfig::default();

    let plain = gmres(&a, &b, &config);
    let precond = DiagonalPreconditioner::from_csr(&a);
    let jacobi = gmres_preconditioned_with_guess(&a, &precond, &b, None, &config);

    assert!(plain.converged && jacobi.converged);
    for (p, q) in plain.x.iter().zip(jacobi.x.iter()) {
        assert!((p - q).abs() < 1e-7);
    }
}

#[test]
fn test_repeated_row_with_inconsistent_rhs_is_not_converged() {
    let n = 20;
    let mut triplets: Vec<_> = influence_like_triplets(n)
        .into_iter()
        .filter(|&(i, _, _)| i != n - 1)
        .collect();
    let copied: Vec<_> = triplets
        .iter()
        .filter(|&&(i, _, _)| i == n - 2)
        .map(|&(_, j, v)| (n - 1, j, v))
        .collect();
    triplets.extend(copied);
    let a = CsrMatrix::from_triplets(n, n, triplets);

    let mut b = Array1::ones(n);
    b[n - 1] = -1.0;
    let solution = gmres(&a, &b, &GmresConfig::default());

    assert!(!solution.converged);
    assert!(solution.residual > 1e-3);
    assert!((solution.residual - residual(&a, &solution.x, &b)).abs() < 1e-10);
}
