//! GMRES (Generalized Minimal Residual) solver
//!
//! Implementation of the restarted GMRES algorithm based on Saad & Schultz (1986),
//! with modified Gram-Schmidt orthogonalisation and Givens rotations.
//!
//! GMRES minimizes the residual in a Krylov subspace and has smooth, monotonic
//! convergence, which suits the non-symmetric influence matrices of panel methods.

use crate::blas_helpers::{axpy, inner_product, vector_norm};
use crate::traits::{IdentityPreconditioner, LinearOperator, Preconditioner};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Right-hand sides below this norm are treated as exactly zero
const ZERO_RHS_NORM: f64 = 1e-15;
/// Arnoldi breakdown threshold (lucky breakdown: exact solution in the subspace)
const BREAKDOWN_TOL: f64 = 1e-14;
/// Threshold for treating Hessenberg entries as zero
const TINY: f64 = 1e-30;
/// Triangular pivots below this fraction of the first one count as zero
const PIVOT_TOL: f64 = 1e-14;

/// GMRES solver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GmresConfig {
    /// Maximum number of outer iterations (restarts)
    pub max_iterations: usize,
    /// Restart parameter (number of inner iterations before restart)
    pub restart: usize,
    /// Relative tolerance for convergence
    pub tolerance: f64,
    /// Print progress every N iterations (0 = no output)
    pub print_interval: usize,
}

impl Default for GmresConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            restart: 50,
            tolerance: 1e-10,
            print_interval: 0,
        }
    }
}

impl GmresConfig {
    /// Create config with specific restart parameter
    pub fn with_restart(restart: usize) -> Self {
        Self {
            restart,
            ..Default::default()
        }
    }
}

/// GMRES solver result
#[derive(Debug, Clone)]
pub struct GmresSolution {
    /// Solution vector
    pub x: Array1<f64>,
    /// Total number of inner iterations (matrix-vector products)
    pub iterations: usize,
    /// Number of restarts performed
    pub restarts: usize,
    /// Final relative residual
    pub residual: f64,
    /// Whether convergence was achieved
    pub converged: bool,
}

/// Solve Ax = b using the restarted GMRES method
///
/// # Arguments
/// * `operator` - Linear operator representing A
/// * `b` - Right-hand side vector
/// * `config` - Solver configuration
pub fn gmres<A>(operator: &A, b: &Array1<f64>, config: &GmresConfig) -> GmresSolution
where
    A: LinearOperator,
{
    gmres_with_guess(operator, b, None, config)
}

/// Solve Ax = b using GMRES with an initial guess
pub fn gmres_with_guess<A>(
    operator: &A,
    b: &Array1<f64>,
    x0: Option<&Array1<f64>>,
    config: &GmresConfig,
) -> GmresSolution
where
    A: LinearOperator,
{
    gmres_preconditioned_with_guess(operator, &IdentityPreconditioner, b, x0, config)
}

/// GMRES solver with preconditioner and initial guess
///
/// Solves Ax = b using left preconditioning: M⁻¹Ax = M⁻¹b.
/// The convergence test is made on the preconditioned residual.
pub fn gmres_preconditioned_with_guess<A, P>(
    operator: &A,
    precond: &P,
    b: &Array1<f64>,
    x0: Option<&Array1<f64>>,
    config: &GmresConfig,
) -> GmresSolution
where
    A: LinearOperator,
    P: Preconditioner,
{
    let n = b.len();
    let m = config.restart.max(1);

    let pb = precond.apply(b);
    let b_norm = vector_norm(&pb);
    if b_norm < ZERO_RHS_NORM {
        return GmresSolution {
            x: Array1::zeros(n),
            iterations: 0,
            restarts: 0,
            residual: 0.0,
            converged: true,
        };
    }

    let mut x = match x0 {
        Some(guess) if guess.len() == n => guess.clone(),
        _ => Array1::zeros(n),
    };

    let mut total_iterations = 0;
    let mut restarts = 0;

    for _outer in 0..config.max_iterations {
        // r = M⁻¹(b - Ax)
        let residual: Array1<f64> = b - &operator.apply(&x);
        let r = precond.apply(&residual);
        let beta = vector_norm(&r);

        let rel_residual = beta / b_norm;
        if rel_residual < config.tolerance {
            return GmresSolution {
                x,
                iterations: total_iterations,
                restarts,
                residual: rel_residual,
                converged: true,
            };
        }

        // Krylov basis and upper Hessenberg matrix
        let mut v: Vec<Array1<f64>> = Vec::with_capacity(m + 1);
        v.push(&r / beta);
        let mut h = Array2::<f64>::zeros((m + 1, m));

        let mut cs: Vec<f64> = Vec::with_capacity(m);
        let mut sn: Vec<f64> = Vec::with_capacity(m);

        // Right-hand side of the least squares problem
        let mut g = Array1::<f64>::zeros(m + 1);
        g[0] = beta;

        let mut columns = m;
        let mut broke_down = false;

        for j in 0..m {
            total_iterations += 1;

            // w = M⁻¹ A v_j
            let mut w = precond.apply(&operator.apply(&v[j]));

            // Modified Gram-Schmidt
            for i in 0..=j {
                h[[i, j]] = inner_product(&v[i], &w);
                axpy(-h[[i, j]], &v[i], &mut w);
            }

            let w_norm = vector_norm(&w);
            h[[j + 1, j]] = w_norm;

            let breakdown = w_norm < BREAKDOWN_TOL;
            if !breakdown {
                v.push(&w / w_norm);
            }

            // Apply previous Givens rotations to the new column
            for i in 0..j {
                let temp = cs[i] * h[[i, j]] + sn[i] * h[[i + 1, j]];
                h[[i + 1, j]] = -sn[i] * h[[i, j]] + cs[i] * h[[i + 1, j]];
                h[[i, j]] = temp;
            }

            let (c, s) = givens_rotation(h[[j, j]], h[[j + 1, j]]);
            cs.push(c);
            sn.push(s);

            h[[j, j]] = c * h[[j, j]] + s * h[[j + 1, j]];
            h[[j + 1, j]] = 0.0;

            let temp = c * g[j] + s * g[j + 1];
            g[j + 1] = -s * g[j] + c * g[j + 1];
            g[j] = temp;

            let rel_residual = g[j + 1].abs() / b_norm;

            if config.print_interval > 0 && total_iterations % config.print_interval == 0 {
                log::info!(
                    "GMRES iteration {} (restart {}): relative residual = {:.6e}",
                    total_iterations,
                    restarts,
                    rel_residual
                );
            }

            if rel_residual < config.tolerance || breakdown {
                columns = j + 1;
                broke_down = breakdown;
                break;
            }
        }

        // A zero pivot means the Krylov space holds no solution: the
        // operator is singular on it and the residual estimate is void
        let Some(y) = solve_upper_triangular(&h, &g, columns) else {
            log::warn!(
                "GMRES stagnated on a singular Hessenberg block after {} iterations",
                total_iterations
            );
            break;
        };
        for (i, &yi) in y.iter().enumerate() {
            axpy(yi, &v[i], &mut x);
        }

        if broke_down {
            break;
        }
        if columns == m {
            restarts += 1;
        }
    }

    // The Givens estimate is not trusted; convergence is decided on the
    // recomputed residual
    let residual: Array1<f64> = b - &operator.apply(&x);
    let rel_residual = vector_norm(&precond.apply(&residual)) / b_norm;

    GmresSolution {
        x,
        iterations: total_iterations,
        restarts,
        residual: rel_residual,
        converged: rel_residual < config.tolerance,
    }
}

/// Compute Givens rotation coefficients zeroing `b` against `a`
#[inline]
fn givens_rotation(a: f64, b: f64) -> (f64, f64) {
    if b.abs() < TINY {
        return (1.0, 0.0);
    }
    if a.abs() < TINY {
        return (0.0, b.signum());
    }

    let r = a.hypot(b);
    (a / r, b / r)
}

/// Solve upper triangular system Hy = g over the leading k×k block
///
/// Returns `None` when a diagonal entry vanishes.
fn solve_upper_triangular(h: &Array2<f64>, g: &Array1<f64>, k: usize) -> Option<Vec<f64>> {
    let mut y = vec![0.0; k];

    for i in (0..k).rev() {
        let mut sum = g[i];
        for j in (i + 1)..k {
            sum -= h[[i, j]] * y[j];
        }
        if h[[i, i]].abs() <= PIVOT_TOL * h[[0, 0]].abs().max(TINY) {
            return None;
        }
        y[i] = sum / h[[i, i]];
    }

    Some(y)
}
