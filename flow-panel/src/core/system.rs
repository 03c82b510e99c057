//! Neumann boundary-condition system for the doublet strengths
//!
//! Row i enforces zero normal velocity at control point i:
//!
//! Σ_j μ_j (AIC_ij · n_i) = -(V∞ + B_i + W_i) · n_i
//!
//! where B is the source-induced velocity and W the wake-induced velocity.
//! The matrix does not depend on the wake, so it is assembled once and only
//! the right-hand side changes between wake steps.

use ndarray::Array1;

use flow_solvers::{
    CsrMatrix, DiagonalPreconditioner, gmres_preconditioned_with_guess, gmres_with_guess,
};

use crate::core::assembly::InfluenceMatrix;
use crate::core::config::LinearSolverConfig;
use crate::core::error::{PanelError, Result};
use crate::core::geometry::Vec3D;
use crate::core::mesh::Panel;

/// Outcome of one linear solve
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSolve {
    /// Doublet strength per panel
    pub doublet: Vec<f64>,
    /// GMRES inner iterations
    pub iterations: usize,
    /// Final relative residual
    pub residual: f64,
}

/// Assembled Neumann system
#[derive(Debug, Clone)]
pub struct NeumannSystem {
    matrix: CsrMatrix,
    normals: Vec<Vec3D>,
    onset: Vec<Vec3D>,
}

impl NeumannSystem {
    /// Assemble A_ij = AIC_ij · n_i and keep V∞ + B_i for the right-hand side
    pub fn assemble(panels: &[Panel], influence: &InfluenceMatrix, freestream: Vec3D) -> Self {
        let n = panels.len();
        let normals: Vec<Vec3D> = panels.iter().map(|p| p.normal()).collect();

        let mut triplets = Vec::with_capacity(n * n);
        for (i, normal) in normals.iter().enumerate() {
            for j in 0..n {
                triplets.push((i, j, influence.doublet[[i, j]].dot(normal)));
            }
        }
        let matrix = CsrMatrix::from_triplets(n, n, triplets);
        let onset = influence.source.iter().map(|b| freestream + *b).collect();

        Self {
            matrix,
            normals,
            onset,
        }
    }

    /// Number of unknowns
    pub fn size(&self) -> usize {
        self.normals.len()
    }

    /// System matrix
    pub fn matrix(&self) -> &CsrMatrix {
        &self.matrix
    }

    /// b_i = -(V∞ + B_i + W_i) · n_i; `wake_velocity` is W at the control points
    pub fn rhs(&self, wake_velocity: Option<&[Vec3D]>) -> Array1<f64> {
        Array1::from_shape_fn(self.size(), |i| {
            let mut v = self.onset[i];
            if let Some(w) = wake_velocity {
                v += w[i];
            }
            -v.dot(&self.normals[i])
        })
    }

    /// Solve for the doublet strengths, starting from `guess` when given
    pub fn solve(
        &self,
        rhs: &Array1<f64>,
        guess: Option<&[f64]>,
        settings: &LinearSolverConfig,
    ) -> Result<LinearSolve> {
        let x0 = guess.map(|g| Array1::from_vec(g.to_vec()));

        let solution = if settings.jacobi {
            let precond = DiagonalPreconditioner::from_csr(&self.matrix);
            gmres_preconditioned_with_guess(
                &self.matrix,
                &precond,
                rhs,
                x0.as_ref(),
                &settings.gmres,
            )
        } else {
            gmres_with_guess(&self.matrix, rhs, x0.as_ref(), &settings.gmres)
        };

        if !solution.converged || solution.x.iter().any(|v| !v.is_finite()) {
            return Err(PanelError::Convergence {
                iterations: solution.iterations,
                residual: solution.residual,
                tolerance: settings.gmres.tolerance,
            });
        }

        log::debug!(
            "GMRES converged in {} iterations ({} restarts), residual {:.3e}",
            solution.iterations,
            solution.restarts,
            solution.residual
        );

        Ok(LinearSolve {
            doublet: solution.x.to_vec(),
            iterations: solution.iterations,
            residual: solution.residual,
        })
    }
}
