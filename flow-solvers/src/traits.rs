//! Core traits for the linear solve
//!
//! - [`LinearOperator`]: anything that can apply y = A x
//! - [`Preconditioner`]: an approximation of A⁻¹ applied to a residual

use ndarray::Array1;

/// Trait for linear operators (matrices) that can perform matrix-vector products.
///
/// GMRES only ever touches the system through this trait, so dense, sparse and
/// matrix-free influence operators are interchangeable.
pub trait LinearOperator: Send + Sync {
    /// Number of rows in the operator
    fn num_rows(&self) -> usize;

    /// Number of columns in the operator
    fn num_cols(&self) -> usize;

    /// Apply the operator: y = A * x
    fn apply(&self, x: &Array1<f64>) -> Array1<f64>;

    /// Apply the transpose: y = A^T * x
    fn apply_transpose(&self, x: &Array1<f64>) -> Array1<f64>;

    /// Check if the operator is square
    fn is_square(&self) -> bool {
        self.num_rows() == self.num_cols()
    }
}

/// Trait for preconditioners used in iterative solvers.
///
/// A preconditioner M approximates A^(-1), so that M*A is better conditioned
/// than A alone.
pub trait Preconditioner: Send + Sync {
    /// Apply the preconditioner: y = M * r
    fn apply(&self, r: &Array1<f64>) -> Array1<f64>;
}

/// Identity preconditioner (no preconditioning)
#[derive(Clone, Debug, Default)]
pub struct IdentityPreconditioner;

impl Preconditioner for IdentityPreconditioner {
    fn apply(&self, r: &Array1<f64>) -> Array1<f64> {
        r.clone()
    }
}
