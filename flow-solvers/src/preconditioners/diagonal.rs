//! Diagonal (Jacobi) preconditioner
//!
//! Scales each residual component by the inverse of the matching diagonal
//! entry. For panel systems the diagonal is the self-influence term, which
//! varies with panel size, so this mainly equilibrates rows.

use crate::sparse::CsrMatrix;
use crate::traits::Preconditioner;
use ndarray::Array1;

/// Diagonal entries smaller than this are left unscaled
const MIN_PIVOT: f64 = 1e-30;

/// Diagonal (Jacobi) preconditioner
///
/// M = diag(A), so M^(-1) scales each component by 1/A_ii
#[derive(Debug, Clone)]
pub struct DiagonalPreconditioner {
    inv_diag: Array1<f64>,
}

impl DiagonalPreconditioner {
    /// Create a diagonal preconditioner from a CSR matrix
    pub fn from_csr(matrix: &CsrMatrix) -> Self {
        Self::from_diagonal(&matrix.diagonal())
    }

    /// Create from a diagonal vector directly
    pub fn from_diagonal(diag: &Array1<f64>) -> Self {
        let inv_diag = diag.mapv(|d| if d.abs() > MIN_PIVOT { 1.0 / d } else { 1.0 });
        Self { inv_diag }
    }
}

impl Preconditioner for DiagonalPreconditioner {
    fn apply(&self, r: &Array1<f64>) -> Array1<f64> {
        r * &self.inv_diag
    }
}
