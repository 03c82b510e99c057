//! Sparse matrix storage (CSR format)
//!
//! The panel system is dense, but it is handed to the solver as explicit
//! (row, col, value) triplets so the same path serves any sparsity pattern.

mod csr;

pub use csr::CsrMatrix;
