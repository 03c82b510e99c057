//! Iterative linear solvers for panel-method systems
//!
//! This crate provides the linear-algebra layer used by the panel solver:
//! a compressed sparse row matrix assembled from triplets, the restarted
//! GMRES method (with optional initial guess and left preconditioning) and a
//! Jacobi preconditioner.
//!
//! # Features
//!
//! - **Iterative Solver**: restarted GMRES(m) with Givens rotations
//! - **Preconditioners**: identity and diagonal (Jacobi)
//! - **Sparse Matrices**: CSR format built from COO triplets, duplicates summed
//! - **Parallel matvec**: enabled with the `rayon` feature
//!
//! # Example
//!
//! ```
//! use flow_solvers::{CsrMatrix, GmresConfig, gmres};
//! use ndarray::array;
//!
//! let triplets = vec![(0, 0, 4.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 3.0)];
//! let matrix = CsrMatrix::from_triplets(2, 2, triplets);
//! let rhs = array![1.0, 2.0];
//!
//! let solution = gmres(&matrix, &rhs, &GmresConfig::default());
//! assert!(solution.converged);
//! ```

pub mod blas_helpers;
pub mod iterative;
pub mod preconditioners;
pub mod sparse;
pub mod traits;

// Re-export main types
pub use sparse::CsrMatrix;
pub use traits::{IdentityPreconditioner, LinearOperator, Preconditioner};

// Re-export iterative solvers
pub use iterative::{
    GmresConfig, GmresSolution, gmres, gmres_preconditioned_with_guess, gmres_with_guess,
};

// Re-export preconditioners
pub use preconditioners::DiagonalPreconditioner;
