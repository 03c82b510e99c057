//! Iterative solvers for linear systems
//!
//! Only the restarted GMRES method is provided: the panel influence matrix is
//! dense and non-symmetric, which rules out CG-type methods.

mod gmres;

pub use gmres::{
    GmresConfig, GmresSolution, gmres, gmres_preconditioned_with_guess, gmres_with_guess,
};
