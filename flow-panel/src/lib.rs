//! # Flow Panel: 3D potential-flow panel method
//!
//! Constant-strength source/doublet panels on triangle and quad meshes,
//! solved for zero normal velocity, with a time-stepped free wake shed from
//! the trailing edges.
//!
//! ## Features
//!
//! - Exact near-field and point-singularity far-field kernels
//! - Influence assembly in parallel with Rayon (`native` feature)
//! - GMRES solve with warm starts across wake steps
//! - JSON configuration, mesh and solution files
//!

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;

pub use crate::core::{AeroSolution, Mesh, PanelError, PanelSolver, SolverConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (set during build)
pub const GIT_HASH: &str = env!("GIT_HASH");
