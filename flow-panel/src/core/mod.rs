//! Source/doublet panel method for steady potential flow
//!
//! ## Architecture
//!
//! - `geometry`: `Vec3D`, local-plane points, areas
//! - `constants`: numerical thresholds shared by the kernels
//! - `mesh`: panel builder, vertex adjacency, trailing edges, generators
//! - `kernels`: source, doublet and line-vortex induced velocities
//! - `freestream`: onset flow and source strengths
//! - `assembly`: influence of every panel on every control point
//! - `system`: Neumann boundary-condition system and its GMRES solve
//! - `wake`: trailing-edge filaments, segment history, rollup mechanics
//! - `velocity`: velocity at arbitrary field points
//! - `postprocess`: per-panel and per-vertex fields
//! - `arrays`: flat-array entry points sharing the same kernels
//! - `config`, `io`: JSON configuration, mesh and solution files
//! - `panel_solver`: high-level API
//! - `parallel`: rayon-backed maps with a sequential fallback

pub mod arrays;
pub mod assembly;
pub mod config;
pub mod constants;
pub mod error;
pub mod freestream;
pub mod geometry;
pub mod io;
pub mod kernels;
pub mod mesh;
pub mod panel_solver;
pub mod parallel;
pub mod postprocess;
pub mod system;
pub mod velocity;
pub mod wake;

pub use arrays::{FlatPanels, FlatWake, FlatWakeBuffers, InfluenceArrays};
pub use assembly::InfluenceMatrix;
pub use config::{LinearSolverConfig, SolverConfig, WakeConfig};
pub use error::{PanelError, Result};
pub use freestream::Freestream;
pub use geometry::{Vec2D, Vec3D};
pub use mesh::{Mesh, Panel, PanelShape, TrailingEdge};
pub use panel_solver::{AeroSolution, PanelSolver, SolveStats};
pub use postprocess::{PressureModel, SurfaceField, VertexField, VertexWeighting};
pub use system::NeumannSystem;
pub use velocity::PointVelocity;
pub use wake::{Wake, WakeCirculation, WakeEdgeMode, WakeSegment};
