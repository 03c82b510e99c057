//! High-level panel solver API
//!
//! Ties the pieces together: source strengths from the freestream,
//! influence assembly, the wakeless Neumann solve, wake rollup and the
//! final field reconstruction.
//!
//! # Example
//!
//! ```
//! use flow_panel::core::{Freestream, PanelSolver, WakeCirculation};
//! use flow_panel::core::mesh::flat_plate_mesh;
//!
//! let mesh = flat_plate_mesh(1.0, 4.0, 4, 6)?;
//! let solution = PanelSolver::default()
//!     .with_freestream(Freestream::new(1.0, 5.0, 0.0))
//!     .with_wake_rows(4)
//!     .with_time_step(0.25)
//!     .with_wake_circulation(WakeCirculation::KuttaJump)
//!     .solve(&mesh)?;
//!
//! assert_eq!(solution.doublet.len(), 24);
//! assert_eq!(solution.te_filament_points().len(), 6 * 6 * 4);
//! # Ok::<(), flow_panel::core::PanelError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::core::assembly::InfluenceMatrix;
use crate::core::config::{LinearSolverConfig, SolverConfig};
use crate::core::error::{PanelError, Result};
use crate::core::freestream::Freestream;
use crate::core::geometry::Vec3D;
use crate::core::mesh::Mesh;
use crate::core::parallel::{is_parallel_available, parallel_map, parallel_map_indexed};
use crate::core::postprocess::{PressureModel, SurfaceField, VertexField, VertexWeighting};
use crate::core::system::NeumannSystem;
use crate::core::velocity::PointVelocity;
use crate::core::wake::{RowVelocities, Wake, WakeCirculation, WakeEdgeMode};

/// Statistics of one linear solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveStats {
    /// Wake step that triggered the solve (`None` for the wakeless solve)
    pub wake_step: Option<usize>,
    /// GMRES inner iterations
    pub iterations: usize,
    /// Final relative residual
    pub residual: f64,
}

/// Panel solver configured through builder methods
#[derive(Debug, Clone, Default)]
pub struct PanelSolver {
    config: SolverConfig,
}

impl PanelSolver {
    /// Create a solver from a configuration
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Set the onset flow
    pub fn with_freestream(mut self, freestream: Freestream) -> Self {
        self.config.freestream = freestream;
        self
    }

    /// Set the number of wake rows (≤ 1 disables rollup)
    pub fn with_wake_rows(mut self, rows: usize) -> Self {
        self.config.wake.rows = rows;
        self
    }

    /// Set the wake convection time step
    pub fn with_time_step(mut self, dt: f64) -> Self {
        self.config.wake.time_step = dt;
        self
    }

    /// Set how new wake segments get their circulation
    pub fn with_wake_circulation(mut self, circulation: WakeCirculation) -> Self {
        self.config.wake.circulation = circulation;
        self
    }

    /// Set how wake segments induce velocity
    pub fn with_edge_mode(mut self, mode: WakeEdgeMode) -> Self {
        self.config.wake.edge_mode = mode;
        self
    }

    /// Set the vertex averaging
    pub fn with_vertex_weighting(mut self, weighting: VertexWeighting) -> Self {
        self.config.vertex_weighting = weighting;
        self
    }

    /// Set the GMRES settings
    pub fn with_linear_solver(mut self, settings: LinearSolverConfig) -> Self {
        self.config.linear_solver = settings;
        self
    }

    /// Set the pressure-coefficient formula
    pub fn with_pressure_model(mut self, pressure: PressureModel) -> Self {
        self.config.pressure = pressure;
        self
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Solve the potential flow around `mesh`
    pub fn solve(&self, mesh: &Mesh) -> Result<AeroSolution> {
        self.config.validate()?;
        if mesh.num_panels() == 0 {
            return Err(PanelError::Index("mesh has no panels".into()));
        }

        let config = &self.config;
        let verbose = config.verbose;
        let freestream = config.freestream;
        let v_inf = freestream.velocity();

        if verbose {
            log::info!(
                "Solving {} panels, {} vertices, {} trailing edges, {} wake rows ({})",
                mesh.num_panels(),
                mesh.num_vertices(),
                mesh.num_trailing_edges(),
                config.wake.rows,
                if is_parallel_available() { "parallel" } else { "sequential" }
            );
        }

        // Step 1: source strengths from the freestream
        let source = freestream.source_strengths(mesh.panels());

        // Step 2: influence of every panel on every control point
        let influence = InfluenceMatrix::assemble(mesh.panels(), &source);
        if verbose {
            log::info!("Assembled {}x{} influence matrix", mesh.num_panels(), mesh.num_panels());
        }

        // Step 3: wakeless solve
        let system = NeumannSystem::assemble(mesh.panels(), &influence, v_inf);
        let first = system.solve(&system.rhs(None), None, &config.linear_solver)?;
        let mut solves = vec![SolveStats {
            wake_step: None,
            iterations: first.iterations,
            residual: first.residual,
        }];
        let mut doublet = first.doublet;
        let mut surface =
            SurfaceField::compute(mesh, &influence, &doublet, v_inf, None, config.pressure);
        let mut wake_velocity = None;

        // Step 4: wake rollup
        let mut wake = Wake::new(mesh, config.wake.rows, config.wake.edge_mode);
        for k in 0..config.wake.num_steps() {
            let rows = {
                let field =
                    PointVelocity::new(mesh.panels(), &source, &doublet, v_inf).with_wake(&wake);
                row_velocities(mesh, &wake, &surface, &field)
            };
            wake.convect(&rows, config.wake.time_step);

            let circulations: Vec<f64> = mesh
                .trailing_edges()
                .iter()
                .map(|edge| config.wake.circulation.value(edge, &doublet))
                .collect();
            wake.shed(&circulations);

            let w: Vec<Vec3D> = parallel_map(mesh.panels(), |p| {
                wake.induced_velocity(p.control_point(), None)
            });
            let step = system.solve(&system.rhs(Some(&w)), Some(&doublet), &config.linear_solver)?;
            solves.push(SolveStats {
                wake_step: Some(k),
                iterations: step.iterations,
                residual: step.residual,
            });
            doublet = step.doublet;
            surface =
                SurfaceField::compute(mesh, &influence, &doublet, v_inf, Some(&w), config.pressure);
            wake_velocity = Some(w);

            log::debug!(
                "Wake step {k}: {} rows, {} GMRES iterations",
                wake.num_rows(),
                step.iterations
            );
            if verbose {
                log::info!("Wake step {}/{} done", k + 1, config.wake.num_steps());
            }
        }

        // Step 5: vertex fields
        let vertices =
            VertexField::compute(mesh, config.vertex_weighting, &source, &doublet, &surface);

        if verbose {
            let (cp_min, cp_max) = surface
                .cp
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &c| (lo.min(c), hi.max(c)));
            log::info!("Solution complete. Cp range [{cp_min:.4}, {cp_max:.4}]");
        }

        Ok(AeroSolution {
            mesh: mesh.clone(),
            freestream,
            source,
            doublet,
            surface,
            vertices,
            wake,
            wake_velocity,
            solves,
        })
    }
}

/// Velocities of the current wake rows: row 0 from the surface, the rest from the field
fn row_velocities(
    mesh: &Mesh,
    wake: &Wake,
    surface: &SurfaceField,
    field: &PointVelocity<'_>,
) -> Vec<RowVelocities> {
    parallel_map_indexed(wake.num_trailing_edges(), |t| {
        let edge_wake = &wake.edges()[t];
        let rows = |filament: &[Vec3D], vertex: usize| -> Vec<Vec3D> {
            filament
                .iter()
                .enumerate()
                .map(|(j, &p)| {
                    if j == 0 {
                        surface.vertex_velocity(mesh, vertex)
                    } else {
                        field.at(p)
                    }
                })
                .collect()
        };
        RowVelocities {
            filament1: rows(&edge_wake.filament1, edge_wake.edge.v1),
            filament2: rows(&edge_wake.filament2, edge_wake.edge.v2),
        }
    })
}

/// Result of a panel solve
#[derive(Debug, Clone)]
pub struct AeroSolution {
    /// Solved mesh
    pub mesh: Mesh,
    /// Onset flow
    pub freestream: Freestream,
    /// Source strength per panel
    pub source: Vec<f64>,
    /// Doublet strength per panel
    pub doublet: Vec<f64>,
    /// Per-panel velocity, cp and transpiration
    pub surface: SurfaceField,
    /// Per-vertex averages
    pub vertices: VertexField,
    /// Final wake geometry and segment history
    pub wake: Wake,
    /// Wake-induced velocity at the control points after the last step
    pub wake_velocity: Option<Vec<Vec3D>>,
    /// One entry per linear solve
    pub solves: Vec<SolveStats>,
}

impl AeroSolution {
    /// Evaluator over the solved surface and wake
    pub fn field(&self) -> PointVelocity<'_> {
        PointVelocity::new(
            self.mesh.panels(),
            &self.source,
            &self.doublet,
            self.freestream.velocity(),
        )
        .with_wake(&self.wake)
    }

    /// Velocity at an arbitrary point
    pub fn velocity_at(&self, p: Vec3D) -> Vec3D {
        self.field().at(p)
    }

    /// Velocities at many points
    pub fn velocity_list(&self, points: &[Vec3D]) -> Vec<Vec3D> {
        self.field().velocity_list(points)
    }

    /// Wake filament rows, 6·rows values per trailing edge
    pub fn te_filament_points(&self) -> Vec<f64> {
        self.wake.filament_points()
    }

    /// Number of panels
    pub fn num_panels(&self) -> usize {
        self.doublet.len()
    }

    /// Largest |v · n| over the control points
    pub fn max_transpiration(&self) -> f64 {
        self.surface
            .transpiration
            .iter()
            .fold(0.0f64, |acc, t| acc.max(t.abs()))
    }
}
