//! JSON configuration of a panel solve
//!
//! Every section and field is optional; missing values take their defaults.
//!
//! ## Example
//!
//! ```json
//! {
//!     "description": "rectangular wing, 5 degrees",
//!     "freestream": { "speed": 1.0, "alpha": 5.0, "beta": 0.0 },
//!     "wake": {
//!         "rows": 8,
//!         "time_step": 0.25,
//!         "circulation": "kutta_jump",
//!         "edge_mode": "closed_ring"
//!     },
//!     "linear_solver": { "tolerance": 1e-10, "restart": 50, "jacobi": true },
//!     "vertex_weighting": "area"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use flow_solvers::GmresConfig;

use crate::core::error::{PanelError, Result};
use crate::core::freestream::Freestream;
use crate::core::postprocess::{PressureModel, VertexWeighting};
use crate::core::wake::{WakeCirculation, WakeEdgeMode};

/// Complete solver configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Free-form problem description
    pub description: String,
    /// Onset flow
    pub freestream: Freestream,
    /// Wake rollup parameters
    pub wake: WakeConfig,
    /// GMRES settings
    pub linear_solver: LinearSolverConfig,
    /// Averaging used for per-vertex fields
    pub vertex_weighting: VertexWeighting,
    /// Pressure-coefficient formula
    pub pressure: PressureModel,
    /// Log phase progress at info level
    pub verbose: bool,
}

/// Wake rollup parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WakeConfig {
    /// Wake rows per trailing edge, including the trailing edge itself (≤ 1 disables rollup)
    pub rows: usize,
    /// Convection time step
    pub time_step: f64,
    /// Circulation given to each newly shed segment
    pub circulation: WakeCirculation,
    /// How a wake segment induces velocity
    pub edge_mode: WakeEdgeMode,
}

impl Default for WakeConfig {
    fn default() -> Self {
        Self {
            rows: 1,
            time_step: 0.1,
            circulation: WakeCirculation::default(),
            edge_mode: WakeEdgeMode::default(),
        }
    }
}

impl WakeConfig {
    /// Number of rollup steps performed
    pub fn num_steps(&self) -> usize {
        self.rows.saturating_sub(1)
    }
}

/// GMRES settings plus the optional Jacobi preconditioner
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearSolverConfig {
    /// Restart length, iteration cap, tolerance and progress interval
    #[serde(flatten)]
    pub gmres: GmresConfig,
    /// Left-precondition with the matrix diagonal
    pub jacobi: bool,
}

impl SolverConfig {
    /// Load a configuration from a JSON file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let fs = &self.freestream;
        if !(fs.speed.is_finite() && fs.speed > 0.0) {
            return Err(PanelError::Config(format!(
                "freestream speed must be positive and finite, got {}",
                fs.speed
            )));
        }
        if !(fs.alpha.is_finite() && fs.beta.is_finite()) {
            return Err(PanelError::Config("freestream angles must be finite".into()));
        }

        if self.wake.rows > 1 && !(self.wake.time_step.is_finite() && self.wake.time_step > 0.0) {
            return Err(PanelError::Config(format!(
                "wake time step must be positive, got {}",
                self.wake.time_step
            )));
        }
        if let WakeCirculation::Fixed(gamma) = self.wake.circulation {
            if !gamma.is_finite() {
                return Err(PanelError::Config("fixed wake circulation must be finite".into()));
            }
        }

        let gmres = &self.linear_solver.gmres;
        if gmres.restart == 0 || gmres.max_iterations == 0 {
            return Err(PanelError::Config(
                "GMRES restart and max_iterations must be at least 1".into(),
            ));
        }
        if !(gmres.tolerance.is_finite() && gmres.tolerance > 0.0) {
            return Err(PanelError::Config(format!(
                "GMRES tolerance must be positive, got {}",
                gmres.tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = SolverConfig::default();
        config.validate().unwrap();
        assert_eq!(config.wake.num_steps(), 0);
        assert_eq!(config.wake.circulation, WakeCirculation::Fixed(-5.0));
        assert_eq!(config.vertex_weighting, VertexWeighting::Equal);
        assert_eq!(config.pressure, PressureModel::SpeedRatio);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "freestream": { "alpha": 4.0 },
            "wake": { "rows": 5, "circulation": "kutta_jump" },
            "linear_solver": { "tolerance": 1e-8, "jacobi": true }
        }"#;
        let config: SolverConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.freestream.speed, 1.0);
        assert_eq!(config.freestream.alpha, 4.0);
        assert_eq!(config.wake.num_steps(), 4);
        assert_eq!(config.wake.circulation, WakeCirculation::KuttaJump);
        assert_eq!(config.wake.edge_mode, WakeEdgeMode::ClosedRing);
        assert_eq!(config.linear_solver.gmres.tolerance, 1e-8);
        assert_eq!(config.linear_solver.gmres.restart, 50);
        assert!(config.linear_solver.jacobi);
    }

    #[test]
    fn test_fixed_circulation_json() {
        let json = r#"{
            "wake": { "circulation": { "fixed": -2.5 }, "edge_mode": "bound_edge_only" }
        }"#;
        let config: SolverConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.wake.circulation, WakeCirculation::Fixed(-2.5));
        assert_eq!(config.wake.edge_mode, WakeEdgeMode::BoundEdgeOnly);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = SolverConfig::default();
        config.freestream.speed = 0.0;
        assert!(matches!(config.validate(), Err(PanelError::Config(_))));

        let mut config = SolverConfig::default();
        config.wake.rows = 4;
        config.wake.time_step = -1.0;
        assert!(config.validate().is_err());

        let mut config = SolverConfig::default();
        config.linear_solver.gmres.restart = 0;
        assert!(config.validate().is_err());

        let mut config = SolverConfig::default();
        config.linear_solver.gmres.tolerance = 0.0;
        assert!(config.validate().is_err());
    }
}
