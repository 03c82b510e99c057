//! Error types for the panel solver

use thiserror::Error;

/// Errors raised while building, assembling or solving a panel problem
#[derive(Error, Debug)]
pub enum PanelError {
    /// Degenerate panel geometry (zero area, coincident or collinear corners)
    #[error("Degenerate geometry in panel {panel}: {reason}")]
    Geometry {
        /// Panel index (position in the face list)
        panel: usize,
        /// What made the panel unusable
        reason: String,
    },

    /// Out-of-range or inconsistent index data at the input boundary
    #[error("Invalid index: {0}")]
    Index(String),

    /// The iterative linear solve did not reach its tolerance
    #[error(
        "Linear solve did not converge after {iterations} iterations \
         (relative residual {residual:.3e}, tolerance {tolerance:.1e})"
    )]
    Convergence {
        /// Inner GMRES iterations performed
        iterations: usize,
        /// Final relative residual
        residual: f64,
        /// Requested relative tolerance
        tolerance: f64,
    },

    /// Invalid solver configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// File access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for panel solver operations
pub type Result<T> = std::result::Result<T, PanelError>;

impl PanelError {
    /// Geometry error for a given panel
    pub fn geometry(panel: usize, reason: impl Into<String>) -> Self {
        Self::Geometry {
            panel,
            reason: reason.into(),
        }
    }

    /// Check if this is a geometry error
    pub fn is_geometry(&self) -> bool {
        matches!(self, Self::Geometry { .. })
    }

    /// Check if this is an index-validation error
    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }

    /// Check if this is a convergence failure
    pub fn is_convergence(&self) -> bool {
        matches!(self, Self::Convergence { .. })
    }
}
