//! Uniform onset flow and the source strengths it induces

use serde::{Deserialize, Serialize};

use crate::core::geometry::Vec3D;
use crate::core::mesh::Panel;

/// Uniform freestream given by speed, angle of attack and sideslip (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Freestream {
    /// Freestream speed |V∞|
    pub speed: f64,
    /// Angle of attack α in degrees
    pub alpha: f64,
    /// Sideslip angle β in degrees
    pub beta: f64,
}

impl Default for Freestream {
    fn default() -> Self {
        Self {
            speed: 1.0,
            alpha: 0.0,
            beta: 0.0,
        }
    }
}

impl Freestream {
    /// Create a freestream; angles in degrees
    pub fn new(speed: f64, alpha: f64, beta: f64) -> Self {
        Self { speed, alpha, beta }
    }

    /// V∞ = speed · (cos β cos α, sin β cos α, sin α)
    pub fn velocity(&self) -> Vec3D {
        let (sa, ca) = self.alpha.to_radians().sin_cos();
        let (sb, cb) = self.beta.to_radians().sin_cos();
        Vec3D::new(cb * ca, sb * ca, sa) * self.speed
    }

    /// Constant source strength per panel, σ = -V∞ · n
    pub fn source_strengths(&self, panels: &[Panel]) -> Vec<f64> {
        let v = self.velocity();
        panels.iter().map(|p| -v.dot(&p.normal())).collect()
    }
}
