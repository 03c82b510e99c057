//! Velocity at arbitrary field points from a solved panel distribution

use crate::core::geometry::Vec3D;
use crate::core::mesh::Panel;
use crate::core::parallel::parallel_map;
use crate::core::wake::Wake;

/// Evaluates V∞ + Σ_j (μ_j D_j + σ_j S_j) + wake at field points
#[derive(Debug, Clone, Copy)]
pub struct PointVelocity<'a> {
    panels: &'a [Panel],
    source: &'a [f64],
    doublet: &'a [f64],
    freestream: Vec3D,
    wake: Option<&'a Wake>,
}

impl<'a> PointVelocity<'a> {
    /// Evaluator for the surface singularities alone
    pub fn new(
        panels: &'a [Panel],
        source: &'a [f64],
        doublet: &'a [f64],
        freestream: Vec3D,
    ) -> Self {
        Self {
            panels,
            source,
            doublet,
            freestream,
            wake: None,
        }
    }

    /// Include the wake segments
    pub fn with_wake(mut self, wake: &'a Wake) -> Self {
        self.wake = Some(wake);
        self
    }

    /// Velocity at `p`
    pub fn at(&self, p: Vec3D) -> Vec3D {
        self.at_skipping(p, None)
    }

    /// Velocity at `p`, leaving out segment `skip.1` of trailing edge `skip.0`
    pub fn at_skipping(&self, p: Vec3D, skip: Option<(usize, usize)>) -> Vec3D {
        let mut v = self.freestream + surface_induced(self.panels, self.source, self.doublet, p);
        if let Some(wake) = self.wake {
            v += wake.induced_velocity(p, skip);
        }
        v
    }

    /// Velocities at many points, in input order
    pub fn velocity_list(&self, points: &[Vec3D]) -> Vec<Vec3D> {
        parallel_map(points, |&p| self.at(p))
    }
}

/// Σ_j (μ_j · doublet_j(p) + σ_j · source_j(p))
pub(crate) fn surface_induced(
    panels: &[Panel],
    source: &[f64],
    doublet: &[f64],
    p: Vec3D,
) -> Vec3D {
    panels
        .iter()
        .zip(source.iter().zip(doublet))
        .map(|(panel, (&sigma, &mu))| {
            panel.doublet_velocity(p) * mu + panel.source_velocity(p) * sigma
        })
        .sum()
}
