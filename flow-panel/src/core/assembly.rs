//! Influence assembly at the panel control points
//!
//! Builds the dense n×n table of unit-doublet velocities and the velocity
//! induced by the (known) source distribution. Rows are independent and are
//! computed in parallel when the `native` feature is enabled.

use ndarray::Array2;

use crate::core::geometry::Vec3D;
use crate::core::mesh::Panel;
use crate::core::parallel::parallel_map_indexed;

/// Velocity influence of every panel on every control point
#[derive(Debug, Clone, PartialEq)]
pub struct InfluenceMatrix {
    /// `doublet[[i, j]]`: velocity at control point i of unit doublet panel j
    pub doublet: Array2<Vec3D>,
    /// `source[i]`: Σ_j σ_j · (unit source panel j at control point i), freestream excluded
    pub source: Vec<Vec3D>,
}

impl InfluenceMatrix {
    /// Evaluate all panel pairs for the given source strengths
    pub fn assemble(panels: &[Panel], source_strengths: &[f64]) -> Self {
        let n = panels.len();
        let rows = parallel_map_indexed(n, |i| {
            influence_row(panels, source_strengths, panels[i].control_point())
        });

        let doublet = Array2::from_shape_fn((n, n), |(i, j)| rows[i].0[j]);
        let source = rows.into_iter().map(|(_, b)| b).collect();
        Self { doublet, source }
    }

    /// Number of panels (rows and columns)
    pub fn num_panels(&self) -> usize {
        self.source.len()
    }

    /// Σ_j μ_j · AIC_ij + B_i at control point i, freestream and wake excluded
    pub fn induced_velocity(&self, i: usize, doublet_strengths: &[f64]) -> Vec3D {
        self.doublet
            .row(i)
            .iter()
            .zip(doublet_strengths)
            .map(|(aic, &mu)| *aic * mu)
            .sum::<Vec3D>()
            + self.source[i]
    }
}

/// Unit-doublet velocities of all panels and the summed source velocity at `point`
pub(crate) fn influence_row(
    panels: &[Panel],
    source_strengths: &[f64],
    point: Vec3D,
) -> (Vec<Vec3D>, Vec3D) {
    let doublet = panels.iter().map(|p| p.doublet_velocity(point)).collect();
    let source = panels
        .iter()
        .zip(source_strengths)
        .map(|(p, &sigma)| p.source_velocity(point) * sigma)
        .sum();
    (doublet, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::freestream::Freestream;
    use crate::core::mesh::flat_plate_mesh;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_diagonal_is_self_influence() {
        let mesh = flat_plate_mesh(2.0, 2.0, 2, 2).unwrap();
        let sigma = vec![0.0; mesh.num_panels()];
        let aic = InfluenceMatrix::assemble(mesh.panels(), &sigma);

        assert_eq!(aic.doublet.dim(), (4, 4));
        for i in 0..4 {
            assert_relative_eq!(aic.doublet[[i, i]].z, 2.0 * 2f64.sqrt() / PI, epsilon = 1e-6);
            assert_eq!(aic.source[i], Vec3D::ZERO);
        }
    }

    #[test]
    fn test_rows_match_direct_evaluation() {
        let mesh = flat_plate_mesh(1.0, 3.0, 3, 4).unwrap();
        let sigma = Freestream::new(1.0, 7.0, 0.0).source_strengths(mesh.panels());
        let aic = InfluenceMatrix::assemble(mesh.panels(), &sigma);

        let i = 5;
        let cp = mesh.panels()[i].control_point();
        for (j, p) in mesh.panels().iter().enumerate() {
            assert_eq!(aic.doublet[[i, j]], p.doublet_velocity(cp));
        }
        let b: Vec3D = mesh
            .panels()
            .iter()
            .zip(&sigma)
            .map(|(p, &s)| p.source_velocity(cp) * s)
            .sum();
        assert_eq!(aic.source[i], b);

        let mu = vec![0.0; mesh.num_panels()];
        assert_eq!(aic.induced_velocity(i, &mu), b);
    }
}
