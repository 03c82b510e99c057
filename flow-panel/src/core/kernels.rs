//! Induced-velocity kernels of constant-strength panels
//!
//! All panel kernels take the field point in the panel's local frame
//! (relative to the centroid) and return local velocity components per unit
//! strength. [`Panel::source_velocity`] and [`Panel::doublet_velocity`] wrap
//! them with the frame change and the near/far switch.
//!
//! Constant doublet panels are evaluated as the equivalent closed vortex
//! ring, so the near-field doublet kernel is a sum of [`line_vortex`] calls.

use crate::core::constants::{FACTOR, PI2, ZERO_ERROR};
use crate::core::geometry::{Vec2D, Vec3D, safe_division};
use crate::core::mesh::{Panel, PanelShape};

/// Exact velocity of a unit-strength source polygon at local point `p`
pub fn source_near_field<const N: usize>(vertices: &[Vec2D; N], p: Vec3D) -> Vec3D {
    let z2 = p.z * p.z;
    let mut u = 0.0;
    let mut v = 0.0;
    let mut w = 0.0;
    let mut inside = true;

    for k in 0..N {
        let a = vertices[k];
        let b = vertices[(k + 1) % N];

        let ra = ((p.x - a.x).powi(2) + (p.y - a.y).powi(2) + z2).sqrt();
        let rb = ((p.x - b.x).powi(2) + (p.y - b.y).powi(2) + z2).sqrt();
        let d = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
        let s = safe_division(b.y - a.y, d);
        let c = safe_division(b.x - a.x, d);

        // The logarithm is singular only for points on the edge itself
        let gap = ra + rb - d;
        let q = if gap > ZERO_ERROR {
            ((ra + rb + d) / gap).ln()
        } else {
            0.0
        };

        let r = (p.x - a.x) * s - (p.y - a.y) * c;
        let sa = (a.x - p.x) * c + (a.y - p.y) * s;
        let sb = (b.x - p.x) * c + (b.y - p.y) * s;
        let j = (r * p.z.abs() * (ra * sb - rb * sa)).atan2(ra * rb * r * r + z2 * sa * sb);

        u += s * q;
        v -= c * q;
        w += j;
        if r >= 0.0 {
            inside = false;
        }
    }

    let sign = if p.z < 0.0 { -1.0 } else { 1.0 };
    let delta = if inside { PI2 } else { 0.0 };
    Vec3D::new(FACTOR * u, FACTOR * v, FACTOR * sign * (delta + w))
}

/// Point-source approximation of a unit-strength source panel of area `area`
#[inline]
pub fn source_far_field(area: f64, p: Vec3D) -> Vec3D {
    let r = p.norm();
    p * (FACTOR * area / (r * r * r))
}

/// Exact velocity of a unit-strength doublet polygon (closed vortex ring)
pub fn doublet_near_field<const N: usize>(vertices: &[Vec2D; N], p: Vec3D) -> Vec3D {
    (0..N)
        .map(|k| line_vortex(vertices[k].lift(), vertices[(k + 1) % N].lift(), p))
        .sum()
}

/// Point-doublet approximation of a unit-strength doublet panel, axis along local z
#[inline]
pub fn doublet_far_field(area: f64, p: Vec3D) -> Vec3D {
    let r2 = p.norm_squared();
    let r5 = r2 * r2 * r2.sqrt();
    let k = FACTOR * area / r5;
    Vec3D::new(
        3.0 * k * p.z * p.x,
        3.0 * k * p.z * p.y,
        -k * (p.x * p.x + p.y * p.y - 2.0 * p.z * p.z),
    )
}

/// Velocity induced at `p` by a unit-circulation straight vortex from `a` to `b`
///
/// Returns zero when `p` coincides with an endpoint or lies on the
/// filament's line (|r1 × r2|² below the zero threshold).
pub fn line_vortex(a: Vec3D, b: Vec3D, p: Vec3D) -> Vec3D {
    let r1 = p - a;
    let r2 = p - b;
    let r0 = b - a;
    let n1 = r1.norm();
    let n2 = r2.norm();
    let cross = r1.cross(&r2);
    let cross2 = cross.norm_squared();
    if n1 < ZERO_ERROR || n2 < ZERO_ERROR || cross2 < ZERO_ERROR {
        return Vec3D::ZERO;
    }
    let k = FACTOR / cross2 * (r0.dot(&r1) / n1 - r0.dot(&r2) / n2);
    cross * k
}

impl Panel {
    /// Velocity at global point `p` induced by this panel as a unit-strength source
    pub fn source_velocity(&self, p: Vec3D) -> Vec3D {
        let local = self.to_local(p);
        let v = if local.norm() > self.far_field_distance() {
            source_far_field(self.area(), local)
        } else {
            match self.shape() {
                PanelShape::Triangle(v) => source_near_field(v, local),
                PanelShape::Quad(v) => source_near_field(v, local),
            }
        };
        self.to_global(v)
    }

    /// Velocity at global point `p` induced by this panel as a unit-strength doublet
    pub fn doublet_velocity(&self, p: Vec3D) -> Vec3D {
        let local = self.to_local(p);
        let v = if local.norm() > self.far_field_distance() {
            doublet_far_field(self.area(), local)
        } else {
            match self.shape() {
                PanelShape::Triangle(v) => doublet_near_field(v, local),
                PanelShape::Quad(v) => doublet_near_field(v, local),
            }
        };
        self.to_global(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn v(x: f64, y: f64, z: f64) -> Vec3D {
        Vec3D::new(x, y, z)
    }

    fn unit_square() -> Panel {
        Panel::new(
            vec![0, 1, 2, 3],
            &[v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(0.0, 1.0, 0.0)],
        )
        .unwrap()
    }

    fn right_triangle() -> Panel {
        Panel::new(vec![0, 1, 2], &[v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)]).unwrap()
    }

    fn local_near_far(panel: &Panel, local: Vec3D) -> (Vec3D, Vec3D, Vec3D, Vec3D) {
        match panel.shape() {
            PanelShape::Triangle(c) => (
                source_near_field(c, local),
                source_far_field(panel.area(), local),
                doublet_near_field(c, local),
                doublet_far_field(panel.area(), local),
            ),
            PanelShape::Quad(c) => (
                source_near_field(c, local),
                source_far_field(panel.area(), local),
                doublet_near_field(c, local),
                doublet_far_field(panel.area(), local),
            ),
        }
    }

    #[test]
    fn test_square_self_influence() {
        let p = unit_square();
        let d = p.doublet_velocity(p.control_point());
        assert_relative_eq!(d.z, 2.0 * 2f64.sqrt() / PI, epsilon = 1e-6);
        assert!(d.x.abs() < 1e-6 && d.y.abs() < 1e-6);

        let s = p.source_velocity(p.control_point());
        assert_relative_eq!(s.z, 0.5, epsilon = 1e-6);
        assert!(s.x.abs() < 1e-6 && s.y.abs() < 1e-6);
    }

    #[test]
    fn test_source_jump_across_panel() {
        let p = unit_square();
        let above = p.source_velocity(p.centroid() + v(0.0, 0.0, 1e-8));
        let below = p.source_velocity(p.centroid() - v(0.0, 0.0, 1e-8));
        assert_relative_eq!(above.z, 0.5, epsilon = 1e-6);
        assert_relative_eq!(below.z, -0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_triangle_self_influence() {
        let p = right_triangle();
        let s = p.source_velocity(p.control_point());
        assert_relative_eq!(s.z, 0.5, epsilon = 1e-6);
        let d = p.doublet_velocity(p.control_point());
        assert_relative_eq!(d.z, 1.40526, epsilon = 1e-4);
    }

    #[test]
    fn test_near_far_agreement() {
        let directions = [
            v(1.0, 0.0, 0.0),
            v(0.0, 0.0, 1.0),
            v(1.0, 1.0, 1.0),
            v(1.0, -2.0, 1.0),
            v(0.3, 0.5, -1.0),
            v(1.0, 1.0, 0.0),
            v(-0.2, 0.9, 0.4),
        ];
        for panel in [unit_square(), right_triangle()] {
            for dir in directions {
                let u = dir.normalized().unwrap();
                // The far-field forms keep the monopole and dipole terms. The first
                // neglected term is the quadrupole, of order (size/r)^2 relative, which
                // is near 1e-2 at the switch distance and falls below 1e-3 at 3x.
                for (scale, tol) in [(1.0, 1e-2), (3.0, 1e-3)] {
                    let local = u * (scale * panel.far_field_distance());
                    let (sn, sf, dn, df) = local_near_far(&panel, local);
                    assert!(
                        (sn - sf).norm() / sf.norm() < tol,
                        "source mismatch along {dir:?} at {scale}x"
                    );
                    assert!(
                        (dn - df).norm() / df.norm() < tol,
                        "doublet mismatch along {dir:?} at {scale}x"
                    );
                }
            }
        }
    }

    #[test]
    fn test_line_vortex_matches_biot_savart() {
        // Long filament along x approaches the infinite-line result 1/(2πh)
        let h = 0.5;
        let vel = line_vortex(v(-1e4, 0.0, 0.0), v(1e4, 0.0, 0.0), v(0.0, 0.0, h));
        assert_relative_eq!(vel.y, -1.0 / (2.0 * PI * h), epsilon = 1e-6);
        assert!(vel.x.abs() < 1e-12 && vel.z.abs() < 1e-12);

        // Reversing the filament reverses the velocity
        let a = v(0.0, 0.0, 0.0);
        let b = v(1.0, 0.2, -0.3);
        let p = v(0.4, 1.0, 0.5);
        let fwd = line_vortex(a, b, p);
        let back = line_vortex(b, a, p);
        assert!((fwd + back).norm() < 1e-14);
    }

    #[test]
    fn test_line_vortex_singular_points() {
        let a = v(0.0, 0.0, 0.0);
        let b = v(1.0, 0.0, 0.0);
        assert_eq!(line_vortex(a, b, a), Vec3D::ZERO);
        assert_eq!(line_vortex(a, b, b), Vec3D::ZERO);
        assert_eq!(line_vortex(a, b, v(0.5, 0.0, 0.0)), Vec3D::ZERO);
        assert_eq!(line_vortex(a, b, v(3.0, 0.0, 0.0)), Vec3D::ZERO);
    }

    #[test]
    fn test_doublet_far_field_on_axis() {
        // Point doublet along its axis: w = 2·A/(4π z³)
        let w = doublet_far_field(2.0, v(0.0, 0.0, 10.0));
        assert_relative_eq!(w.z, 2.0 * 2.0 * FACTOR / 1000.0, epsilon = 1e-15);
        // and in its plane: w = -A/(4π r³)
        let w = doublet_far_field(2.0, v(10.0, 0.0, 0.0));
        assert_relative_eq!(w.z, -2.0 * FACTOR / 1000.0, epsilon = 1e-15);
        assert_eq!(w.x, 0.0);
    }

    #[test]
    fn test_rotated_panel_gives_rotated_velocity() {
        // Same square standing in the yz-plane with normal +x
        let flat = unit_square();
        let upright = Panel::new(
            vec![],
            &[v(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0), v(0.0, 1.0, 1.0), v(0.0, 0.0, 1.0)],
        )
        .unwrap();
        assert_relative_eq!(upright.normal().x, 1.0);

        let d_flat = flat.doublet_velocity(v(0.5, 0.5, 0.7));
        let d_up = upright.doublet_velocity(v(0.7, 0.5, 0.5));
        assert_relative_eq!(d_flat.z, d_up.x, epsilon = 1e-12);

        let s_flat = flat.source_velocity(v(0.5, 0.5, 0.7));
        let s_up = upright.source_velocity(v(0.7, 0.5, 0.5));
        assert_relative_eq!(s_flat.z, s_up.x, epsilon = 1e-12);
    }
}
