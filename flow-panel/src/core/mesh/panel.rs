//! Panel builder: local frame, local-plane corners, control point and area
//!
//! Every panel is planar in its own frame. For a non-planar quadrilateral
//! the corners are projected onto the plane through the centroid normal to
//! the diagonal cross product.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::constants::{CONTROL_POINT_OFFSET, FAR_FIELD_SCALE, ZERO_ERROR};
use crate::core::geometry::{Vec2D, Vec3D, quad_area, triangle_area};

/// Corner coordinates in the panel's (e1, e2) plane, centred on the local centroid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PanelShape {
    /// Three-sided panel
    Triangle([Vec2D; 3]),
    /// Four-sided panel
    Quad([Vec2D; 4]),
}

impl PanelShape {
    /// Corners in order
    pub fn vertices(&self) -> &[Vec2D] {
        match self {
            PanelShape::Triangle(v) => v,
            PanelShape::Quad(v) => v,
        }
    }

    /// Number of sides (3 or 4)
    pub fn num_sides(&self) -> usize {
        self.vertices().len()
    }
}

/// Orthonormal, right-handed panel basis; `e3` is the outward normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalFrame {
    /// First tangent
    pub e1: Vec3D,
    /// Second tangent, e3 × e1
    pub e2: Vec3D,
    /// Unit normal
    pub e3: Vec3D,
}

impl LocalFrame {
    /// Build the frame for a unit normal.
    ///
    /// The tangent starts from the seed (1, 1, 1) and the component matching the
    /// largest-magnitude normal component is solved from e1 · e3 = 0.
    pub fn from_normal(e3: Vec3D) -> Option<Self> {
        let (ax, ay, az) = (e3.x.abs(), e3.y.abs(), e3.z.abs());
        let mut e1 = Vec3D::new(1.0, 1.0, 1.0);
        if ax >= ay && ax >= az {
            e1.x = -(e3.y + e3.z) / e3.x;
        } else if ay >= az {
            e1.y = -(e3.x + e3.z) / e3.y;
        } else {
            e1.z = -(e3.x + e3.y) / e3.z;
        }
        let e1 = e1.normalized()?;
        let e2 = e3.cross(&e1).normalized()?;
        Some(Self { e1, e2, e3 })
    }

    /// Components of `v` along (e1, e2, e3)
    #[inline]
    pub fn project(&self, v: Vec3D) -> Vec3D {
        Vec3D::new(v.dot(&self.e1), v.dot(&self.e2), v.dot(&self.e3))
    }

    /// Global vector from local components
    #[inline]
    pub fn unproject(&self, v: Vec3D) -> Vec3D {
        self.e1 * v.x + self.e2 * v.y + self.e3 * v.z
    }
}

/// Why a set of corners cannot form a panel
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PanelDefect {
    /// Only triangles and quadrilaterals are supported
    #[error("expected 3 or 4 corners, got {0}")]
    SideCount(usize),
    /// NaN or infinite coordinate
    #[error("non-finite corner coordinate")]
    NonFinite,
    /// Normal could not be formed (coincident or collinear corners, crossed diagonals)
    #[error("normal vector is undefined")]
    NoNormal,
    /// Area below the zero threshold
    #[error("area {0:.3e} is below the zero threshold")]
    ZeroArea(f64),
}

/// A flat source/doublet panel, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    vertex_ids: Vec<usize>,
    shape: PanelShape,
    frame: LocalFrame,
    centroid: Vec3D,
    control_point: Vec3D,
    area: f64,
    far_field_distance: f64,
}

impl Panel {
    /// Build a panel from 3 or 4 ordered corners.
    ///
    /// `vertex_ids` are the global mesh ids of the corners; they may be empty
    /// for panels that are not part of a mesh (wake quadrilaterals).
    pub fn new(vertex_ids: Vec<usize>, corners: &[Vec3D]) -> Result<Self, PanelDefect> {
        if corners.iter().any(|c| !c.is_finite()) {
            return Err(PanelDefect::NonFinite);
        }

        let (normal_seed, area) = match corners {
            [p1, p2, p3] => ((*p2 - *p1).cross(&(*p3 - *p1)), triangle_area(*p1, *p2, *p3)),
            [p1, p2, p3, p4] => (
                (*p2 - *p4).cross(&(*p3 - *p1)),
                quad_area(*p1, *p2, *p3, *p4),
            ),
            _ => return Err(PanelDefect::SideCount(corners.len())),
        };

        if area < ZERO_ERROR {
            return Err(PanelDefect::ZeroArea(area));
        }
        let e3 = normal_seed.normalized().ok_or(PanelDefect::NoNormal)?;
        let frame = LocalFrame::from_normal(e3).ok_or(PanelDefect::NoNormal)?;

        let n = corners.len() as f64;
        let centroid = corners.iter().copied().sum::<Vec3D>() * (1.0 / n);

        let projected: Vec<Vec2D> = corners
            .iter()
            .map(|c| {
                let d = *c - centroid;
                Vec2D::new(d.dot(&frame.e1), d.dot(&frame.e2))
            })
            .collect();
        let mean_x = projected.iter().map(|p| p.x).sum::<f64>() / n;
        let mean_y = projected.iter().map(|p| p.y).sum::<f64>() / n;
        let local: Vec<Vec2D> = projected
            .iter()
            .map(|p| Vec2D::new(p.x - mean_x, p.y - mean_y))
            .collect();

        let shape = match local.as_slice() {
            [a, b, c] => PanelShape::Triangle([*a, *b, *c]),
            [a, b, c, d] => PanelShape::Quad([*a, *b, *c, *d]),
            _ => return Err(PanelDefect::SideCount(corners.len())),
        };

        Ok(Self {
            vertex_ids,
            shape,
            frame,
            centroid,
            control_point: centroid + e3 * CONTROL_POINT_OFFSET,
            area,
            far_field_distance: FAR_FIELD_SCALE * (area / std::f64::consts::PI).sqrt(),
        })
    }

    /// Global ids of the corners (empty for free-standing panels)
    pub fn vertex_ids(&self) -> &[usize] {
        &self.vertex_ids
    }

    /// Local-plane corners
    pub fn shape(&self) -> &PanelShape {
        &self.shape
    }

    /// Number of sides
    pub fn num_sides(&self) -> usize {
        self.shape.num_sides()
    }

    /// Local orthonormal frame
    pub fn frame(&self) -> &LocalFrame {
        &self.frame
    }

    /// Outward unit normal
    pub fn normal(&self) -> Vec3D {
        self.frame.e3
    }

    /// Mean of the 3D corners
    pub fn centroid(&self) -> Vec3D {
        self.centroid
    }

    /// Collocation point, just off the panel plane along the normal
    pub fn control_point(&self) -> Vec3D {
        self.control_point
    }

    /// Panel area
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Distance beyond which the point-singularity kernels are used
    pub fn far_field_distance(&self) -> f64 {
        self.far_field_distance
    }

    /// Field point expressed in the local frame, relative to the centroid
    #[inline]
    pub fn to_local(&self, p: Vec3D) -> Vec3D {
        self.frame.project(p - self.centroid)
    }

    /// Local velocity components rotated back to the global frame
    #[inline]
    pub fn to_global(&self, v: Vec3D) -> Vec3D {
        self.frame.unproject(v)
    }

    /// Position of a global vertex id among the corners
    pub fn corner_index(&self, vertex: usize) -> Option<usize> {
        self.vertex_ids.iter().position(|&v| v == vertex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn v(x: f64, y: f64, z: f64) -> Vec3D {
        Vec3D::new(x, y, z)
    }

    fn assert_orthonormal(frame: &LocalFrame) {
        assert_relative_eq!(frame.e1.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(frame.e2.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(frame.e3.norm(), 1.0, epsilon = 1e-12);
        assert!(frame.e1.dot(&frame.e2).abs() < 1e-12);
        assert!(frame.e1.dot(&frame.e3).abs() < 1e-12);
        assert!(frame.e2.dot(&frame.e3).abs() < 1e-12);
        // right-handed
        let e3 = frame.e1.cross(&frame.e2);
        assert!((e3 - frame.e3).norm() < 1e-12);
    }

    #[test]
    fn test_unit_square() {
        let p = Panel::new(
            vec![0, 1, 2, 3],
            &[v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(0.0, 1.0, 0.0)],
        )
        .unwrap();

        assert_eq!(p.num_sides(), 4);
        assert_relative_eq!(p.area(), 1.0);
        assert_eq!(p.normal(), v(0.0, 0.0, 1.0));
        assert_orthonormal(p.frame());
        assert_relative_eq!(p.centroid().x, 0.5);
        assert_relative_eq!(p.control_point().z, CONTROL_POINT_OFFSET);
        assert_relative_eq!(
            p.far_field_distance(),
            20.0 / std::f64::consts::PI.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_triangle_normal_follows_winding() {
        let ccw =
            Panel::new(vec![], &[v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)]).unwrap();
        let cw =
            Panel::new(vec![], &[v(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0), v(1.0, 0.0, 0.0)]).unwrap();
        assert_relative_eq!(ccw.normal().z, 1.0);
        assert_relative_eq!(cw.normal().z, -1.0);
        assert_relative_eq!(ccw.area(), 0.5);
    }

    #[test]
    fn test_frames_for_all_pivots() {
        let normals = [
            v(1.0, 0.0, 0.0),
            v(0.0, -1.0, 0.0),
            v(0.0, 0.0, 1.0),
            v(0.3, -0.4, 0.86),
            v(-0.7, 0.7, 0.1),
            v(1e-3, 1.0, 1e-3),
        ];
        for n in normals {
            let frame = LocalFrame::from_normal(n.normalized().unwrap()).unwrap();
            assert_orthonormal(&frame);
        }
    }

    #[test]
    fn test_local_corners_are_centred_and_in_plane() {
        let corners = [
            v(0.2, -0.1, 0.3),
            v(1.4, 0.2, 0.5),
            v(1.1, 1.3, 0.2),
            v(-0.1, 0.9, 0.1),
        ];
        let p = Panel::new(vec![4, 5, 6, 7], &corners).unwrap();
        assert_orthonormal(p.frame());

        let sx: f64 = p.shape().vertices().iter().map(|c| c.x).sum();
        let sy: f64 = p.shape().vertices().iter().map(|c| c.y).sum();
        assert!(sx.abs() < 1e-14);
        assert!(sy.abs() < 1e-14);

        // e3 is perpendicular to both diagonals
        assert!((corners[2] - corners[0]).dot(&p.normal()).abs() < 1e-12);
        assert!((corners[3] - corners[1]).dot(&p.normal()).abs() < 1e-12);
        assert_eq!(p.corner_index(6), Some(2));
    }

    #[test]
    fn test_round_trip_local_global() {
        let p =
            Panel::new(vec![], &[v(0.0, 0.0, 1.0), v(1.0, 0.0, 2.0), v(0.0, 1.0, 0.5)]).unwrap();
        let x = v(0.3, -2.0, 4.0);
        let back = p.to_global(p.to_local(x)) + p.centroid();
        assert!((back - x).norm() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        let collinear = Panel::new(vec![], &[v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(2.0, 0.0, 0.0)]);
        assert!(matches!(collinear, Err(PanelDefect::ZeroArea(_))));

        let coincident = Panel::new(
            vec![],
            &[v(0.0, 0.0, 0.0), v(0.0, 0.0, 0.0), v(0.0, 0.0, 0.0), v(0.0, 0.0, 0.0)],
        );
        assert!(coincident.is_err());

        let two = Panel::new(vec![], &[v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0)]);
        assert_eq!(two, Err(PanelDefect::SideCount(2)));

        let nan = Panel::new(vec![], &[v(f64::NAN, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)]);
        assert_eq!(nan, Err(PanelDefect::NonFinite));
    }
}
