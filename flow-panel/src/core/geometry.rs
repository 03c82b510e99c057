//! Geometry kernel: 3D vectors, local-plane points and small helpers
//!
//! `Vec3D` is a plain `Copy` value; every kernel works on these rather than
//! on ndarray views to keep the per-pair evaluation allocation free.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::core::constants::ZERO_ERROR;

/// Point or vector in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3D {
    /// x component
    pub x: f64,
    /// y component
    pub y: f64,
    /// z component
    pub z: f64,
}

impl Vec3D {
    /// Zero vector
    pub const ZERO: Vec3D = Vec3D {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a vector from components
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Dot product
    #[inline]
    pub fn dot(&self, other: &Vec3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product self × other
    #[inline]
    pub fn cross(&self, other: &Vec3D) -> Vec3D {
        Vec3D::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Squared Euclidean length
    #[inline]
    pub fn norm_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length
    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Distance between two points
    #[inline]
    pub fn distance(&self, other: &Vec3D) -> f64 {
        (*self - *other).norm()
    }

    /// Unit vector in the same direction, `None` when the length is below `ZERO_ERROR`
    pub fn normalized(&self) -> Option<Vec3D> {
        let n = self.norm();
        if n < ZERO_ERROR || !n.is_finite() {
            None
        } else {
            Some(*self * (1.0 / n))
        }
    }

    /// All components finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Components as an array
    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vec3D {
    fn from(p: [f64; 3]) -> Self {
        Vec3D::new(p[0], p[1], p[2])
    }
}

impl From<Vec3D> for [f64; 3] {
    fn from(v: Vec3D) -> Self {
        v.to_array()
    }
}

impl Add for Vec3D {
    type Output = Vec3D;

    #[inline]
    fn add(self, rhs: Vec3D) -> Vec3D {
        Vec3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3D {
    type Output = Vec3D;

    #[inline]
    fn sub(self, rhs: Vec3D) -> Vec3D {
        Vec3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3D {
    type Output = Vec3D;

    #[inline]
    fn neg(self) -> Vec3D {
        Vec3D::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vec3D {
    type Output = Vec3D;

    #[inline]
    fn mul(self, s: f64) -> Vec3D {
        Vec3D::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Mul<Vec3D> for f64 {
    type Output = Vec3D;

    #[inline]
    fn mul(self, v: Vec3D) -> Vec3D {
        v * self
    }
}

impl AddAssign for Vec3D {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3D) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl SubAssign for Vec3D {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3D) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl std::iter::Sum for Vec3D {
    fn sum<I: Iterator<Item = Vec3D>>(iter: I) -> Vec3D {
        iter.fold(Vec3D::ZERO, |acc, v| acc + v)
    }
}

/// Point in a panel's (e1, e2) plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2D {
    /// Coordinate along e1
    pub x: f64,
    /// Coordinate along e2
    pub y: f64,
}

impl Vec2D {
    /// Create a local-plane point
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Lift into 3D with z = 0
    #[inline]
    pub fn lift(self) -> Vec3D {
        Vec3D::new(self.x, self.y, 0.0)
    }
}

/// Area of the triangle (a, b, c)
#[inline]
pub fn triangle_area(a: Vec3D, b: Vec3D, c: Vec3D) -> f64 {
    0.5 * (b - a).cross(&(c - a)).norm()
}

/// Area of the quadrilateral (a, b, c, d) split along the a-c diagonal
#[inline]
pub fn quad_area(a: Vec3D, b: Vec3D, c: Vec3D, d: Vec3D) -> f64 {
    triangle_area(a, b, c) + triangle_area(a, c, d)
}

/// Division that stays finite when |b| falls below `ZERO_ERROR`
///
/// Returns a/b normally, a·b / (|b|·(|b| + ZERO_ERROR)) for tiny divisors and
/// zero for an exactly zero divisor.
#[inline]
pub fn safe_division(a: f64, b: f64) -> f64 {
    let b_abs = b.abs();
    if b_abs == 0.0 {
        0.0
    } else if b_abs < ZERO_ERROR {
        a * b / (b_abs * (b_abs + ZERO_ERROR))
    } else {
        a / b
    }
}
