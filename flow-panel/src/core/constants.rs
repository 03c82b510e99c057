//! Numerical constants of the panel method
//!
//! These thresholds define the clamping policy of the kernels; changing any
//! of them changes results, not just robustness.

use std::f64::consts::PI;

/// Threshold below which lengths, cross products and divisors count as zero
pub const ZERO_ERROR: f64 = 1e-12;

/// 1/(4π), the free-space Green's function factor
pub const FACTOR: f64 = 0.25 / PI;

/// Offset of the control point along the panel normal
pub const CONTROL_POINT_OFFSET: f64 = 1e-8;

/// Far-field switch distance in units of the equivalent-disc radius √(A/π)
pub const FAR_FIELD_SCALE: f64 = 20.0;

/// Points closer than this to a wake corner skip that wake segment
pub const WAKE_PROXIMITY: f64 = 1e-5;

/// Circulation given to every new wake segment unless configured otherwise
pub const DEFAULT_WAKE_CIRCULATION: f64 = -5.0;

/// 2π
pub const PI2: f64 = 2.0 * PI;
