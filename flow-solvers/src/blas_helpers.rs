//! Vector kernels used by the Krylov iteration
//!
//! Plain loops over contiguous `Array1<f64>` storage; the panel systems are
//! dense but small enough that these never dominate the influence assembly.

use ndarray::Array1;

/// Compute inner product (x, y) = Σ x_i * y_i
#[inline]
pub fn inner_product(x: &Array1<f64>, y: &Array1<f64>) -> f64 {
    assert_eq!(
        x.len(),
        y.len(),
        "Vector lengths must match for inner product"
    );
    x.iter().zip(y.iter()).map(|(xi, yi)| xi * yi).sum()
}

/// Compute vector 2-norm: ||x||_2 = sqrt(Σ x_i^2)
#[inline]
pub fn vector_norm(x: &Array1<f64>) -> f64 {
    vector_norm_sqr(x).sqrt()
}

/// Compute vector norm squared: ||x||_2^2 = Σ x_i^2
#[inline]
pub fn vector_norm_sqr(x: &Array1<f64>) -> f64 {
    x.iter().map(|xi| xi * xi).sum()
}

/// Compute axpy: y = α * x + y
#[inline]
pub fn axpy(alpha: f64, x: &Array1<f64>, y: &mut Array1<f64>) {
    for (xi, yi) in x.iter().zip(y.iter_mut()) {
        *yi += alpha * *xi;
    }
}
