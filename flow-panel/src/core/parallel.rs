//! Data-parallel maps for the per-row and per-point loops
//!
//! With the `native` feature the maps run on the rayon thread pool; without
//! it they run sequentially. Output order is the input order either way, so
//! results do not depend on the feature.

/// True when the maps run on a thread pool
#[inline]
pub fn is_parallel_available() -> bool {
    cfg!(feature = "native")
}

/// Map `f` over `0..count`, collecting in index order
#[cfg(feature = "native")]
pub fn parallel_map_indexed<U, F>(count: usize, f: F) -> Vec<U>
where
    U: Send,
    F: Fn(usize) -> U + Sync + Send,
{
    use rayon::prelude::*;
    (0..count).into_par_iter().map(f).collect()
}

/// Map `f` over `0..count`, collecting in index order
#[cfg(not(feature = "native"))]
pub fn parallel_map_indexed<U, F>(count: usize, f: F) -> Vec<U>
where
    F: Fn(usize) -> U,
{
    (0..count).map(f).collect()
}

/// Map `f` over a slice, collecting in slice order
#[cfg(feature = "native")]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    use rayon::prelude::*;
    data.par_iter().map(f).collect()
}

/// Map `f` over a slice, collecting in slice order
#[cfg(not(feature = "native"))]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    F: Fn(&T) -> U,
{
    data.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_preserved() {
        let squares = parallel_map_indexed(1000, |i| i * i);
        assert!(squares.iter().enumerate().all(|(i, &s)| s == i * i));

        let data: Vec<f64> = (0..100).map(f64::from).collect();
        let halves = parallel_map(&data, |x| x * 0.5);
        assert_eq!(halves[99], 49.5);
    }

    #[test]
    fn test_parallel_flag_follows_feature() {
        assert_eq!(is_parallel_available(), cfg!(feature = "native"));
    }
}
