//! Data-parallel helpers.
//!
//! With the `parallel` feature these fan out over the rayon pool; without it
//! (the WASM build) they run sequentially. Results are identical either way.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Evaluate `f` for every index in `0..len`, preserving index order.
#[cfg(feature = "parallel")]
pub(crate) fn map_indices<T, F>(len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..len).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn map_indices<T, F>(len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..len).map(f).collect()
}

/// Run two independent computations, potentially concurrently.
#[cfg(feature = "parallel")]
pub(crate) fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    rayon::join(a, b)
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    (a(), b())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_indices_keeps_order() {
        let squares = map_indices(6, |i| i * i);
        assert_eq!(squares, vec![0, 1, 4, 9, 16, 25]);
    }

    #[test]
    fn test_join() {
        let (a, b) = join(|| 2 + 2, || "done");
        assert_eq!(a, 4);
        assert_eq!(b, "done");
    }
}
