//! Core traits for m3c2

use crate::point::Point3d;

/// Trait for radius search over a spatial index
///
/// The two query forms cover the two ways M3C2 working-set finders address
/// an epoch: by an arbitrary coordinate, or by the position of a core point
/// in a reference list handed to the index ahead of time. Implementations
/// must answer queries concurrently from multiple threads; the index is
/// built once and never mutated afterwards.
pub trait RadiusSearch {
    /// Find all neighbors within `radius` of `query`, as (index, distance)
    /// pairs sorted by ascending distance
    fn find_radius_neighbors(&self, query: &Point3d, radius: f64) -> Vec<(usize, f64)>;

    /// Answer a radius query for the `core_idx`-th precomputed core point
    ///
    /// Returns `None` when no applicable precomputation exists: nothing was
    /// precomputed, `core_idx` is out of range, or `radius` exceeds the
    /// radius the lists were built for. Callers fall back to
    /// [`RadiusSearch::find_radius_neighbors`] in that case.
    fn precomputed_radius_neighbors(&self, core_idx: usize, radius: f64) -> Option<Vec<usize>>;
}
