//! Epochs: one point cloud capture plus its spatial search index
//!
//! An [`Epoch`] owns an immutable point cloud and a k-d tree over it. The
//! index is built once in [`Epoch::new`] and only read afterwards, so
//! radius queries can run concurrently from many worker threads without
//! locking. Beyond plain coordinate queries, an epoch can precompute the
//! neighborhoods of a fixed list of core points up to a maximum radius;
//! later queries for those core points at any smaller radius are answered
//! from the stored lists without touching the tree.

use crate::error::{Error, Result};
use crate::point::Point3d;
use crate::point_cloud::PointCloud3d;
use crate::traits::RadiusSearch;
use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;

/// Concrete k-d tree type used by an [`Epoch`].
///
/// This is `kiddo`'s float tree with an enlarged bucket size. The default
/// alias (`kiddo::KdTree`) fixes the bucket at 32 and panics during
/// construction when more than that many points share a coordinate on one
/// axis — routine for regular/gridded clouds. A larger bucket only changes
/// the tree's internal node capacity; query results are unaffected.
type Tree = KdTree<f64, u64, 3, 256, u32>;

/// Neighbor lists precomputed for a reference list of core points
///
/// Each list holds (point index, distance) pairs sorted by ascending
/// distance, covering all cloud points within `max_radius` of the
/// corresponding core point.
struct PrecomputedNeighbors {
    max_radius: f64,
    lists: Vec<Vec<(usize, f64)>>,
}

/// A point cloud capture with its radius search index
pub struct Epoch {
    cloud: PointCloud3d,
    tree: Tree,
    precomputed: Option<PrecomputedNeighbors>,
}

impl Epoch {
    /// Create an epoch from a point cloud, building the search index
    pub fn new(cloud: PointCloud3d) -> Self {
        let mut tree: Tree = Tree::with_capacity(cloud.len());
        for (idx, point) in cloud.iter().enumerate() {
            tree.add(&[point.x, point.y, point.z], idx as u64);
        }

        Self {
            cloud,
            tree,
            precomputed: None,
        }
    }

    /// The number of points in this epoch's cloud
    pub fn len(&self) -> usize {
        self.cloud.len()
    }

    /// Whether this epoch's cloud is empty
    pub fn is_empty(&self) -> bool {
        self.cloud.is_empty()
    }

    /// The epoch's point cloud
    pub fn cloud(&self) -> &PointCloud3d {
        &self.cloud
    }

    /// Gather cloud points by index list into a new owned cloud
    pub fn gather(&self, indices: &[usize]) -> PointCloud3d {
        self.cloud.gather(indices)
    }

    /// Precompute neighborhoods of `corepoints` up to `max_radius`
    ///
    /// After this call, [`RadiusSearch::precomputed_radius_neighbors`]
    /// answers queries for any of these core points at radii up to
    /// `max_radius`. Calling again replaces the previous precomputation.
    pub fn precompute(&mut self, corepoints: &PointCloud3d, max_radius: f64) -> Result<()> {
        if max_radius <= 0.0 {
            return Err(Error::InvalidData(
                "precompute max_radius must be positive".to_string(),
            ));
        }

        let lists = corepoints
            .iter()
            .map(|corepoint| {
                let mut neighbors = self.find_radius_neighbors(corepoint, max_radius);
                neighbors
                    .sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
                neighbors
            })
            .collect();

        self.precomputed = Some(PrecomputedNeighbors { max_radius, lists });
        Ok(())
    }
}

impl RadiusSearch for Epoch {
    fn find_radius_neighbors(&self, query: &Point3d, radius: f64) -> Vec<(usize, f64)> {
        if self.cloud.is_empty() {
            return Vec::new();
        }

        self.tree
            .within::<SquaredEuclidean>(&[query.x, query.y, query.z], radius * radius)
            .into_iter()
            .map(|neighbor| (neighbor.item as usize, neighbor.distance.sqrt()))
            .collect()
    }

    fn precomputed_radius_neighbors(&self, core_idx: usize, radius: f64) -> Option<Vec<usize>> {
        let precomputed = self.precomputed.as_ref()?;
        if radius > precomputed.max_radius {
            return None;
        }
        let list = precomputed.lists.get(core_idx)?;

        // Lists are sorted by distance, so the in-radius prefix is found by
        // binary search rather than a scan.
        let end = list.partition_point(|&(_, distance)| distance <= radius);
        Some(list[..end].iter().map(|&(idx, _)| idx).collect())
    }
}
