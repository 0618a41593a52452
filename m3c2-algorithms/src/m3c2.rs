//! M3C2 change detection driver
//!
//! Binds one working-set finder and one distance estimator to a parameter
//! set, and runs the per-core-point computation over two epochs. Every
//! core point is independent of every other one, so the sweep is a rayon
//! parallel map over read-only epochs; no state is shared or cached
//! between core points.

use crate::distances::{mean_stddev_distance, DistanceEstimator};
use crate::workingset::{cylinder_workingset_finder, WorkingSetFinder};
use m3c2_core::{DistanceUncertainty, Epoch, Error, Point3d, Result, Vector3d};
use rayon::prelude::*;

/// Parameters of an M3C2 run
#[derive(Debug, Clone)]
pub struct M3C2Params {
    /// Search radius (projection scale) for working-set extraction
    pub radius: f64,
    /// Cylinder half-length along the normal direction
    pub max_cylinder_length: f64,
    /// Registration error between the two epochs, folded into the level of
    /// detection
    pub registration_error: f64,
}

impl Default for M3C2Params {
    fn default() -> Self {
        Self {
            radius: 1.0,
            max_cylinder_length: 0.0,
            registration_error: 0.0,
        }
    }
}

impl M3C2Params {
    /// Set the search radius
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the cylinder half-length
    pub fn with_max_cylinder_length(mut self, max_cylinder_length: f64) -> Self {
        self.max_cylinder_length = max_cylinder_length;
        self
    }

    /// Set the registration error
    pub fn with_registration_error(mut self, registration_error: f64) -> Self {
        self.registration_error = registration_error;
        self
    }
}

/// An M3C2 algorithm instance
///
/// The finder and estimator strategies are fixed at construction; any
/// finder can be paired with any estimator. Defaults are the cylinder
/// finder with the mean/standard-deviation estimator.
pub struct M3C2 {
    params: M3C2Params,
    finder: WorkingSetFinder,
    estimator: DistanceEstimator,
}

impl M3C2 {
    /// Create an algorithm instance with the default strategies
    pub fn new(params: M3C2Params) -> Self {
        Self {
            params,
            finder: cylinder_workingset_finder,
            estimator: mean_stddev_distance,
        }
    }

    /// Replace the working-set finder strategy
    pub fn with_finder(mut self, finder: WorkingSetFinder) -> Self {
        self.finder = finder;
        self
    }

    /// Replace the distance estimator strategy
    pub fn with_estimator(mut self, estimator: DistanceEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Compute distances and uncertainties for all core points
    ///
    /// See [`compute_distances`].
    pub fn run(
        &self,
        epoch1: &Epoch,
        epoch2: &Epoch,
        corepoints: &[Point3d],
        directions: &[Vector3d],
    ) -> Result<Vec<(f64, DistanceUncertainty)>> {
        compute_distances(
            corepoints,
            self.params.radius,
            epoch1,
            epoch2,
            directions,
            self.params.max_cylinder_length,
            self.params.registration_error,
            self.finder,
            self.estimator,
        )
    }
}

/// Compute per-core-point distances and uncertainties between two epochs
///
/// For each core point, the working-set finder is run against both epochs
/// independently and the resulting pair of working sets is handed to the
/// estimator together with the core point's direction. `directions` holds
/// either a single direction shared by all core points, or exactly one
/// direction per core point.
///
/// Core points are processed in parallel; the epochs are only read. A core
/// point with a degenerate neighborhood produces NaN results without
/// aborting the sweep.
///
/// # Arguments
/// * `corepoints` - Anchor locations for the change estimates
/// * `radius` - Working-set search radius, must be positive
/// * `epoch1` - First epoch
/// * `epoch2` - Second epoch
/// * `directions` - One shared direction, or one per core point
/// * `max_cylinder_length` - Cylinder half-length for cylinder finders
/// * `registration_error` - Alignment error folded into the uncertainty
/// * `finder` - Working-set finder strategy
/// * `estimator` - Distance/uncertainty estimator strategy
///
/// # Returns
/// * One (signed distance, uncertainty) pair per core point, in core-point
///   order
pub fn compute_distances(
    corepoints: &[Point3d],
    radius: f64,
    epoch1: &Epoch,
    epoch2: &Epoch,
    directions: &[Vector3d],
    max_cylinder_length: f64,
    registration_error: f64,
    finder: WorkingSetFinder,
    estimator: DistanceEstimator,
) -> Result<Vec<(f64, DistanceUncertainty)>> {
    if directions.len() != 1 && directions.len() != corepoints.len() {
        return Err(Error::InvalidData(format!(
            "expected 1 or {} directions, got {}",
            corepoints.len(),
            directions.len()
        )));
    }

    corepoints
        .par_iter()
        .enumerate()
        .map(|(core_idx, corepoint)| {
            // Per-core-point direction when available, the shared one otherwise
            let direction = if directions.len() > 1 {
                &directions[core_idx]
            } else {
                &directions[0]
            };

            let workingset1 = finder(
                epoch1,
                radius,
                corepoint,
                direction,
                max_cylinder_length,
                Some(core_idx),
            )?;
            let workingset2 = finder(
                epoch2,
                radius,
                corepoint,
                direction,
                max_cylinder_length,
                Some(core_idx),
            )?;

            Ok(estimator(
                &workingset1,
                &workingset2,
                corepoint,
                direction,
                registration_error,
            ))
        })
        .collect()
}
