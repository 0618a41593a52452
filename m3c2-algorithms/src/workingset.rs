//! Working set extraction around core points
//!
//! A working set is the subset of one epoch's points that is relevant for
//! estimating the local surface at one core point. Two finders are
//! provided: a plain radius ball, and a finite cylinder along the core
//! point's normal direction. Both answer the same pluggable contract, so
//! either can be combined with any distance estimator.

use m3c2_core::{Epoch, Error, Point3d, PointCloud3d, RadiusSearch, Result, Vector3d};

/// Pluggable working-set finder
///
/// Arguments are the epoch to query, the search radius, the core point,
/// the cylinder axis direction (a unit vector), the maximum cylinder
/// half-length, and the core point's position in the epoch's precomputed
/// reference list, when one was registered via [`Epoch::precompute`].
///
/// An empty result cloud is a valid outcome (an isolated core point), not
/// an error.
pub type WorkingSetFinder =
    fn(&Epoch, f64, &Point3d, &Vector3d, f64, Option<usize>) -> Result<PointCloud3d>;

/// Resolve a core point radius query, preferring precomputed lists
fn radius_neighbor_indices(
    epoch: &Epoch,
    corepoint: &Point3d,
    radius: f64,
    core_idx: Option<usize>,
) -> Vec<usize> {
    if let Some(idx) = core_idx {
        if let Some(indices) = epoch.precomputed_radius_neighbors(idx, radius) {
            return indices;
        }
    }

    epoch
        .find_radius_neighbors(corepoint, radius)
        .into_iter()
        .map(|(idx, _)| idx)
        .collect()
}

/// Radius working-set finder
///
/// Returns all epoch points within `radius` of the core point. The
/// direction and cylinder length are ignored.
///
/// # Arguments
/// * `epoch` - Epoch to extract the working set from
/// * `radius` - Search radius, must be positive
/// * `corepoint` - Core point the working set is anchored at
/// * `core_idx` - Position of the core point in the epoch's precomputed
///   reference list, if any
pub fn radius_workingset_finder(
    epoch: &Epoch,
    radius: f64,
    corepoint: &Point3d,
    _direction: &Vector3d,
    _max_cylinder_length: f64,
    core_idx: Option<usize>,
) -> Result<PointCloud3d> {
    if radius <= 0.0 {
        return Err(Error::InvalidData("radius must be positive".to_string()));
    }

    let indices = radius_neighbor_indices(epoch, corepoint, radius, core_idx);
    Ok(epoch.gather(&indices))
}

/// Cylinder working-set finder
///
/// Returns all epoch points inside the finite cylinder of radius `radius`
/// extending `max_cylinder_length` along `direction` on both sides of the
/// core point. When `max_cylinder_length <= radius` the cylinder
/// degenerates to the radius ball and this finder returns exactly the
/// [`radius_workingset_finder`] result.
///
/// The cylinder is cut into N = ceil(max_cylinder_length / radius) slabs
/// along the axis. Each slab is covered by one radius query around its
/// midpoint, with the query radius enlarged to the sphere that contains
/// the whole slab. Candidates are then filtered exactly: squared distance
/// to the axis at most radius², and axial offset within the slab's own
/// extent. The slab extents partition the axis, so a point showing up in
/// several query supersets is kept exactly once.
///
/// # Arguments
/// * `epoch` - Epoch to extract the working set from
/// * `radius` - Cylinder radius, must be positive
/// * `corepoint` - Core point on the cylinder axis
/// * `direction` - Cylinder axis, expected to be unit length
/// * `max_cylinder_length` - Cylinder half-length along the axis
/// * `core_idx` - Position of the core point in the epoch's precomputed
///   reference list, if any; only consulted on the degenerate ball path,
///   slab midpoints are queried by coordinate
pub fn cylinder_workingset_finder(
    epoch: &Epoch,
    radius: f64,
    corepoint: &Point3d,
    direction: &Vector3d,
    max_cylinder_length: f64,
    core_idx: Option<usize>,
) -> Result<PointCloud3d> {
    if radius <= 0.0 {
        return Err(Error::InvalidData("radius must be positive".to_string()));
    }

    // A short cylinder is entirely contained in the radius ball
    if max_cylinder_length <= radius {
        return radius_workingset_finder(
            epoch,
            radius,
            corepoint,
            direction,
            max_cylinder_length,
            core_idx,
        );
    }

    let segments = (max_cylinder_length / radius).ceil() as usize;
    let slab_half_length = max_cylinder_length / segments as f64;
    // Radius of the sphere containing one slab of the cylinder
    let slab_radius = (radius * radius + slab_half_length * slab_half_length).sqrt();
    let radius_sq = radius * radius;

    let mut working_set = PointCloud3d::new();
    for i in 0..segments {
        let offset =
            (2.0 * i as f64 - segments as f64 + 1.0) / segments as f64 * max_cylinder_length;
        let midpoint = corepoint + direction * offset;

        for (idx, _) in epoch.find_radius_neighbors(&midpoint, slab_radius) {
            let point = epoch.cloud()[idx];
            let to_midpoint = point - midpoint;
            let along_axis = to_midpoint.dot(direction);
            let radial_sq = (to_midpoint - direction * along_axis).norm_squared();

            // The axial check keeps the point in exactly one slab even when
            // neighboring query spheres overlap.
            if radial_sq <= radius_sq && along_axis.abs() <= slab_half_length {
                working_set.push(point);
            }
        }
    }

    Ok(working_set)
}
