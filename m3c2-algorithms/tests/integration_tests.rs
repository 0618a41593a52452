//! Integration tests for m3c2-algorithms
//!
//! These tests drive working-set finders and distance estimators together
//! through the full per-core-point pipeline, the way an orchestrating
//! application would.

use approx::assert_relative_eq;
use m3c2_algorithms::*;
use m3c2_core::{Epoch, Point3d, PointCloud3d, Vector3d};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The eight corners of a unit cube centered at the origin
fn unit_cube_cloud() -> PointCloud3d {
    let mut points = Vec::new();
    for x in [-0.5, 0.5] {
        for y in [-0.5, 0.5] {
            for z in [-0.5, 0.5] {
                points.push(Point3d::new(x, y, z));
            }
        }
    }
    PointCloud3d::from_points(points)
}

/// A gently undulating surface patch sampled on a grid
fn surface_cloud(z_offset: f64) -> PointCloud3d {
    let mut points = Vec::new();
    for x in 0..12 {
        for y in 0..12 {
            let xf = x as f64 * 0.25;
            let yf = y as f64 * 0.25;
            let z = 0.05 * (xf * 2.1).sin() * (yf * 1.7).cos() + z_offset;
            points.push(Point3d::new(xf, yf, z));
        }
    }
    PointCloud3d::from_points(points)
}

#[test]
fn test_unit_cube_scenario() {
    // Two identical epochs of cube corners, core point at the cube center,
    // radius large enough to catch all corners.
    let epoch1 = Epoch::new(unit_cube_cloud());
    let epoch2 = Epoch::new(unit_cube_cloud());
    let corepoint = Point3d::origin();
    let direction = Vector3d::z();

    let workingset1 =
        radius_workingset_finder(&epoch1, 2.0, &corepoint, &direction, 0.0, None).unwrap();
    let workingset2 =
        radius_workingset_finder(&epoch2, 2.0, &corepoint, &direction, 0.0, None).unwrap();
    assert_eq!(workingset1.len(), 8);
    assert_eq!(workingset2.len(), 8);

    let (distance, uncertainty) =
        mean_stddev_distance(&workingset1, &workingset2, &corepoint, &direction, 0.0);
    assert_relative_eq!(distance, 0.0);
    // No registration error, so the threshold is purely the sampling
    // variance of eight corners and must still be strictly positive.
    assert!(uncertainty.lodetection > 0.0);
    assert_eq!(uncertainty.num_samples1, 8);
    assert_eq!(uncertainty.num_samples2, 8);
}

#[test]
fn test_surface_shift_recovered_by_both_estimators() {
    let shift = 0.35;
    let epoch1 = Epoch::new(surface_cloud(0.0));
    let epoch2 = Epoch::new(surface_cloud(shift));

    // Core points in the interior, away from the patch border
    let mut corepoints = Vec::new();
    for x in 4..8 {
        for y in 4..8 {
            corepoints.push(Point3d::new(x as f64 * 0.25, y as f64 * 0.25, 0.0));
        }
    }
    let directions = [Vector3d::z()];

    let algorithm = M3C2::new(
        M3C2Params::default()
            .with_radius(0.4)
            .with_max_cylinder_length(3.0),
    );
    let results = algorithm
        .run(&epoch1, &epoch2, &corepoints, &directions)
        .unwrap();

    // The same xy-columns are selected in both epochs, so the vertical
    // shift is recovered exactly up to floating point noise.
    for (distance, uncertainty) in &results {
        assert_relative_eq!(*distance, shift, epsilon = 1e-9);
        assert!(uncertainty.num_samples1 >= 2);
    }

    let median_variant = M3C2::new(
        M3C2Params::default()
            .with_radius(0.4)
            .with_max_cylinder_length(3.0),
    )
    .with_estimator(median_distance);
    let median_results = median_variant
        .run(&epoch1, &epoch2, &corepoints, &directions)
        .unwrap();

    for (distance, uncertainty) in &median_results {
        assert_relative_eq!(*distance, shift, epsilon = 1e-9);
        assert_eq!(uncertainty.lodetection, 0.0);
    }
}

#[test]
fn test_precomputed_and_direct_queries_agree_end_to_end() {
    let cloud = surface_cloud(0.0);
    let corepoints: Vec<Point3d> = cloud.iter().copied().collect();
    let corepoint_cloud = PointCloud3d::from_points(corepoints.clone());

    let mut epoch1 = Epoch::new(surface_cloud(0.0));
    let mut epoch2 = Epoch::new(surface_cloud(0.2));
    epoch1.precompute(&corepoint_cloud, 1.0).unwrap();
    epoch2.precompute(&corepoint_cloud, 1.0).unwrap();

    let plain_epoch1 = Epoch::new(surface_cloud(0.0));
    let plain_epoch2 = Epoch::new(surface_cloud(0.2));

    let directions = [Vector3d::z()];
    let with_precomputed = compute_distances(
        &corepoints,
        0.6,
        &epoch1,
        &epoch2,
        &directions,
        0.0,
        0.0,
        radius_workingset_finder,
        mean_stddev_distance,
    )
    .unwrap();
    let direct = compute_distances(
        &corepoints,
        0.6,
        &plain_epoch1,
        &plain_epoch2,
        &directions,
        0.0,
        0.0,
        radius_workingset_finder,
        mean_stddev_distance,
    )
    .unwrap();

    assert_eq!(with_precomputed.len(), direct.len());
    for ((d1, u1), (d2, u2)) in with_precomputed.iter().zip(direct.iter()) {
        assert_relative_eq!(*d1, *d2, epsilon = 1e-12);
        assert_eq!(u1.num_samples1, u2.num_samples1);
        assert_eq!(u1.num_samples2, u2.num_samples2);
        assert_relative_eq!(u1.lodetection, u2.lodetection, epsilon = 1e-12);
    }
}

#[test]
fn test_isolated_corepoint_yields_nan_not_error() {
    let epoch1 = Epoch::new(surface_cloud(0.0));
    let epoch2 = Epoch::new(surface_cloud(0.1));

    // Far away from the surface patch: empty working sets in both epochs
    let corepoints = vec![Point3d::new(500.0, 500.0, 500.0)];
    let directions = [Vector3d::z()];

    for estimator in [
        mean_stddev_distance as DistanceEstimator,
        median_distance as DistanceEstimator,
    ] {
        let results = compute_distances(
            &corepoints,
            0.5,
            &epoch1,
            &epoch2,
            &directions,
            0.0,
            0.0,
            radius_workingset_finder,
            estimator,
        )
        .unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].0.is_nan());
    }
}

#[test]
fn test_noisy_shift_recovered_within_tolerance() {
    // A vertical shift buried under per-point measurement noise: the mean
    // estimator must still land close to the true shift, with a strictly
    // positive detection threshold driven by the noise spread.
    let shift = 0.3;
    let mut rng = StdRng::seed_from_u64(7);

    let mut points1 = Vec::new();
    let mut points2 = Vec::new();
    for x in 0..12 {
        for y in 0..12 {
            let xf = x as f64 * 0.25;
            let yf = y as f64 * 0.25;
            points1.push(Point3d::new(xf, yf, rng.gen_range(-0.01..0.01)));
            points2.push(Point3d::new(xf, yf, shift + rng.gen_range(-0.01..0.01)));
        }
    }
    let epoch1 = Epoch::new(PointCloud3d::from_points(points1));
    let epoch2 = Epoch::new(PointCloud3d::from_points(points2));

    let mut corepoints = Vec::new();
    for x in 4..8 {
        for y in 4..8 {
            corepoints.push(Point3d::new(x as f64 * 0.25, y as f64 * 0.25, 0.0));
        }
    }

    let algorithm = M3C2::new(
        M3C2Params::default()
            .with_radius(0.4)
            .with_max_cylinder_length(2.0)
            .with_registration_error(0.005),
    );
    let results = algorithm
        .run(&epoch1, &epoch2, &corepoints, &[Vector3d::z()])
        .unwrap();

    for (distance, uncertainty) in results {
        assert!((distance - shift).abs() < 0.025);
        assert!(uncertainty.lodetection > 0.0);
        assert!(uncertainty.spread1 > 0.0);
    }
}

#[test]
fn test_cylinder_and_radius_finders_agree_on_flat_dense_data() {
    // On a dense flat patch with a short cylinder the two finders select
    // different sets, but both must recover the same vertical shift.
    let shift = 0.12;
    let epoch1 = Epoch::new(surface_cloud(0.0));
    let epoch2 = Epoch::new(surface_cloud(shift));

    let corepoints = vec![
        Point3d::new(1.5, 1.5, 0.0),
        Point3d::new(1.75, 1.25, 0.0),
        Point3d::new(2.0, 2.0, 0.0),
    ];
    let directions = [Vector3d::z()];

    for finder in [
        radius_workingset_finder as WorkingSetFinder,
        cylinder_workingset_finder as WorkingSetFinder,
    ] {
        let results = compute_distances(
            &corepoints,
            0.45,
            &epoch1,
            &epoch2,
            &directions,
            2.0,
            0.0,
            finder,
            mean_stddev_distance,
        )
        .unwrap();

        for (distance, _) in results {
            assert_relative_eq!(distance, shift, epsilon = 1e-9);
        }
    }
}
