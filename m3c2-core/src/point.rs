//! Point and vector type aliases
//!
//! M3C2 distances are small differences between large survey coordinates,
//! so all geometry in this workspace is carried in double precision.

use nalgebra::{Point3, Vector3};

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;
