//! # m3c2-algorithms
//!
//! The computational core of M3C2 point cloud change detection.
//!
//! Given two epochs of the same surface and a set of core points with
//! normal directions, this crate extracts per-core-point working sets from
//! each epoch, and turns each pair of working sets into a signed
//! surface-to-surface distance with an uncertainty estimate. Both stages
//! are pluggable: any working-set finder can be combined with any distance
//! estimator.

pub mod workingset;
pub mod distances;
pub mod m3c2;

// Re-export commonly used items
pub use workingset::*;
pub use distances::*;
pub use m3c2::*;
