//! Core data structures and traits for m3c2
//!
//! This crate provides the fundamental types for M3C2 point cloud change
//! detection: points, point clouds, epochs with their spatial search index,
//! and the distance uncertainty record.

pub mod point;
pub mod point_cloud;
pub mod epoch;
pub mod traits;
pub mod uncertainty;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use epoch::*;
pub use traits::*;
pub use uncertainty::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix3, Point3, Vector3};

/// Common result type for m3c2 operations
pub type Result<T> = std::result::Result<T, Error>;
