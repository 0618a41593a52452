//! Distance uncertainty record

use serde::{Deserialize, Serialize};

/// Statistical uncertainty attached to a single M3C2 distance
///
/// `lodetection` is the 95% level of detection: measured distances below it
/// are not distinguishable from noise. The spread and sample count fields
/// describe the per-epoch working sets the distance was estimated from.
///
/// Estimators that do not produce statistical uncertainty return the
/// all-zero [`Default`] value; callers must not assume non-zero fields.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DistanceUncertainty {
    /// 95% level of detection for the distance
    pub lodetection: f64,
    /// Standard deviation of the first epoch's working set along the normal
    pub spread1: f64,
    /// Number of points in the first epoch's working set
    pub num_samples1: usize,
    /// Standard deviation of the second epoch's working set along the normal
    pub spread2: f64,
    /// Number of points in the second epoch's working set
    pub num_samples2: usize,
}
