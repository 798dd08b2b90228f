use crate::models::keypoint::FrameIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Angle in degrees per frame. `NaN` marks a geometrically undefined value.
pub type AngleSeries = BTreeMap<FrameIndex, f64>;

/// Named angle series, e.g. `"right_hip_knee_ankle"` -> series
pub type AngleSeriesSet = BTreeMap<String, AngleSeries>;

/// Summary statistics for one named angle over its defined values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleStatistics {
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Frames with a defined (non-NaN) value
    pub defined_frames: usize,
    pub total_frames: usize,
}

/// Iterate the defined (finite) values of a series in frame order
pub fn defined_values(series: &AngleSeries) -> impl Iterator<Item = (FrameIndex, f64)> + '_ {
    series
        .iter()
        .filter(|(_, angle)| angle.is_finite())
        .map(|(&frame, &angle)| (frame, angle))
}
