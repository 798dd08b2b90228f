//! Keypoint Preprocessing Service
//!
//! Turns raw detector output into a dense landmark sequence:
//! - Confidence filtering (low-confidence joints become missing)
//! - Per-joint linear interpolation across the frames where the joint is missing,
//!   extrapolating past the observed range with the end segments
//! - Single-observation broadcast and never-observed propagation

use crate::error::{CorrectionError, Result};
use crate::models::keypoint::{DetectorFrames, FrameIndex, LandmarkSequence, Point3};
use ndarray::Array2;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Frames after confidence filtering, before interpolation
pub type FilteredFrames = BTreeMap<FrameIndex, Vec<Option<Point3>>>;

/// Keypoint preprocessor
#[derive(Debug, Clone)]
pub struct KeypointProcessor {
    /// Minimum confidence threshold for valid keypoints
    min_confidence: f64,
}

/// Piecewise-linear interpolant over the frames where a joint was observed
#[derive(Debug)]
struct LinearInterpolant {
    /// Observed frame positions, strictly increasing
    knots: Vec<f64>,
    /// One row per knot, columns x/y/z
    values: Array2<f64>,
}

impl LinearInterpolant {
    /// Requires at least two knots
    fn new(observations: &[(FrameIndex, Point3)]) -> Self {
        let knots = observations.iter().map(|(frame, _)| *frame as f64).collect();
        let mut values = Array2::<f64>::zeros((observations.len(), 3));
        for (row, (_, point)) in observations.iter().enumerate() {
            for (dim, value) in point.to_array().into_iter().enumerate() {
                values[[row, dim]] = value;
            }
        }

        Self { knots, values }
    }

    /// Evaluate at `x`; outside the knot range the first/last segment is extended
    fn evaluate(&self, x: f64) -> Point3 {
        let last = self.knots.len() - 1;
        let upper = self.knots.partition_point(|&knot| knot <= x).clamp(1, last);
        let lower = upper - 1;

        let (x0, x1) = (self.knots[lower], self.knots[upper]);
        let t = (x - x0) / (x1 - x0);

        let start = self.values.row(lower);
        let end = self.values.row(upper);
        let lerp = |dim: usize| start[dim] + t * (end[dim] - start[dim]);

        Point3::new(lerp(0), lerp(1), lerp(2))
    }
}

impl KeypointProcessor {
    /// Create a new processor with the default 0.5 confidence threshold
    pub fn new() -> Self {
        Self {
            min_confidence: 0.5,
        }
    }

    /// Set minimum confidence threshold
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence.clamp(0.0, 1.0);
        self
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Replace joints below the confidence threshold with `None`
    pub fn filter_low_confidence(&self, frames: &DetectorFrames) -> FilteredFrames {
        frames
            .iter()
            .map(|(&frame, observations)| {
                let joints = observations
                    .iter()
                    .map(|obs| obs.is_confident(self.min_confidence).then(|| obs.point()))
                    .collect();
                (frame, joints)
            })
            .collect()
    }

    /// Fill missing joints per joint, independently of every other joint.
    ///
    /// Observed values are kept verbatim. A joint seen in two or more frames is
    /// linearly interpolated (and extrapolated) at every other frame; a joint
    /// seen once is broadcast to all frames; a joint never seen stays `None`.
    pub fn interpolate(&self, filtered: &FilteredFrames) -> Result<LandmarkSequence> {
        let (&first_frame, first_joints) = filtered
            .iter()
            .next()
            .ok_or_else(|| CorrectionError::NoData("no frames to interpolate".to_string()))?;
        let joint_count = first_joints.len();

        if let Some((&frame, joints)) = filtered.iter().find(|(_, j)| j.len() != joint_count) {
            return Err(CorrectionError::JointCountMismatch {
                frame,
                expected: joint_count,
                found: joints.len(),
            });
        }

        let mut dense: LandmarkSequence = filtered.clone();
        let (mut interpolated, mut broadcast, mut never_observed) = (0usize, 0usize, 0usize);

        for joint in 0..joint_count {
            let observations: Vec<(FrameIndex, Point3)> = filtered
                .iter()
                .filter_map(|(&frame, joints)| joints[joint].map(|point| (frame, point)))
                .collect();

            match observations.as_slice() {
                [] => never_observed += 1,
                [(_, point)] => {
                    for joints in dense.values_mut() {
                        joints[joint] = Some(*point);
                    }
                    broadcast += 1;
                }
                _ => {
                    let interpolant = LinearInterpolant::new(&observations);
                    for (&frame, joints) in dense.iter_mut() {
                        if joints[joint].is_none() {
                            joints[joint] = Some(interpolant.evaluate(frame as f64));
                        }
                    }
                    interpolated += 1;
                }
            }
        }

        debug!(
            first_frame,
            frames = filtered.len(),
            interpolated,
            broadcast,
            never_observed,
            "Interpolated missing keypoints"
        );

        Ok(dense)
    }

    /// Filter then interpolate a complete detector stream
    pub fn process(&self, frames: &DetectorFrames) -> Result<LandmarkSequence> {
        if frames.is_empty() {
            return Err(CorrectionError::NoData(
                "pose detector produced zero frames".to_string(),
            ));
        }

        let filtered = self.filter_low_confidence(frames);
        let dense = self.interpolate(&filtered)?;

        info!(
            frames = dense.len(),
            min_confidence = self.min_confidence,
            "Preprocessed keypoints"
        );

        Ok(dense)
    }
}

impl Default for KeypointProcessor {
    fn default() -> Self {
        Self::new()
    }
}
