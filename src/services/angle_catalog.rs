//! Named joint-angle catalog
//!
//! A closed table maps every supported angle name to its three landmarks and
//! the geometric primitive that measures it. Names are resolved against a
//! [`JointMap`] once, so an unsupported name fails before any frame is touched.

use crate::error::{CorrectionError, Result};
use crate::models::angles::{defined_values, AngleSeries, AngleSeriesSet, AngleStatistics};
use crate::models::keypoint::{
    joint_at, BlazePoseLandmark, JointMap, LandmarkFrame, LandmarkSequence, Point3,
};
use crate::services::geometry;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use tracing::debug;

use BlazePoseLandmark::*;

type AnglePrimitive = fn(Point3, Point3, Point3) -> f64;

struct AngleDefinition {
    name: &'static str,
    /// Outer joint, vertex, outer joint
    joints: [BlazePoseLandmark; 3],
    primitive: AnglePrimitive,
}

const fn planar(name: &'static str, joints: [BlazePoseLandmark; 3]) -> AngleDefinition {
    AngleDefinition {
        name,
        joints,
        primitive: geometry::angle,
    }
}

const fn spatial(name: &'static str, joints: [BlazePoseLandmark; 3]) -> AngleDefinition {
    AngleDefinition {
        name,
        joints,
        primitive: geometry::angle_law_of_cosines,
    }
}

const ANGLE_DEFINITIONS: &[AngleDefinition] = &[
    planar("right_hip_knee_ankle", [RightHip, RightKnee, RightAnkle]),
    planar("left_hip_knee_ankle", [LeftHip, LeftKnee, LeftAnkle]),
    planar("right_shoulder_hip_knee", [RightShoulder, RightHip, RightKnee]),
    planar("left_shoulder_hip_knee", [LeftShoulder, LeftHip, LeftKnee]),
    planar("right_shoulder_elbow_wrist", [RightShoulder, RightElbow, RightWrist]),
    planar("left_shoulder_elbow_wrist", [LeftShoulder, LeftElbow, LeftWrist]),
    planar("right_elbow_wrist_index", [RightElbow, RightWrist, RightIndex]),
    planar("left_elbow_wrist_index", [LeftElbow, LeftWrist, LeftIndex]),
    planar("right_hip_shoulder_elbow", [RightHip, RightShoulder, RightElbow]),
    planar("left_hip_shoulder_elbow", [LeftHip, LeftShoulder, LeftElbow]),
    spatial("right_hip_knee_ankle_3d", [RightHip, RightKnee, RightAnkle]),
    spatial("left_hip_knee_ankle_3d", [LeftHip, LeftKnee, LeftAnkle]),
];

/// An angle name bound to concrete joint slots
#[derive(Clone)]
pub struct NamedAngle {
    name: String,
    joints: [usize; 3],
    primitive: AnglePrimitive,
}

impl std::fmt::Debug for NamedAngle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedAngle")
            .field("name", &self.name)
            .field("joints", &self.joints)
            .finish()
    }
}

impl NamedAngle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Angle on one frame; `NaN` when any of the three joints is missing
    pub fn compute(&self, frame: &LandmarkFrame) -> f64 {
        let [a, b, c] = self.joints;
        match (joint_at(frame, a), joint_at(frame, b), joint_at(frame, c)) {
            (Some(a), Some(b), Some(c)) => (self.primitive)(a, b, c),
            _ => f64::NAN,
        }
    }

    /// Angle for every frame of a sequence
    pub fn series(&self, landmarks: &LandmarkSequence) -> AngleSeries {
        landmarks
            .iter()
            .map(|(&frame, joints)| (frame, self.compute(joints)))
            .collect()
    }
}

/// Resolves angle names against a joint map
#[derive(Debug, Clone, Copy)]
pub struct AngleCatalog<'a> {
    joints: &'a JointMap,
}

impl<'a> AngleCatalog<'a> {
    pub fn new(joints: &'a JointMap) -> Self {
        Self { joints }
    }

    /// Every angle name the catalog knows
    pub fn supported_names() -> impl Iterator<Item = &'static str> {
        ANGLE_DEFINITIONS.iter().map(|def| def.name)
    }

    pub fn is_supported(name: &str) -> bool {
        ANGLE_DEFINITIONS.iter().any(|def| def.name == name)
    }

    /// Bind one angle name to joint slots
    pub fn resolve(&self, name: &str) -> Result<NamedAngle> {
        let definition = ANGLE_DEFINITIONS
            .iter()
            .find(|def| def.name == name)
            .ok_or_else(|| CorrectionError::UnknownAngleName(name.to_string()))?;

        let [a, b, c] = definition.joints;
        Ok(NamedAngle {
            name: definition.name.to_string(),
            joints: [
                self.joints.landmark_index(a)?,
                self.joints.landmark_index(b)?,
                self.joints.landmark_index(c)?,
            ],
            primitive: definition.primitive,
        })
    }

    /// Bind several names; the first unsupported name fails the whole set
    pub fn resolve_all<I, S>(&self, names: I) -> Result<Vec<NamedAngle>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| self.resolve(name.as_ref()))
            .collect()
    }
}

/// Evaluate every resolved angle on every frame
pub fn compute_angle_series(landmarks: &LandmarkSequence, angles: &[NamedAngle]) -> AngleSeriesSet {
    let set: AngleSeriesSet = angles
        .iter()
        .map(|angle| (angle.name().to_string(), angle.series(landmarks)))
        .collect();

    debug!(
        angles = set.len(),
        frames = landmarks.len(),
        "Computed angle series"
    );

    set
}

/// Summary statistics per named angle over its defined values.
///
/// A series without any defined value reports `NaN` for mean, spread and range.
pub fn compute_statistics(series_set: &AngleSeriesSet) -> BTreeMap<String, AngleStatistics> {
    series_set
        .iter()
        .map(|(name, series)| {
            let values: Vec<f64> = defined_values(series).map(|(_, angle)| angle).collect();
            let stats = AngleStatistics {
                mean: Statistics::mean(&values),
                std_dev: Statistics::population_std_dev(&values),
                min: Statistics::min(&values),
                max: Statistics::max(&values),
                defined_frames: values.len(),
                total_frames: series.len(),
            };
            (name.clone(), stats)
        })
        .collect()
}
