//! Landmark models shared by every stage of the analysis pipeline
//!
//! Raw detector output arrives as per-frame lists of observations with a
//! confidence score. After preprocessing every frame holds exactly one slot per
//! named joint, either a 3-D point or `None` when the joint was never observed.

use crate::error::{CorrectionError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::ops::Sub;

/// Video frame number. Strictly increasing per video, gaps allowed.
pub type FrameIndex = u32;

/// Point in normalized image space (z is the detector's relative depth)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length when treated as a vector
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Length of the x/y projection
    pub fn planar_norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn dot(&self, other: &Point3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Point3) -> Point3 {
        Point3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Euclidean distance to another point in full 3-D space
    pub fn distance_to(&self, other: &Point3) -> f64 {
        (*self - *other).norm()
    }

    pub fn scale(&self, factor: f64) -> Point3 {
        Point3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(values: [f64; 3]) -> Self {
        Point3::new(values[0], values[1], values[2])
    }
}

impl Sub for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// One joint as reported by the pose-landmark detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointObservation {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    /// Detection confidence (0-1)
    #[serde(alias = "visibility")]
    pub confidence: f64,
}

impl JointObservation {
    pub fn new(x: f64, y: f64, z: f64, confidence: f64) -> Self {
        Self { x, y, z, confidence }
    }

    /// Check if the observation clears the confidence threshold
    pub fn is_confident(&self, min_confidence: f64) -> bool {
        self.confidence >= min_confidence
    }

    pub fn point(&self) -> Point3 {
        Point3::new(self.x, self.y, self.z)
    }
}

/// Raw detector output: frame index -> observations in joint order.
/// Frames without a detected person are simply absent.
pub type DetectorFrames = BTreeMap<FrameIndex, Vec<JointObservation>>;

/// One cleaned frame: a slot per named joint, `None` when never observed
pub type LandmarkFrame = Vec<Option<Point3>>;

/// Cleaned landmarks for a whole video, ordered by frame index
pub type LandmarkSequence = BTreeMap<FrameIndex, LandmarkFrame>;

/// BlazePose landmark indices (33 landmarks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlazePoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BlazePoseLandmark {
    pub const COUNT: usize = 33;

    /// Get landmark name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left_eye_inner",
            Self::LeftEye => "left_eye",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeInner => "right_eye_inner",
            Self::RightEye => "right_eye",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::MouthLeft => "mouth_left",
            Self::MouthRight => "mouth_right",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftPinky => "left_pinky",
            Self::RightPinky => "right_pinky",
            Self::LeftIndex => "left_index",
            Self::RightIndex => "right_index",
            Self::LeftThumb => "left_thumb",
            Self::RightThumb => "right_thumb",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::LeftHeel => "left_heel",
            Self::RightHeel => "right_heel",
            Self::LeftFootIndex => "left_foot_index",
            Self::RightFootIndex => "right_foot_index",
        }
    }

    /// All landmarks in detector order
    pub fn all() -> [Self; Self::COUNT] {
        [
            Self::Nose,
            Self::LeftEyeInner,
            Self::LeftEye,
            Self::LeftEyeOuter,
            Self::RightEyeInner,
            Self::RightEye,
            Self::RightEyeOuter,
            Self::LeftEar,
            Self::RightEar,
            Self::MouthLeft,
            Self::MouthRight,
            Self::LeftShoulder,
            Self::RightShoulder,
            Self::LeftElbow,
            Self::RightElbow,
            Self::LeftWrist,
            Self::RightWrist,
            Self::LeftPinky,
            Self::RightPinky,
            Self::LeftIndex,
            Self::RightIndex,
            Self::LeftThumb,
            Self::RightThumb,
            Self::LeftHip,
            Self::RightHip,
            Self::LeftKnee,
            Self::RightKnee,
            Self::LeftAnkle,
            Self::RightAnkle,
            Self::LeftHeel,
            Self::RightHeel,
            Self::LeftFootIndex,
            Self::RightFootIndex,
        ]
    }
}

/// Immutable joint-name -> index mapping shared by all components.
///
/// Built once per process and passed by reference; lookups accept either
/// `"right hip"` or `"right_hip"`.
#[derive(Debug, Clone)]
pub struct JointMap {
    names: Vec<String>,
    indices: HashMap<String, usize>,
}

impl JointMap {
    /// Mapping for the 33-landmark BlazePose topology
    pub fn blaze_pose() -> Self {
        Self::from_names(BlazePoseLandmark::all().iter().map(|lm| lm.name()))
    }

    /// Build a mapping from joint names given in detector order
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|name| canonical_joint_name(name.as_ref()))
            .collect();
        let indices = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();

        Self { names, indices }
    }

    /// Number of joints per frame
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve a joint name to its slot index
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.indices
            .get(&canonical_joint_name(name))
            .copied()
            .ok_or_else(|| CorrectionError::UnknownJoint(name.to_string()))
    }

    /// Resolve a BlazePose landmark against this mapping
    pub fn landmark_index(&self, landmark: BlazePoseLandmark) -> Result<usize> {
        self.index_of(landmark.name())
    }

    /// Get joint name by index
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for JointMap {
    fn default() -> Self {
        Self::blaze_pose()
    }
}

fn canonical_joint_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Get a joint from a cleaned frame by slot index
pub fn joint_at(frame: &LandmarkFrame, index: usize) -> Option<Point3> {
    frame.get(index).copied().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_point_distance() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 12.0);
        assert!((a.distance_to(&b) - 13.0).abs() < 1e-12);
    }

    #[test]
    fn test_cross_product_is_orthogonal() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(-2.0, 0.5, 4.0);
        let n = a.cross(&b);
        assert!(n.dot(&a).abs() < 1e-12);
        assert!(n.dot(&b).abs() < 1e-12);
    }

    #[test]
    fn test_observation_visibility_alias() {
        let obs: JointObservation =
            serde_json::from_str(r#"{"x":0.1,"y":0.2,"z":0.3,"visibility":0.9}"#).unwrap();
        assert_eq!(obs.confidence, 0.9);
        assert!(obs.is_confident(0.5));
        assert!(!obs.is_confident(0.95));
    }

    #[test]
    fn test_blaze_pose_landmark_names() {
        assert_eq!(BlazePoseLandmark::Nose.name(), "nose");
        assert_eq!(BlazePoseLandmark::RightHip.name(), "right_hip");
        assert_eq!(BlazePoseLandmark::RightFootIndex.name(), "right_foot_index");
        assert_eq!(BlazePoseLandmark::all().len(), BlazePoseLandmark::COUNT);
    }

    #[test]
    fn test_joint_map_lookup_accepts_spaced_names() {
        let joints = JointMap::blaze_pose();
        assert_eq!(joints.len(), 33);
        assert_eq!(joints.index_of("right hip").unwrap(), 24);
        assert_eq!(joints.index_of("right_hip").unwrap(), 24);
        assert_eq!(joints.index_of("Left Foot Index").unwrap(), 31);
        assert_eq!(joints.name(12), Some("right_shoulder"));
    }

    #[test]
    fn test_joint_map_unknown_joint() {
        let joints = JointMap::blaze_pose();
        assert_matches!(
            joints.index_of("tail"),
            Err(CorrectionError::UnknownJoint(name)) if name == "tail"
        );
    }

    #[test]
    fn test_landmark_indices_match_enum_discriminants() {
        let joints = JointMap::blaze_pose();
        for landmark in BlazePoseLandmark::all() {
            assert_eq!(joints.landmark_index(landmark).unwrap(), landmark as usize);
        }
    }
}
