//! Landmark-level metrics used by per-frame checks and depth-frame rules.
//!
//! Unlike named angles these read arbitrary joints (and sometimes the previous
//! retained frame), so they form their own closed set.

use crate::error::Result;
use crate::models::keypoint::{joint_at, BlazePoseLandmark, JointMap, LandmarkFrame, Point3};
use crate::services::geometry;
use serde::{Deserialize, Serialize};

use BlazePoseLandmark::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkMetric {
    /// Face-plane normal against the vertical axis, degrees
    HeadPitch,
    /// Right shoulder→hip segment against the vertical axis, degrees
    RightTrunkInclination,
    /// |Δy/Δx| of the hip line, `+inf` when vertical
    HipSlope,
    /// Toe width minus knee width (x only); positive when the knees cave in
    KneeValgus,
    /// |Δy| of the right heel since the previous retained frame
    RightHeelLift,
    /// |trunk orientation − tibia orientation|, degrees
    RightTrunkTibiaDivergence,
    RightFootKneeAlignment,
    LeftFootKneeAlignment,
}

impl LandmarkMetric {
    pub fn name(&self) -> &'static str {
        match self {
            Self::HeadPitch => "head_pitch",
            Self::RightTrunkInclination => "right_trunk_inclination",
            Self::HipSlope => "hip_slope",
            Self::KneeValgus => "knee_valgus",
            Self::RightHeelLift => "right_heel_lift",
            Self::RightTrunkTibiaDivergence => "right_trunk_tibia_divergence",
            Self::RightFootKneeAlignment => "right_foot_knee_alignment",
            Self::LeftFootKneeAlignment => "left_foot_knee_alignment",
        }
    }

    pub fn all() -> [Self; 8] {
        [
            Self::HeadPitch,
            Self::RightTrunkInclination,
            Self::HipSlope,
            Self::KneeValgus,
            Self::RightHeelLift,
            Self::RightTrunkTibiaDivergence,
            Self::RightFootKneeAlignment,
            Self::LeftFootKneeAlignment,
        ]
    }

    fn landmarks(&self) -> &'static [BlazePoseLandmark] {
        match self {
            Self::HeadPitch => &[LeftEye, RightEye, Nose],
            Self::RightTrunkInclination => &[RightShoulder, RightHip],
            Self::HipSlope => &[LeftHip, RightHip],
            Self::KneeValgus => &[RightKnee, LeftKnee, RightFootIndex, LeftFootIndex],
            Self::RightHeelLift => &[RightHeel],
            Self::RightTrunkTibiaDivergence => &[RightShoulder, RightHip, RightKnee, RightAnkle],
            Self::RightFootKneeAlignment => &[RightHip, RightKnee, RightAnkle, RightFootIndex],
            Self::LeftFootKneeAlignment => &[LeftHip, LeftKnee, LeftAnkle, LeftFootIndex],
        }
    }

    /// Metrics comparing against the previous retained frame
    pub fn needs_previous_frame(&self) -> bool {
        matches!(self, Self::RightHeelLift)
    }

    /// Resolve the metric's joints against a joint map
    pub fn bind(&self, joints: &JointMap) -> Result<BoundMetric> {
        let slots = self
            .landmarks()
            .iter()
            .map(|&landmark| joints.landmark_index(landmark))
            .collect::<Result<Vec<_>>>()?;

        Ok(BoundMetric {
            metric: *self,
            slots,
        })
    }
}

impl std::fmt::Display for LandmarkMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A metric bound to concrete joint slots
#[derive(Debug, Clone)]
pub struct BoundMetric {
    metric: LandmarkMetric,
    slots: Vec<usize>,
}

impl BoundMetric {
    pub fn metric(&self) -> LandmarkMetric {
        self.metric
    }

    fn points(&self, frame: &LandmarkFrame) -> Option<Vec<Point3>> {
        self.slots.iter().map(|&slot| joint_at(frame, slot)).collect()
    }

    /// Metric value on `frame`; `None` when a joint is missing, the geometry is
    /// degenerate, or a previous frame is required but absent
    pub fn evaluate(&self, frame: &LandmarkFrame, previous: Option<&LandmarkFrame>) -> Option<f64> {
        let p = self.points(frame)?;

        let value = match self.metric {
            LandmarkMetric::HeadPitch => geometry::head_pitch(p[0], p[1], p[2])?,
            LandmarkMetric::RightTrunkInclination => geometry::vertical_orientation_angle(p[0], p[1]),
            LandmarkMetric::HipSlope => geometry::slope(p[0], p[1]),
            LandmarkMetric::KneeValgus => {
                let knee_width = (p[0].x - p[1].x).abs();
                let toe_width = (p[2].x - p[3].x).abs();
                toe_width - knee_width
            }
            LandmarkMetric::RightHeelLift => {
                let before = self.points(previous?)?;
                (p[0].y - before[0].y).abs()
            }
            LandmarkMetric::RightTrunkTibiaDivergence => {
                let trunk = geometry::vertical_orientation_angle(p[0], p[1]);
                let tibia = geometry::vertical_orientation_angle(p[2], p[3]);
                (trunk - tibia).abs()
            }
            LandmarkMetric::RightFootKneeAlignment | LandmarkMetric::LeftFootKneeAlignment => {
                geometry::foot_knee_alignment(p[0], p[1], p[2], p[3])?
            }
        };

        (!value.is_nan()).then_some(value)
    }
}
