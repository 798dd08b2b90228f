use crate::models::keypoint::FrameIndex;
use thiserror::Error;

/// Errors surfaced by the analysis core.
///
/// Missing detections and degenerate geometry are not errors: they travel
/// through the pipeline as `None` joints and undefined (`NaN`/`None`) metrics.
#[derive(Error, Debug)]
pub enum CorrectionError {
    #[error("No pose data: {0}")]
    NoData(String),

    #[error("Unknown angle name: {0}")]
    UnknownAngleName(String),

    #[error("Unknown exercise type: {0}")]
    UnknownExerciseType(String),

    #[error("Unknown joint name: {0}")]
    UnknownJoint(String),

    #[error("Insufficient data for repetition {repetition}: no {angle} value above {threshold}")]
    InsufficientSegmentData {
        repetition: usize,
        angle: String,
        threshold: f64,
    },

    #[error("Invalid exercise profile '{profile}': {reason}")]
    InvalidProfile { profile: String, reason: String },

    #[error("Frame {frame} has {found} joints, expected {expected}")]
    JointCountMismatch {
        frame: FrameIndex,
        expected: usize,
        found: usize,
    },

    #[error("Clip export failed: {0}")]
    ClipExport(#[from] anyhow::Error),
}

impl CorrectionError {
    /// Configuration errors are fatal for the whole run
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CorrectionError::UnknownAngleName(_)
                | CorrectionError::UnknownExerciseType(_)
                | CorrectionError::UnknownJoint(_)
                | CorrectionError::InvalidProfile { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CorrectionError>;
