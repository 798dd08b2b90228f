// Exercise-specific correction policies as data plus one shared evaluator

pub mod engine;
pub mod grading;
pub mod metrics;
pub mod profile;

pub use engine::CorrectionEngine;
pub use grading::{Criterion, GradeTable, GradeTier, Interval};
pub use metrics::{BoundMetric, LandmarkMetric};
pub use profile::{
    CheckRule, DepthFrameRule, DepthRule, ExerciseProfile, ExerciseType, Extreme, ExtremumRule,
    ProfileRegistry, Reducer, TempoRule,
};
