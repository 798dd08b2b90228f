// Analysis pipeline services

pub mod angle_catalog;
pub mod correction;
pub mod geometry;
pub mod keypoint_processor;
pub mod pipeline;
pub mod segmentation;
pub mod snapshot;

pub use angle_catalog::{AngleCatalog, NamedAngle};
pub use correction::{CorrectionEngine, ExerciseProfile, ExerciseType, ProfileRegistry};
pub use keypoint_processor::KeypointProcessor;
pub use pipeline::{ClipExporter, ExerciseAnalyzer, FrameRangeLabels, PreparedSession};
pub use segmentation::{RepetitionSegmenter, SegmentationParams};
