pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::PipelineConfig;
pub use error::{CorrectionError, Result};
pub use models::keypoint::JointMap;
pub use services::pipeline::ExerciseAnalyzer;
