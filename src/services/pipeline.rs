//! Exercise analysis pipeline
//!
//! Runs the stages in strict sequence for one captured video:
//! preprocess → angle series → boundaries → split → per-repetition correction.
//! Repetitions without usable depth data are skipped and recorded; every
//! other error aborts the whole video.

use crate::config::PipelineConfig;
use crate::error::{CorrectionError, Result};
use crate::models::angles::AngleSeriesSet;
use crate::models::keypoint::{DetectorFrames, FrameIndex, JointMap, LandmarkSequence};
use crate::models::report::{AnalysisReport, RepetitionReport, RepetitionSpan, SkippedRepetition};
use crate::services::angle_catalog::compute_angle_series;
use crate::services::correction::{CorrectionEngine, ExerciseProfile, ProfileRegistry};
use crate::services::keypoint_processor::KeypointProcessor;
use crate::services::segmentation::{split_angle_series, split_into_segments, RepetitionSegmenter};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

/// Collaborator that cuts one repetition out of the source media.
///
/// Receives the inclusive frame range and returns the identifier under which
/// the repetition's report is published.
#[cfg_attr(test, mockall::automock)]
pub trait ClipExporter {
    fn export(&self, span: &RepetitionSpan) -> anyhow::Result<String>;
}

/// Exporter that only labels frame ranges, e.g. `rep-001_f0-f27`
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameRangeLabels;

impl ClipExporter for FrameRangeLabels {
    fn export(&self, span: &RepetitionSpan) -> anyhow::Result<String> {
        Ok(format!(
            "rep-{:03}_f{}-f{}",
            span.index + 1,
            span.start_frame,
            span.end_frame
        ))
    }
}

/// Cleaned landmarks plus every angle series the profile needs
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSession {
    pub landmarks: LandmarkSequence,
    pub angles: AngleSeriesSet,
}

pub struct ExerciseAnalyzer {
    joint_count: usize,
    processor: KeypointProcessor,
    engine: CorrectionEngine,
    exporter: Box<dyn ClipExporter + Send + Sync>,
}

impl ExerciseAnalyzer {
    /// Compile the profile against the joint map; configuration errors surface here
    pub fn new(joints: &JointMap, profile: &ExerciseProfile) -> Result<Self> {
        Ok(Self {
            joint_count: joints.len(),
            processor: KeypointProcessor::new(),
            engine: CorrectionEngine::compile(joints, profile)?,
            exporter: Box::new(FrameRangeLabels),
        })
    }

    /// Resolve `exercise` through the configured profile registry
    pub fn from_config(joints: &JointMap, config: &PipelineConfig, exercise: &str) -> anyhow::Result<Self> {
        let registry = ProfileRegistry::load(config.profiles_dir.as_deref())?;
        let profile = registry.get(exercise)?;

        Ok(Self::new(joints, profile)?.with_min_confidence(config.confidence_threshold))
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.processor = self.processor.with_min_confidence(min_confidence);
        self
    }

    pub fn with_exporter(mut self, exporter: impl ClipExporter + Send + Sync + 'static) -> Self {
        self.exporter = Box::new(exporter);
        self
    }

    pub fn engine(&self) -> &CorrectionEngine {
        &self.engine
    }

    pub fn profile(&self) -> &ExerciseProfile {
        self.engine.profile()
    }

    /// Clean the detector stream and compute the profile's angle series
    pub fn prepare(&self, frames: &DetectorFrames) -> Result<PreparedSession> {
        if let Some((&frame, joints)) = frames.iter().next() {
            if joints.len() != self.joint_count {
                return Err(CorrectionError::JointCountMismatch {
                    frame,
                    expected: self.joint_count,
                    found: joints.len(),
                });
            }
        }

        let landmarks = self.processor.process(frames)?;
        let angles = compute_angle_series(&landmarks, self.engine.angles());

        Ok(PreparedSession { landmarks, angles })
    }

    /// Repetition boundaries from the segmentation angle
    pub fn boundaries(&self, session: &PreparedSession) -> Result<Vec<FrameIndex>> {
        let name = &self.profile().segmentation_angle;
        let series = session.angles.get(name).ok_or_else(|| {
            CorrectionError::NoData(format!("segmentation angle '{}' was not computed", name))
        })?;

        Ok(RepetitionSegmenter::new(self.engine.segmentation_params()).boundaries(series))
    }

    /// Full analysis of one detector stream
    pub fn analyze(&self, frames: &DetectorFrames) -> Result<AnalysisReport> {
        let session = self.prepare(frames)?;
        self.analyze_prepared(&session)
    }

    /// Segment and grade an already prepared session
    pub fn analyze_prepared(&self, session: &PreparedSession) -> Result<AnalysisReport> {
        if session.landmarks.is_empty() {
            return Err(CorrectionError::NoData("session has no frames".to_string()));
        }

        let boundaries = self.boundaries(session)?;
        let landmark_segments = split_into_segments(&session.landmarks, &boundaries);
        let angle_segments = split_angle_series(&session.angles, &boundaries);

        let mut repetitions = Vec::new();
        let mut skipped = Vec::new();

        for (index, (landmarks, angles)) in landmark_segments.iter().zip(&angle_segments).enumerate() {
            let (Some((&start_frame, _)), Some((&end_frame, _))) =
                (landmarks.first_key_value(), landmarks.last_key_value())
            else {
                continue;
            };
            let span = RepetitionSpan {
                index,
                start_frame,
                end_frame,
            };

            match self.engine.evaluate_repetition(index, landmarks, angles) {
                Ok(report) => {
                    let clip_id = self.exporter.export(&span)?;
                    repetitions.push(RepetitionReport {
                        span,
                        clip_id,
                        report,
                    });
                }
                Err(err @ CorrectionError::InsufficientSegmentData { .. }) => {
                    warn!(
                        repetition = index,
                        start_frame,
                        end_frame,
                        "Skipping repetition: {}",
                        err
                    );
                    skipped.push(SkippedRepetition {
                        span,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            exercise = %self.profile().name,
            frames = session.landmarks.len(),
            repetitions = repetitions.len(),
            skipped = skipped.len(),
            "Analyzed exercise video"
        );

        Ok(AnalysisReport {
            id: Uuid::new_v4(),
            exercise: self.profile().name.clone(),
            generated_at: Utc::now(),
            total_frames: session.landmarks.len(),
            boundaries,
            repetitions,
            skipped,
        })
    }
}
