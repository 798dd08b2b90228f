use crate::models::keypoint::FrameIndex;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Grading attached to each advice category: 1 good, 2 fair, 3 bad
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    Good = 1,
    Fair = 2,
    Bad = 3,
}

impl Severity {
    pub fn level(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Severity::Good),
            2 => Ok(Severity::Fair),
            3 => Ok(Severity::Bad),
            other => Err(format!("severity level must be 1, 2 or 3, got {}", other)),
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> u8 {
        severity.level()
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Good => write!(f, "good"),
            Severity::Fair => write!(f, "fair"),
            Severity::Bad => write!(f, "bad"),
        }
    }
}

/// Advice text with its grading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub text: String,
    pub severity: Severity,
}

impl Advice {
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }

    pub fn good(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Good)
    }

    pub fn fair(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Fair)
    }

    pub fn bad(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Bad)
    }
}

/// Category name -> advice for one repetition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrectionReport {
    entries: BTreeMap<String, Advice>,
}

impl CorrectionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>, advice: Advice) {
        self.entries.insert(category.into(), advice);
    }

    pub fn get(&self, category: &str) -> Option<&Advice> {
        self.entries.get(category)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.entries.contains_key(category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Advice)> {
        self.entries.iter().map(|(name, advice)| (name.as_str(), advice))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Worst severity across all categories
    pub fn worst_severity(&self) -> Option<Severity> {
        self.entries.values().map(|advice| advice.severity).max()
    }
}

/// Inclusive frame range of one repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepetitionSpan {
    /// Zero-based repetition number within the video
    pub index: usize,
    pub start_frame: FrameIndex,
    pub end_frame: FrameIndex,
}

impl RepetitionSpan {
    pub fn frame_count(&self) -> u32 {
        self.end_frame - self.start_frame + 1
    }
}

/// Correction report for one repetition, keyed by its clip identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepetitionReport {
    pub span: RepetitionSpan,
    pub clip_id: String,
    pub report: CorrectionReport,
}

/// Repetition left out of the report and why
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRepetition {
    pub span: RepetitionSpan,
    pub reason: String,
}

/// Complete analysis result for one video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub exercise: String,
    pub generated_at: DateTime<Utc>,
    pub total_frames: usize,
    /// Boundary frames, first and last data frame included
    pub boundaries: Vec<FrameIndex>,
    pub repetitions: Vec<RepetitionReport>,
    pub skipped: Vec<SkippedRepetition>,
}

impl AnalysisReport {
    /// Number of repetitions that produced a report
    pub fn rep_count(&self) -> usize {
        self.repetitions.len()
    }

    /// True when no repetition was detected at all
    pub fn no_repetitions_detected(&self) -> bool {
        self.repetitions.is_empty() && self.skipped.is_empty()
    }

    /// Clip identifier -> report, the shape handed to the serving layer
    pub fn reports_by_clip(&self) -> BTreeMap<&str, &CorrectionReport> {
        self.repetitions
            .iter()
            .map(|rep| (rep.clip_id.as_str(), &rep.report))
            .collect()
    }
}
