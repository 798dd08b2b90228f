//! Repetition Segmentation Service
//!
//! Finds repetition boundaries from a single designated angle series and splits
//! any per-frame data on those boundaries:
//! - Hysteresis state machine producing "flexed runs" (frames below threshold)
//! - Noise rejection for implausibly small angles and sudden frame-to-frame jumps
//! - Boundary = top of the rest phase between two consecutive flexed runs
//! - Segment splitting with a one-frame overlap at each shared boundary

use crate::models::angles::{AngleSeries, AngleSeriesSet};
use crate::models::keypoint::FrameIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

pub const DEFAULT_ERROR_THRESHOLD: f64 = 15.0;
pub const DEFAULT_CHANGE_THRESHOLD: f64 = 20.0;

/// Thresholds driving the segmentation state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentationParams {
    /// Rest/flexed boundary
    pub angle_threshold: f64,
    /// Angles below this are measurement noise
    pub error_threshold: f64,
    /// Largest accepted jump from the last accepted angle
    pub change_threshold: f64,
}

impl SegmentationParams {
    pub fn new(angle_threshold: f64) -> Self {
        Self {
            angle_threshold,
            error_threshold: DEFAULT_ERROR_THRESHOLD,
            change_threshold: DEFAULT_CHANGE_THRESHOLD,
        }
    }

    pub fn with_error_threshold(mut self, error_threshold: f64) -> Self {
        self.error_threshold = error_threshold;
        self
    }

    pub fn with_change_threshold(mut self, change_threshold: f64) -> Self {
        self.change_threshold = change_threshold;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepetitionState {
    OutsideRepetition,
    InsideRepetition,
}

/// Output of one pass of the state machine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlexedRuns {
    /// Maximal runs of accepted frames below the angle threshold
    pub runs: Vec<Vec<FrameIndex>>,
    /// Every frame that passed the noise filters, with its angle
    pub accepted: Vec<(FrameIndex, f64)>,
}

/// Incremental state machine, fed one frame at a time in ascending order
#[derive(Debug, Clone)]
struct RunTracker {
    params: SegmentationParams,
    state: RepetitionState,
    last_accepted: Option<f64>,
    current_run: Vec<FrameIndex>,
    output: FlexedRuns,
}

impl RunTracker {
    fn new(params: SegmentationParams) -> Self {
        Self {
            params,
            state: RepetitionState::OutsideRepetition,
            last_accepted: None,
            current_run: Vec::new(),
            output: FlexedRuns::default(),
        }
    }

    fn is_noise(&self, angle: f64) -> bool {
        if !angle.is_finite() || angle < self.params.error_threshold {
            return true;
        }

        self.last_accepted
            .is_some_and(|last| (angle - last).abs() > self.params.change_threshold)
    }

    fn step(&mut self, frame: FrameIndex, angle: f64) {
        if self.is_noise(angle) {
            return;
        }

        self.last_accepted = Some(angle);
        self.output.accepted.push((frame, angle));

        if angle < self.params.angle_threshold {
            self.state = RepetitionState::InsideRepetition;
            self.current_run.push(frame);
        } else if self.state == RepetitionState::InsideRepetition {
            self.close_run();
            self.state = RepetitionState::OutsideRepetition;
        }
    }

    fn close_run(&mut self) {
        if !self.current_run.is_empty() {
            self.output.runs.push(std::mem::take(&mut self.current_run));
        }
    }

    fn finish(mut self) -> FlexedRuns {
        self.close_run();
        self.output
    }
}

/// Repetition boundary detection over one angle series
#[derive(Debug, Clone)]
pub struct RepetitionSegmenter {
    params: SegmentationParams,
}

impl RepetitionSegmenter {
    pub fn new(params: SegmentationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SegmentationParams {
        &self.params
    }

    /// Run the state machine over the whole series in frame order
    pub fn flexed_runs(&self, series: &AngleSeries) -> FlexedRuns {
        let mut tracker = RunTracker::new(self.params);
        for (&frame, &angle) in series {
            tracker.step(frame, angle);
        }
        tracker.finish()
    }

    /// Boundary candidates: the first maximum-angle accepted frame strictly
    /// between each pair of consecutive flexed runs
    pub fn split_frames(&self, series: &AngleSeries) -> Vec<FrameIndex> {
        let FlexedRuns { runs, accepted } = self.flexed_runs(series);

        let split_frames: Vec<FrameIndex> = runs
            .windows(2)
            .filter_map(|pair| {
                let (after, before) = (*pair[0].last()?, *pair[1].first()?);
                accepted
                    .iter()
                    .filter(|(frame, _)| *frame > after && *frame < before)
                    .fold(None, |best: Option<(FrameIndex, f64)>, &(frame, angle)| match best {
                        Some((_, top)) if top >= angle => best,
                        _ => Some((frame, angle)),
                    })
                    .map(|(frame, _)| frame)
            })
            .collect();

        debug!(
            runs = runs.len(),
            split_frames = split_frames.len(),
            "Detected flexed runs"
        );

        split_frames
    }

    /// Complete boundary list for the series, first and last frame included
    pub fn boundaries(&self, series: &AngleSeries) -> Vec<FrameIndex> {
        let frames: Vec<FrameIndex> = series.keys().copied().collect();
        valid_boundaries(&frames, &self.split_frames(series))
    }
}

/// Clamp boundary candidates to the data's frame range and add its first and
/// last frame. `data_frames` must be sorted ascending.
pub fn valid_boundaries(data_frames: &[FrameIndex], candidates: &[FrameIndex]) -> Vec<FrameIndex> {
    let (Some(&first), Some(&last)) = (data_frames.first(), data_frames.last()) else {
        return Vec::new();
    };

    let mut boundaries: Vec<FrameIndex> = candidates
        .iter()
        .copied()
        .filter(|frame| (first..=last).contains(frame))
        .collect();
    boundaries.sort_unstable();
    boundaries.dedup();

    if boundaries.first() != Some(&first) {
        boundaries.insert(0, first);
    }
    if boundaries.last() != Some(&last) {
        boundaries.push(last);
    }

    boundaries
}

/// Split per-frame data into inclusive `[b_i, b_{i+1}]` windows.
///
/// Boundaries are first normalized against the data's own frames, so one
/// boundary list can be applied to landmarks and every angle series alike.
/// Fewer than two valid boundaries yields no segments.
pub fn split_into_segments<T: Clone>(
    data: &BTreeMap<FrameIndex, T>,
    boundaries: &[FrameIndex],
) -> Vec<BTreeMap<FrameIndex, T>> {
    let frames: Vec<FrameIndex> = data.keys().copied().collect();
    let boundaries = valid_boundaries(&frames, boundaries);

    boundaries
        .windows(2)
        .map(|window| {
            data.range(window[0]..=window[1])
                .map(|(&frame, value)| (frame, value.clone()))
                .collect()
        })
        .collect()
}

/// Split every named series independently and regroup by segment index
pub fn split_angle_series(series_set: &AngleSeriesSet, boundaries: &[FrameIndex]) -> Vec<AngleSeriesSet> {
    let mut segments: Vec<AngleSeriesSet> = Vec::new();

    for (name, series) in series_set {
        for (index, segment) in split_into_segments(series, boundaries).into_iter().enumerate() {
            if segments.len() <= index {
                segments.push(AngleSeriesSet::new());
            }
            segments[index].insert(name.clone(), segment);
        }
    }

    segments
}

/// Frames whose angle is below the threshold, in frame order
pub fn frames_under_tension(series: &AngleSeries, threshold: f64) -> Vec<FrameIndex> {
    series
        .iter()
        .filter(|(_, &angle)| angle < threshold)
        .map(|(&frame, _)| frame)
        .collect()
}

/// Tension frames strictly before and strictly after the first minimum-angle
/// tension frame
pub fn eccentric_concentric_frames(
    series: &AngleSeries,
    threshold: f64,
) -> (Vec<FrameIndex>, Vec<FrameIndex>) {
    let tension: Vec<(FrameIndex, f64)> = series
        .iter()
        .filter(|(_, &angle)| angle < threshold)
        .map(|(&frame, &angle)| (frame, angle))
        .collect();

    let Some(bottom) = tension
        .iter()
        .fold(None, |best: Option<(FrameIndex, f64)>, &(frame, angle)| match best {
            Some((_, low)) if low <= angle => best,
            _ => Some((frame, angle)),
        })
        .map(|(frame, _)| frame)
    else {
        return (Vec::new(), Vec::new());
    };

    let eccentric = tension
        .iter()
        .filter(|(frame, _)| *frame < bottom)
        .map(|(frame, _)| *frame)
        .collect();
    let concentric = tension
        .iter()
        .filter(|(frame, _)| *frame > bottom)
        .map(|(frame, _)| *frame)
        .collect();

    (eccentric, concentric)
}
