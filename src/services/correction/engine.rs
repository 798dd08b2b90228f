//! Correction Rule Engine
//!
//! One shared evaluation routine parameterized by an [`ExerciseProfile`]:
//! 1. Depth: extreme of the depth angle over values above the error threshold;
//!    a bad grade short-circuits the repetition
//! 2. Running extrema of secondary angles over the tension interval
//! 3. Per-frame checks with sticky failure
//! 4. Metrics graded on the depth frame
//! 5. Eccentric/concentric tempo ratio

use crate::error::{CorrectionError, Result};
use crate::models::angles::{AngleSeries, AngleSeriesSet};
use crate::models::keypoint::{FrameIndex, JointMap, LandmarkSequence};
use crate::models::report::{CorrectionReport, Severity};
use crate::services::angle_catalog::{AngleCatalog, NamedAngle};
use crate::services::correction::metrics::BoundMetric;
use crate::services::correction::profile::{
    CheckRule, DepthFrameRule, ExerciseProfile, Extreme, ExtremumRule, Reducer,
};
use crate::services::geometry::eccentric_concentric_ratio;
use crate::services::segmentation::{eccentric_concentric_frames, SegmentationParams};
use std::collections::HashSet;
use tracing::{debug, warn};

/// A profile validated against a joint map, ready to evaluate repetitions
#[derive(Debug, Clone)]
pub struct CorrectionEngine {
    profile: ExerciseProfile,
    angles: Vec<NamedAngle>,
    checks: Vec<(CheckRule, BoundMetric)>,
    depth_frame_rules: Vec<(DepthFrameRule, BoundMetric)>,
}

/// One frame of a repetition with its previous retained frame
#[derive(Debug, Clone, Copy)]
struct TensionFrame {
    frame: FrameIndex,
    previous: Option<FrameIndex>,
}

impl CorrectionEngine {
    /// Validate every name and reference in the profile.
    ///
    /// Unsupported angle names fail with `UnknownAngleName`; inconsistent
    /// references (an angle used but not computed, duplicate categories,
    /// nonsensical thresholds) fail with `InvalidProfile`.
    pub fn compile(joints: &JointMap, profile: &ExerciseProfile) -> Result<Self> {
        let invalid = |reason: String| CorrectionError::InvalidProfile {
            profile: profile.name.clone(),
            reason,
        };

        let angles = AngleCatalog::new(joints).resolve_all(&profile.angles)?;

        let computed: HashSet<&str> = profile.angles.iter().map(String::as_str).collect();
        let referenced = std::iter::once(("segmentation_angle", &profile.segmentation_angle))
            .chain(std::iter::once(("depth", &profile.depth.angle)))
            .chain(profile.extrema.iter().map(|rule| (rule.category.as_str(), &rule.angle)));
        for (usage, angle) in referenced {
            if !AngleCatalog::is_supported(angle) {
                return Err(CorrectionError::UnknownAngleName(angle.clone()));
            }
            if !computed.contains(angle.as_str()) {
                return Err(invalid(format!(
                    "{} uses angle '{}' which is not in the computed angles",
                    usage, angle
                )));
            }
        }

        let thresholds = [
            ("repetition_start_threshold", profile.repetition_start_threshold),
            ("error_threshold", profile.error_threshold),
            ("change_threshold", profile.change_threshold),
        ];
        if let Some((name, value)) = thresholds.iter().find(|(_, value)| !value.is_finite()) {
            return Err(invalid(format!("{} must be finite, got {}", name, value)));
        }
        if profile.error_threshold >= profile.repetition_start_threshold {
            return Err(invalid(format!(
                "error_threshold ({}) must be below repetition_start_threshold ({})",
                profile.error_threshold, profile.repetition_start_threshold
            )));
        }

        let mut categories = HashSet::new();
        for category in profile.categories() {
            if !categories.insert(category) {
                return Err(invalid(format!("duplicate category '{}'", category)));
            }
        }

        let tables = std::iter::once(&profile.depth.grades)
            .chain(profile.extrema.iter().map(|rule| &rule.grades))
            .chain(profile.depth_frame_rules.iter().map(|rule| &rule.grades))
            .chain(std::iter::once(&profile.tempo.grades));
        for table in tables {
            table.validate().map_err(&invalid)?;
        }
        for rule in &profile.checks {
            rule.criterion.interval().validate().map_err(&invalid)?;
        }

        let checks = profile
            .checks
            .iter()
            .map(|rule| rule.metric.bind(joints).map(|metric| (rule.clone(), metric)))
            .collect::<Result<Vec<_>>>()?;
        let depth_frame_rules = profile
            .depth_frame_rules
            .iter()
            .map(|rule| rule.metric.bind(joints).map(|metric| (rule.clone(), metric)))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            profile = %profile.name,
            angles = angles.len(),
            checks = checks.len(),
            "Compiled exercise profile"
        );

        Ok(Self {
            profile: profile.clone(),
            angles,
            checks,
            depth_frame_rules,
        })
    }

    pub fn profile(&self) -> &ExerciseProfile {
        &self.profile
    }

    /// Resolved angles the profile needs for every frame
    pub fn angles(&self) -> &[NamedAngle] {
        &self.angles
    }

    pub fn segmentation_params(&self) -> SegmentationParams {
        SegmentationParams::new(self.profile.repetition_start_threshold)
            .with_error_threshold(self.profile.error_threshold)
            .with_change_threshold(self.profile.change_threshold)
    }

    /// Grade one repetition segment.
    ///
    /// Fails with `InsufficientSegmentData` when the depth angle never exceeds
    /// the error threshold in this segment; callers skip that repetition.
    pub fn evaluate_repetition(
        &self,
        repetition: usize,
        landmarks: &LandmarkSequence,
        angles: &AngleSeriesSet,
    ) -> Result<CorrectionReport> {
        let profile = &self.profile;
        let mut report = CorrectionReport::new();

        let empty = AngleSeries::new();
        let series = |name: &str| angles.get(name).unwrap_or(&empty);

        let (depth_frame, depth_value) = depth_extreme(
            series(&profile.depth.angle),
            profile.error_threshold,
            profile.depth.extreme,
        )
        .ok_or_else(|| CorrectionError::InsufficientSegmentData {
            repetition,
            angle: profile.depth.angle.clone(),
            threshold: profile.error_threshold,
        })?;

        let depth_advice = profile.depth.grades.grade(depth_value).clone();
        let short_circuit = depth_advice.severity == Severity::Bad;
        report.insert(profile.depth.category.clone(), depth_advice);
        if short_circuit {
            debug!(repetition, depth = depth_value, "Depth graded bad, skipping secondary checks");
            return Ok(report);
        }

        let segmentation = series(&profile.segmentation_angle);
        let frames: Vec<FrameIndex> = landmarks.keys().copied().collect();
        let tension: Vec<TensionFrame> = frames
            .iter()
            .enumerate()
            .map(|(position, &frame)| TensionFrame {
                frame,
                previous: position.checked_sub(1).map(|prev| frames[prev]),
            })
            .filter(|tf| {
                segmentation
                    .get(&tf.frame)
                    .is_some_and(|&angle| angle < profile.repetition_start_threshold)
            })
            .collect();

        for rule in &profile.extrema {
            let value = reduce_extremum(rule, series(&rule.angle), &tension);
            report.insert(
                rule.category.clone(),
                rule.grades.grade(value.unwrap_or(f64::NAN)).clone(),
            );
        }

        let mut failed = vec![false; self.checks.len()];
        for tf in &tension {
            let Some(frame) = landmarks.get(&tf.frame) else {
                continue;
            };
            let previous = tf.previous.and_then(|prev| landmarks.get(&prev));

            for ((rule, metric), failed) in self.checks.iter().zip(failed.iter_mut()) {
                if *failed {
                    continue;
                }
                if let Some(value) = metric.evaluate(frame, previous) {
                    if !rule.criterion.passes(value) {
                        debug!(
                            repetition,
                            frame = tf.frame,
                            category = %rule.category,
                            value,
                            "Check failed"
                        );
                        *failed = true;
                    }
                }
            }
        }
        for ((rule, _), failed) in self.checks.iter().zip(&failed) {
            let advice = if *failed { &rule.fail } else { &rule.pass };
            report.insert(rule.category.clone(), advice.clone());
        }

        if !self.depth_frame_rules.is_empty() {
            let previous = landmarks
                .range(..depth_frame)
                .next_back()
                .map(|(_, frame)| frame);
            let frame = landmarks.get(&depth_frame);
            if frame.is_none() {
                warn!(repetition, depth_frame, "Depth frame has no landmarks");
            }

            for (rule, metric) in &self.depth_frame_rules {
                let value = frame
                    .and_then(|frame| metric.evaluate(frame, previous))
                    .unwrap_or(f64::NAN);
                report.insert(rule.category.clone(), rule.grades.grade(value).clone());
            }
        }

        let (eccentric, concentric) =
            eccentric_concentric_frames(segmentation, profile.repetition_start_threshold);
        let ratio = eccentric_concentric_ratio(&eccentric, &concentric);
        report.insert(
            profile.tempo.category.clone(),
            profile.tempo.grades.grade(ratio).clone(),
        );

        Ok(report)
    }
}

/// First frame holding the extreme value among values above `error_threshold`
fn depth_extreme(series: &AngleSeries, error_threshold: f64, extreme: Extreme) -> Option<(FrameIndex, f64)> {
    let keeps_current = |current: f64, angle: f64| match extreme {
        Extreme::Min => current <= angle,
        Extreme::Max => current >= angle,
    };

    series
        .iter()
        .filter(|(_, &angle)| angle > error_threshold)
        .fold(None, |best: Option<(FrameIndex, f64)>, (&frame, &angle)| match best {
            Some((_, current)) if keeps_current(current, angle) => best,
            _ => Some((frame, angle)),
        })
}

/// Fold a secondary angle over the tension frames, starting from the seed
fn reduce_extremum(rule: &ExtremumRule, series: &AngleSeries, tension: &[TensionFrame]) -> Option<f64> {
    let steady = |tf: &TensionFrame, value: f64| match rule.max_step {
        None => true,
        Some(max_step) => tf
            .previous
            .and_then(|prev| series.get(&prev))
            .is_some_and(|&before| (value - before).abs() < max_step),
    };

    let mut values = tension.iter().filter_map(|tf| {
        series
            .get(&tf.frame)
            .copied()
            .filter(|value| !value.is_nan() && steady(tf, *value))
    });

    match rule.reducer {
        Reducer::First => values.next().or(rule.seed),
        Reducer::Min => values.fold(rule.seed, |acc, value| {
            Some(acc.map_or(value, |current| current.min(value)))
        }),
        Reducer::Max => values.fold(rule.seed, |acc, value| {
            Some(acc.map_or(value, |current| current.max(value)))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::keypoint::{BlazePoseLandmark, LandmarkFrame, Point3};
    use crate::models::report::Advice;
    use crate::services::angle_catalog::compute_angle_series;
    use crate::services::correction::grading::{Criterion, GradeTable, Interval};
    use crate::services::correction::metrics::LandmarkMetric;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn series(values: &[(FrameIndex, f64)]) -> AngleSeries {
        values.iter().copied().collect()
    }

    fn tension(frames: &[FrameIndex]) -> Vec<TensionFrame> {
        frames
            .iter()
            .map(|&frame| TensionFrame {
                frame,
                previous: frame.checked_sub(1),
            })
            .collect()
    }

    fn extremum(reducer: Reducer, seed: Option<f64>, max_step: Option<f64>) -> ExtremumRule {
        ExtremumRule {
            category: "test".to_string(),
            angle: "right_elbow_wrist_index".to_string(),
            reducer,
            seed,
            max_step,
            grades: GradeTable::new(Advice::bad("bad")),
        }
    }

    /// Frame where the right arm is bent to `elbow_deg` and all other joints
    /// sit in a neutral standing pose
    fn arm_frame(elbow_deg: f64) -> LandmarkFrame {
        use BlazePoseLandmark::*;
        let mut frame: LandmarkFrame = vec![Some(Point3::new(0.5, 0.5, 0.0)); BlazePoseLandmark::COUNT];
        let theta = elbow_deg.to_radians();
        frame[RightShoulder as usize] = Some(Point3::new(0.5, 0.3, 0.0));
        frame[RightElbow as usize] = Some(Point3::new(0.5, 0.5, 0.0));
        frame[RightWrist as usize] = Some(Point3::new(
            0.5 + 0.2 * theta.sin(),
            0.5 - 0.2 * theta.cos(),
            0.0,
        ));
        frame
    }

    fn rotate(x: f64, y: f64, deg: f64) -> (f64, f64) {
        let (sin, cos) = deg.to_radians().sin_cos();
        (x * cos - y * sin, x * sin + y * cos)
    }

    /// Push-up side view: shoulder fixed above the hip, every graded angle set
    /// independently
    fn push_up_frame(elbow_deg: f64, abduction_deg: f64, hand_deg: f64, body_deg: f64) -> LandmarkFrame {
        use BlazePoseLandmark::*;
        let mut frame: LandmarkFrame = vec![None; BlazePoseLandmark::COUNT];
        let (shoulder, hip) = ((0.5, 0.3), (0.5, 0.6));

        let upper_arm = rotate(0.0, 1.0, abduction_deg);
        let elbow = (shoulder.0 + 0.2 * upper_arm.0, shoulder.1 + 0.2 * upper_arm.1);
        let forearm = rotate(-upper_arm.0, -upper_arm.1, elbow_deg);
        let wrist = (elbow.0 + 0.2 * forearm.0, elbow.1 + 0.2 * forearm.1);
        let hand = rotate(-forearm.0, -forearm.1, hand_deg);
        let index = (wrist.0 + 0.05 * hand.0, wrist.1 + 0.05 * hand.1);
        let thigh = rotate(0.0, -1.0, body_deg);
        let knee = (hip.0 + 0.3 * thigh.0, hip.1 + 0.3 * thigh.1);

        for (landmark, (x, y)) in [
            (RightShoulder, shoulder),
            (RightHip, hip),
            (RightElbow, elbow),
            (RightWrist, wrist),
            (RightIndex, index),
            (RightKnee, knee),
        ] {
            frame[landmark as usize] = Some(Point3::new(x, y, 0.0));
        }
        frame
    }

    #[test]
    fn test_depth_extreme_picks_first_minimum_above_error_threshold() {
        let angles = series(&[(0, 170.0), (1, 10.0), (2, 80.0), (3, 80.0), (4, 150.0)]);
        assert_eq!(depth_extreme(&angles, 15.0, Extreme::Min), Some((2, 80.0)));
        assert_eq!(depth_extreme(&angles, 15.0, Extreme::Max), Some((0, 170.0)));
        assert_eq!(depth_extreme(&series(&[(0, 5.0), (1, f64::NAN)]), 15.0, Extreme::Min), None);
    }

    #[test]
    fn test_reducers_fold_from_seed() {
        let angles = series(&[(0, 170.0), (1, 160.0), (2, f64::NAN), (3, 155.0), (4, 175.0)]);
        let frames = tension(&[1, 2, 3, 4]);

        assert_eq!(reduce_extremum(&extremum(Reducer::Min, Some(180.0), None), &angles, &frames), Some(155.0));
        assert_eq!(reduce_extremum(&extremum(Reducer::Max, Some(0.0), None), &angles, &frames), Some(175.0));
        assert_eq!(reduce_extremum(&extremum(Reducer::First, Some(0.0), None), &angles, &frames), Some(160.0));
        assert_eq!(reduce_extremum(&extremum(Reducer::Min, Some(150.0), None), &angles, &frames), Some(150.0));
        assert_eq!(reduce_extremum(&extremum(Reducer::Min, Some(180.0), None), &angles, &[]), Some(180.0));
        assert_eq!(reduce_extremum(&extremum(Reducer::Max, None, None), &angles, &[]), None);
    }

    #[test]
    fn test_max_step_ignores_jumps_from_previous_frame() {
        // frame 2 drops 40 degrees and frame 3 jumps back, both are glitches
        let angles = series(&[(0, 170.0), (1, 165.0), (2, 125.0), (3, 160.0), (4, 158.0)]);
        let rule = extremum(Reducer::Min, Some(180.0), Some(15.0));

        assert_eq!(reduce_extremum(&rule, &angles, &tension(&[1, 2, 3])), Some(165.0));
        assert_eq!(reduce_extremum(&rule, &angles, &tension(&[1, 2, 3, 4])), Some(158.0));
    }

    #[test]
    fn test_max_step_needs_previous_frame() {
        let angles = series(&[(5, 150.0), (6, 152.0)]);
        let rule = extremum(Reducer::Min, Some(180.0), Some(15.0));
        let frames = vec![
            TensionFrame { frame: 5, previous: None },
            TensionFrame { frame: 6, previous: Some(5) },
        ];

        assert_eq!(reduce_extremum(&rule, &angles, &frames), Some(152.0));
    }

    #[test]
    fn test_unknown_angle_in_profile_fails_fast() {
        let mut profile = ExerciseProfile::bicep_curl();
        profile.angles.push("right_ear_nose_eye".to_string());

        assert_matches!(
            CorrectionEngine::compile(&JointMap::blaze_pose(), &profile),
            Err(CorrectionError::UnknownAngleName(name)) if name == "right_ear_nose_eye"
        );
    }

    #[test]
    fn test_reference_to_uncomputed_angle_is_invalid() {
        let mut profile = ExerciseProfile::bicep_curl();
        profile.extrema[0].angle = "left_elbow_wrist_index".to_string();

        let err = CorrectionEngine::compile(&JointMap::blaze_pose(), &profile).unwrap_err();
        assert_matches!(err, CorrectionError::InvalidProfile { .. });
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_duplicate_category_is_invalid() {
        let mut profile = ExerciseProfile::push_up();
        profile.extrema[1].category = "hand_position".to_string();

        assert_matches!(
            CorrectionEngine::compile(&JointMap::blaze_pose(), &profile),
            Err(CorrectionError::InvalidProfile { reason, .. }) if reason.contains("hand_position")
        );
    }

    #[test]
    fn test_inverted_thresholds_are_invalid() {
        let mut profile = ExerciseProfile::squat();
        profile.error_threshold = 140.0;

        assert_matches!(
            CorrectionEngine::compile(&JointMap::blaze_pose(), &profile),
            Err(CorrectionError::InvalidProfile { .. })
        );
    }

    #[test]
    fn test_builtins_compile() {
        let joints = JointMap::blaze_pose();
        for profile in [
            ExerciseProfile::squat(),
            ExerciseProfile::bicep_curl(),
            ExerciseProfile::push_up(),
        ] {
            let engine = CorrectionEngine::compile(&joints, &profile).unwrap();
            assert_eq!(engine.angles().len(), profile.angles.len());
            assert_eq!(
                engine.segmentation_params().angle_threshold,
                profile.repetition_start_threshold
            );
        }
    }

    #[test]
    fn test_segment_without_depth_data_is_insufficient() {
        let engine = CorrectionEngine::compile(&JointMap::blaze_pose(), &ExerciseProfile::bicep_curl()).unwrap();
        let landmarks: LandmarkSequence = [(0, arm_frame(10.0))].into_iter().collect();
        let angles: AngleSeriesSet = [("right_shoulder_elbow_wrist".to_string(), series(&[(0, 10.0)]))]
            .into_iter()
            .collect();

        assert_matches!(
            engine.evaluate_repetition(4, &landmarks, &angles),
            Err(CorrectionError::InsufficientSegmentData { repetition: 4, .. })
        );
    }

    #[test]
    fn test_bad_depth_short_circuits() {
        let engine = CorrectionEngine::compile(&JointMap::blaze_pose(), &ExerciseProfile::bicep_curl()).unwrap();
        let landmarks: LandmarkSequence = (0..5).map(|frame| (frame, arm_frame(150.0))).collect();
        let angles = compute_angle_series(&landmarks, engine.angles());

        let report = engine.evaluate_repetition(0, &landmarks, &angles).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.get("curl_depth").unwrap().severity, Severity::Bad);
    }

    #[test]
    fn test_sticky_failure_survives_later_passing_frames() {
        let mut profile = ExerciseProfile::bicep_curl();
        profile.checks.push(CheckRule {
            category: "wrist_drift".to_string(),
            metric: LandmarkMetric::RightHeelLift,
            criterion: Criterion::FailWhen(Interval::above(0.05)),
            pass: Advice::good("steady"),
            fail: Advice::bad("drifting"),
        });
        let engine = CorrectionEngine::compile(&JointMap::blaze_pose(), &profile).unwrap();

        let schedule = [170.0, 130.0, 90.0, 50.0, 90.0, 130.0, 170.0];
        let mut landmarks: LandmarkSequence = schedule
            .iter()
            .enumerate()
            .map(|(frame, &deg)| (frame as FrameIndex, arm_frame(deg)))
            .collect();
        // a single heel jump on frame 3, every other frame is steady
        if let Some(frame) = landmarks.get_mut(&3) {
            frame[BlazePoseLandmark::RightHeel as usize] = Some(Point3::new(0.5, 0.6, 0.0));
        }
        let angles = compute_angle_series(&landmarks, engine.angles());

        let report = engine.evaluate_repetition(0, &landmarks, &angles).unwrap();
        assert_eq!(report.get("curl_depth").unwrap().severity, Severity::Good);
        assert_eq!(report.get("wrist_drift").unwrap(), &Advice::bad("drifting"));
    }

    #[test]
    fn test_report_has_every_category() {
        let profile = ExerciseProfile::bicep_curl();
        let engine = CorrectionEngine::compile(&JointMap::blaze_pose(), &profile).unwrap();

        let schedule = [170.0, 140.0, 110.0, 80.0, 50.0, 70.0, 100.0, 140.0, 170.0];
        let landmarks: LandmarkSequence = schedule
            .iter()
            .enumerate()
            .map(|(frame, &deg)| (frame as FrameIndex, arm_frame(deg)))
            .collect();
        let angles = compute_angle_series(&landmarks, engine.angles());

        let report = engine.evaluate_repetition(0, &landmarks, &angles).unwrap();
        assert_eq!(report.len(), profile.categories().len());
        // tension frames 2..=6, minimum at 4: two eccentric, two concentric
        assert_eq!(
            report.get("eccentric_concentric_ratio").unwrap().severity,
            Severity::Bad
        );
    }

    #[test]
    fn test_push_up_repetition_grades_every_category() {
        let profile = ExerciseProfile::push_up();
        let engine = CorrectionEngine::compile(&JointMap::blaze_pose(), &profile).unwrap();

        let elbow = [170.0, 150.0, 130.0, 120.0, 110.0, 100.0, 90.0, 80.0, 70.0, 110.0, 150.0, 170.0];
        let landmarks: LandmarkSequence = elbow
            .iter()
            .enumerate()
            .map(|(frame, &elbow_deg)| {
                let abduction = match frame {
                    0 | 1 => 20.0,
                    2 => 50.0,
                    6 => 30.0,
                    _ => 75.0,
                };
                let hand = if frame == 4 { 145.0 } else { 160.0 };
                let body = match frame {
                    0 => 100.0,
                    7 => 130.0,
                    _ => 175.0,
                };
                (frame as FrameIndex, push_up_frame(elbow_deg, abduction, hand, body))
            })
            .collect();
        let angles = compute_angle_series(&landmarks, engine.angles());

        let report = engine.evaluate_repetition(0, &landmarks, &angles).unwrap();
        assert_eq!(report.len(), profile.categories().len());
        assert_eq!(report.get("push_up_depth").unwrap(), &Advice::good("Perfect range of motion!"));
        assert_eq!(report.get("hand_position").unwrap(), &Advice::good("Good hand position!"));
        // body dips to 130 on frame 7; the 100 on frame 0 is outside the tension interval
        assert_eq!(report.get("body_alignment").unwrap().severity, Severity::Bad);
        // first tension frame is 2 (50 degrees); later frames at 30 and 75 are ignored
        assert_eq!(report.get("elbow_position").unwrap(), &Advice::good("Perfect elbow position!"));
        // eccentric frames 2..=7 against concentric frame 9
        assert_eq!(
            report.get("eccentric_concentric_ratio").unwrap().severity,
            Severity::Good
        );
    }

    #[test]
    fn test_push_up_elbow_uses_first_tension_frame() {
        let engine = CorrectionEngine::compile(&JointMap::blaze_pose(), &ExerciseProfile::push_up()).unwrap();
        let elbow = [170.0, 130.0, 100.0, 70.0, 100.0, 130.0, 170.0];
        let abduction = [50.0, 70.0, 50.0, 50.0, 50.0, 50.0, 50.0];
        let landmarks: LandmarkSequence = elbow
            .iter()
            .zip(abduction)
            .enumerate()
            .map(|(frame, (&elbow_deg, abduction_deg))| {
                (frame as FrameIndex, push_up_frame(elbow_deg, abduction_deg, 160.0, 175.0))
            })
            .collect();
        let angles = compute_angle_series(&landmarks, engine.angles());

        let report = engine.evaluate_repetition(0, &landmarks, &angles).unwrap();
        assert_eq!(report.get("elbow_position").unwrap().severity, Severity::Bad);
    }
}
