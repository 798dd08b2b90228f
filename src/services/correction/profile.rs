//! Exercise profiles: every exercise-specific constant as serde data.
//!
//! Built-in profiles cover squat, bicep curl and push-up. A directory of TOML
//! files can replace them or add new exercises without code changes.

use crate::error::{CorrectionError, Result};
use crate::models::report::Advice;
use crate::services::correction::grading::{Criterion, GradeTable, Interval};
use crate::services::correction::metrics::LandmarkMetric;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

pub const TEMPO_CATEGORY: &str = "eccentric_concentric_ratio";

/// Which extreme of the depth angle measures range of motion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extreme {
    #[default]
    Min,
    Max,
}

/// How a secondary angle is folded over the tension interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    Min,
    Max,
    /// First defined value
    First,
}

/// Primary range-of-motion grading; a bad grade ends the evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthRule {
    pub category: String,
    pub angle: String,
    #[serde(default)]
    pub extreme: Extreme,
    pub grades: GradeTable,
}

/// Running extremum of a secondary angle inside the tension interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremumRule {
    pub category: String,
    pub angle: String,
    pub reducer: Reducer,
    /// Starting value of the fold, graded as-is when no frame qualifies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<f64>,
    /// Values jumping at least this far from the previous retained frame are ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_step: Option<f64>,
    pub grades: GradeTable,
}

/// Per-frame check with sticky failure over the tension interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRule {
    pub category: String,
    pub metric: LandmarkMetric,
    pub criterion: Criterion,
    pub pass: Advice,
    pub fail: Advice,
}

/// Metric graded once, on the frame where the depth extreme was reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthFrameRule {
    pub category: String,
    pub metric: LandmarkMetric,
    pub grades: GradeTable,
}

fn tempo_category() -> String {
    TEMPO_CATEGORY.to_string()
}

/// Eccentric/concentric ratio grading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempoRule {
    #[serde(default = "tempo_category")]
    pub category: String,
    pub grades: GradeTable,
}

/// Complete configuration for one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProfile {
    pub name: String,
    /// Angles computed for every frame
    pub angles: Vec<String>,
    /// Angle driving repetition detection and the tension interval
    pub segmentation_angle: String,
    pub repetition_start_threshold: f64,
    pub error_threshold: f64,
    pub change_threshold: f64,
    pub depth: DepthRule,
    #[serde(default)]
    pub extrema: Vec<ExtremumRule>,
    #[serde(default)]
    pub checks: Vec<CheckRule>,
    #[serde(default)]
    pub depth_frame_rules: Vec<DepthFrameRule>,
    pub tempo: TempoRule,
}

impl ExerciseProfile {
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse exercise profile")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse profile file {}", path.display()))
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize exercise profile")
    }

    /// Every category this profile can report, in evaluation order
    pub fn categories(&self) -> Vec<&str> {
        std::iter::once(self.depth.category.as_str())
            .chain(self.extrema.iter().map(|rule| rule.category.as_str()))
            .chain(self.checks.iter().map(|rule| rule.category.as_str()))
            .chain(self.depth_frame_rules.iter().map(|rule| rule.category.as_str()))
            .chain(std::iter::once(self.tempo.category.as_str()))
            .collect()
    }

    pub fn squat() -> Self {
        Self {
            name: "squat".to_string(),
            angles: vec![
                "right_shoulder_hip_knee".to_string(),
                "right_hip_knee_ankle".to_string(),
            ],
            segmentation_angle: "right_hip_knee_ankle".to_string(),
            repetition_start_threshold: 135.0,
            error_threshold: 15.0,
            change_threshold: 15.0,
            depth: DepthRule {
                category: "squat_depth".to_string(),
                angle: "right_hip_knee_ankle".to_string(),
                extreme: Extreme::Min,
                grades: GradeTable::new(Advice::bad(
                    "This is not considered a squat. You need to go deeper in depth.",
                ))
                .tier(Interval::at_most(90.0), Advice::good("You depth is good."))
                .tier(
                    Interval::above(90.0).and_at_most(135.0),
                    Advice::fair("You need to go deeper in depth."),
                ),
            },
            extrema: Vec::new(),
            checks: vec![
                CheckRule {
                    category: "head_position".to_string(),
                    metric: LandmarkMetric::HeadPitch,
                    criterion: Criterion::PassWhen(Interval::above(120.0).and_below(160.0)),
                    pass: Advice::good("Your head position is good."),
                    fail: Advice::bad("You need to keep your head straight."),
                },
                CheckRule {
                    category: "thoracic_position".to_string(),
                    metric: LandmarkMetric::RightTrunkInclination,
                    criterion: Criterion::PassWhen(Interval::at_most(170.0)),
                    pass: Advice::good("Your thoracic position is good."),
                    fail: Advice::bad("You need to keep your chest up."),
                },
                CheckRule {
                    category: "hip_position".to_string(),
                    metric: LandmarkMetric::HipSlope,
                    criterion: Criterion::FailWhen(Interval::between(0.09, 0.15)),
                    pass: Advice::good("Your hip position is good."),
                    fail: Advice::bad("You need to keep your hips parallel to the ground."),
                },
                CheckRule {
                    category: "frontal_knee_position".to_string(),
                    metric: LandmarkMetric::KneeValgus,
                    criterion: Criterion::FailWhen(Interval::above(0.01)),
                    pass: Advice::good("Your knee position is good."),
                    fail: Advice::bad("You need to keep your knees in line with your toes."),
                },
                CheckRule {
                    category: "foot_position".to_string(),
                    metric: LandmarkMetric::RightHeelLift,
                    criterion: Criterion::FailWhen(Interval::above(0.001).and_at_most(0.1)),
                    pass: Advice::good("Your foot position is good."),
                    fail: Advice::bad(
                        "You need to keep your entire foot in contact with the ground.",
                    ),
                },
            ],
            depth_frame_rules: vec![DepthFrameRule {
                category: "trunk_position".to_string(),
                metric: LandmarkMetric::RightTrunkTibiaDivergence,
                grades: GradeTable::new(Advice::bad("Your trunk is not parallel to your tibia."))
                    .tier(
                        Interval::below(15.0),
                        Advice::good("Your trunk is parallel to your tibia."),
                    ),
            }],
            tempo: TempoRule {
                category: tempo_category(),
                grades: tempo_grades(
                    "Your movement is controlled, not dropping into the squat.",
                    "Your movement pace is good, but try to control the descent more.",
                    "You need to also control the descent movement, not just the ascent.",
                ),
            },
        }
    }

    pub fn bicep_curl() -> Self {
        Self {
            name: "bicep_curl".to_string(),
            angles: vec![
                "right_shoulder_elbow_wrist".to_string(),
                "right_elbow_wrist_index".to_string(),
                "right_hip_shoulder_elbow".to_string(),
                "right_shoulder_hip_knee".to_string(),
            ],
            segmentation_angle: "right_shoulder_elbow_wrist".to_string(),
            repetition_start_threshold: 120.0,
            error_threshold: 15.0,
            change_threshold: 90.0,
            depth: DepthRule {
                category: "curl_depth".to_string(),
                angle: "right_shoulder_elbow_wrist".to_string(),
                extreme: Extreme::Min,
                grades: GradeTable::new(Advice::bad("Bad curl depth, please go deeper."))
                    .tier(Interval::at_most(60.0), Advice::good("Perfect curl depth!"))
                    .tier(
                        Interval::above(60.0).and_at_most(120.0),
                        Advice::fair("Good curl depth, but could be better."),
                    ),
            },
            extrema: vec![
                ExtremumRule {
                    category: "wrist_position".to_string(),
                    angle: "right_elbow_wrist_index".to_string(),
                    reducer: Reducer::Min,
                    seed: Some(180.0),
                    max_step: Some(15.0),
                    grades: GradeTable::new(Advice::bad(
                        "Bad wrist position, please straighten your wrist.",
                    ))
                    .tier(Interval::between(150.0, 180.0), Advice::good("Good wrist position.")),
                },
                ExtremumRule {
                    category: "elbow_position".to_string(),
                    angle: "right_hip_shoulder_elbow".to_string(),
                    reducer: Reducer::Max,
                    seed: Some(0.0),
                    max_step: None,
                    grades: GradeTable::new(Advice::bad(
                        "Bad elbow position, please keep your elbows closer to your body.",
                    ))
                    .tier(Interval::at_most(15.0), Advice::good("Perfect elbow position!"))
                    .tier(
                        Interval::above(15.0).and_at_most(25.0),
                        Advice::fair("Good elbow position, but could be better."),
                    ),
                },
                ExtremumRule {
                    category: "back_arching_momentum".to_string(),
                    angle: "right_shoulder_hip_knee".to_string(),
                    reducer: Reducer::Min,
                    seed: Some(180.0),
                    max_step: None,
                    grades: GradeTable::new(Advice::bad(
                        "Poor back stability, avoid arching your back.",
                    ))
                    .tier(Interval::between(170.0, 180.0), Advice::good("Good back stability!")),
                },
            ],
            checks: Vec::new(),
            depth_frame_rules: Vec::new(),
            tempo: TempoRule {
                category: tempo_category(),
                grades: upper_body_tempo_grades(),
            },
        }
    }

    pub fn push_up() -> Self {
        Self {
            name: "push_up".to_string(),
            angles: vec![
                "right_shoulder_elbow_wrist".to_string(),
                "right_hip_shoulder_elbow".to_string(),
                "right_shoulder_hip_knee".to_string(),
                "right_elbow_wrist_index".to_string(),
            ],
            segmentation_angle: "right_shoulder_elbow_wrist".to_string(),
            repetition_start_threshold: 135.0,
            error_threshold: 15.0,
            change_threshold: 90.0,
            depth: DepthRule {
                category: "push_up_depth".to_string(),
                angle: "right_shoulder_elbow_wrist".to_string(),
                extreme: Extreme::Min,
                grades: GradeTable::new(Advice::bad("Bad range of motion, lower yourself further."))
                    .tier(Interval::at_most(90.0), Advice::good("Perfect range of motion!"))
                    .tier(
                        Interval::above(90.0).and_at_most(120.0),
                        Advice::fair("Good range of motion, but could be better."),
                    ),
            },
            extrema: vec![
                ExtremumRule {
                    category: "hand_position".to_string(),
                    angle: "right_elbow_wrist_index".to_string(),
                    reducer: Reducer::Min,
                    seed: Some(180.0),
                    max_step: None,
                    grades: GradeTable::new(Advice::bad("Bad hand position, please adjust your hands."))
                        .tier(Interval::at_least(140.0), Advice::good("Good hand position!"))
                        .tier(Interval::at_most(100.0), Advice::good("Good hand position!")),
                },
                ExtremumRule {
                    category: "body_alignment".to_string(),
                    angle: "right_shoulder_hip_knee".to_string(),
                    reducer: Reducer::Min,
                    seed: Some(180.0),
                    max_step: None,
                    grades: GradeTable::new(Advice::bad(
                        "Bad body alignment, maintain a straight line from head to heels.",
                    ))
                    .tier(Interval::between(140.0, 180.0), Advice::good("Good body alignment!")),
                },
                ExtremumRule {
                    category: "elbow_position".to_string(),
                    angle: "right_hip_shoulder_elbow".to_string(),
                    reducer: Reducer::First,
                    seed: Some(0.0),
                    max_step: None,
                    grades: GradeTable::new(Advice::bad(
                        "Bad elbow position, keep your elbows closer to your body.",
                    ))
                    .tier(Interval::between(45.0, 60.0), Advice::good("Perfect elbow position!")),
                },
            ],
            checks: Vec::new(),
            depth_frame_rules: Vec::new(),
            tempo: TempoRule {
                category: tempo_category(),
                grades: upper_body_tempo_grades(),
            },
        }
    }
}

fn tempo_grades(good: &str, fair: &str, bad: &str) -> GradeTable {
    GradeTable::new(Advice::bad(bad))
        .tier(Interval::at_least(2.0), Advice::good(good))
        .tier(Interval::at_least(1.5), Advice::fair(fair))
}

fn upper_body_tempo_grades() -> GradeTable {
    tempo_grades(
        "Your movement is controlled, great job!",
        "Your movement pace is good, but try to slow down the lowering phase.",
        "You need to also control the descent movement, aim for a slower eccentric phase.",
    )
}

/// Exercises with a built-in profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Squat,
    BicepCurl,
    PushUp,
}

impl ExerciseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::Squat => "squat",
            ExerciseType::BicepCurl => "bicep_curl",
            ExerciseType::PushUp => "push_up",
        }
    }

    pub fn all() -> [Self; 3] {
        [ExerciseType::Squat, ExerciseType::BicepCurl, ExerciseType::PushUp]
    }

    pub fn profile(&self) -> ExerciseProfile {
        match self {
            ExerciseType::Squat => ExerciseProfile::squat(),
            ExerciseType::BicepCurl => ExerciseProfile::bicep_curl(),
            ExerciseType::PushUp => ExerciseProfile::push_up(),
        }
    }
}

impl FromStr for ExerciseType {
    type Err = CorrectionError;

    fn from_str(s: &str) -> Result<Self> {
        match canonical_exercise_name(s).as_str() {
            "squat" => Ok(ExerciseType::Squat),
            "bicep_curl" | "bicepcurl" | "curl" => Ok(ExerciseType::BicepCurl),
            "push_up" | "pushup" => Ok(ExerciseType::PushUp),
            _ => Err(CorrectionError::UnknownExerciseType(s.to_string())),
        }
    }
}

impl std::fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn canonical_exercise_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Named exercise profiles: built-ins overlaid with profile files
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, ExerciseProfile>,
}

impl ProfileRegistry {
    /// Registry holding only the built-in profiles
    pub fn builtin() -> Self {
        let profiles = ExerciseType::all()
            .iter()
            .map(|exercise| (exercise.as_str().to_string(), exercise.profile()))
            .collect();

        Self { profiles }
    }

    /// Built-ins overlaid with an optional profiles directory
    pub fn load(profiles_dir: Option<&Path>) -> anyhow::Result<Self> {
        let mut registry = Self::builtin();
        if let Some(dir) = profiles_dir {
            registry.load_dir(dir)?;
        }
        Ok(registry)
    }

    /// Load every `*.toml` file in `dir`; a profile replaces any existing
    /// profile of the same name. Returns the number of files loaded.
    pub fn load_dir(&mut self, dir: &Path) -> anyhow::Result<usize> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read profiles directory {}", dir.display()))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to list profiles directory {}", dir.display()))?
                .path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let profile = ExerciseProfile::from_file(path)?;
            debug!(profile = %profile.name, path = %path.display(), "Loaded exercise profile");
            self.insert(profile);
        }

        info!(
            loaded = paths.len(),
            dir = %dir.display(),
            "Loaded exercise profiles"
        );

        Ok(paths.len())
    }

    pub fn insert(&mut self, mut profile: ExerciseProfile) {
        profile.name = canonical_exercise_name(&profile.name);
        self.profiles.insert(profile.name.clone(), profile);
    }

    /// Look up a profile by name; built-in aliases such as "pushup" are accepted
    pub fn get(&self, name: &str) -> Result<&ExerciseProfile> {
        let canonical = canonical_exercise_name(name);
        if let Some(profile) = self.profiles.get(&canonical) {
            return Ok(profile);
        }

        ExerciseType::from_str(name)
            .ok()
            .and_then(|exercise| self.profiles.get(exercise.as_str()))
            .ok_or_else(|| CorrectionError::UnknownExerciseType(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &ExerciseProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::Severity;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exercise_type_parsing() {
        assert_eq!("squat".parse::<ExerciseType>().unwrap(), ExerciseType::Squat);
        assert_eq!("Bicep Curl".parse::<ExerciseType>().unwrap(), ExerciseType::BicepCurl);
        assert_eq!("pushup".parse::<ExerciseType>().unwrap(), ExerciseType::PushUp);
        assert_eq!("push-up".parse::<ExerciseType>().unwrap(), ExerciseType::PushUp);
        assert_matches!(
            "deadlift".parse::<ExerciseType>(),
            Err(CorrectionError::UnknownExerciseType(_))
        );
    }

    #[test]
    fn test_builtin_registry() {
        let registry = ProfileRegistry::builtin();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["bicep_curl", "push_up", "squat"]);
        assert_eq!(registry.get("PushUp").unwrap().name, "push_up");
        assert_matches!(
            registry.get("lunge"),
            Err(CorrectionError::UnknownExerciseType(name)) if name == "lunge"
        );
    }

    #[test]
    fn test_squat_depth_edges() {
        let grades = &ExerciseProfile::squat().depth.grades;
        assert_eq!(grades.grade(90.0).severity, Severity::Good);
        assert_eq!(grades.grade(90.0001).severity, Severity::Fair);
        assert_eq!(grades.grade(135.0).severity, Severity::Fair);
        assert_eq!(grades.grade(135.0001).severity, Severity::Bad);
    }

    fn extremum_grades<'a>(profile: &'a ExerciseProfile, category: &str) -> &'a GradeTable {
        &profile
            .extrema
            .iter()
            .find(|rule| rule.category == category)
            .unwrap()
            .grades
    }

    fn check<'a>(profile: &'a ExerciseProfile, category: &str) -> &'a Criterion {
        &profile
            .checks
            .iter()
            .find(|rule| rule.category == category)
            .unwrap()
            .criterion
    }

    fn severities(grades: &GradeTable, values: &[f64]) -> Vec<Severity> {
        values.iter().map(|&value| grades.grade(value).severity).collect()
    }

    #[test]
    fn test_squat_check_edges() {
        let squat = ExerciseProfile::squat();

        let head = check(&squat, "head_position");
        assert!(!head.passes(120.0));
        assert!(head.passes(120.0001));
        assert!(head.passes(159.9999));
        assert!(!head.passes(160.0));

        let thoracic = check(&squat, "thoracic_position");
        assert!(thoracic.passes(170.0));
        assert!(!thoracic.passes(170.0001));

        let hips = check(&squat, "hip_position");
        assert!(hips.passes(0.0899));
        assert!(!hips.passes(0.09));
        assert!(!hips.passes(0.15));
        assert!(hips.passes(0.1501));

        let feet = check(&squat, "foot_position");
        assert!(feet.passes(0.001));
        assert!(!feet.passes(0.0011));
        assert!(!feet.passes(0.1));
        assert!(feet.passes(0.1001));

        let trunk = &squat.depth_frame_rules[0].grades;
        assert_eq!(severities(trunk, &[14.9999, 15.0]), vec![Severity::Good, Severity::Bad]);
    }

    #[test]
    fn test_bicep_curl_tier_edges() {
        let curl = ExerciseProfile::bicep_curl();
        use Severity::*;

        assert_eq!(
            severities(&curl.depth.grades, &[60.0, 60.0001, 120.0, 120.0001]),
            vec![Good, Fair, Fair, Bad]
        );
        assert_eq!(
            severities(extremum_grades(&curl, "wrist_position"), &[149.9999, 150.0, 180.0, 180.0001]),
            vec![Bad, Good, Good, Bad]
        );
        assert_eq!(
            severities(extremum_grades(&curl, "elbow_position"), &[15.0, 15.0001, 25.0, 25.0001]),
            vec![Good, Fair, Fair, Bad]
        );
        assert_eq!(
            severities(extremum_grades(&curl, "back_arching_momentum"), &[169.9999, 170.0, 180.0]),
            vec![Bad, Good, Good]
        );
        assert_eq!(
            severities(&curl.tempo.grades, &[1.4999, 1.5, 1.9999, 2.0]),
            vec![Bad, Fair, Fair, Good]
        );
    }

    #[test]
    fn test_push_up_tier_edges() {
        let push_up = ExerciseProfile::push_up();
        use Severity::*;

        assert_eq!(
            severities(&push_up.depth.grades, &[90.0, 90.0001, 120.0, 120.0001]),
            vec![Good, Fair, Fair, Bad]
        );
        assert_eq!(
            severities(
                extremum_grades(&push_up, "hand_position"),
                &[100.0, 100.0001, 120.0, 139.9999, 140.0]
            ),
            vec![Good, Bad, Bad, Bad, Good]
        );
        assert_eq!(
            severities(extremum_grades(&push_up, "body_alignment"), &[139.9999, 140.0, 180.0, 180.0001]),
            vec![Bad, Good, Good, Bad]
        );
        assert_eq!(
            severities(extremum_grades(&push_up, "elbow_position"), &[44.9999, 45.0, 60.0, 60.0001]),
            vec![Bad, Good, Good, Bad]
        );
        assert_eq!(
            severities(&push_up.tempo.grades, &[1.4999, 1.5, 2.0]),
            vec![Bad, Fair, Good]
        );
    }

    #[test]
    fn test_nan_grades_fall_through_to_bad() {
        for exercise in ExerciseType::all() {
            let profile = exercise.profile();
            assert_eq!(profile.depth.grades.grade(f64::NAN).severity, Severity::Bad);
            for rule in &profile.extrema {
                assert_eq!(rule.grades.grade(f64::NAN).severity, Severity::Bad, "{}", rule.category);
            }
        }
    }

    #[test]
    fn test_tempo_bands() {
        let grades = &ExerciseProfile::squat().tempo.grades;
        assert_eq!(grades.grade(2.0).severity, Severity::Good);
        assert_eq!(grades.grade(1.5).severity, Severity::Fair);
        assert_eq!(grades.grade(1.4999).severity, Severity::Bad);
        assert_eq!(grades.grade(0.0).severity, Severity::Bad);
    }

    #[test]
    fn test_toml_export_parses_back() {
        for exercise in ExerciseType::all() {
            let profile = exercise.profile();
            let text = profile.to_toml_string().unwrap();
            let parsed = ExerciseProfile::from_toml_str(&text).unwrap();
            assert_eq!(parsed, profile);
        }
    }

    #[test]
    fn test_categories_in_evaluation_order() {
        let profile = ExerciseProfile::squat();
        assert_eq!(
            profile.categories(),
            vec![
                "squat_depth",
                "head_position",
                "thoracic_position",
                "hip_position",
                "frontal_knee_position",
                "foot_position",
                "trunk_position",
                "eccentric_concentric_ratio",
            ]
        );
    }

    #[test]
    fn test_profiles_dir_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();

        let mut tuned = ExerciseProfile::squat();
        tuned.repetition_start_threshold = 140.0;
        std::fs::write(dir.path().join("squat.toml"), tuned.to_toml_string().unwrap()).unwrap();

        let mut lunge = ExerciseProfile::squat();
        lunge.name = "Lunge".to_string();
        std::fs::write(dir.path().join("lunge.toml"), lunge.to_toml_string().unwrap()).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = ProfileRegistry::load(Some(dir.path())).unwrap();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get("squat").unwrap().repetition_start_threshold, 140.0);
        assert_eq!(registry.get("lunge").unwrap().name, "lunge");
    }

    #[test]
    fn test_malformed_profile_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.toml"), "name = \"broken\"\nangles = 3\n").unwrap();

        let err = ProfileRegistry::load(Some(dir.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.toml"));
    }
}
