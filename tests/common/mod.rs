#![allow(dead_code)]

use form_coach::models::{BlazePoseLandmark, DetectorFrames, FrameIndex, JointObservation};
use std::sync::Once;

use BlazePoseLandmark::*;

static INIT_LOGGING: Once = Once::new();

/// Route tracing output through the test harness, honoring `RUST_LOG`
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Knee angle schedule for one deep repetition: 165 → 80 by 5, back to 170 by 10
pub fn deep_squat_rep() -> Vec<f64> {
    let descent = (0..18).map(|step| 165.0 - 5.0 * step as f64);
    let ascent = (0..9).map(|step| 90.0 + 10.0 * step as f64);
    descent.chain(ascent).collect()
}

/// Standing frame followed by `reps` deep repetitions; 27 frames per repetition
pub fn deep_squat_schedule(reps: usize) -> Vec<f64> {
    std::iter::once(170.0)
        .chain((0..reps).flat_map(|_| deep_squat_rep()))
        .collect()
}

/// A single repetition that never drops below 140 degrees
pub fn shallow_squat_schedule() -> Vec<f64> {
    let descent = (0..7).map(|step| 170.0 - 5.0 * step as f64);
    let ascent = (1..5).map(|step| 140.0 + 7.5 * step as f64);
    descent.chain(ascent).collect()
}

/// Generator for synthetic side-view squat detector output.
///
/// The right ankle, heel and toes stay planted, the tibia and trunk both lean
/// forward by the same angle, and the left side mirrors the right shifted by
/// `stance_width`. With the defaults every squat check passes.
#[derive(Debug, Clone)]
pub struct SquatFixture {
    pub segment_length: f64,
    pub trunk_length: f64,
    pub lean_deg: f64,
    pub stance_width: f64,
    pub confidence: f64,
}

impl Default for SquatFixture {
    fn default() -> Self {
        Self {
            segment_length: 0.2,
            trunk_length: 0.3,
            lean_deg: 30.0,
            stance_width: 0.1,
            confidence: 0.9,
        }
    }
}

impl SquatFixture {
    /// One frame with the right knee bent to `knee_deg`
    pub fn frame(&self, knee_deg: f64) -> Vec<JointObservation> {
        let lean = self.lean_deg.to_radians();
        let knee_angle = knee_deg.to_radians();
        let l = self.segment_length;

        let ankle = (0.5, 0.9);
        let knee = (ankle.0 + l * lean.sin(), ankle.1 - l * lean.cos());
        let thigh = -lean - knee_angle;
        let hip = (knee.0 + l * thigh.sin(), knee.1 + l * thigh.cos());
        let shoulder = (
            hip.0 + self.trunk_length * lean.sin(),
            hip.1 - self.trunk_length * lean.cos(),
        );

        let mut joints =
            vec![JointObservation::new(0.5, 0.5, 0.0, self.confidence); BlazePoseLandmark::COUNT];
        let mut place = |landmark: BlazePoseLandmark, (x, y): (f64, f64), z: f64| {
            joints[landmark as usize] = JointObservation::new(x, y, z, self.confidence);
        };

        let right_side = [
            (RightAnkle, ankle),
            (RightKnee, knee),
            (RightHip, hip),
            (RightShoulder, shoulder),
            (RightHeel, (ankle.0 - 0.02, ankle.1 + 0.02)),
            (RightFootIndex, (ankle.0 + 0.08, ankle.1 + 0.02)),
        ];
        let mirrored = [LeftAnkle, LeftKnee, LeftHip, LeftShoulder, LeftHeel, LeftFootIndex];
        for ((landmark, point), left) in right_side.into_iter().zip(mirrored) {
            place(landmark, point, 0.0);
            place(left, (point.0 - self.stance_width, point.1), 0.0);
        }

        // face plane tilted so its normal sits 140 degrees off the z axis
        let head = (shoulder.0, shoulder.1 - 0.15);
        let pitch = 140f64.to_radians();
        place(LeftEye, (head.0 - 0.02, head.1), 0.0);
        place(RightEye, (head.0 + 0.02, head.1), 0.0);
        place(
            Nose,
            (head.0, head.1 + 0.05 * pitch.cos()),
            0.05 * pitch.sin(),
        );

        joints
    }

    /// Detector frames numbered from zero, one per scheduled knee angle
    pub fn frames(&self, knee_schedule: &[f64]) -> DetectorFrames {
        knee_schedule
            .iter()
            .enumerate()
            .map(|(frame, &deg)| (frame as FrameIndex, self.frame(deg)))
            .collect()
    }
}

/// Nudge one joint of one frame
pub fn shift_joint(
    frames: &mut DetectorFrames,
    frame: FrameIndex,
    landmark: BlazePoseLandmark,
    dx: f64,
    dy: f64,
) {
    if let Some(joints) = frames.get_mut(&frame) {
        let joint = &mut joints[landmark as usize];
        joint.x += dx;
        joint.y += dy;
    }
}
