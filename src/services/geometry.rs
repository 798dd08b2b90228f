//! Geometric primitives over landmark coordinates.
//!
//! Every function is pure and takes concrete points, never a frame index.
//! Degenerate input (zero-length vectors, collinear points) yields `NaN` or
//! `None` instead of an error.

use crate::models::keypoint::{FrameIndex, Point3};

/// Interior angle at `b` between rays b→a and b→c, in degrees, on the x/y projection.
///
/// Returns `NaN` when either ray has zero length.
pub fn angle(a: Point3, b: Point3, c: Point3) -> f64 {
    let (ba_x, ba_y) = (a.x - b.x, a.y - b.y);
    let (bc_x, bc_y) = (c.x - b.x, c.y - b.y);

    let norm_ba = ba_x.hypot(ba_y);
    let norm_bc = bc_x.hypot(bc_y);

    if norm_ba == 0.0 || norm_bc == 0.0 {
        return f64::NAN;
    }

    let cosine = (ba_x * bc_x + ba_y * bc_y) / (norm_ba * norm_bc);
    cosine.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Angle at `b` from the three side lengths of triangle abc in full 3-D space
pub fn angle_law_of_cosines(a: Point3, b: Point3, c: Point3) -> f64 {
    let ab = a.distance_to(&b);
    let bc = b.distance_to(&c);
    let ac = a.distance_to(&c);

    if ab == 0.0 || bc == 0.0 {
        return f64::NAN;
    }

    let cosine = (ab * ab + bc * bc - ac * ac) / (2.0 * ab * bc);
    cosine.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Unit normal of the plane through three points, `None` when they are collinear
pub fn normal_vector(p1: Point3, p2: Point3, p3: Point3) -> Option<Point3> {
    let normal = (p2 - p1).cross(&(p3 - p1));
    let norm = normal.norm();

    if norm == 0.0 || !norm.is_finite() {
        return None;
    }

    Some(normal.scale(1.0 / norm))
}

/// Unsigned angle in degrees between the segment upper→lower and the vertical axis.
///
/// Uses `atan2(dx, dy)` so near-vertical and near-horizontal segments are both
/// well defined. The result lies in [0, 180].
pub fn vertical_orientation_angle(upper: Point3, lower: Point3) -> f64 {
    let dx = upper.x - lower.x;
    let dy = upper.y - lower.y;

    dx.atan2(dy).to_degrees().abs()
}

/// Angle in degrees between the face-plane normal (eyes + nose) and the vertical axis
pub fn head_pitch(eye_left: Point3, eye_right: Point3, nose: Point3) -> Option<f64> {
    let normal = normal_vector(eye_left, eye_right, nose)?;
    let vertical = Point3::new(0.0, 0.0, 1.0);

    Some(normal.dot(&vertical).clamp(-1.0, 1.0).acos().to_degrees())
}

/// Cosine between the knee→hip and ankle→foot-index directions.
///
/// `None` when either segment has zero length.
pub fn foot_knee_alignment(
    hip: Point3,
    knee: Point3,
    ankle: Point3,
    foot_index: Point3,
) -> Option<f64> {
    let knee_to_hip = hip - knee;
    let ankle_to_foot = foot_index - ankle;

    let (thigh, foot) = (knee_to_hip.norm(), ankle_to_foot.norm());
    if thigh == 0.0 || foot == 0.0 {
        return None;
    }

    Some(knee_to_hip.dot(&ankle_to_foot) / (thigh * foot))
}

/// Absolute slope of the line through two points, `+inf` when it is vertical
pub fn slope(left: Point3, right: Point3) -> f64 {
    let dx = right.x - left.x;
    if dx == 0.0 {
        return f64::INFINITY;
    }

    ((right.y - left.y) / dx).abs()
}

/// Eccentric frame count over concentric frame count, zero without concentric frames
pub fn eccentric_concentric_ratio(eccentric: &[FrameIndex], concentric: &[FrameIndex]) -> f64 {
    if concentric.is_empty() {
        return 0.0;
    }

    eccentric.len() as f64 / concentric.len() as f64
}
