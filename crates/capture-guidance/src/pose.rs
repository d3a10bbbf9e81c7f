//! Face pose estimate from landmarks

use serde::{Deserialize, Serialize};

use crate::config::GuidanceConfig;
use crate::landmarks::{FrameDims, LandmarkSet, Point2};

/// Per-frame face pose classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseEstimate {
    /// Eye-line deviation from horizontal, in [0, 180] degrees
    pub roll: f32,
    /// Nose-chin deviation from vertical, in [0, 180] degrees
    pub pitch: f32,
    /// Mean of the eye corners, nose tip and chin (pixels)
    pub face_center: Point2,
    /// Distance between face center and frame center (pixels)
    pub center_distance: f32,
    pub is_centered: bool,
    pub is_upright: bool,
    pub is_straight: bool,
}

impl PoseEstimate {
    /// Upright and straight
    pub fn is_aligned(&self) -> bool {
        self.is_upright && self.is_straight
    }

    /// The single gating condition for capture
    pub fn is_perfect_position(&self) -> bool {
        self.is_centered && self.is_aligned()
    }

    pub fn quality(&self) -> PositionQuality {
        if self.is_perfect_position() {
            PositionQuality::Perfect
        } else if self.is_centered {
            PositionQuality::Centered
        } else {
            PositionQuality::OffCenter
        }
    }
}

/// Coarse position quality, used for landmark coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionQuality {
    Perfect,
    Centered,
    OffCenter,
}

/// Line angle in degrees, in (-180, 180]
fn line_angle(from: Point2, to: Point2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees()
}

/// Deviation of the nose-chin line from pointing straight down, in [0, 180]
fn pitch_from_angle(angle: f32) -> f32 {
    let a = (angle - 90.0).abs();
    if a > 180.0 {
        360.0 - a
    } else {
        a
    }
}

/// Classify one frame's landmarks.
///
/// Angles are measured on the normalized landmarks; only the centering
/// distance is in pixels.
pub fn compute_pose_estimate(
    landmarks: &LandmarkSet,
    dims: FrameDims,
    config: &GuidanceConfig,
) -> PoseEstimate {
    let roll = line_angle(landmarks.left_eye(), landmarks.right_eye()).abs();
    let pitch = pitch_from_angle(line_angle(landmarks.nose_tip(), landmarks.chin()));

    let left_eye = dims.to_pixels(landmarks.left_eye());
    let right_eye = dims.to_pixels(landmarks.right_eye());
    let nose = dims.to_pixels(landmarks.nose_tip());
    let chin = dims.to_pixels(landmarks.chin());

    let face_center = Point2::new(
        (left_eye.x + right_eye.x + nose.x + chin.x) / 4.0,
        (left_eye.y + right_eye.y + nose.y + chin.y) / 4.0,
    );
    let center_distance = face_center.distance(&dims.center());

    PoseEstimate {
        roll,
        pitch,
        face_center,
        center_distance,
        is_centered: center_distance < config.center_threshold_px,
        is_upright: roll < config.rotation_threshold_deg,
        is_straight: pitch < config.tilt_threshold_deg,
    }
}
