//! Per-frame guidance: pose, status, overlay and capture gate

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GuidanceConfig;
use crate::landmarks::{FrameDims, LandmarkSet};
use crate::overlay::{render_overlay, Overlay};
use crate::pose::{compute_pose_estimate, PoseEstimate};
use crate::status::Status;

/// Everything one frame of guidance produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceFrame {
    /// `None` when no face was detected
    pub estimate: Option<PoseEstimate>,
    pub status: Status,
    pub capture_enabled: bool,
    pub overlay: Overlay,
}

impl GuidanceFrame {
    pub fn face_detected(&self) -> bool {
        self.estimate.is_some()
    }
}

/// Classify one frame. Stateless: the same input always yields the same frame.
pub fn evaluate_frame(
    landmarks: Option<&LandmarkSet>,
    dims: FrameDims,
    config: &GuidanceConfig,
) -> GuidanceFrame {
    let Some(face) = landmarks else {
        return GuidanceFrame {
            estimate: None,
            status: Status::NoFace,
            capture_enabled: false,
            overlay: render_overlay(None, dims, config),
        };
    };

    let estimate = compute_pose_estimate(face, dims, config);
    debug!(
        "Orientation - Roll: {:.1}°, Pitch: {:.1}°, Centered: {}, Perfect: {}",
        estimate.roll,
        estimate.pitch,
        estimate.is_centered,
        estimate.is_perfect_position()
    );

    let overlay = render_overlay(Some((face, &estimate)), dims, config);

    GuidanceFrame {
        status: Status::from_estimate(Some(&estimate)),
        capture_enabled: estimate.is_perfect_position(),
        estimate: Some(estimate),
        overlay,
    }
}
