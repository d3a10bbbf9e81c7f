//! Guided face capture
//!
//! Turns face-mesh landmarks from a live camera preview into
//! alignment feedback:
//! - Head pose (roll and pitch) and centering from four key landmarks
//! - Status line and capture gating
//! - Overlay display list (guide frame, crosshair, landmarks, hint lines)
//! - Capture session lifecycle with idempotent camera teardown

pub mod config;
pub mod guidance;
pub mod landmarks;
pub mod overlay;
pub mod pose;
pub mod session;
pub mod state;
pub mod status;

pub use config::GuidanceConfig;
pub use guidance::{evaluate_frame, GuidanceFrame};
pub use landmarks::{
    DetectionError, FrameDims, LandmarkDetector, LandmarkSet, Point2, ScriptedDetector,
};
pub use overlay::{rasterize, render_overlay, Color, DrawCommand, Overlay};
pub use pose::{compute_pose_estimate, PoseEstimate, PositionQuality};
pub use session::CaptureSession;
pub use state::{LifecycleEvent, SessionState};
pub use status::Status;

use camera_capture::CameraError;
use thiserror::Error;

/// Guidance error types
#[derive(Error, Debug)]
pub enum GuidanceError {
    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("Detector error: {0}")]
    Detection(#[from] DetectionError),

    #[error("Invalid landmarks: {0}")]
    InvalidLandmarks(String),

    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },

    #[error("Face is not in a capturable position")]
    CaptureNotReady,

    #[error("Configuration error: {0}")]
    Config(String),
}
