//! Camera Capture Library for Dermalyze
//!
//! Provides the camera side of guided face capture:
//! - Front-facing (selfie) camera configuration
//! - Media streams with stoppable tracks
//! - Decoded video frames, mirroring and JPEG still encoding

pub mod frame;
pub mod stream;

pub use frame::{StillImage, VideoFrame};
pub use stream::{MediaSource, MediaStream, MediaTrack, SimulatedCamera, TrackKind};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("Failed to open camera: {0}")]
    Open(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Still encoding failed: {0}")]
    Encode(String),
}

/// Which way the camera faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front camera, facing the user
    User,
    /// Rear camera
    Environment,
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera facing mode
    pub facing_mode: FacingMode,
    /// Ideal capture width
    pub width: u32,
    /// Ideal capture height
    pub height: u32,
    /// Preview is shown mirrored (selfie mode)
    pub mirror_preview: bool,
    /// JPEG quality for captured stills (1-100)
    pub jpeg_quality: u8,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            facing_mode: FacingMode::User,
            width: 640,
            height: 480,
            mirror_preview: true,
            jpeg_quality: 90,
        }
    }
}

impl CameraConfig {
    /// Create selfie camera config (face capture)
    pub fn selfie() -> Self {
        Self::default()
    }

    /// Create rear camera config (no mirroring)
    pub fn rear() -> Self {
        Self {
            facing_mode: FacingMode::Environment,
            mirror_preview: false,
            ..Self::default()
        }
    }
}
