//! Guidance configuration

use crate::GuidanceError;
use serde::{Deserialize, Serialize};

/// Guidance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    /// Width of the corner-bracket frame guide (pixels)
    pub frame_width: f32,

    /// Height of the corner-bracket frame guide (pixels)
    pub frame_height: f32,

    /// Length of each corner marker arm (pixels)
    pub corner_length: f32,

    /// Max distance between face center and frame center (pixels)
    pub center_threshold_px: f32,

    /// Max eye-line deviation from horizontal (degrees)
    pub rotation_threshold_deg: f32,

    /// Max nose-chin deviation from vertical (degrees)
    pub tilt_threshold_deg: f32,

    /// Mirror the overlay to match a selfie-mode preview
    pub mirror: bool,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            frame_width: 300.0,
            frame_height: 380.0,
            corner_length: 35.0,
            center_threshold_px: 40.0,
            rotation_threshold_deg: 15.0,
            tilt_threshold_deg: 10.0,
            mirror: true,
        }
    }
}

impl GuidanceConfig {
    /// Create strict config (lower thresholds)
    pub fn strict() -> Self {
        Self {
            center_threshold_px: 25.0,
            rotation_threshold_deg: 8.0,
            tilt_threshold_deg: 6.0,
            ..Default::default()
        }
    }

    /// Create lenient config (higher thresholds)
    pub fn lenient() -> Self {
        Self {
            center_threshold_px: 60.0,
            rotation_threshold_deg: 25.0,
            tilt_threshold_deg: 18.0,
            ..Default::default()
        }
    }

    /// Reject non-positive or non-finite values
    pub fn validate(&self) -> Result<(), GuidanceError> {
        let fields = [
            ("frame_width", self.frame_width),
            ("frame_height", self.frame_height),
            ("corner_length", self.corner_length),
            ("center_threshold_px", self.center_threshold_px),
            ("rotation_threshold_deg", self.rotation_threshold_deg),
            ("tilt_threshold_deg", self.tilt_threshold_deg),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(GuidanceError::Config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if self.corner_length * 2.0 > self.frame_width.min(self.frame_height) {
            return Err(GuidanceError::Config(
                "corner_length does not fit inside the frame guide".to_string(),
            ));
        }

        Ok(())
    }
}
