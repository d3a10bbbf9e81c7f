//! Face landmarks and the detector seam

use camera_capture::VideoFrame;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;
use tracing::{debug, info};

use crate::GuidanceError;

/// Landmark count of the face mesh model (refined meshes add iris points)
pub const FACE_MESH_LANDMARKS: usize = 468;

/// Left eye outer corner
pub const LEFT_EYE_OUTER: usize = 33;
/// Right eye outer corner
pub const RIGHT_EYE_OUTER: usize = 362;
/// Nose tip
pub const NOSE_TIP: usize = 1;
/// Chin center
pub const CHIN_CENTER: usize = 18;

/// Landmarks drawn with an extra ring (nose, eyes, mouth, face contour)
pub const KEY_LANDMARKS: &[usize] = &[
    1, 2, 5, 4, 6, 19, 20, // nose
    33, 7, 163, 144, 145, 153, 154, 155, // left eye
    362, 398, 384, 385, 386, 387, 388, 466, // right eye
    61, 84, 17, 314, 405, 320, 307, 375, // mouth
    10, 151, 9, 8, 168, 148, 176, 149, 150, // contour
];

/// 2D point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Video frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDims {
    pub width: u32,
    pub height: u32,
}

impl FrameDims {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Geometric center of the frame
    pub fn center(&self) -> Point2 {
        Point2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    /// Scale a normalized [0,1] point to pixels
    pub fn to_pixels(&self, p: Point2) -> Point2 {
        Point2::new(p.x * self.width as f32, p.y * self.height as f32)
    }

    /// Scale a pixel point to normalized [0,1] coordinates
    pub fn to_normalized(&self, p: Point2) -> Point2 {
        Point2::new(p.x / self.width as f32, p.y / self.height as f32)
    }
}

impl From<&VideoFrame> for FrameDims {
    fn from(frame: &VideoFrame) -> Self {
        Self::new(frame.width, frame.height)
    }
}

/// One face's landmarks in normalized image coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    points: Vec<Point2>,
}

impl LandmarkSet {
    /// Wrap detector output; the set must cover the full face mesh
    pub fn new(points: Vec<Point2>) -> Result<Self, GuidanceError> {
        if points.len() < FACE_MESH_LANDMARKS {
            return Err(GuidanceError::InvalidLandmarks(format!(
                "expected at least {} points, got {}",
                FACE_MESH_LANDMARKS,
                points.len()
            )));
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(GuidanceError::InvalidLandmarks(
                "non-finite coordinate".to_string(),
            ));
        }
        Ok(Self { points })
    }

    /// Synthetic face whose key points average to `center_px`, with the eye
    /// line rotated by `roll_deg` and the nose-chin line tilted by `pitch_deg`.
    /// Angles hold in normalized coordinates.
    pub fn posed(dims: FrameDims, center_px: Point2, roll_deg: f32, pitch_deg: f32) -> Self {
        const EYE_HALF_SPAN: f32 = 0.08;
        const NOSE_CHIN_HALF: f32 = 0.06;

        let roll = roll_deg.to_radians();
        let face_line = (90.0 + pitch_deg).to_radians();

        let eye_offset = Point2::new(EYE_HALF_SPAN * roll.cos(), EYE_HALF_SPAN * roll.sin());
        let chin_offset = Point2::new(
            NOSE_CHIN_HALF * face_line.cos(),
            NOSE_CHIN_HALF * face_line.sin(),
        );

        let center = dims.to_normalized(center_px);
        let at = |dx: f32, dy: f32| Point2::new(center.x + dx, center.y + dy);

        let mut points = vec![center; FACE_MESH_LANDMARKS];
        points[LEFT_EYE_OUTER] = at(-eye_offset.x, -eye_offset.y);
        points[RIGHT_EYE_OUTER] = at(eye_offset.x, eye_offset.y);
        points[NOSE_TIP] = at(-chin_offset.x, -chin_offset.y);
        points[CHIN_CENTER] = at(chin_offset.x, chin_offset.y);

        Self { points }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn left_eye(&self) -> Point2 {
        self.points[LEFT_EYE_OUTER]
    }

    pub fn right_eye(&self) -> Point2 {
        self.points[RIGHT_EYE_OUTER]
    }

    pub fn nose_tip(&self) -> Point2 {
        self.points[NOSE_TIP]
    }

    pub fn chin(&self) -> Point2 {
        self.points[CHIN_CENTER]
    }
}

/// Detector failure for a single frame
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Detector not running")]
    NotRunning,

    #[error("Detector failed to start: {0}")]
    Start(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// External face-landmark detector
pub trait LandmarkDetector {
    /// Prepare the detector for a new camera session
    fn start(&mut self) -> Result<(), DetectionError> {
        Ok(())
    }

    /// Landmarks for every face found in the frame
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<LandmarkSet>, DetectionError>;

    /// Release the detector. Must tolerate repeated calls.
    fn stop(&mut self) {}
}

/// Detector that replays queued results, one per frame
#[derive(Debug, Default)]
pub struct ScriptedDetector {
    script: VecDeque<Result<Vec<LandmarkSet>, String>>,
    running: bool,
    stop_calls: u32,
}

impl ScriptedDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a frame with the given faces
    pub fn push_faces(&mut self, faces: Vec<LandmarkSet>) -> &mut Self {
        self.script.push_back(Ok(faces));
        self
    }

    /// Queue a frame that fails inference
    pub fn push_failure(&mut self, message: &str) -> &mut Self {
        self.script.push_back(Err(message.to_string()));
        self
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop_calls(&self) -> u32 {
        self.stop_calls
    }
}

impl LandmarkDetector for ScriptedDetector {
    fn start(&mut self) -> Result<(), DetectionError> {
        info!("Scripted detector started with {} queued frames", self.script.len());
        self.running = true;
        Ok(())
    }

    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<LandmarkSet>, DetectionError> {
        if !self.running {
            return Err(DetectionError::NotRunning);
        }
        debug!("Scripted detection for frame {}", frame.sequence);
        match self.script.pop_front() {
            Some(Ok(faces)) => Ok(faces),
            Some(Err(message)) => Err(DetectionError::Inference(message)),
            None => Ok(Vec::new()),
        }
    }

    fn stop(&mut self) {
        self.running = false;
        self.stop_calls += 1;
    }
}
