//! Capture session: camera stream, detector and the guidance loop

use camera_capture::{CameraConfig, MediaSource, MediaStream, StillImage, VideoFrame};
use tracing::{debug, error, info, warn};

use crate::config::GuidanceConfig;
use crate::guidance::{evaluate_frame, GuidanceFrame};
use crate::landmarks::{FrameDims, LandmarkDetector, LandmarkSet};
use crate::state::{LifecycleEvent, SessionState};
use crate::status::Status;
use crate::GuidanceError;

/// Guided capture session.
///
/// Owns the single camera stream and detector. Every exit path funnels into
/// [`CaptureSession::teardown`], which is safe to call any number of times.
pub struct CaptureSession<S: MediaSource, D: LandmarkDetector> {
    config: GuidanceConfig,
    camera_config: CameraConfig,
    source: S,
    detector: D,
    state: SessionState,
    stream: Option<MediaStream>,
    detector_running: bool,
    capture_enabled: bool,
    face_detected: bool,
    status: Status,
}

impl<S: MediaSource, D: LandmarkDetector> CaptureSession<S, D> {
    /// Create a new session
    pub fn new(
        config: GuidanceConfig,
        camera_config: CameraConfig,
        source: S,
        detector: D,
    ) -> Result<Self, GuidanceError> {
        config.validate()?;
        Ok(Self {
            config,
            camera_config,
            source,
            detector,
            state: SessionState::Idle,
            stream: None,
            detector_running: false,
            capture_enabled: false,
            face_detected: false,
            status: Status::Ready,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn capture_enabled(&self) -> bool {
        self.capture_enabled
    }

    pub fn face_detected(&self) -> bool {
        self.face_detected
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Idle -> Starting
    pub fn begin_start(&mut self) -> Result<(), GuidanceError> {
        if !matches!(self.state, SessionState::Idle) {
            return Err(GuidanceError::InvalidTransition {
                from: self.state.name(),
                action: "start",
            });
        }
        self.state = SessionState::Starting;
        self.status = Status::CameraStarting;
        debug!("Capture session starting");
        Ok(())
    }

    /// Starting -> Guiding, or back to Idle when the camera cannot be opened
    pub fn complete_start(&mut self) -> Result<(), GuidanceError> {
        if !matches!(self.state, SessionState::Starting) {
            return Err(GuidanceError::InvalidTransition {
                from: self.state.name(),
                action: "open camera",
            });
        }

        let stream = match self.source.open(&self.camera_config) {
            Ok(stream) => stream,
            Err(e) => {
                error!("Error accessing camera: {}", e);
                self.fail_start();
                return Err(e.into());
            }
        };
        self.stream = Some(stream);

        if let Err(e) = self.detector.start() {
            error!("Failed to start landmark detector: {}", e);
            self.fail_start();
            return Err(e.into());
        }
        self.detector_running = true;

        self.state = SessionState::Guiding;
        self.status = Status::CameraActive;
        info!("Camera active, guidance running");
        Ok(())
    }

    /// Idle -> Starting -> Guiding in one step
    pub fn start(&mut self) -> Result<(), GuidanceError> {
        self.begin_start()?;
        self.complete_start()
    }

    fn fail_start(&mut self) {
        self.teardown();
        self.state = SessionState::Idle;
        self.status = Status::CameraError;
    }

    /// Run the detector on a camera frame and update guidance.
    ///
    /// Detector failures count as a frame without a face.
    pub fn process_frame(&mut self, frame: &VideoFrame) -> Result<GuidanceFrame, GuidanceError> {
        self.ensure_guiding("process frame")?;

        let faces = match self.detector.detect(frame) {
            Ok(faces) => faces,
            Err(e) => {
                warn!("Error sending frame to face mesh: {}", e);
                Vec::new()
            }
        };

        Ok(self.apply(faces.first(), FrameDims::from(frame)))
    }

    /// Update guidance from landmarks produced outside the session
    pub fn process_landmarks(
        &mut self,
        landmarks: Option<&LandmarkSet>,
        dims: FrameDims,
    ) -> Result<GuidanceFrame, GuidanceError> {
        self.ensure_guiding("process landmarks")?;
        Ok(self.apply(landmarks, dims))
    }

    fn ensure_guiding(&self, action: &'static str) -> Result<(), GuidanceError> {
        if matches!(self.state, SessionState::Guiding) {
            Ok(())
        } else {
            Err(GuidanceError::InvalidTransition {
                from: self.state.name(),
                action,
            })
        }
    }

    fn apply(&mut self, landmarks: Option<&LandmarkSet>, dims: FrameDims) -> GuidanceFrame {
        let frame = evaluate_frame(landmarks, dims, &self.config);
        self.capture_enabled = frame.capture_enabled;
        self.face_detected = frame.face_detected();
        self.status = frame.status;
        frame
    }

    /// Guiding -> Captured. Only allowed while the last frame was a perfect position.
    pub fn capture(&mut self, frame: &VideoFrame) -> Result<&StillImage, GuidanceError> {
        self.ensure_guiding("capture")?;
        if !self.capture_enabled {
            return Err(GuidanceError::CaptureNotReady);
        }

        let still = StillImage::capture(
            frame,
            self.camera_config.mirror_preview,
            self.camera_config.jpeg_quality,
        )?;
        info!("Photo captured successfully, stopping camera...");

        self.teardown();
        self.status = Status::CameraStopped;
        self.state = SessionState::Captured(still);

        match &self.state {
            SessionState::Captured(still) => Ok(still),
            _ => Err(GuidanceError::CaptureNotReady),
        }
    }

    /// Captured -> Idle, handing over the still
    pub fn take_capture(&mut self) -> Option<StillImage> {
        match std::mem::take(&mut self.state) {
            SessionState::Captured(still) => {
                self.status = Status::Ready;
                Some(still)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// User cancel: camera off
    pub fn stop(&mut self) {
        self.teardown();
        if self.state.is_camera_active() {
            self.state = SessionState::Idle;
        }
        self.status = Status::CameraStopped;
        info!("Camera stopped successfully");
    }

    /// Host lifecycle events force the camera off from Starting/Guiding
    pub fn handle_event(&mut self, event: LifecycleEvent) {
        debug!("Lifecycle event {:?} in state {}", event, self.state.name());
        self.teardown();
        if self.state.is_camera_active() {
            self.state = SessionState::Idle;
            self.status = Status::Ready;
        }
    }

    /// Stop tracks, stop the detector, drop references. Idempotent.
    pub fn teardown(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_all();
            debug!("Released stream {}", stream.id());
        }
        if self.detector_running {
            self.detector.stop();
            self.detector_running = false;
        }
        self.capture_enabled = false;
        self.face_detected = false;
    }
}

impl<S: MediaSource, D: LandmarkDetector> Drop for CaptureSession<S, D> {
    fn drop(&mut self) {
        self.teardown();
    }
}
