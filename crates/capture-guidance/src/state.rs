//! Capture session state

use camera_capture::StillImage;

/// Capture session state
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// No camera
    #[default]
    Idle,
    /// Camera requested, stream not yet open
    Starting,
    /// Stream open, guidance loop running
    Guiding,
    /// Stream stopped, still frozen from the preview
    Captured(StillImage),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Starting => "starting",
            SessionState::Guiding => "guiding",
            SessionState::Captured(_) => "captured",
        }
    }

    /// Whether the camera is requested or running
    pub fn is_camera_active(&self) -> bool {
        matches!(self, SessionState::Starting | SessionState::Guiding)
    }
}

/// Host events that force the camera off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Route change away from the capture page
    NavigateAway,
    /// Tab hidden
    VisibilityHidden,
    /// Window unload / beforeunload
    Unload,
    /// Page hide (mobile)
    PageHide,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        let state = SessionState::default();
        assert_eq!(state.name(), "idle");
        assert!(!state.is_camera_active());
    }

    #[test]
    fn test_camera_active_states() {
        assert!(SessionState::Starting.is_camera_active());
        assert!(SessionState::Guiding.is_camera_active());
    }
}
