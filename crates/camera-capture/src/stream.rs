//! Media streams and the sources that open them

use crate::{CameraConfig, CameraError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Media track kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
}

/// A single track of a media stream
pub trait MediaTrack: Send {
    fn kind(&self) -> TrackKind;

    /// Stop the track. Stopping an ended track is a no-op.
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

/// An open camera stream
pub struct MediaStream {
    id: String,
    tracks: Vec<Box<dyn MediaTrack>>,
}

impl MediaStream {
    pub fn new(id: impl Into<String>, tracks: Vec<Box<dyn MediaTrack>>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Stop every track of the stream
    pub fn stop_all(&mut self) {
        for track in self.tracks.iter_mut() {
            if track.is_live() {
                track.stop();
            }
        }
        debug!("Stopped all tracks of stream {}", self.id);
    }

    /// Number of tracks still live
    pub fn live_tracks(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_live()).count()
    }

    pub fn video_tracks(&self) -> usize {
        self.tracks
            .iter()
            .filter(|t| t.kind() == TrackKind::Video)
            .count()
    }
}

impl std::fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream")
            .field("id", &self.id)
            .field("tracks", &self.tracks.len())
            .field("live", &self.live_tracks())
            .finish()
    }
}

/// Something that can open a camera stream (getUserMedia equivalent)
pub trait MediaSource {
    fn open(&mut self, config: &CameraConfig) -> Result<MediaStream, CameraError>;
}

/// Track whose liveness is shared with the camera that produced it
struct SimulatedTrack {
    kind: TrackKind,
    live: Arc<AtomicBool>,
}

impl MediaTrack for SimulatedTrack {
    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn stop(&mut self) {
        self.live.store(false, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

/// Software camera for development and tests (no hardware required)
#[derive(Debug)]
pub struct SimulatedCamera {
    permission_granted: bool,
    opened: Vec<Arc<AtomicBool>>,
    next_id: u32,
}

impl SimulatedCamera {
    /// Camera that grants permission
    pub fn new() -> Self {
        Self {
            permission_granted: true,
            opened: Vec::new(),
            next_id: 1,
        }
    }

    /// Camera whose permission prompt is denied
    pub fn denied() -> Self {
        Self {
            permission_granted: false,
            ..Self::new()
        }
    }

    /// Tracks opened by this camera that are still live
    pub fn live_track_count(&self) -> usize {
        self.opened
            .iter()
            .filter(|live| live.load(Ordering::SeqCst))
            .count()
    }

    /// Total number of streams opened
    pub fn streams_opened(&self) -> u32 {
        self.next_id - 1
    }
}

impl Default for SimulatedCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaSource for SimulatedCamera {
    fn open(&mut self, config: &CameraConfig) -> Result<MediaStream, CameraError> {
        if !self.permission_granted {
            warn!("Simulated camera: permission denied");
            return Err(CameraError::PermissionDenied);
        }

        let live = Arc::new(AtomicBool::new(true));
        self.opened.push(live.clone());

        let id = format!("simulated-{}", self.next_id);
        self.next_id += 1;

        info!(
            "Simulated camera opened {} ({}x{}, {:?})",
            id, config.width, config.height, config.facing_mode
        );

        Ok(MediaStream::new(
            id,
            vec![Box::new(SimulatedTrack {
                kind: TrackKind::Video,
                live,
            })],
        ))
    }
}
