//! User-facing capture status

use serde::{Deserialize, Serialize};

use crate::pose::PoseEstimate;

/// Status line shown under the camera preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Camera off, waiting for the user
    Ready,
    CameraStarting,
    CameraActive,
    /// Camera could not be opened
    CameraError,
    CameraStopped,
    NoFace,
    PerfectPosition,
    /// Off center and not aligned
    CenterAndAlign,
    OffCenter,
    /// Eye line not level (roll)
    HeadTilted,
    /// Nose-chin line not vertical (pitch)
    FaceNotUpright,
}

impl Status {
    /// Guidance status for one frame, by priority:
    /// perfect > off-center and misaligned > off-center > roll > pitch
    pub fn from_estimate(estimate: Option<&PoseEstimate>) -> Self {
        let Some(pose) = estimate else {
            return Status::NoFace;
        };

        if pose.is_perfect_position() {
            Status::PerfectPosition
        } else if !pose.is_centered && !pose.is_aligned() {
            Status::CenterAndAlign
        } else if !pose.is_centered {
            Status::OffCenter
        } else if !pose.is_upright {
            Status::HeadTilted
        } else {
            Status::FaceNotUpright
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Status::Ready => "Siap untuk deteksi wajah",
            Status::CameraStarting => "Memulai kamera...",
            Status::CameraActive => "Kamera aktif - Posisikan wajah Anda",
            Status::CameraError => "Error: Tidak dapat mengakses kamera",
            Status::CameraStopped => "Kamera dimatikan",
            Status::NoFace => "❌ Wajah tidak terdeteksi",
            Status::PerfectPosition => "✅ Posisi Sempurna",
            Status::CenterAndAlign => "⚠️ Posisikan ke tengah & luruskan wajah",
            Status::OffCenter => "⚠️ Posisikan wajah ke tengah",
            Status::HeadTilted => "⚠️ Luruskan kepala (jangan miring)",
            Status::FaceNotUpright => "⚠️ Tegakkan wajah (jangan menunduk/mendongak)",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
