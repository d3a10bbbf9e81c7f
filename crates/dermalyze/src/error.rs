//! Application error type

use api_client::ApiError;
use camera_capture::CameraError;
use capture_guidance::GuidanceError;
use local_store::StoreError;
use thiserror::Error;

/// Application errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Guidance(#[from] GuidanceError),

    #[error(transparent)]
    Camera(#[from] CameraError),
}

impl AppError {
    /// Message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api(e) => e.user_message(),
            AppError::Camera(_) | AppError::Guidance(GuidanceError::Camera(_)) => {
                "Error: Tidak dapat mengakses kamera".to_string()
            }
            AppError::Guidance(GuidanceError::CaptureNotReady) => {
                "Posisikan wajah dengan benar sebelum mengambil foto".to_string()
            }
            _ => "Terjadi kesalahan yang tidak diketahui.".to_string(),
        }
    }
}
