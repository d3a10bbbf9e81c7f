//! API Error Types

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors from backend calls
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: connection refused, DNS, timeout
    #[error("Network error: {0}")]
    Network(String),

    /// No stored token for an authenticated endpoint
    #[error("Authentication required. Please login first.")]
    AuthRequired,

    /// Backend answered 401
    #[error("Authentication failed. Please login again.")]
    Unauthorized,

    #[error("Endpoint not found: {0}")]
    NotFound(String),

    /// Backend answered 500
    #[error("Backend server error (status {status})")]
    Server { status: u16 },

    /// Body was an HTML page instead of JSON
    #[error("Server returned HTML error page instead of JSON")]
    HtmlResponse,

    #[error("Server returned invalid response format: {0}")]
    InvalidResponse(String),

    /// Backend refused the request with its own message
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// Message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Koneksi internet bermasalah. Silakan coba lagi.".to_string(),
            ApiError::AuthRequired => {
                "Silakan login terlebih dahulu untuk mengakses fitur ini.".to_string()
            }
            ApiError::Unauthorized => "Sesi Anda telah berakhir. Silakan login kembali.".to_string(),
            ApiError::NotFound(_) => {
                "Layanan tidak ditemukan. Periksa konfigurasi server.".to_string()
            }
            ApiError::Server { .. } => {
                "Terjadi kesalahan pada server. Silakan coba lagi nanti.".to_string()
            }
            ApiError::HtmlResponse => {
                "Server sedang bermasalah. Silakan coba lagi nanti.".to_string()
            }
            ApiError::InvalidResponse(_) => "Format respons server tidak valid.".to_string(),
            ApiError::Rejected { message, .. } => message.clone(),
            ApiError::Validation(e) => e.to_string(),
        }
    }

    /// Stored credentials are missing or no longer accepted
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::AuthRequired | ApiError::Unauthorized)
    }

    /// Backend could not be reached or did not answer usefully
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ApiError::Network(_)
                | ApiError::Server { .. }
                | ApiError::HtmlResponse
                | ApiError::InvalidResponse(_)
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}
