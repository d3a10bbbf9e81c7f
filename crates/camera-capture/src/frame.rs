//! Video frame types and still encoding

use crate::CameraError;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage};
use tracing::debug;

/// File name given to stills captured from the camera
pub const CAPTURED_FILE_NAME: &str = "captured-photo.jpg";

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }

    /// Create a frame filled with one color
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take((width * height * 3) as usize)
            .collect();
        Self::new(data, width, height, 0, 0)
    }

    /// Check that the buffer length matches the dimensions
    pub fn validate(&self) -> Result<(), CameraError> {
        let expected = self.width as usize * self.height as usize * 3;
        if self.width == 0 || self.height == 0 {
            return Err(CameraError::InvalidFrame("zero-sized frame".to_string()));
        }
        if self.data.len() != expected {
            return Err(CameraError::InvalidFrame(format!(
                "expected {} bytes for {}x{}, got {}",
                expected,
                self.width,
                self.height,
                self.data.len()
            )));
        }
        Ok(())
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        self.data
            .get(idx..idx + 3)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Flip the frame horizontally so it matches a mirrored preview
    pub fn mirrored(&self) -> VideoFrame {
        let row_len = (self.width * 3) as usize;
        if row_len == 0 {
            return self.clone();
        }
        let mut flipped = Vec::with_capacity(self.data.len());

        for row in self.data.chunks(row_len) {
            for pixel in row.chunks(3).rev() {
                flipped.extend_from_slice(pixel);
            }
        }

        VideoFrame {
            data: flipped,
            width: self.width,
            height: self.height,
            timestamp_ns: self.timestamp_ns,
            sequence: self.sequence,
        }
    }

    /// View as an `image` RGB buffer
    pub fn to_rgb_image(&self) -> Result<RgbImage, CameraError> {
        self.validate()?;
        RgbImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| CameraError::InvalidFrame("buffer too small".to_string()))
    }

    /// Encode the frame as JPEG
    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, CameraError> {
        self.validate()?;

        let mut out = Vec::new();
        {
            let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
            encoder
                .encode(&self.data, self.width, self.height, ExtendedColorType::Rgb8)
                .map_err(|e| CameraError::Encode(e.to_string()))?;
        }

        debug!("Encoded {}x{} frame to {} JPEG bytes", self.width, self.height, out.len());
        Ok(out)
    }
}

/// Still photo frozen from the live preview
#[derive(Debug, Clone)]
pub struct StillImage {
    /// JPEG bytes
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Upload file name
    pub file_name: String,
}

impl StillImage {
    /// Freeze a frame into a JPEG still, mirrored when the preview is mirrored
    pub fn capture(frame: &VideoFrame, mirror: bool, quality: u8) -> Result<Self, CameraError> {
        frame.validate()?;
        let source = if mirror { frame.mirrored() } else { frame.clone() };
        let jpeg = source.encode_jpeg(quality)?;

        Ok(Self {
            jpeg,
            width: frame.width,
            height: frame.height,
            file_name: CAPTURED_FILE_NAME.to_string(),
        })
    }
}
