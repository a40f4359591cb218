//! Core types for the export pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MIME type of every exported file.
pub const EXPORT_MIME_TYPE: &str = "image/png";

/// Error types for export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Reading a file-backed source failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A data URL source could not be decoded.
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// The source bytes are not a recognized or valid image.
    #[error("Failed to decode source image: {0}")]
    DecodeFailed(String),

    /// The crop rectangle rounds to an empty or non-finite region, or one
    /// larger than [`MAX_EXPORT_BYTES`](super::MAX_EXPORT_BYTES) allows.
    #[error("Invalid crop rectangle: {width}x{height} at ({x}, {y})")]
    InvalidCrop { x: f64, y: f64, width: f64, height: f64 },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Interpolation filter for arbitrary-angle rotation.
///
/// Quarter turns are always exact and never interpolate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation.
    #[default]
    Bilinear,
    /// Lanczos3 interpolation, sharper edges at higher cost.
    Lanczos3,
}

/// Knobs for the export pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub interpolation: InterpolationFilter,
}

/// A finished export: one PNG file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// File name, `img-<millis>.png`.
    pub name: String,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Encoded PNG bytes.
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    pub fn mime_type(&self) -> &'static str {
        EXPORT_MIME_TYPE
    }

    /// Size of the encoded file in bytes.
    pub fn byte_size(&self) -> usize {
        self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_error_display() {
        let err = ExportError::DecodeFailed("truncated".to_string());
        assert_eq!(err.to_string(), "Failed to decode source image: truncated");

        let err = ExportError::InvalidCrop {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 10.0,
        };
        assert_eq!(err.to_string(), "Invalid crop rectangle: 0x10 at (0, 0)");
    }

    #[test]
    fn test_default_filter_is_bilinear() {
        assert_eq!(ExportOptions::default().interpolation, InterpolationFilter::Bilinear);
    }

    #[test]
    fn test_exported_file_mime() {
        let file = ExportedFile {
            name: "img-1.png".to_string(),
            width: 1,
            height: 1,
            bytes: vec![0; 4],
        };
        assert_eq!(file.mime_type(), "image/png");
        assert_eq!(file.byte_size(), 4);
    }
}
