//! Pan offsets and crop rectangles.
//!
//! # Coordinate System
//!
//! - Crop rectangles are in source-image pixels, measured in the space of
//!   the image *after* rotation onto its bounding canvas
//! - Origin is the top-left corner of that canvas
//! - Pan offsets are viewport units and carry no bounds

use serde::{Deserialize, Serialize};

/// Drag offset of the image inside the crop viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PanOffset {
    pub x: f64,
    pub y: f64,
}

impl PanOffset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Crop rectangle as reported by the viewport geometry callback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Round to whole pixels.
    ///
    /// Returns `None` if any field is non-finite or the rounded size is
    /// zero in either dimension.
    pub fn to_pixels(&self) -> Option<PixelRect> {
        if ![self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
        {
            return None;
        }

        let width = self.width.round();
        let height = self.height.round();
        if width < 1.0 || height < 1.0 || width > u32::MAX as f64 || height > u32::MAX as f64 {
            return None;
        }

        Some(PixelRect {
            x: self.x.round() as i64,
            y: self.y.round() as i64,
            width: width as u32,
            height: height as u32,
        })
    }
}

/// Whole-pixel crop region. The origin may be negative or past the canvas;
/// uncovered pixels export as transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of pixels in the region.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}
