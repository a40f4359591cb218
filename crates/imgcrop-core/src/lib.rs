//! imgcrop Core - crop, zoom and rotate state with PNG export
//!
//! This crate holds the state behind an interactive image cropper: pan,
//! zoom, rotation and the crop rectangle reported by the viewport, plus the
//! pipeline that turns that state into a single PNG file.
//!
//! # Module Structure
//!
//! - `clamp` - Pure bound checks for zoom and rotation
//! - `config` - Per-session bounds, steps and policies
//! - `geometry` - Pan offsets and crop rectangles
//! - `source` - References to the image being edited
//! - `session` - The mutable editing state
//! - `export` - Decode, rotate, slice, encode, name
//!
//! # Usage
//!
//! ```ignore
//! use imgcrop_core::{CropConfig, CropRect, CropSession, SourceImage};
//!
//! let mut session = CropSession::new(CropConfig::default())?;
//! session.set_image(Some(SourceImage::from(std::fs::read("photo.jpg")?)));
//! session.zoom_in();
//! session.rotate_clockwise();
//! session.on_geometry_change(CropRect::new(0.0, 0.0, 100.0, 100.0));
//!
//! if let Some(file) = session.export_image()? {
//!     std::fs::write(&file.name, &file.bytes)?;
//! }
//! session.reset();
//! ```

pub mod clamp;
pub mod config;
pub mod export;
pub mod geometry;
pub mod session;
pub mod source;

pub use clamp::{Bounds, RotationPolicy, StepPolicy};
pub use config::{ConfigError, CropConfig};
pub use export::{
    Clock, ExportError, ExportJob, ExportOptions, ExportOutcome, ExportedFile,
    InterpolationFilter, SystemClock,
};
pub use geometry::{CropRect, PanOffset, PixelRect};
pub use session::{CropSession, SessionState};
pub use source::SourceImage;
