//! Export pipeline: from source image and crop state to one PNG file.
//!
//! # Pipeline Order
//!
//! 1. Load and decode the source (EXIF orientation applied)
//! 2. Rotate the *whole* bitmap onto its bounding canvas
//! 3. Slice the crop rectangle out of the rotated canvas
//! 4. Encode as PNG
//!
//! The crop rectangle is expressed in rotated-canvas coordinates, so
//! rotation must come before slicing.
//!
//! # Architecture
//!
//! A session hands out an [`ExportJob`]: an owned snapshot of everything the
//! pipeline needs, tagged with the session generation it was taken from.
//! The job is `Send` and can run anywhere (a worker thread, a Web Worker).
//! Its [`ExportOutcome`] goes back through
//! [`CropSession::accept`](crate::CropSession::accept), which drops results
//! from a session that has since been reset or given a new image.

mod decode;
mod encode;
mod naming;
mod rotate;
mod slice;
mod types;

pub use decode::{decode_source, read_orientation, Orientation};
pub use encode::encode_png;
pub use naming::{Clock, FileNamer, SystemClock};
pub use rotate::{compute_rotated_bounds, rotate_image};
pub use slice::slice_region;
pub use types::{ExportError, ExportOptions, ExportedFile, InterpolationFilter, EXPORT_MIME_TYPE};

use crate::geometry::{CropRect, PixelRect};
use crate::source::SourceImage;

/// Largest RGBA output an export will allocate, in bytes. Same as the
/// `image` crate's default decoder allocation limit.
pub const MAX_EXPORT_BYTES: u64 = 512 * 1024 * 1024;

fn fits_export_limit(rect: &PixelRect) -> bool {
    rect.area()
        .checked_mul(4)
        .is_some_and(|bytes| bytes <= MAX_EXPORT_BYTES && usize::try_from(bytes).is_ok())
}

/// Everything needed to produce one export, detached from the session.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub(crate) generation: u64,
    pub(crate) source: SourceImage,
    pub(crate) crop: CropRect,
    pub(crate) rotation: f64,
    pub(crate) options: ExportOptions,
    pub(crate) name: String,
}

/// Result of running an [`ExportJob`], still tagged with its generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub generation: u64,
    pub file: ExportedFile,
}

impl ExportJob {
    /// Generation of the session state this job was taken from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// File name the output will carry.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn crop(&self) -> CropRect {
        self.crop
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Run the pipeline.
    ///
    /// # Errors
    ///
    /// Any load, decode, crop or encode failure. Nothing is retried.
    pub fn run(self) -> Result<ExportOutcome, ExportError> {
        let _span = tracing::debug_span!(
            "export",
            generation = self.generation,
            file = %self.name,
        )
        .entered();

        let rect = self
            .crop
            .to_pixels()
            .filter(fits_export_limit)
            .ok_or(ExportError::InvalidCrop {
            x: self.crop.x,
            y: self.crop.y,
            width: self.crop.width,
            height: self.crop.height,
        })?;

        let bytes = self.source.load()?;
        let decoded = decode_source(&bytes)?;
        drop(bytes);

        tracing::debug!(
            source = self.source.kind(),
            width = decoded.width(),
            height = decoded.height(),
            rotation = self.rotation,
            "decoded source"
        );

        let rotated = rotate_image(&decoded, self.rotation, self.options.interpolation);
        drop(decoded);

        let region = slice_region(&rotated, rect);
        let file = ExportedFile {
            name: self.name,
            width: rect.width,
            height: rect.height,
            bytes: encode_png(&region)?,
        };

        tracing::debug!(
            width = file.width,
            height = file.height,
            bytes = file.byte_size(),
            "export finished"
        );

        Ok(ExportOutcome {
            generation: self.generation,
            file,
        })
    }
}
