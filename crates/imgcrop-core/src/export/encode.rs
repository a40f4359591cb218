//! PNG encoding of the sliced region.
//!
//! PNG is the only output format: it is lossless and keeps the alpha
//! channel, which carries the transparent areas of rotated or overhanging
//! crops.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use super::ExportError;

/// Encode an RGBA bitmap to PNG bytes.
///
/// # Errors
///
/// Returns `ExportError::EncodingFailed` for an empty image or if the
/// encoder fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::EncodingFailed(format!(
            "image dimensions must be non-zero, got {}x{}",
            width, height
        )));
    }

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| ExportError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}
