//! Cutting the crop rectangle out of the rotated canvas.
//!
//! The rectangle is in whole pixels of the rotated canvas and may hang over
//! any edge (the viewport lets the user zoom out past the image). The output
//! always has exactly the rectangle's dimensions; pixels with no canvas
//! behind them are transparent.

use image::RgbaImage;

use crate::geometry::PixelRect;

/// Slice `rect` out of `image`.
pub fn slice_region(image: &RgbaImage, rect: PixelRect) -> RgbaImage {
    let mut output = RgbaImage::new(rect.width, rect.height);

    let src_w = image.width() as i64;
    let src_h = image.height() as i64;

    // Overlap of the rectangle with the canvas, in canvas coordinates
    let left = rect.x.max(0);
    let top = rect.y.max(0);
    let right = (rect.x + rect.width as i64).min(src_w);
    let bottom = (rect.y + rect.height as i64).min(src_h);

    if left >= right || top >= bottom {
        return output;
    }

    let row_bytes = ((right - left) * 4) as usize;
    let src_stride = (src_w * 4) as usize;
    let dst_stride = rect.width as usize * 4;
    let src = image.as_raw();
    let dst: &mut [u8] = &mut output;

    // Copy pixel data row by row
    for src_y in top..bottom {
        let dst_y = (src_y - rect.y) as usize;
        let dst_x = (left - rect.x) as usize;

        let src_start = src_y as usize * src_stride + left as usize * 4;
        let dst_start = dst_y * dst_stride + dst_x * 4;

        dst[dst_start..dst_start + row_bytes].copy_from_slice(&src[src_start..src_start + row_bytes]);
    }

    output
}


// ============================================================================
// Property-Based Tests
// ============================================================================
