//! Whole-image rotation onto an expanded canvas.
//!
//! The source is rotated around its center and drawn onto a canvas sized to
//! the rotated bounding box, the same way a 2D canvas context would render
//! `translate(center) · rotate(θ) · translate(-center)`. Canvas pixels not
//! covered by the image stay fully transparent.
//!
//! Angles are degrees, positive = clockwise on screen (y axis pointing down).
//!
//! # Algorithm
//!
//! Quarter turns are handled by exact pixel permutation. Any other angle
//! uses inverse mapping: for each output pixel center we find the source
//! position and interpolate.
//!
//! ```text
//! src_x =  (dst_x - dst_cx) * cos(θ) + (dst_y - dst_cy) * sin(θ) + src_cx
//! src_y = -(dst_x - dst_cx) * sin(θ) + (dst_y - dst_cy) * cos(θ) + src_cy
//! ```

use image::imageops;
use image::{Rgba, RgbaImage};

use super::InterpolationFilter;

const ANGLE_EPSILON: f64 = 0.001;

/// Compute the bounding box of an image rotated by `angle_degrees`.
///
/// Quarter turns are exact; other angles are rounded to the nearest pixel
/// and never collapse below 1x1.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    match quarter_turns(angle_degrees) {
        Some(0) | Some(2) => return (width, height),
        Some(_) => return (height, width),
        None => {}
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate the full image clockwise by `angle_degrees`.
///
/// The output canvas is expanded to hold the whole rotated image; nothing
/// is clipped.
pub fn rotate_image(image: &RgbaImage, angle_degrees: f64, filter: InterpolationFilter) -> RgbaImage {
    match quarter_turns(angle_degrees) {
        Some(0) => return image.clone(),
        Some(1) => return imageops::rotate90(image),
        Some(2) => return imageops::rotate180(image),
        Some(3) => return imageops::rotate270(image),
        _ => {}
    }

    let (src_w, src_h) = (image.width() as f64, image.height() as f64);
    let (dst_w, dst_h) = compute_rotated_bounds(image.width(), image.height(), angle_degrees);

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    RgbaImage::from_fn(dst_w, dst_h, |dst_x, dst_y| {
        // Work with pixel centers
        let dx = dst_x as f64 + 0.5 - dst_cx;
        let dy = dst_y as f64 + 0.5 - dst_cy;

        let src_x = dx * cos + dy * sin + src_cx - 0.5;
        let src_y = -dx * sin + dy * cos + src_cy - 0.5;

        match filter {
            InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y),
            InterpolationFilter::Lanczos3 => sample_lanczos3(image, src_x, src_y),
        }
    })
}

/// Number of clockwise quarter turns if the angle is one, normalized to 0..4.
fn quarter_turns(angle_degrees: f64) -> Option<u8> {
    let normalized = angle_degrees.rem_euclid(360.0);
    let turns = (normalized / 90.0).round();
    if (normalized - turns * 90.0).abs() < ANGLE_EPSILON {
        Some((turns as u8) % 4)
    } else {
        None
    }
}

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Whether a sample position (in pixel-center coordinates) falls on the image.
#[inline]
fn covers(image: &RgbaImage, x: f64, y: f64) -> bool {
    x >= -0.5 && y >= -0.5 && x < image.width() as f64 - 0.5 && y < image.height() as f64 - 0.5
}

/// Get a pixel as [f64; 4] with coordinates clamped to the image edge.
#[inline]
fn get_pixel_f64(image: &RgbaImage, px: i64, py: i64) -> [f64; 4] {
    let x = px.clamp(0, image.width() as i64 - 1) as u32;
    let y = py.clamp(0, image.height() as i64 - 1) as u32;
    let p = image.get_pixel(x, y).0;
    [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64]
}

#[inline]
fn to_rgba(values: [f64; 4]) -> Rgba<u8> {
    let mut out = [0u8; 4];
    for (o, v) in out.iter_mut().zip(values) {
        *o = v.clamp(0.0, 255.0).round() as u8;
    }
    Rgba(out)
}

/// Sample using bilinear interpolation of the 4 nearest pixels.
fn sample_bilinear(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    if !covers(image, x, y) {
        return TRANSPARENT;
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x0 + 1, y0);
    let p01 = get_pixel_f64(image, x0, y0 + 1);
    let p11 = get_pixel_f64(image, x0 + 1, y0 + 1);

    let mut result = [0.0; 4];
    for i in 0..4 {
        result[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }
    to_rgba(result)
}

/// Sample using a 6x6 Lanczos3 kernel, falling back to bilinear near edges.
fn sample_lanczos3(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let (w, h) = (image.width() as i64, image.height() as i64);

    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);

            let pixel = get_pixel_f64(image, px, py);
            for i in 0..4 {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    if weight_sum <= 0.0 {
        return TRANSPARENT;
    }
    to_rgba(sum.map(|v| v / weight_sum))
}

/// Lanczos kernel: `sinc(x) * sinc(x/a)` for `|x| < a`, zero beyond.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Opaque gradient so every pixel is distinguishable.
    fn test_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let v = ((x + y) * 8 % 256) as u8;
            Rgba([v, v, 255 - v, 255])
        })
    }

    fn marked_strip() -> RgbaImage {
        // 3x1: red, green, blue
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        img.put_pixel(2, 0, Rgba([0, 0, 255, 255]));
        img
    }

    #[test]
    fn test_no_rotation_is_identity() {
        let img = test_image(20, 10);
        let result = rotate_image(&img, 0.0, InterpolationFilter::Bilinear);
        assert_eq!(result, img);
    }

    #[test]
    fn test_tiny_rotation_fast_path() {
        let img = test_image(20, 10);
        let result = rotate_image(&img, 0.0001, InterpolationFilter::Bilinear);
        assert_eq!(result, img);
    }

    #[test]
    fn test_quarter_turn_clockwise() {
        let result = rotate_image(&marked_strip(), 90.0, InterpolationFilter::Bilinear);
        assert_eq!(result.dimensions(), (1, 3));
        // Clockwise: the left end moves to the top
        assert_eq!(result.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(result.get_pixel(0, 2).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_quarter_turn_counter_clockwise() {
        let result = rotate_image(&marked_strip(), -90.0, InterpolationFilter::Bilinear);
        assert_eq!(result.dimensions(), (1, 3));
        assert_eq!(result.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(result.get_pixel(0, 2).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_half_turn() {
        let result = rotate_image(&marked_strip(), 180.0, InterpolationFilter::Bilinear);
        assert_eq!(result.dimensions(), (3, 1));
        assert_eq!(result.get_pixel(0, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_full_turns_are_identity() {
        let img = test_image(12, 7);
        assert_eq!(rotate_image(&img, 360.0, InterpolationFilter::Bilinear), img);
        assert_eq!(rotate_image(&img, -720.0, InterpolationFilter::Bilinear), img);
    }

    #[test]
    fn test_quarter_turns_detection() {
        assert_eq!(quarter_turns(0.0), Some(0));
        assert_eq!(quarter_turns(90.0), Some(1));
        assert_eq!(quarter_turns(-90.0), Some(3));
        assert_eq!(quarter_turns(450.0), Some(1));
        assert_eq!(quarter_turns(359.9999), Some(0));
        assert_eq!(quarter_turns(45.0), None);
        assert_eq!(quarter_turns(5.0), None);
    }

    #[test]
    fn test_rotated_bounds() {
        assert_eq!(compute_rotated_bounds(100, 50, 0.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 90.0), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, 180.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 270.0), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, 450.0), (50, 100));

        let (w, h) = compute_rotated_bounds(100, 100, 45.0);
        assert!(w > 140 && w < 143, "width was {}", w);
        assert!(h > 140 && h < 143, "height was {}", h);
    }

    #[test]
    fn test_opposite_angles_same_bounds() {
        assert_eq!(
            compute_rotated_bounds(100, 80, 30.0),
            compute_rotated_bounds(100, 80, -30.0)
        );
    }

    #[test]
    fn test_bounds_never_zero() {
        for angle in [1.0, 15.0, 45.0, 89.0, 135.0, 179.0, 359.0] {
            let (w, h) = compute_rotated_bounds(1, 1, angle);
            assert!(w > 0 && h > 0, "angle {}", angle);
        }
    }

    #[test]
    fn test_rotation_expands_canvas_with_transparent_corners() {
        let img = test_image(40, 40);
        let result = rotate_image(&img, 45.0, InterpolationFilter::Bilinear);

        assert!(result.width() > img.width());
        assert!(result.height() > img.height());
        assert_eq!(result.get_pixel(0, 0).0[3], 0, "corner should be transparent");

        let center = result.get_pixel(result.width() / 2, result.height() / 2);
        assert_eq!(center.0[3], 255, "center should be covered");
    }

    #[test]
    fn test_output_dimensions_match_bounds() {
        let img = test_image(30, 17);
        for angle in [5.0, 33.0, -12.5, 200.0] {
            let result = rotate_image(&img, angle, InterpolationFilter::Bilinear);
            assert_eq!(result.dimensions(), compute_rotated_bounds(30, 17, angle));
        }
    }

    #[test]
    fn test_bilinear_vs_lanczos_same_dimensions() {
        let img = test_image(50, 50);
        let bilinear = rotate_image(&img, 15.0, InterpolationFilter::Bilinear);
        let lanczos = rotate_image(&img, 15.0, InterpolationFilter::Lanczos3);
        assert_eq!(bilinear.dimensions(), lanczos.dimensions());
    }

    #[test]
    fn test_uniform_image_stays_uniform_inside() {
        let img = RgbaImage::from_pixel(30, 30, Rgba([10, 200, 30, 255]));
        let result = rotate_image(&img, 20.0, InterpolationFilter::Lanczos3);
        let center = result.get_pixel(result.width() / 2, result.height() / 2);
        assert_eq!(center.0, [10, 200, 30, 255]);
    }

    #[test]
    fn test_1x1_image_rotation() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([128, 128, 128, 255]));
        let result = rotate_image(&img, 45.0, InterpolationFilter::Bilinear);
        assert!(result.width() >= 1 && result.height() >= 1);
    }

    #[test]
    fn test_lanczos_small_image_fallback() {
        let img = test_image(6, 6);
        let result = rotate_image(&img, 15.0, InterpolationFilter::Lanczos3);
        assert!(result.width() > 0 && result.height() > 0);
    }

    #[test]
    fn test_lanczos_weight() {
        assert!((lanczos_weight(0.0, 3.0) - 1.0).abs() < f64::EPSILON);
        assert!(lanczos_weight(3.0, 3.0).abs() < f64::EPSILON);
        assert!((lanczos_weight(1.5, 3.0) - lanczos_weight(-1.5, 3.0)).abs() < 1e-10);
    }
}
