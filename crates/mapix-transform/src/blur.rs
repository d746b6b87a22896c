//! 3x3 box blur with clamp-to-edge neighborhoods.
//!
//! The neighborhood of `(x, y)` is the rectangle `[x - 1, x + 1] x
//! [y - 1, y + 1]`, where any end falling outside the image is pulled
//! back to the center coordinate on that axis. Interior pixels therefore
//! average 9 cells, edge pixels 6 and corner pixels 4; every cell is
//! counted once. Each channel is averaged independently and the result
//! floored.
//!
//! [`image_blur`] runs a single pass: every output pixel is computed
//! from the original input, so blurred values never feed back into
//! their neighbors within the same call.

use crate::map::image_map_coord;
use crate::types::{Color, RgbImage, TransformError};

/// Floored per-channel mean of the clamped 3x3 neighborhood of `(x, y)`.
///
/// # Panics
///
/// Panics if `(x, y)` lies outside the image. Use [`try_pixel_blur`]
/// when the coordinate is not known to be valid.
#[must_use]
pub fn pixel_blur(image: &RgbImage, x: u32, y: u32) -> Color {
    assert!(
        x < image.width() && y < image.height(),
        "pixel_blur: ({x}, {y}) is outside the {}x{} image",
        image.width(),
        image.height(),
    );
    neighborhood_mean(image, x, y)
}

/// Checked form of [`pixel_blur`].
///
/// # Errors
///
/// Returns [`TransformError::OutOfBounds`] if `(x, y)` lies outside the
/// image.
pub fn try_pixel_blur(image: &RgbImage, x: u32, y: u32) -> Result<Color, TransformError> {
    let (width, height) = image.dimensions();
    if x >= width || y >= height {
        return Err(TransformError::OutOfBounds {
            x,
            y,
            width,
            height,
        });
    }
    Ok(neighborhood_mean(image, x, y))
}

/// Replace every pixel with [`pixel_blur`] of the original image.
#[must_use = "returns the blurred image"]
pub fn image_blur(image: &RgbImage) -> RgbImage {
    image_map_coord(image, pixel_blur)
}

/// Inclusive `[c - 1, c + 1]` along an axis of length `len`, with each
/// out-of-range end replaced by `c`. Requires `c < len`.
const fn clamped_span(c: u32, len: u32) -> (u32, u32) {
    let lo = if c == 0 { c } else { c - 1 };
    let hi = if c + 1 >= len { c } else { c + 1 };
    (lo, hi)
}

fn neighborhood_mean(image: &RgbImage, x: u32, y: u32) -> Color {
    let (x_lo, x_hi) = clamped_span(x, image.width());
    let (y_lo, y_hi) = clamped_span(y, image.height());

    let mut sums = [0_u32; 3];
    let mut count = 0_u32;
    for ny in y_lo..=y_hi {
        for nx in x_lo..=x_hi {
            let pixel = image.get_pixel(nx, ny);
            for (sum, &channel) in sums.iter_mut().zip(pixel.0.iter()) {
                *sum += u32::from(channel);
            }
            count += 1;
        }
    }

    // The mean of u8 values fits in a u8.
    #[allow(clippy::cast_possible_truncation)]
    let mean = sums.map(|sum| (sum / count) as u8);
    image::Rgb(mean)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::Rgb;

    use super::*;

    fn gray(v: u8) -> Color {
        Rgb([v, v, v])
    }

    #[test]
    fn clamped_span_cases() {
        assert_eq!(clamped_span(0, 5), (0, 1));
        assert_eq!(clamped_span(2, 5), (1, 3));
        assert_eq!(clamped_span(4, 5), (3, 4));
        assert_eq!(clamped_span(0, 1), (0, 0));
        assert_eq!(clamped_span(1, 2), (0, 1));
    }

    #[test]
    fn uniform_image_is_a_fixed_point_everywhere() {
        let img = RgbImage::from_pixel(7, 7, gray(10));
        for (x, y) in [(1, 1), (0, 0), (6, 6), (0, 3), (3, 6), (3, 3)] {
            assert_eq!(pixel_blur(&img, x, y), gray(10), "at ({x},{y})");
        }
    }

    #[test]
    fn two_by_two_corner_averages_four_cells() {
        let mut img = RgbImage::from_pixel(2, 2, gray(0));
        img.put_pixel(1, 1, gray(200));
        assert_eq!(pixel_blur(&img, 1, 1), gray(50));
    }

    #[test]
    fn top_right_and_bottom_right_corners() {
        let mut img = RgbImage::from_pixel(3, 3, gray(0));
        img.put_pixel(2, 0, gray(200));
        assert_eq!(pixel_blur(&img, 2, 0), gray(50));
        assert_eq!(pixel_blur(&img, 2, 2), gray(0));
    }

    #[test]
    fn edge_pixel_averages_six_cells() {
        let mut img = RgbImage::from_pixel(3, 3, gray(0));
        img.put_pixel(1, 0, gray(60));
        // (1, 0) neighbourhood: x in 0..=2, y in 0..=1 -> 6 cells.
        assert_eq!(pixel_blur(&img, 1, 0), gray(10));
    }

    #[test]
    fn channels_are_averaged_independently() {
        let mut img = RgbImage::from_pixel(3, 3, Rgb([0, 90, 255]));
        img.put_pixel(1, 1, Rgb([90, 0, 0]));
        // Interior: 9 cells, one of them differs.
        assert_eq!(pixel_blur(&img, 1, 1), Rgb([10, 80, 226]));
    }

    #[test]
    fn single_pixel_image_blurs_to_itself() {
        let img = RgbImage::from_pixel(1, 1, Rgb([7, 8, 9]));
        assert_eq!(pixel_blur(&img, 0, 0), Rgb([7, 8, 9]));
    }

    #[test]
    fn one_pixel_wide_image_uses_vertical_neighbours_only() {
        let img = RgbImage::from_fn(1, 3, |_, y| gray([30, 0, 0][usize::try_from(y).unwrap()]));
        assert_eq!(pixel_blur(&img, 0, 0), gray(15));
        assert_eq!(pixel_blur(&img, 0, 1), gray(10));
        assert_eq!(pixel_blur(&img, 0, 2), gray(0));
    }

    #[test]
    fn try_pixel_blur_rejects_out_of_range() {
        let img = RgbImage::new(3, 2);
        let err = try_pixel_blur(&img, 3, 0).unwrap_err();
        assert!(matches!(
            err,
            TransformError::OutOfBounds {
                x: 3,
                y: 0,
                width: 3,
                height: 2
            }
        ));
        assert!(try_pixel_blur(&img, 0, 2).is_err());
    }

    #[test]
    fn try_pixel_blur_matches_pixel_blur() {
        let mut img = RgbImage::from_pixel(4, 4, gray(100));
        img.put_pixel(2, 2, gray(0));
        for (x, y, _) in img.enumerate_pixels() {
            assert_eq!(try_pixel_blur(&img, x, y).unwrap(), pixel_blur(&img, x, y));
        }
    }

    #[test]
    #[should_panic(expected = "outside the 2x2 image")]
    fn pixel_blur_panics_out_of_range() {
        let img = RgbImage::new(2, 2);
        let _ = pixel_blur(&img, 0, 2);
    }

    #[test]
    fn image_blur_returns_distinct_image() {
        let input = RgbImage::from_pixel(3, 3, gray(20));
        let output = image_blur(&input);
        assert_eq!(input, output);
        assert_ne!(input.as_raw().as_ptr(), output.as_raw().as_ptr());
    }

    #[test]
    fn image_blur_uniform_is_unchanged() {
        let input = RgbImage::from_pixel(7, 7, gray(10));
        assert_eq!(image_blur(&input), input);
    }

    #[test]
    fn image_blur_dark_center() {
        let mut input = RgbImage::from_pixel(3, 3, gray(100));
        input.put_pixel(1, 1, gray(0));

        let mut expected = RgbImage::from_pixel(3, 3, gray(83));
        for (x, y) in [(0, 0), (0, 2), (2, 0), (2, 2)] {
            expected.put_pixel(x, y, gray(75));
        }
        expected.put_pixel(1, 1, gray(88));

        assert_eq!(image_blur(&input), expected);
    }

    #[test]
    fn image_blur_reads_only_original_values() {
        // A single bright pixel in a row: a propagating blur would leak
        // brightness beyond the immediate neighbours.
        let mut input = RgbImage::from_pixel(5, 1, gray(0));
        input.put_pixel(0, 0, gray(240));
        let output = image_blur(&input);
        assert_eq!(*output.get_pixel(0, 0), gray(120));
        assert_eq!(*output.get_pixel(1, 0), gray(80));
        assert_eq!(*output.get_pixel(2, 0), gray(0));
    }

    #[test]
    fn image_blur_of_empty_image_is_empty() {
        let input = RgbImage::new(0, 4);
        assert_eq!(image_blur(&input).dimensions(), (0, 4));
    }
}
