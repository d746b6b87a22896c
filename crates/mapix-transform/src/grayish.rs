//! Grayish-color classification and normalization.
//!
//! A color is *grayish* when its channels lie close together: the spread
//! between the largest and smallest channel is at most
//! [`GRAYISH_SPREAD`]. [`make_grayish`] replaces every other pixel with
//! the plain average of its channels, leaving already-grayish pixels
//! alone.

use crate::map::image_map_coord;
use crate::types::{Color, RgbImage};

/// Largest channel spread (`max - min`) still classified as grayish.
pub const GRAYISH_SPREAD: u8 = 85;

/// Whether the channels of `color` lie within [`GRAYISH_SPREAD`] of each
/// other. The boundary itself counts as grayish.
///
/// # Examples
///
/// ```
/// use image::Rgb;
/// use mapix_transform::is_grayish;
///
/// assert!(is_grayish(Rgb([85, 0, 0])));
/// assert!(!is_grayish(Rgb([86, 0, 0])));
/// ```
#[must_use]
pub fn is_grayish(color: Color) -> bool {
    let [r, g, b] = color.0;
    let hi = r.max(g).max(b);
    let lo = r.min(g).min(b);
    hi - lo <= GRAYISH_SPREAD
}

/// Neutral gray with every channel set to the floored mean of `color`'s
/// channels.
#[must_use]
pub fn desaturate(color: Color) -> Color {
    let [r, g, b] = color.0;
    let sum = u16::from(r) + u16::from(g) + u16::from(b);
    // sum / 3 <= 255
    #[allow(clippy::cast_possible_truncation)]
    let m = (sum / 3) as u8;
    image::Rgb([m, m, m])
}

/// Desaturate every pixel that is not [grayish](is_grayish).
#[must_use = "returns the normalized image"]
pub fn make_grayish(image: &RgbImage) -> RgbImage {
    image_map_coord(image, |img, x, y| {
        let color = *img.get_pixel(x, y);
        if is_grayish(color) {
            color
        } else {
            desaturate(color)
        }
    })
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    #[test]
    fn black_and_white_are_grayish() {
        assert!(is_grayish(Rgb([0, 0, 0])));
        assert!(is_grayish(Rgb([255, 255, 255])));
    }

    #[test]
    fn close_channels_are_grayish() {
        assert!(is_grayish(Rgb([255, 200, 233])));
    }

    #[test]
    fn spread_out_channels_are_not_grayish() {
        assert!(!is_grayish(Rgb([255, 10, 130])));
    }

    #[test]
    fn spread_boundary_is_inclusive() {
        assert!(is_grayish(Rgb([85, 0, 0])));
        assert!(!is_grayish(Rgb([86, 0, 0])));
    }

    #[test]
    fn classification_ignores_channel_order() {
        for color in [Rgb([0, 86, 0]), Rgb([0, 0, 86]), Rgb([86, 0, 43])] {
            assert!(!is_grayish(color), "{color:?} should not be grayish");
        }
        for color in [Rgb([0, 85, 0]), Rgb([170, 255, 200]), Rgb([40, 0, 85])] {
            assert!(is_grayish(color), "{color:?} should be grayish");
        }
    }

    #[test]
    fn desaturate_floors_the_mean() {
        assert_eq!(desaturate(Rgb([200, 0, 0])), Rgb([66, 66, 66]));
        assert_eq!(desaturate(Rgb([120, 0, 0])), Rgb([40, 40, 40]));
        assert_eq!(desaturate(Rgb([255, 255, 255])), Rgb([255, 255, 255]));
        assert_eq!(desaturate(Rgb([1, 1, 0])), Rgb([0, 0, 0]));
    }

    #[test]
    fn make_grayish_returns_distinct_image() {
        let input = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        let output = make_grayish(&input);
        assert_eq!(input, output);
        assert_ne!(input.as_raw().as_ptr(), output.as_raw().as_ptr());
    }

    #[test]
    fn make_grayish_leaves_grayish_image_alone() {
        let input = RgbImage::from_pixel(10, 10, Rgb([10, 10, 10]));
        assert_eq!(make_grayish(&input), input);
    }

    #[test]
    fn make_grayish_desaturates_red() {
        let input = RgbImage::from_pixel(10, 10, Rgb([200, 0, 0]));
        let output = make_grayish(&input);
        assert_eq!(output, RgbImage::from_pixel(10, 10, Rgb([66, 66, 66])));
    }

    #[test]
    fn make_grayish_desaturates_dark_red() {
        let input = RgbImage::from_pixel(10, 10, Rgb([120, 0, 0]));
        let output = make_grayish(&input);
        assert_eq!(output, RgbImage::from_pixel(10, 10, Rgb([40, 40, 40])));
    }

    #[test]
    fn make_grayish_handles_mixed_pixels() {
        let input = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([255, 10, 130])
            } else {
                Rgb([255, 200, 233])
            }
        });
        let output = make_grayish(&input);
        assert_eq!(*output.get_pixel(0, 0), Rgb([131, 131, 131]));
        assert_eq!(*output.get_pixel(1, 0), Rgb([255, 200, 233]));
    }

    #[test]
    fn make_grayish_output_is_entirely_grayish() {
        #[allow(clippy::cast_possible_truncation)]
        let input = RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 0]));
        let output = make_grayish(&input);
        assert!(output.pixels().all(|p| is_grayish(*p)));
    }
}
