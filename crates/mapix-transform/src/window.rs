//! Rectangular window resolution and windowed mapping.
//!
//! Callers describe the window with two [`Interval`]s that may extend
//! past the image on any side. [`Window::resolve`] clamps both axes to
//! the image, and [`map_window`] applies a color transform only to the
//! pixels inside the clamped rectangle.
//!
//! Both axes are clamped the same way:
//!
//! ```text
//! min' = max(min, 0)
//! max' = min(max, len - 1)
//! ```
//!
//! A window whose clamped bounds cross (`min' > max'`) on either axis is
//! empty, and mapping over it returns an unchanged copy of the image.

use log::debug;

use crate::map::image_map_if;
use crate::types::{Color, Interval, RgbImage};

/// An inclusive, axis-aligned pixel rectangle known to lie inside an
/// image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// First column inside the window.
    pub x_min: u32,
    /// Last column inside the window.
    pub x_max: u32,
    /// First row inside the window.
    pub y_min: u32,
    /// Last row inside the window.
    pub y_max: u32,
}

impl Window {
    /// Clamp `x` and `y` against a `width` x `height` image.
    ///
    /// Returns `None` when the clamped window is empty on either axis,
    /// which includes every window over a zero-sized image.
    #[must_use]
    pub fn resolve(x: Interval, y: Interval, width: u32, height: u32) -> Option<Self> {
        let (x_min, x_max) = clamp_axis(x, width)?;
        let (y_min, y_max) = clamp_axis(y, height)?;
        Some(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Whether `(x, y)` lies inside the window.
    #[must_use]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        self.x_min <= x && x <= self.x_max && self.y_min <= y && y <= self.y_max
    }

    /// Width of the window in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.x_max - self.x_min + 1
    }

    /// Height of the window in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.y_max - self.y_min + 1
    }
}

fn clamp_axis(interval: Interval, len: u32) -> Option<(u32, u32)> {
    let min = interval.min.max(0);
    let max = interval.max.min(i64::from(len) - 1);
    if min > max {
        return None;
    }
    // Both bounds are now within `0..len`.
    Some((u32::try_from(min).ok()?, u32::try_from(max).ok()?))
}

/// Apply `f` to the pixels inside the window spanned by `x` and `y`.
///
/// Intervals are clamped to the image first (see [`Window::resolve`]).
/// Pixels outside the window are copied unchanged, and an empty window
/// yields an unchanged copy of the whole image.
///
/// # Examples
///
/// ```
/// use mapix_transform::{Interval, RgbImage, map_window};
/// use image::Rgb;
///
/// let img = RgbImage::from_pixel(5, 5, Rgb([30, 30, 30]));
/// let out = map_window(
///     &img,
///     Interval::new(-232, 70),
///     Interval::new(0, 1),
///     |_| Rgb([0, 0, 255]),
/// );
/// assert_eq!(*out.get_pixel(4, 1), Rgb([0, 0, 255]));
/// assert_eq!(*out.get_pixel(4, 2), Rgb([30, 30, 30]));
/// ```
#[must_use = "returns the mapped image"]
pub fn map_window<F>(image: &RgbImage, x: Interval, y: Interval, f: F) -> RgbImage
where
    F: FnMut(Color) -> Color,
{
    let Some(window) = Window::resolve(x, y, image.width(), image.height()) else {
        debug!(
            "map_window x={x:?} y={y:?} is empty on a {}x{} image, copying",
            image.width(),
            image.height(),
        );
        return image.clone();
    };
    debug!(
        "map_window resolved {window:?} ({}x{} pixels)",
        window.width(),
        window.height(),
    );
    image_map_if(image, |_, px, py| window.contains(px, py), f)
}
