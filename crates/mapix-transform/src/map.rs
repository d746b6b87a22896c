//! Coordinate-based and conditional pixel mapping.
//!
//! [`image_map_coord`] is the primitive every other transform in this
//! crate is built on: it visits each `(x, y)` of the input, asks a
//! position-aware function for the output color, and writes it into a
//! fresh image of the same size. The function always reads from the
//! untouched input, never from partially written output.
//!
//! [`image_map_if`] specializes it with a predicate, leaving pixels
//! where the predicate is false untouched.

use crate::types::{Color, RgbImage};

/// Build a new image by evaluating `f(image, x, y)` at every coordinate.
///
/// The input is borrowed read-only; the returned image always has the
/// same dimensions and is a separate buffer even when `f` returns the
/// color it read.
#[must_use = "returns the mapped image"]
pub fn image_map_coord<F>(image: &RgbImage, mut f: F) -> RgbImage
where
    F: FnMut(&RgbImage, u32, u32) -> Color,
{
    RgbImage::from_fn(image.width(), image.height(), |x, y| f(image, x, y))
}

/// Fallible form of [`image_map_coord`].
///
/// # Errors
///
/// Returns the first error produced by `f`, unmodified. No further
/// coordinates are visited after a failure.
pub fn try_image_map_coord<F, E>(image: &RgbImage, mut f: F) -> Result<RgbImage, E>
where
    F: FnMut(&RgbImage, u32, u32) -> Result<Color, E>,
{
    let mut output = image.clone();
    for (x, y, pixel) in output.enumerate_pixels_mut() {
        *pixel = f(image, x, y)?;
    }
    Ok(output)
}

/// Apply `f` to the pixels where `cond(image, x, y)` holds.
///
/// Pixels failing the predicate are copied as-is. Both callbacks see
/// the original input.
#[must_use = "returns the mapped image"]
pub fn image_map_if<C, F>(image: &RgbImage, mut cond: C, mut f: F) -> RgbImage
where
    C: FnMut(&RgbImage, u32, u32) -> bool,
    F: FnMut(Color) -> Color,
{
    image_map_coord(image, |img, x, y| {
        let color = *img.get_pixel(x, y);
        if cond(img, x, y) { f(color) } else { color }
    })
}
