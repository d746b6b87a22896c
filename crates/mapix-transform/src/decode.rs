//! Image decoding.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces an
//! 8-bit RGB image. Any alpha channel is discarded.

use crate::types::{RgbImage, TransformError};

/// Decode raw image bytes into an RGB image.
///
/// # Errors
///
/// Returns [`TransformError::EmptyInput`] if `bytes` is empty.
/// Returns [`TransformError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, TransformError> {
    if bytes.is_empty() {
        return Err(TransformError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgb8())
}

/// Encode an RGBA image as PNG bytes. Shared by tests across modules.
#[cfg(test)]
pub(crate) fn encode_png(img: &image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(
        encoder,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ExtendedColorType::Rgba8,
    )
    .ok();
    buf
}
