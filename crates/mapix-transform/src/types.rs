//! Shared types for the mapix transform library.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Re-export `RgbImage` so downstream crates can construct and inspect
/// bitmaps without depending on `image` directly.
pub use image::RgbImage;

/// A single RGB pixel value.
///
/// Channels are `u8`, so every color is within `[0, 255]` by construction.
pub type Color = image::Rgb<u8>;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an existing image.
    #[must_use]
    pub fn of(image: &RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    /// Total pixel count (`width * height`).
    #[must_use]
    pub const fn pixel_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// An inclusive coordinate range along one axis.
///
/// Bounds are signed and are **not** assumed to lie inside any image:
/// `[-232, 70]` is a perfectly good interval and is clamped against the
/// image when it is resolved into a [`Window`](crate::window::Window).
///
/// Serialized as a two-element array `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i64; 2]", into = "[i64; 2]")]
pub struct Interval {
    /// Lower bound (inclusive).
    pub min: i64,
    /// Upper bound (inclusive).
    pub max: i64,
}

impl Interval {
    /// Create a new interval.
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// The interval covering every coordinate of an axis of length `len`.
    #[must_use]
    pub fn full(len: u32) -> Self {
        Self::new(0, i64::from(len) - 1)
    }
}

impl From<[i64; 2]> for Interval {
    fn from([min, max]: [i64; 2]) -> Self {
        Self::new(min, max)
    }
}

impl From<(i64, i64)> for Interval {
    fn from((min, max): (i64, i64)) -> Self {
        Self::new(min, max)
    }
}

impl From<RangeInclusive<i64>> for Interval {
    fn from(range: RangeInclusive<i64>) -> Self {
        Self::new(*range.start(), *range.end())
    }
}

impl From<Interval> for [i64; 2] {
    fn from(interval: Interval) -> Self {
        [interval.min, interval.max]
    }
}

/// Result of running a [`Recipe`](crate::recipe::Recipe) over decoded
/// image bytes.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// The transformed image.
    pub image: RgbImage,

    /// Dimensions of the source (and therefore output) image.
    pub dimensions: Dimensions,
}

/// Errors that can occur while decoding or transforming images.
///
/// Uses custom `Serialize`/`Deserialize` because `image::ImageError`
/// does not implement serde traits. The `ImageDecode` variant is
/// serialized as its `Display` string.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// A pixel coordinate lies outside the image.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },

    /// The recipe failed validation.
    #[error("invalid recipe: {0}")]
    InvalidRecipe(String),
}

/// Serde-compatible proxy for `TransformError`.
#[derive(Serialize, Deserialize)]
enum TransformErrorProxy {
    ImageDecode(String),
    EmptyInput,
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    InvalidRecipe(String),
}

impl Serialize for TransformError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let proxy = match self {
            Self::ImageDecode(e) => TransformErrorProxy::ImageDecode(e.to_string()),
            Self::EmptyInput => TransformErrorProxy::EmptyInput,
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => TransformErrorProxy::OutOfBounds {
                x: *x,
                y: *y,
                width: *width,
                height: *height,
            },
            Self::InvalidRecipe(s) => TransformErrorProxy::InvalidRecipe(s.clone()),
        };
        proxy.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TransformError {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = TransformErrorProxy::deserialize(deserializer)?;
        Ok(match proxy {
            // The typed `image::ImageError` cannot be rebuilt from its
            // message, so the text is carried in `InvalidRecipe`.
            TransformErrorProxy::ImageDecode(msg) => {
                Self::InvalidRecipe(format!("image decode error: {msg}"))
            }
            TransformErrorProxy::EmptyInput => Self::EmptyInput,
            TransformErrorProxy::OutOfBounds {
                x,
                y,
                width,
                height,
            } => Self::OutOfBounds {
                x,
                y,
                width,
                height,
            },
            TransformErrorProxy::InvalidRecipe(s) => Self::InvalidRecipe(s),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_of_image() {
        let img = RgbImage::new(7, 3);
        let dims = Dimensions::of(&img);
        assert_eq!(dims.width, 7);
        assert_eq!(dims.height, 3);
        assert_eq!(dims.pixel_count(), 21);
    }

    #[test]
    fn interval_conversions_agree() {
        let a = Interval::from([-2_i64, 9]);
        let b = Interval::from((-2_i64, 9));
        let c = Interval::from(-2_i64..=9);
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.min, -2);
        assert_eq!(a.max, 9);
    }

    #[test]
    fn interval_full_covers_axis() {
        assert_eq!(Interval::full(5), Interval::new(0, 4));
        assert_eq!(Interval::full(0), Interval::new(0, -1));
    }

    #[test]
    fn interval_serializes_as_pair() {
        let json = serde_json::to_string(&Interval::new(-232, 70)).unwrap();
        assert_eq!(json, "[-232,70]");
        let back: Interval = serde_json::from_str("[3, 4]").unwrap();
        assert_eq!(back, Interval::new(3, 4));
    }

    #[test]
    fn interval_rejects_wrong_arity() {
        assert!(serde_json::from_str::<Interval>("[1]").is_err());
        assert!(serde_json::from_str::<Interval>("[1, 2, 3]").is_err());
    }

    #[test]
    fn error_messages() {
        let err = TransformError::OutOfBounds {
            x: 9,
            y: 1,
            width: 3,
            height: 3,
        };
        assert_eq!(err.to_string(), "pixel (9, 1) is outside the 3x3 image");
        assert_eq!(
            TransformError::EmptyInput.to_string(),
            "input image data is empty"
        );
    }

    #[test]
    fn error_serde_round_trip_preserves_variant() {
        let err = TransformError::OutOfBounds {
            x: 1,
            y: 2,
            width: 3,
            height: 4,
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: TransformError = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            back,
            TransformError::OutOfBounds {
                x: 1,
                y: 2,
                width: 3,
                height: 4
            }
        ));
    }

    #[test]
    fn image_decode_error_deserializes_with_message() {
        let json = r#"{"ImageDecode":"bad magic"}"#;
        let back: TransformError = serde_json::from_str(json).unwrap();
        match back {
            TransformError::InvalidRecipe(msg) => assert!(msg.contains("bad magic")),
            other => unreachable!("unexpected variant: {other:?}"),
        }
    }
}
