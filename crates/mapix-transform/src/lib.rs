//! mapix-transform: higher-order transforms over in-memory RGB images (sans-IO).
//!
//! Every transform borrows its input and returns a new image of the same
//! dimensions, built from one primitive:
//!
//! - [`image_map_coord`]: position-aware per-pixel mapping
//! - [`image_map_if`]: mapping restricted by a predicate
//! - [`map_window`]: mapping restricted to a clamped rectangle
//! - [`is_grayish`] / [`make_grayish`]: channel-spread classification
//!   and desaturation
//! - [`pixel_blur`] / [`image_blur`]: 3x3 clamp-to-edge box blur
//!
//! On top of those, [`Recipe`] describes a serializable sequence of
//! steps and [`process`] decodes image bytes and runs a recipe over them.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and images. Reading and writing files lives in
//! `mapix-cli`.

pub mod blur;
pub mod decode;
pub mod diagnostics;
pub mod grayish;
pub mod map;
pub mod recipe;
pub mod types;
pub mod window;

pub use blur::{image_blur, pixel_blur, try_pixel_blur};
pub use decode::decode_rgb;
pub use diagnostics::{Clock, RecipeDiagnostics, process_with_diagnostics};
pub use grayish::{GRAYISH_SPREAD, desaturate, is_grayish, make_grayish};
pub use map::{image_map_coord, image_map_if, try_image_map_coord};
pub use recipe::{ColorOp, Recipe, Step, process};
pub use types::{Color, Dimensions, Interval, ProcessResult, RgbImage, TransformError};
pub use window::{Window, map_window};
