//! Serializable transformation recipes.
//!
//! A [`Recipe`] is an ordered list of [`Step`]s, each built from the
//! primitives in this crate. Recipes are plain data: they round-trip
//! through JSON, which is how the command-line front end accepts them.
//!
//! ```json
//! {
//!   "steps": [
//!     { "kind": "make_grayish" },
//!     { "kind": "window", "x": [0, 63], "y": [-10, 31], "op": { "kind": "invert" } },
//!     { "kind": "blur", "passes": 2 }
//!   ]
//! }
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use crate::blur::image_blur;
use crate::decode::decode_rgb;
use crate::grayish::{desaturate, is_grayish, make_grayish};
use crate::map::image_map_if;
use crate::types::{Color, Dimensions, Interval, ProcessResult, RgbImage, TransformError};
use crate::window::map_window;

/// A per-pixel color transform usable inside a [`Step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorOp {
    /// Leave the color unchanged.
    Identity,
    /// Replace the color with a fixed one.
    Fill {
        /// Replacement `[r, g, b]`.
        color: [u8; 3],
    },
    /// Invert every channel (`255 - c`).
    Invert,
    /// Replace the color with the floored mean of its channels.
    Desaturate,
    /// Add `amount` to every channel, saturating at 0 and 255.
    Brighten {
        /// Signed per-channel offset.
        amount: i16,
    },
}

impl ColorOp {
    /// Apply the transform to one color.
    #[must_use]
    pub fn apply(self, color: Color) -> Color {
        match self {
            Self::Identity => color,
            Self::Fill { color: fill } => image::Rgb(fill),
            Self::Invert => image::Rgb(color.0.map(|c| 255 - c)),
            Self::Desaturate => desaturate(color),
            Self::Brighten { amount } => image::Rgb(color.0.map(|c| brighten_channel(c, amount))),
        }
    }
}

fn brighten_channel(c: u8, amount: i16) -> u8 {
    let shifted = i16::from(c).saturating_add(amount).clamp(0, 255);
    u8::try_from(shifted).unwrap_or(u8::MAX)
}

/// One step of a [`Recipe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// Run [`image_blur`] `passes` times, each pass reading the previous
    /// pass's output. Zero passes is a no-op.
    Blur {
        /// Number of blur passes.
        passes: u32,
    },
    /// Run [`make_grayish`].
    MakeGrayish,
    /// Apply `op` inside the window spanned by `x` and `y`.
    Window {
        /// Column interval (clamped to the image).
        x: Interval,
        /// Row interval (clamped to the image).
        y: Interval,
        /// Transform applied inside the window.
        op: ColorOp,
    },
    /// Apply `op` to every pixel.
    Map {
        /// Transform applied everywhere.
        op: ColorOp,
    },
    /// Apply `op` only to grayish pixels.
    GrayishOnly {
        /// Transform applied to grayish pixels.
        op: ColorOp,
    },
    /// Apply `op` only to pixels that are not grayish.
    ColorfulOnly {
        /// Transform applied to non-grayish pixels.
        op: ColorOp,
    },
}

impl Step {
    /// Run this step on `image`, returning a new image.
    #[must_use = "returns the transformed image"]
    pub fn apply(&self, image: &RgbImage) -> RgbImage {
        match *self {
            Self::Blur { passes } => (0..passes).fold(image.clone(), |acc, _| image_blur(&acc)),
            Self::MakeGrayish => make_grayish(image),
            Self::Window { x, y, op } => map_window(image, x, y, |c| op.apply(c)),
            Self::Map { op } => image_map_if(image, |_, _, _| true, |c| op.apply(c)),
            Self::GrayishOnly { op } => image_map_if(
                image,
                |img, x, y| is_grayish(*img.get_pixel(x, y)),
                |c| op.apply(c),
            ),
            Self::ColorfulOnly { op } => image_map_if(
                image,
                |img, x, y| !is_grayish(*img.get_pixel(x, y)),
                |c| op.apply(c),
            ),
        }
    }

    /// Short human-readable description, used in diagnostics.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Blur { passes } => format!("blur x{passes}"),
            Self::MakeGrayish => "make grayish".to_string(),
            Self::Window { x, y, op } => format!(
                "window [{}, {}]x[{}, {}] {}",
                x.min,
                x.max,
                y.min,
                y.max,
                op_label(*op)
            ),
            Self::Map { op } => format!("map {}", op_label(*op)),
            Self::GrayishOnly { op } => format!("grayish-only {}", op_label(*op)),
            Self::ColorfulOnly { op } => format!("colorful-only {}", op_label(*op)),
        }
    }
}

fn op_label(op: ColorOp) -> String {
    match op {
        ColorOp::Identity => "identity".to_string(),
        ColorOp::Fill { color: [r, g, b] } => format!("fill({r},{g},{b})"),
        ColorOp::Invert => "invert".to_string(),
        ColorOp::Desaturate => "desaturate".to_string(),
        ColorOp::Brighten { amount } => format!("brighten({amount:+})"),
    }
}

/// An ordered list of transformation steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Steps, applied first to last.
    pub steps: Vec<Step>,
}

impl Recipe {
    /// Largest blur pass count accepted by [`validate`](Self::validate).
    pub const MAX_BLUR_PASSES: u32 = 64;

    /// Create a recipe from a list of steps.
    #[must_use]
    pub const fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Check the recipe for values that are rejected before any pixel
    /// is touched.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidRecipe`] naming the first
    /// offending step.
    pub fn validate(&self) -> Result<(), TransformError> {
        for (index, step) in self.steps.iter().enumerate() {
            if let Step::Blur { passes } = step
                && *passes > Self::MAX_BLUR_PASSES
            {
                return Err(TransformError::InvalidRecipe(format!(
                    "step {index}: blur passes {passes} exceeds maximum {}",
                    Self::MAX_BLUR_PASSES,
                )));
            }
        }
        Ok(())
    }

    /// Validate, then run every step in order.
    ///
    /// An empty recipe returns an unchanged copy of `image`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidRecipe`] if validation fails.
    pub fn apply(&self, image: &RgbImage) -> Result<RgbImage, TransformError> {
        self.validate()?;
        Ok(self.run_steps(image))
    }

    /// Run every step in order without validating.
    fn run_steps(&self, image: &RgbImage) -> RgbImage {
        self.steps.iter().fold(image.clone(), |acc, step| {
            debug!("recipe step: {}", step.label());
            step.apply(&acc)
        })
    }
}

/// Decode `image_bytes` and run `recipe` over the result.
///
/// # Errors
///
/// Returns [`TransformError::EmptyInput`] if `image_bytes` is empty,
/// [`TransformError::ImageDecode`] if the bytes cannot be decoded, and
/// [`TransformError::InvalidRecipe`] if the recipe fails validation.
pub fn process(image_bytes: &[u8], recipe: &Recipe) -> Result<ProcessResult, TransformError> {
    recipe.validate()?;
    let decoded = decode_rgb(image_bytes)?;
    let dimensions = Dimensions::of(&decoded);
    debug!(
        "process: {}x{} image, {} steps",
        dimensions.width,
        dimensions.height,
        recipe.steps.len(),
    );
    let image = recipe.run_steps(&decoded);
    Ok(ProcessResult { image, dimensions })
}
