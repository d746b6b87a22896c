//! Recipe diagnostics: per-step timing and change counts.
//!
//! The library never reads a wall clock itself. Callers pass a [`Clock`]
//! to [`process_with_diagnostics`]; the command-line front end backs it
//! with `std::time::Instant`, tests use a fake.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::decode::decode_rgb;
use crate::recipe::Recipe;
use crate::types::{Dimensions, ProcessResult, RgbImage, TransformError};

/// Source of timestamps for diagnostics.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Current timestamp.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single recipe run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDiagnostics {
    /// Decoding of the input bytes.
    pub decode: DecodeDiagnostics,
    /// One entry per recipe step, in order.
    pub steps: Vec<StepDiagnostics>,
    /// Total wall-clock duration, including decoding (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across the run.
    pub summary: RecipeSummary,
}

/// Diagnostics for the decode stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeDiagnostics {
    /// Wall-clock duration (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Size of the input in bytes.
    pub input_bytes: usize,
}

/// Diagnostics for one recipe step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDiagnostics {
    /// Human-readable step description.
    pub label: String,
    /// Wall-clock duration (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Pixels whose color differs from the step's input.
    pub changed_pixels: u64,
}

/// High-level summary for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummary {
    /// Image width in pixels.
    pub image_width: u32,
    /// Image height in pixels.
    pub image_height: u32,
    /// Total pixel count.
    pub pixel_count: u64,
    /// Number of steps run.
    pub step_count: usize,
    /// Pixels whose final color differs from the decoded input.
    pub changed_pixels: u64,
}

/// Decode `image_bytes`, run `recipe`, and time every stage with `clock`.
///
/// Produces the same image as [`process`](crate::process).
///
/// # Errors
///
/// Same as [`process`](crate::process).
pub fn process_with_diagnostics<C: Clock>(
    image_bytes: &[u8],
    recipe: &Recipe,
    clock: &C,
) -> Result<(ProcessResult, RecipeDiagnostics), TransformError> {
    recipe.validate()?;
    let start = clock.now();

    let decoded = decode_rgb(image_bytes)?;
    let decode = DecodeDiagnostics {
        duration: clock.elapsed(&start),
        input_bytes: image_bytes.len(),
    };
    let dimensions = Dimensions::of(&decoded);

    let mut steps = Vec::with_capacity(recipe.steps.len());
    let mut current = decoded.clone();
    for step in &recipe.steps {
        let step_start = clock.now();
        let next = step.apply(&current);
        let duration = clock.elapsed(&step_start);
        let changed_pixels = count_changed_pixels(&current, &next);
        debug!(
            "{}: {changed_pixels} pixels changed in {:.3}ms",
            step.label(),
            duration_ms(duration),
        );
        steps.push(StepDiagnostics {
            label: step.label(),
            duration,
            changed_pixels,
        });
        current = next;
    }

    let summary = RecipeSummary {
        image_width: dimensions.width,
        image_height: dimensions.height,
        pixel_count: dimensions.pixel_count(),
        step_count: steps.len(),
        changed_pixels: count_changed_pixels(&decoded, &current),
    };
    let diagnostics = RecipeDiagnostics {
        decode,
        steps,
        total_duration: clock.elapsed(&start),
        summary,
    };

    Ok((
        ProcessResult {
            image: current,
            dimensions,
        },
        diagnostics,
    ))
}

impl RecipeDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Recipe Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {}x{} ({} pixels, {} bytes encoded)",
            self.summary.image_width,
            self.summary.image_height,
            self.summary.pixel_count,
            self.decode.input_bytes,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<36} {:>10} {:>10}  {}",
            "Step", "Duration", "% Total", "Changed"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        let percent = |ms: f64| {
            if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            }
        };

        let decode_ms = duration_ms(self.decode.duration);
        lines.push(format!(
            "{:<36} {decode_ms:>8.3}ms {:>9.1}%  -",
            "decode",
            percent(decode_ms),
        ));
        for step in &self.steps {
            let ms = duration_ms(step.duration);
            lines.push(format!(
                "{:<36} {ms:>8.3}ms {:>9.1}%  {}",
                step.label,
                percent(ms),
                step.changed_pixels,
            ));
        }

        lines.push(String::new());
        lines.push(format!(
            "Steps: {}  |  Pixels changed overall: {} of {}",
            self.summary.step_count, self.summary.changed_pixels, self.summary.pixel_count,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Count pixels that differ between two images of equal size.
pub(crate) fn count_changed_pixels(before: &RgbImage, after: &RgbImage) -> u64 {
    before
        .pixels()
        .zip(after.pixels())
        .map(|(a, b)| u64::from(a != b))
        .sum()
}
