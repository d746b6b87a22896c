//! mapix: apply pixel-mapping recipes to image files.
//!
//! Reads an image, runs a transformation recipe over it, and writes the
//! result. The recipe comes from a JSON file, an inline JSON string, or
//! individual step flags.
//!
//! # Usage
//!
//! ```text
//! mapix run photo.png -o out.png --make-grayish --blur 2
//! mapix run photo.png -o out.png --window 0,63,-10,31 --invert
//! mapix run photo.png -o out.png --recipe steps.json --diagnostics
//! mapix classify 255,10,130
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use log::{debug, error, info};
use mapix_transform::diagnostics::Clock;
use mapix_transform::{ColorOp, Interval, Recipe, Step};

/// Higher-order pixel mapping, windowed transforms, grayish
/// normalization, and box blur for image files.
#[derive(Parser)]
#[command(name = "mapix", version)]
struct Cli {
    /// Enable debug logging (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a recipe to an image file.
    Run(RunArgs),
    /// Report whether a color is grayish.
    Classify {
        /// Color as "R,G,B".
        #[arg(value_parser = parse_color)]
        color: [u8; 3],
    },
}

#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
struct RunArgs {
    /// Input image path (PNG, JPEG, BMP, WebP).
    input: PathBuf,

    /// Output image path; the format follows the extension.
    #[arg(short, long)]
    output: PathBuf,

    /// Recipe as a JSON file.
    ///
    /// When provided, all individual step flags are ignored.
    #[arg(long, conflicts_with = "recipe_json")]
    recipe: Option<PathBuf>,

    /// Recipe as an inline JSON string.
    ///
    /// When provided, all individual step flags are ignored.
    #[arg(long)]
    recipe_json: Option<String>,

    /// Desaturate pixels that are not grayish.
    #[arg(long)]
    make_grayish: bool,

    /// Restrict a color transform to the window "X0,X1,Y0,Y1"
    /// (inclusive, clamped to the image).
    #[arg(
        long,
        value_name = "X0,X1,Y0,Y1",
        value_parser = parse_window,
        allow_hyphen_values = true
    )]
    window: Option<(Interval, Interval)>,

    /// Fill the window with "R,G,B".
    #[arg(long, value_parser = parse_color, requires = "window", conflicts_with = "invert")]
    fill: Option<[u8; 3]>,

    /// Invert colors inside the window.
    #[arg(long, requires = "window")]
    invert: bool,

    /// Number of 3x3 box blur passes, applied last.
    #[arg(long, default_value_t = 0)]
    blur: u32,

    /// Print per-step diagnostics to stdout.
    #[arg(long)]
    diagnostics: bool,

    /// Print diagnostics as JSON instead of a human-readable report.
    #[arg(long, requires = "diagnostics")]
    json: bool,
}

/// Parse "R,G,B" into three channel values.
fn parse_color(s: &str) -> Result<[u8; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [r, g, b] = parts.as_slice() else {
        return Err(format!("color must be 'R,G,B', got: '{s}'"));
    };
    let channel = |v: &str| {
        v.parse::<u8>()
            .map_err(|e| format!("invalid channel '{v}' (expected 0-255): {e}"))
    };
    Ok([channel(r)?, channel(g)?, channel(b)?])
}

/// Parse "X0,X1,Y0,Y1" into column and row intervals.
fn parse_window(s: &str) -> Result<(Interval, Interval), String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x0, x1, y0, y1] = parts.as_slice() else {
        return Err(format!("window must be 'X0,X1,Y0,Y1', got: '{s}'"));
    };
    let bound = |v: &str| {
        v.parse::<i64>()
            .map_err(|e| format!("invalid window bound '{v}': {e}"))
    };
    Ok((
        Interval::new(bound(x0)?, bound(x1)?),
        Interval::new(bound(y0)?, bound(y1)?),
    ))
}

/// Build a [`Recipe`] from CLI arguments.
///
/// If `--recipe` or `--recipe-json` is provided, the JSON is parsed
/// directly and the individual step flags are ignored. Otherwise the
/// flags are assembled in a fixed order: grayish normalization, then the
/// window transform, then blur.
fn recipe_from_args(args: &RunArgs) -> Result<Recipe, String> {
    if let Some(ref path) = args.recipe {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading recipe {}: {e}", path.display()))?;
        return serde_json::from_str(&json)
            .map_err(|e| format!("Error parsing recipe {}: {e}", path.display()));
    }
    if let Some(ref json) = args.recipe_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --recipe-json: {e}"));
    }

    let mut steps = Vec::new();
    if args.make_grayish {
        steps.push(Step::MakeGrayish);
    }
    if let Some((x, y)) = args.window {
        let op = match (args.fill, args.invert) {
            (Some(color), _) => ColorOp::Fill { color },
            (None, true) => ColorOp::Invert,
            (None, false) => {
                return Err("--window needs a transform: pass --fill R,G,B or --invert".into());
            }
        };
        steps.push(Step::Window { x, y, op });
    }
    if args.blur > 0 {
        steps.push(Step::Blur { passes: args.blur });
    }
    Ok(Recipe::new(steps))
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

fn run(args: &RunArgs) -> ExitCode {
    let recipe = match recipe_from_args(args) {
        Ok(r) => r,
        Err(msg) => {
            error!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    if recipe.steps.is_empty() {
        info!("Recipe has no steps; the image will be re-encoded unchanged");
    }
    debug!("Recipe: {recipe:#?}");

    let image_bytes = match std::fs::read(&args.input) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Error reading {}: {e}", args.input.display());
            return ExitCode::FAILURE;
        }
    };
    info!(
        "Image: {} ({} bytes)",
        args.input.display(),
        image_bytes.len(),
    );

    let (result, diagnostics) =
        match mapix_transform::process_with_diagnostics(&image_bytes, &recipe, &StdClock) {
            Ok(out) => out,
            Err(e) => {
                error!("Processing error: {e}");
                return ExitCode::FAILURE;
            }
        };

    if args.diagnostics {
        if args.json {
            match serde_json::to_string_pretty(&diagnostics) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    error!("Error serializing diagnostics: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("{}", diagnostics.report());
        }
    }

    if let Err(e) = result.image.save(&args.output) {
        error!("Error writing {}: {e}", args.output.display());
        return ExitCode::FAILURE;
    }
    info!(
        "Wrote {}x{} image to {}",
        result.dimensions.width,
        result.dimensions.height,
        args.output.display(),
    );
    ExitCode::SUCCESS
}

fn classify(color: [u8; 3]) -> ExitCode {
    let [r, g, b] = color;
    let spread = r.max(g).max(b) - r.min(g).min(b);
    if mapix_transform::is_grayish(image::Rgb(color)) {
        println!("({r}, {g}, {b}) is grayish (spread {spread})");
    } else {
        let gray = mapix_transform::desaturate(image::Rgb(color)).0[0];
        println!(
            "({r}, {g}, {b}) is not grayish (spread {spread} > {}); normalizes to ({gray}, {gray}, {gray})",
            mapix_transform::GRAYISH_SPREAD,
        );
    }
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    match cli.command {
        Command::Run(ref args) => run(args),
        Command::Classify { color } => classify(color),
    }
}
