use std::path::{Path, PathBuf};

use thiserror::Error;

use fourier::mask::DEFAULT_FREQUENCY_CUTOFF;
use fourier::pipeline::{
    self, default_sweep_thresholds, DEFAULT_ACCURACY_TOLERANCE, DEFAULT_BENCHMARK_ITERATIONS,
    DEFAULT_BENCHMARK_SIZES, DEFAULT_COMPRESSION_FACTORS,
};
use fourier::transform::{self, DEFAULT_RECURSION_THRESHOLD};
use fourier::MaskScheme;

pub mod load;
pub mod plot;
pub mod reference;

pub const DEFAULT_IMAGE: &str = "moonlanding.png";

// seeds for the random masking scheme and benchmark data
const COMPRESS_SEED: u64 = 316;
const BENCHMARK_SEED: u64 = 0x5EED;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("invalid syntax. expected: fourier -m <mode> [-i <image>]")]
    Syntax,

    #[error("expected mode to be an integer in range [1, 6]")]
    Mode,

    #[error("provided image path is incorrect: {0}")]
    ImagePath(String),

    #[error(transparent)]
    Shape(#[from] fourier::ShapeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("plot error: {0}")]
    Plot(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Display,
    Denoise,
    Compress,
    Benchmark,
    Accuracy,
    ThresholdSweep,
}

impl Mode {
    fn from_number(number: u32) -> Result<Mode, CliError> {
        match number {
            1 => Ok(Mode::Display),
            2 => Ok(Mode::Denoise),
            3 => Ok(Mode::Compress),
            4 => Ok(Mode::Benchmark),
            5 => Ok(Mode::Accuracy),
            6 => Ok(Mode::ThresholdSweep),
            _ => Err(CliError::Mode),
        }
    }
}

/// Parsed once from the argument list and passed by value into the mode
/// runners.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub image: PathBuf,
}

impl Config {
    /// Parse `-m <mode> [-i <image>]`. `args` excludes the program name.
    pub fn from_args<I: Iterator<Item = String>>(mut args: I) -> Result<Config, CliError> {
        let mut mode = None;
        let mut image = PathBuf::from(DEFAULT_IMAGE);

        while let Some(flag) = args.next() {
            match flag.as_str() {
                "-m" => {
                    let value = args.next().ok_or(CliError::Syntax)?;
                    let number: u32 = value.parse().map_err(|_| CliError::Mode)?;
                    mode = Some(Mode::from_number(number)?);
                }
                "-i" => image = PathBuf::from(args.next().ok_or(CliError::Syntax)?),
                _ => return Err(CliError::Syntax),
            }
        }

        Ok(Config {
            mode: mode.ok_or(CliError::Syntax)?,
            image,
        })
    }
}

pub fn run(config: Config) -> Result<(), CliError> {
    match config.mode {
        Mode::Display => display(config),
        Mode::Denoise => denoise(config),
        Mode::Compress => compress(config),
        Mode::Benchmark => benchmark(),
        Mode::Accuracy => accuracy(config),
        Mode::ThresholdSweep => threshold_sweep(config),
    }
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

fn display(config: Config) -> Result<(), CliError> {
    let plane = load::load_padded_plane(&config.image)?;
    let (rows, cols) = plane.dim();
    println!("transforming {} ({rows}x{cols} after padding)", config.image.display());

    let spectrum = transform::forward_fast(&plane, DEFAULT_RECURSION_THRESHOLD)?;

    let stem = stem(&config.image);
    load::save_plane(&plane, format!("{stem}.padded.png"))?;
    plot::save_log_magnitude(&spectrum, format!("{stem}.spectrum.png"))?;
    println!("wrote {stem}.padded.png and {stem}.spectrum.png");
    Ok(())
}

fn denoise(config: Config) -> Result<(), CliError> {
    let plane = load::load_padded_plane(&config.image)?;
    let report = pipeline::denoise(&plane, DEFAULT_FREQUENCY_CUTOFF, DEFAULT_RECURSION_THRESHOLD)?;

    println!(
        "nonzero coefficients left after filtering: {} of {}",
        report.retained, report.total
    );

    let stem = stem(&config.image);
    load::save_plane(&plane, format!("{stem}.padded.png"))?;
    load::save_plane(&report.reconstruction, format!("{stem}.denoised.png"))?;
    println!("wrote {stem}.padded.png and {stem}.denoised.png");
    Ok(())
}

fn compress(config: Config) -> Result<(), CliError> {
    let plane = load::load_padded_plane(&config.image)?;
    let report = pipeline::compress(
        &plane,
        &DEFAULT_COMPRESSION_FACTORS,
        MaskScheme::HighFrequency,
        DEFAULT_RECURSION_THRESHOLD,
        COMPRESS_SEED,
    )?;

    let stem = stem(&config.image);
    let csv = format!("{stem}.spectrum.csv");
    fourier::export::export_spectrum(&report.spectrum, &csv)?;
    println!("wrote the coefficient matrix to {csv}");

    for level in &report.levels {
        let percent = (level.factor * 100.0).round() as u32;
        let out = format!("{stem}.compressed-{percent}.png");
        load::save_plane(&level.reconstruction, &out)?;
        println!(
            "{percent}% compression: {} nonzero coefficients left, wrote {out}",
            level.retained
        );
    }
    Ok(())
}

fn benchmark() -> Result<(), CliError> {
    println!(
        " \x1b[1mRunning runtime benchmark\x1b[0m ({} runs per size)",
        DEFAULT_BENCHMARK_ITERATIONS
    );

    let stats = pipeline::benchmark(
        &DEFAULT_BENCHMARK_SIZES,
        DEFAULT_BENCHMARK_ITERATIONS,
        BENCHMARK_SEED,
    )?;

    for s in &stats {
        println!(
            "size {:>4}: naive {:>10.6}s (std {:.6}), fast {:>10.6}s (std {:.6})",
            s.size, s.naive_mean, s.naive_std, s.fast_mean, s.fast_std
        );
    }

    plot::save_runtime_chart(&stats, "runtime.png")?;
    println!("wrote runtime.png");
    Ok(())
}

fn accuracy(config: Config) -> Result<(), CliError> {
    let plane = load::load_padded_plane(&config.image)?;
    let report = pipeline::accuracy(
        &plane,
        DEFAULT_RECURSION_THRESHOLD,
        &reference::PlannedReference,
        DEFAULT_ACCURACY_TOLERANCE,
    )?;

    println!("root mean squared errors against the reference transform:");
    for (name, check) in [
        ("naive forward", report.naive_forward),
        ("fast forward", report.fast_forward),
        ("fast inverse", report.fast_inverse),
    ] {
        println!(
            "\t{name:<14}\t{:e}\t| within {:e} tolerance: {}",
            check.rms, report.tolerance, check.within_tolerance
        );
    }
    Ok(())
}

fn threshold_sweep(config: Config) -> Result<(), CliError> {
    let plane = load::load_padded_plane(&config.image)?;
    let points = pipeline::threshold_sweep(
        &plane,
        &default_sweep_thresholds(),
        &reference::PlannedReference,
    )?;

    for point in &points {
        println!(
            "threshold {:>3}: {:>10.6}s, rms vs reference {:e}",
            point.threshold, point.runtime, point.rms
        );
    }

    plot::save_sweep_runtime_chart(&points, "threshold-runtime.png")?;
    plot::save_sweep_rms_chart(&points, "threshold-rms.png")?;
    println!("wrote threshold-runtime.png and threshold-rms.png");
    Ok(())
}
