//! End-to-end operations built on the transform engine and masks:
//! denoising, lossy compression, accuracy reports, runtime benchmarks and
//! the recursion-threshold sweep.

use std::time::Instant;

use ndarray::Array2;
use num_complex::Complex64;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::mask::{self, MaskScheme};
use crate::transform::{self, real_plane};
use crate::ShapeError;

pub const DEFAULT_COMPRESSION_FACTORS: [f64; 6] = [0.0, 0.19, 0.38, 0.57, 0.76, 0.95];
pub const DEFAULT_BENCHMARK_SIZES: [usize; 3] = [32, 64, 128];
pub const DEFAULT_BENCHMARK_ITERATIONS: usize = 10;
pub const DEFAULT_ACCURACY_TOLERANCE: f64 = 1e-6;

/// Trusted third-party transform used only by accuracy checks and the
/// threshold sweep, injected so the engine itself never depends on it.
pub trait ReferenceTransform {
    fn fft2(&self, image: &Array2<f64>) -> Array2<Complex64>;
    fn ifft2(&self, spectrum: &Array2<Complex64>) -> Array2<Complex64>;
}

/// Threshold candidates for the sweep: 1, then 10, 20, ..., 240.
pub fn default_sweep_thresholds() -> Vec<usize> {
    std::iter::once(1).chain((1..25).map(|n| 10 * n)).collect()
}

#[derive(Debug, Clone)]
pub struct DenoiseReport {
    pub reconstruction: Array2<f64>,
    /// Nonzero coefficients left after filtering.
    pub retained: usize,
    pub total: usize,
}

/// Forward transform, zero the high frequencies, transform back.
pub fn denoise(
    image: &Array2<f64>,
    cutoff: (f64, f64),
    threshold: usize,
) -> Result<DenoiseReport, ShapeError> {
    let spectrum = transform::forward_fast(image, threshold)?;
    let total = spectrum.len();
    let mask = mask::high_frequency(spectrum.dim(), cutoff);
    let (filtered, retained) = mask.apply(&spectrum)?;
    let reconstruction = real_plane(&transform::inverse_fast(&filtered, threshold)?);
    Ok(DenoiseReport {
        reconstruction,
        retained,
        total,
    })
}

#[derive(Debug, Clone)]
pub struct CompressionLevel {
    pub factor: f64,
    /// Nonzero coefficients left at this factor.
    pub retained: usize,
    pub reconstruction: Array2<f64>,
}

#[derive(Debug, Clone)]
pub struct CompressReport {
    /// The unmasked coefficient matrix, for export.
    pub spectrum: Array2<Complex64>,
    pub levels: Vec<CompressionLevel>,
}

/// Transform once, then reconstruct at every compression factor under the
/// given scheme.
pub fn compress(
    image: &Array2<f64>,
    factors: &[f64],
    scheme: MaskScheme,
    threshold: usize,
    seed: u64,
) -> Result<CompressReport, ShapeError> {
    let spectrum = transform::forward_fast(image, threshold)?;

    let mut levels = Vec::with_capacity(factors.len());
    for (i, &factor) in factors.iter().enumerate() {
        let mask = scheme.build(&spectrum, factor, seed.wrapping_add(i as u64));
        let (filtered, retained) = mask.apply(&spectrum)?;
        let reconstruction = real_plane(&transform::inverse_fast(&filtered, threshold)?);
        levels.push(CompressionLevel {
            factor,
            retained,
            reconstruction,
        });
    }

    Ok(CompressReport { spectrum, levels })
}

/// Root-mean-square error between two spectra.
pub fn rms_error(a: &Array2<Complex64>, b: &Array2<Complex64>) -> f64 {
    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y).norm_sqr())
        .sum();
    (sum / a.len() as f64).sqrt()
}

#[derive(Debug, Clone, Copy)]
pub struct AccuracyCheck {
    pub rms: f64,
    pub within_tolerance: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct AccuracyReport {
    pub tolerance: f64,
    pub naive_forward: AccuracyCheck,
    pub fast_forward: AccuracyCheck,
    pub fast_inverse: AccuracyCheck,
}

fn check(ours: &Array2<Complex64>, reference: &Array2<Complex64>, tolerance: f64) -> AccuracyCheck {
    let rms = rms_error(ours, reference);
    AccuracyCheck {
        rms,
        within_tolerance: rms <= tolerance,
    }
}

/// Compare the naive forward, fast forward and fast inverse transforms
/// against the injected reference implementation.
pub fn accuracy(
    image: &Array2<f64>,
    threshold: usize,
    reference: &dyn ReferenceTransform,
    tolerance: f64,
) -> Result<AccuracyReport, ShapeError> {
    let naive = transform::forward_naive(image)?;
    let fast = transform::forward_fast(image, threshold)?;
    let inverse = transform::inverse_fast(&fast, threshold)?;

    let reference_fft = reference.fft2(image);
    let reference_ifft = reference.ifft2(&reference_fft);

    Ok(AccuracyReport {
        tolerance,
        naive_forward: check(&naive, &reference_fft, tolerance),
        fast_forward: check(&fast, &reference_fft, tolerance),
        fast_inverse: check(&inverse, &reference_ifft, tolerance),
    })
}

#[derive(Debug, Clone, Copy)]
pub struct RuntimeStats {
    pub size: usize,
    pub naive_mean: f64,
    pub naive_std: f64,
    pub fast_mean: f64,
    pub fast_std: f64,
}

/// Square plane of uniform random values in [0, 1).
pub fn random_plane(size: usize, rng: &mut StdRng) -> Array2<f64> {
    Array2::from_shape_fn((size, size), |_| rng.gen::<f64>())
}

pub fn mean_std(samples: &[f64]) -> (f64, f64) {
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let variance = samples
        .iter()
        .map(|s| (s - mean).powi(2))
        .sum::<f64>()
        / samples.len() as f64;
    (mean, variance.sqrt())
}

/// Time the naive and fast forward transforms over seeded random planes,
/// aggregating mean and standard deviation per size.
pub fn benchmark(
    sizes: &[usize],
    iterations: usize,
    seed: u64,
) -> Result<Vec<RuntimeStats>, ShapeError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut stats = Vec::with_capacity(sizes.len());

    for &size in sizes {
        let mut naive_times = Vec::with_capacity(iterations);
        let mut fast_times = Vec::with_capacity(iterations);

        for _ in 0..iterations {
            let plane = random_plane(size, &mut rng);

            let start = Instant::now();
            std::hint::black_box(transform::forward_naive(std::hint::black_box(&plane))?);
            naive_times.push(start.elapsed().as_secs_f64());

            let start = Instant::now();
            std::hint::black_box(transform::forward_fast(
                std::hint::black_box(&plane),
                transform::DEFAULT_RECURSION_THRESHOLD,
            )?);
            fast_times.push(start.elapsed().as_secs_f64());
        }

        let (naive_mean, naive_std) = mean_std(&naive_times);
        let (fast_mean, fast_std) = mean_std(&fast_times);
        stats.push(RuntimeStats {
            size,
            naive_mean,
            naive_std,
            fast_mean,
            fast_std,
        });
    }

    Ok(stats)
}

#[derive(Debug, Clone, Copy)]
pub struct SweepPoint {
    pub threshold: usize,
    pub runtime: f64,
    pub rms: f64,
}

/// Measure fast-transform runtime and RMS error against the reference for
/// each candidate recursion cutover threshold.
pub fn threshold_sweep(
    image: &Array2<f64>,
    thresholds: &[usize],
    reference: &dyn ReferenceTransform,
) -> Result<Vec<SweepPoint>, ShapeError> {
    let reference_fft = reference.fft2(image);

    thresholds
        .iter()
        .map(|&threshold| {
            let start = Instant::now();
            let fast = transform::forward_fast(image, threshold)?;
            let runtime = start.elapsed().as_secs_f64();
            Ok(SweepPoint {
                threshold,
                runtime,
                rms: rms_error(&fast, &reference_fft),
            })
        })
        .collect()
}
