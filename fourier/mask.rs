//! Coefficient-selection masks applied element-wise to a spectrum.

use ndarray::{Array2, Zip};
use num_complex::Complex64;
use rand::{rngs::StdRng, SeedableRng};
use std::cmp::Ordering;
use std::f64::consts::PI;

use crate::ShapeError;

pub const DEFAULT_FREQUENCY_CUTOFF: (f64, f64) = (0.1 * PI, 0.1 * PI);

/// A {0,1} matrix selecting which coefficients of a spectrum survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    cells: Array2<u8>,
}

impl Mask {
    pub fn shape(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// Number of positions the mask keeps.
    pub fn selected(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell != 0).count()
    }

    /// Element-wise product with the spectrum. Returns the masked spectrum
    /// and the count of nonzero coefficients remaining.
    pub fn apply(
        &self,
        spectrum: &Array2<Complex64>,
    ) -> Result<(Array2<Complex64>, usize), ShapeError> {
        if self.cells.dim() != spectrum.dim() {
            return Err(ShapeError::MaskMismatch {
                mask: self.cells.dim(),
                spectrum: spectrum.dim(),
            });
        }

        let mut masked = spectrum.clone();
        Zip::from(&mut masked).and(&self.cells).for_each(|c, &keep| {
            if keep == 0 {
                *c = Complex64::new(0.0, 0.0);
            }
        });
        let nonzero = masked.iter().filter(|c| c.norm_sqr() > 0.0).count();
        Ok((masked, nonzero))
    }

    /// Apply the same 2D mask to every channel spectrum.
    pub fn apply_channels(
        &self,
        spectra: &[Array2<Complex64>],
    ) -> Result<Vec<(Array2<Complex64>, usize)>, ShapeError> {
        spectra.iter().map(|s| self.apply(s)).collect()
    }
}

/// Folded normalized angular frequency of `index` along an axis of length
/// `len`, in [0, pi].
fn folded_frequency(index: usize, len: usize) -> f64 {
    2.0 * PI * index.min(len - index) as f64 / len as f64
}

/// Low-pass cross: zero every position where BOTH axis frequencies exceed
/// their cutoff. Used for denoising.
pub fn high_frequency(shape: (usize, usize), cutoff: (f64, f64)) -> Mask {
    let (rows, cols) = shape;
    let cells = Array2::from_shape_fn(shape, |(u, v)| {
        let dropped = folded_frequency(u, rows) > cutoff.0 && folded_frequency(v, cols) > cutoff.1;
        u8::from(!dropped)
    });
    Mask { cells }
}

/// Keep the largest-magnitude coefficients, zero the rest. Ranking is
/// stable, so ties resolve in original index order.
pub fn magnitude_threshold(spectrum: &Array2<Complex64>, keep_fraction: f64) -> Mask {
    let dim = spectrum.dim();
    let total = dim.0 * dim.1;
    let dropped = (total as f64 * (1.0 - keep_fraction.clamp(0.0, 1.0))).floor() as usize;
    let kept = total - dropped.min(total);

    let magnitudes: Vec<f64> = spectrum.iter().map(|c| c.norm()).collect();
    let mut order: Vec<usize> = (0..total).collect();
    order.sort_by(|&a, &b| {
        magnitudes[b]
            .partial_cmp(&magnitudes[a])
            .unwrap_or(Ordering::Equal)
    });

    let mut cells = Array2::from_elem(dim, 0u8);
    for &flat in order.iter().take(kept) {
        cells[[flat / dim.1, flat % dim.1]] = 1;
    }
    Mask { cells }
}

/// Zero `floor(total * drop_fraction)` positions sampled uniformly without
/// replacement. Deterministic for a given seed.
pub fn random(shape: (usize, usize), drop_fraction: f64, seed: u64) -> Mask {
    let total = shape.0 * shape.1;
    let dropped = (total as f64 * drop_fraction.clamp(0.0, 1.0)) as usize;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut cells = Array2::from_elem(shape, 1u8);
    for flat in rand::seq::index::sample(&mut rng, total, dropped) {
        cells[[flat / shape.1, flat % shape.1]] = 0;
    }
    Mask { cells }
}

/// How a compression factor (fraction of coefficients to drop) turns into
/// a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskScheme {
    HighFrequency,
    MagnitudeThreshold,
    Random,
}

impl MaskScheme {
    /// Build the mask for one compression factor in [0, 1].
    pub fn build(self, spectrum: &Array2<Complex64>, factor: f64, seed: u64) -> Mask {
        let factor = factor.clamp(0.0, 1.0);
        match self {
            MaskScheme::HighFrequency => {
                // factor 0 keeps everything (folded frequencies never exceed pi)
                let cutoff = (1.0 - factor) * PI;
                high_frequency(spectrum.dim(), (cutoff, cutoff))
            }
            MaskScheme::MagnitudeThreshold => magnitude_threshold(spectrum, 1.0 - factor),
            MaskScheme::Random => random(spectrum.dim(), factor, seed),
        }
    }
}
