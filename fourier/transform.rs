//! 2D discrete Fourier transforms over image planes.
//!
//! Convention matches numpy:
//! - forward transforms are unnormalized
//! - inverse transforms divide by M*N
//!
//! Every entry point requires power-of-two dimensions along both axes;
//! callers pad upstream.

use ndarray::Array2;
use num_complex::Complex64;
use std::f64::consts::PI;

use crate::ShapeError;

/// 1D lengths at or below this fall back to direct summation instead of
/// recursing further.
pub const DEFAULT_RECURSION_THRESHOLD: usize = 4;

fn check_shape(dim: (usize, usize)) -> Result<(), ShapeError> {
    for (axis, len) in [dim.0, dim.1].into_iter().enumerate() {
        if !len.is_power_of_two() {
            return Err(ShapeError::NonPowerOfTwo { axis, len });
        }
    }
    Ok(())
}

fn twiddles(n: usize, sign: f64) -> Vec<Complex64> {
    (0..n)
        .map(|k| Complex64::from_polar(1.0, sign * 2.0 * PI * k as f64 / n as f64))
        .collect()
}

/// Direct 1D DFT by summation. `sign` is -1.0 for forward, +1.0 for inverse
/// (unnormalized in both directions).
fn dft_1d(input: &[Complex64], sign: f64) -> Vec<Complex64> {
    let n = input.len();
    let twiddles = twiddles(n, sign);
    (0..n)
        .map(|k| {
            input
                .iter()
                .enumerate()
                .fold(Complex64::new(0.0, 0.0), |acc, (j, &x)| {
                    acc + x * twiddles[(j * k) % n]
                })
        })
        .collect()
}

/// Recursive radix-2 decimation-in-time FFT. Splits into even/odd halves
/// until the working length drops to `threshold`, then sums directly.
fn fft_1d(input: &[Complex64], sign: f64, threshold: usize) -> Vec<Complex64> {
    let n = input.len();
    if n <= threshold.max(1) {
        return dft_1d(input, sign);
    }

    let even: Vec<Complex64> = input.iter().copied().step_by(2).collect();
    let odd: Vec<Complex64> = input.iter().copied().skip(1).step_by(2).collect();
    let even = fft_1d(&even, sign, threshold);
    let odd = fft_1d(&odd, sign, threshold);

    let half = n / 2;
    let step = sign * 2.0 * PI / n as f64;
    let mut out = vec![Complex64::new(0.0, 0.0); n];
    for k in 0..half {
        let twiddled = Complex64::from_polar(1.0, step * k as f64) * odd[k];
        out[k] = even[k] + twiddled;
        out[k + half] = even[k] - twiddled;
    }
    out
}

/// 1D transforms along rows, then along columns. Columns go through a
/// gather/scatter buffer instead of a full transposed copy.
fn transform_2d(data: &mut Array2<Complex64>, sign: f64, threshold: usize) {
    let (rows, cols) = data.dim();

    for mut row in data.rows_mut() {
        let transformed = fft_1d(&row.to_vec(), sign, threshold);
        for (dst, src) in row.iter_mut().zip(transformed) {
            *dst = src;
        }
    }

    let mut col_buf = vec![Complex64::new(0.0, 0.0); rows];
    for col in 0..cols {
        for row in 0..rows {
            col_buf[row] = data[[row, col]];
        }
        let transformed = fft_1d(&col_buf, sign, threshold);
        for row in 0..rows {
            data[[row, col]] = transformed[row];
        }
    }
}

/// Direct 2D summation: out(u,v) = sum_x sum_y in(x,y) * exp(sign*2pi*i*(ux/M + vy/N)).
/// Twiddle tables keep the inner loop to one complex multiply; the O(M^2 N^2)
/// summation itself is untouched.
fn naive_2d(data: &Array2<Complex64>, sign: f64) -> Array2<Complex64> {
    let (m, n) = data.dim();
    let row_twiddles = twiddles(m, sign);
    let col_twiddles = twiddles(n, sign);

    Array2::from_shape_fn((m, n), |(u, v)| {
        let mut acc = Complex64::new(0.0, 0.0);
        for x in 0..m {
            let row_twiddle = row_twiddles[(u * x) % m];
            for y in 0..n {
                acc += data[[x, y]] * row_twiddle * col_twiddles[(v * y) % n];
            }
        }
        acc
    })
}

/// Forward 2D DFT by direct double summation, O(M^2 N^2). Ground truth for
/// accuracy and runtime comparisons; impractical above small sizes.
pub fn forward_naive(image: &Array2<f64>) -> Result<Array2<Complex64>, ShapeError> {
    check_shape(image.dim())?;
    let data = image.mapv(|v| Complex64::new(v, 0.0));
    Ok(naive_2d(&data, -1.0))
}

/// Forward 2D FFT via recursive row/column decimation, O(M N log(MN)).
/// Matches [`forward_naive`] within floating-point tolerance for any
/// `threshold >= 1`.
pub fn forward_fast(
    image: &Array2<f64>,
    threshold: usize,
) -> Result<Array2<Complex64>, ShapeError> {
    check_shape(image.dim())?;
    let mut data = image.mapv(|v| Complex64::new(v, 0.0));
    transform_2d(&mut data, -1.0, threshold);
    Ok(data)
}

/// Inverse 2D FFT, normalized by 1/(M*N).
pub fn inverse_fast(
    spectrum: &Array2<Complex64>,
    threshold: usize,
) -> Result<Array2<Complex64>, ShapeError> {
    check_shape(spectrum.dim())?;
    let (m, n) = spectrum.dim();
    let mut data = spectrum.clone();
    transform_2d(&mut data, 1.0, threshold);
    let norm = 1.0 / (m * n) as f64;
    data.mapv_inplace(|c| c * norm);
    Ok(data)
}

/// Inverse 2D DFT by direct summation, normalized by 1/(M*N).
pub fn inverse_naive(spectrum: &Array2<Complex64>) -> Result<Array2<Complex64>, ShapeError> {
    check_shape(spectrum.dim())?;
    let (m, n) = spectrum.dim();
    let norm = 1.0 / (m * n) as f64;
    Ok(naive_2d(spectrum, 1.0).mapv(|c| c * norm))
}

/// Real parts of an inverse-transformed spectrum, as an image plane.
pub fn real_plane(data: &Array2<Complex64>) -> Array2<f64> {
    data.mapv(|c| c.re)
}

/// Forward FFT applied independently to each channel plane.
pub fn forward_fast_channels(
    planes: &[Array2<f64>],
    threshold: usize,
) -> Result<Vec<Array2<Complex64>>, ShapeError> {
    planes.iter().map(|p| forward_fast(p, threshold)).collect()
}

/// Inverse FFT applied independently to each channel spectrum.
pub fn inverse_fast_channels(
    spectra: &[Array2<Complex64>],
    threshold: usize,
) -> Result<Vec<Array2<Complex64>>, ShapeError> {
    spectra.iter().map(|s| inverse_fast(s, threshold)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_plane(rows: usize, cols: usize, seed: u64) -> Array2<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        Array2::from_shape_fn((rows, cols), |_| rng.gen::<f64>())
    }

    fn assert_spectra_close(a: &Array2<Complex64>, b: &Array2<Complex64>, tol: f64) {
        for ((i, j), &x) in a.indexed_iter() {
            let diff = (x - b[[i, j]]).norm();
            assert!(
                diff < tol,
                "mismatch at ({i}, {j}): {x} vs {}, diff {diff}",
                b[[i, j]]
            );
        }
    }

    #[test]
    fn fast_matches_naive() {
        let plane = random_plane(16, 16, 7);
        let naive = forward_naive(&plane).unwrap();
        let fast = forward_fast(&plane, DEFAULT_RECURSION_THRESHOLD).unwrap();
        assert_spectra_close(&naive, &fast, 1e-8);
    }

    #[test]
    fn fast_matches_naive_rectangular() {
        let plane = random_plane(8, 32, 21);
        let naive = forward_naive(&plane).unwrap();
        let fast = forward_fast(&plane, DEFAULT_RECURSION_THRESHOLD).unwrap();
        assert_spectra_close(&naive, &fast, 1e-8);
    }

    #[test]
    fn roundtrip_recovers_plane() {
        let plane = random_plane(32, 32, 3);
        let spectrum = forward_fast(&plane, DEFAULT_RECURSION_THRESHOLD).unwrap();
        let recovered = inverse_fast(&spectrum, DEFAULT_RECURSION_THRESHOLD).unwrap();
        for ((i, j), &val) in plane.indexed_iter() {
            let diff = (recovered[[i, j]] - Complex64::new(val, 0.0)).norm();
            assert!(diff < 1e-6, "roundtrip failed at ({i}, {j}): diff {diff}");
        }
    }

    #[test]
    fn inverse_naive_matches_inverse_fast() {
        let plane = random_plane(8, 8, 11);
        let spectrum = forward_fast(&plane, DEFAULT_RECURSION_THRESHOLD).unwrap();
        let fast = inverse_fast(&spectrum, DEFAULT_RECURSION_THRESHOLD).unwrap();
        let naive = inverse_naive(&spectrum).unwrap();
        assert_spectra_close(&fast, &naive, 1e-8);
    }

    #[test]
    fn transform_is_linear() {
        let x = random_plane(16, 16, 1);
        let y = random_plane(16, 16, 2);
        let (a, b) = (2.5, -0.75);

        let combined = x.mapv(|v| a * v) + &y.mapv(|v| b * v);
        let lhs = forward_fast(&combined, DEFAULT_RECURSION_THRESHOLD).unwrap();

        let fx = forward_fast(&x, DEFAULT_RECURSION_THRESHOLD).unwrap();
        let fy = forward_fast(&y, DEFAULT_RECURSION_THRESHOLD).unwrap();
        let rhs = fx.mapv(|c| c * a) + &fy.mapv(|c| c * b);

        assert_spectra_close(&lhs, &rhs, 1e-8);
    }

    #[test]
    fn parseval_energy_is_preserved() {
        let plane = random_plane(16, 16, 5);
        let spectrum = forward_fast(&plane, DEFAULT_RECURSION_THRESHOLD).unwrap();

        let spatial: f64 = plane.iter().map(|v| v * v).sum();
        let frequency: f64 = spectrum.iter().map(|c| c.norm_sqr()).sum();
        let n = plane.len() as f64;

        assert!(
            (spatial - frequency / n).abs() < 1e-8,
            "spatial energy {spatial} vs frequency energy {}",
            frequency / n
        );
    }

    #[test]
    fn constant_plane_has_single_dc_coefficient() {
        let plane = Array2::from_elem((8, 8), 5.0);
        let spectrum = forward_fast(&plane, DEFAULT_RECURSION_THRESHOLD).unwrap();

        let dc = spectrum[[0, 0]];
        assert!((dc.re - 5.0 * 64.0).abs() < 1e-9, "dc was {dc}");
        assert!(dc.im.abs() < 1e-9);
        for ((u, v), &c) in spectrum.indexed_iter() {
            if (u, v) != (0, 0) {
                assert!(c.norm() < 1e-9, "nonzero coefficient at ({u}, {v}): {c}");
            }
        }

        let recovered = inverse_fast(&spectrum, DEFAULT_RECURSION_THRESHOLD).unwrap();
        for &c in recovered.iter() {
            assert!((c.re - 5.0).abs() < 1e-9 && c.im.abs() < 1e-9);
        }
    }

    #[test]
    fn threshold_does_not_change_result() {
        let plane = random_plane(32, 32, 13);
        let baseline = forward_fast(&plane, 1).unwrap();
        for threshold in [2, 4, 8, 32, 100] {
            let other = forward_fast(&plane, threshold).unwrap();
            assert_spectra_close(&baseline, &other, 1e-9);
        }
    }

    #[test]
    fn rejects_non_power_of_two_shapes() {
        let plane = Array2::from_elem((12, 16), 1.0);
        assert_eq!(
            forward_fast(&plane, DEFAULT_RECURSION_THRESHOLD),
            Err(ShapeError::NonPowerOfTwo { axis: 0, len: 12 })
        );

        let plane = Array2::from_elem((16, 10), 1.0);
        assert_eq!(
            forward_naive(&plane),
            Err(ShapeError::NonPowerOfTwo { axis: 1, len: 10 })
        );

        let empty = Array2::from_elem((0, 8), 1.0);
        assert!(forward_fast(&empty, DEFAULT_RECURSION_THRESHOLD).is_err());
    }

    #[test]
    fn channel_planes_transform_independently() {
        let planes = vec![
            random_plane(8, 8, 30),
            random_plane(8, 8, 31),
            random_plane(8, 8, 32),
        ];
        let spectra = forward_fast_channels(&planes, DEFAULT_RECURSION_THRESHOLD).unwrap();
        assert_eq!(spectra.len(), 3);
        for (plane, spectrum) in planes.iter().zip(&spectra) {
            let expected = forward_fast(plane, DEFAULT_RECURSION_THRESHOLD).unwrap();
            assert_spectra_close(spectrum, &expected, 1e-12);
        }

        let recovered = inverse_fast_channels(&spectra, DEFAULT_RECURSION_THRESHOLD).unwrap();
        for (plane, rec) in planes.iter().zip(&recovered) {
            for ((i, j), &val) in plane.indexed_iter() {
                assert!((rec[[i, j]].re - val).abs() < 1e-6);
            }
        }
    }
}
