//! rustfft-backed reference transform for the accuracy and sweep modes.

use fourier::ReferenceTransform;
use ndarray::Array2;
use num_complex::Complex64;
use rustfft::FftPlanner;

/// Plans 1D transforms per axis length, rows first then columns.
pub struct PlannedReference;

fn process_2d(data: &mut Array2<Complex64>, forward: bool) {
    let (rows, cols) = data.dim();
    let mut planner = FftPlanner::new();

    let row_fft = if forward {
        planner.plan_fft_forward(cols)
    } else {
        planner.plan_fft_inverse(cols)
    };
    for mut row in data.rows_mut() {
        let mut buf = row.to_vec();
        row_fft.process(&mut buf);
        for (dst, src) in row.iter_mut().zip(buf) {
            *dst = src;
        }
    }

    let col_fft = if forward {
        planner.plan_fft_forward(rows)
    } else {
        planner.plan_fft_inverse(rows)
    };
    let mut col_buf = vec![Complex64::new(0.0, 0.0); rows];
    for col in 0..cols {
        for row in 0..rows {
            col_buf[row] = data[[row, col]];
        }
        col_fft.process(&mut col_buf);
        for row in 0..rows {
            data[[row, col]] = col_buf[row];
        }
    }
}

impl ReferenceTransform for PlannedReference {
    fn fft2(&self, image: &Array2<f64>) -> Array2<Complex64> {
        let mut data = image.mapv(|v| Complex64::new(v, 0.0));
        process_2d(&mut data, true);
        data
    }

    fn ifft2(&self, spectrum: &Array2<Complex64>) -> Array2<Complex64> {
        let (rows, cols) = spectrum.dim();
        let mut data = spectrum.clone();
        process_2d(&mut data, false);
        let norm = 1.0 / (rows * cols) as f64;
        data.mapv_inplace(|c| c * norm);
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fourier::transform::{forward_fast, DEFAULT_RECURSION_THRESHOLD};

    #[test]
    fn reference_agrees_with_the_engine() {
        let plane = Array2::from_shape_fn((16, 16), |(i, j)| ((i * 16 + j) % 37) as f64);
        let ours = forward_fast(&plane, DEFAULT_RECURSION_THRESHOLD).unwrap();
        let theirs = PlannedReference.fft2(&plane);

        for ((i, j), &c) in ours.indexed_iter() {
            assert!(
                (c - theirs[[i, j]]).norm() < 1e-8,
                "mismatch at ({i}, {j})"
            );
        }
    }
}
