//! Property-based tests for the transform engine.

use fourier::transform::{forward_fast, forward_naive, inverse_fast};
use ndarray::Array2;
use num_complex::Complex64;
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_plane(size: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((size, size), |_| rng.gen::<f64>())
}

proptest! {
    /// The recursive transform agrees with direct summation for every
    /// power-of-two size and every cutover threshold.
    #[test]
    fn fast_agrees_with_naive(size_exp in 1usize..5, seed in 0u64..256, threshold in 1usize..20) {
        let size = 1 << size_exp;
        let plane = random_plane(size, seed);

        let naive = forward_naive(&plane).unwrap();
        let fast = forward_fast(&plane, threshold).unwrap();

        for ((i, j), &n) in naive.indexed_iter() {
            let diff = (n - fast[[i, j]]).norm();
            prop_assert!(diff < 1e-8, "diff {diff} at ({i}, {j}) for size {size}");
        }
    }

    /// inverse(forward(x)) recovers x.
    #[test]
    fn roundtrip_recovers_input(size_exp in 1usize..6, seed in 0u64..256, threshold in 1usize..20) {
        let size = 1 << size_exp;
        let plane = random_plane(size, seed);

        let spectrum = forward_fast(&plane, threshold).unwrap();
        let recovered = inverse_fast(&spectrum, threshold).unwrap();

        for ((i, j), &val) in plane.indexed_iter() {
            let diff = (recovered[[i, j]] - Complex64::new(val, 0.0)).norm();
            prop_assert!(diff < 1e-6, "diff {diff} at ({i}, {j}) for size {size}");
        }
    }

    /// forward(a*x + b*y) == a*forward(x) + b*forward(y).
    #[test]
    fn transform_is_linear(
        seed in 0u64..256,
        a in -10.0f64..10.0,
        b in -10.0f64..10.0,
    ) {
        let x = random_plane(16, seed);
        let y = random_plane(16, seed.wrapping_add(1));

        let combined = x.mapv(|v| a * v) + &y.mapv(|v| b * v);
        let lhs = forward_fast(&combined, 4).unwrap();

        let fx = forward_fast(&x, 4).unwrap();
        let fy = forward_fast(&y, 4).unwrap();

        for ((i, j), &l) in lhs.indexed_iter() {
            let r = fx[[i, j]] * a + fy[[i, j]] * b;
            prop_assert!((l - r).norm() < 1e-8);
        }
    }

    /// Parseval: spectrum energy equals plane energy times M*N.
    #[test]
    fn energy_is_preserved(size_exp in 1usize..6, seed in 0u64..256) {
        let size = 1 << size_exp;
        let plane = random_plane(size, seed);

        let spectrum = forward_fast(&plane, 4).unwrap();
        let spatial: f64 = plane.iter().map(|v| v * v).sum();
        let frequency: f64 = spectrum.iter().map(|c| c.norm_sqr()).sum();

        prop_assert!((spatial - frequency / plane.len() as f64).abs() < 1e-6);
    }
}
