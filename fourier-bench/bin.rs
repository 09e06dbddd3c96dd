use std::collections::BTreeMap;
use std::hint::black_box;
use std::time::Instant;

use indicatif::ProgressBar;
use rand::{rngs::StdRng, SeedableRng};
use strum::IntoEnumIterator;

use fourier::pipeline::random_plane;
use fourier::transform::{forward_fast, forward_naive, DEFAULT_RECURSION_THRESHOLD};

mod suite;

use crate::suite::{SizeRun, TransformKind};

// how many timed runs per size and transform kind
static RUNS: usize = 10;
static SIZES: [usize; 4] = [16, 32, 64, 128];
static SEED: u64 = 0x5EED;

fn main() {
    println!(
        " \x1b[1mRunning transform benchmarks\x1b[0m ({} runs per size)",
        RUNS
    );

    let mut rng = StdRng::seed_from_u64(SEED);
    let mut runs = Vec::with_capacity(SIZES.len());

    let pb = ProgressBar::new((SIZES.len() * RUNS) as u64);
    for &size in SIZES.iter() {
        let mut samples: BTreeMap<TransformKind, Vec<f64>> = TransformKind::iter()
            .map(|kind| (kind, Vec::with_capacity(RUNS)))
            .collect();

        for _ in 0..RUNS {
            pb.inc(1);
            let plane = random_plane(size, &mut rng);

            for kind in TransformKind::iter() {
                let start = Instant::now();
                let spectrum = match kind {
                    TransformKind::Naive => forward_naive(black_box(&plane)),
                    TransformKind::Fast => {
                        forward_fast(black_box(&plane), DEFAULT_RECURSION_THRESHOLD)
                    }
                };
                let elapsed = start.elapsed().as_secs_f64();
                black_box(spectrum.expect("benchmark planes are powers of two"));

                samples
                    .get_mut(&kind)
                    .expect("every kind is preseeded")
                    .push(elapsed);
            }
        }

        runs.push(SizeRun::from_samples(size, &samples));
    }
    pb.finish_and_clear();

    println!("\n \x1b[1mResults\x1b[0m");
    println!("┌────────┬────────┬────────────┬────────────┬────────────┐");
    println!("│ size   │ kind   │ mean       │ std        │ min        │");
    println!("├────────┼────────┼────────────┼────────────┼────────────┤");
    for run in &runs {
        for kind in TransformKind::iter() {
            let result = &run.results[&kind];
            println!(
                "│ {size: >6} │ {kind: <6} │ {mean: >8.3}ms │ {std: >8.3}ms │ {min: >8.3}ms │",
                size = run.size,
                kind = kind,
                mean = result.mean * 1e3,
                std = result.std * 1e3,
                min = result.min * 1e3,
            );
        }
    }
    println!("└────────┴────────┴────────────┴────────────┴────────────┘");
}
