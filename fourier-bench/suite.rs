use std::collections::BTreeMap;

use strum_macros::{Display, EnumIter};

#[derive(Debug, Display, EnumIter, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum TransformKind {
    Naive,
    Fast,
}

#[derive(Debug)]
pub struct KindResult {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
}

#[derive(Debug)]
pub struct SizeRun {
    pub size: usize,
    pub results: BTreeMap<TransformKind, KindResult>,
}

impl SizeRun {
    pub fn from_samples(size: usize, samples: &BTreeMap<TransformKind, Vec<f64>>) -> SizeRun {
        let results = samples
            .iter()
            .map(|(&kind, times)| {
                let (mean, std) = fourier::pipeline::mean_std(times);
                let min = times.iter().copied().fold(f64::INFINITY, f64::min);
                (kind, KindResult { mean, std, min })
            })
            .collect();
        SizeRun { size, results }
    }
}
