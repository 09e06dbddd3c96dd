//! Spectrum visualization and runtime/accuracy charts.

use std::path::Path;

use fourier::pipeline::{RuntimeStats, SweepPoint};
use image::{GrayImage, Luma};
use ndarray::Array2;
use num_complex::Complex64;
use plotters::prelude::*;

use crate::CliError;

fn plot_err<E: std::fmt::Display>(err: E) -> CliError {
    CliError::Plot(err.to_string())
}

/// Render the log-scaled magnitudes of a spectrum as a grayscale PNG.
pub fn save_log_magnitude<P: AsRef<Path>>(
    spectrum: &Array2<Complex64>,
    path: P,
) -> Result<(), CliError> {
    // log transformation keeps the dc peak from washing out everything else
    let magnitudes = spectrum.mapv(|c| (c.norm() + 1.0).ln());
    let max = magnitudes
        .iter()
        .copied()
        .fold(f64::MIN, f64::max)
        .max(f64::EPSILON);
    let (height, width) = spectrum.dim();

    let img = GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let normalized = magnitudes[[y as usize, x as usize]] / max * 255.0;
        Luma([normalized.clamp(0.0, 255.0) as u8])
    });
    img.save(path)?;
    Ok(())
}

/// Log-log runtime-vs-size chart with one-sigma error bars for the naive
/// and fast transforms.
pub fn save_runtime_chart<P: AsRef<Path>>(
    stats: &[RuntimeStats],
    path: P,
) -> Result<(), CliError> {
    let root = BitMapBackend::new(path.as_ref(), (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let x_min = stats.iter().map(|s| s.size).min().unwrap_or(1) as f64 / 2.0;
    let x_max = stats.iter().map(|s| s.size).max().unwrap_or(1) as f64 * 2.0;
    let y_min = stats
        .iter()
        .map(|s| s.fast_mean)
        .fold(f64::INFINITY, f64::min)
        .max(1e-9)
        / 10.0;
    let y_max = stats
        .iter()
        .map(|s| s.naive_mean + s.naive_std)
        .fold(0.0f64, f64::max)
        .max(y_min)
        * 10.0;

    let mut chart = ChartBuilder::on(&root)
        .caption("naive vs fast transform runtime", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((x_min..x_max).log_scale(), (y_min..y_max).log_scale())
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("problem size")
        .y_desc("runtime (s)")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            stats.iter().map(|s| (s.size as f64, s.naive_mean)),
            &RED,
        ))
        .map_err(plot_err)?
        .label("naive")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], RED));
    chart
        .draw_series(stats.iter().map(|s| {
            ErrorBar::new_vertical(
                s.size as f64,
                (s.naive_mean - s.naive_std).max(y_min),
                s.naive_mean,
                s.naive_mean + s.naive_std,
                RED.filled(),
                8,
            )
        }))
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            stats.iter().map(|s| (s.size as f64, s.fast_mean)),
            &BLUE,
        ))
        .map_err(plot_err)?
        .label("fast")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLUE));
    chart
        .draw_series(stats.iter().map(|s| {
            ErrorBar::new_vertical(
                s.size as f64,
                (s.fast_mean - s.fast_std).max(y_min),
                s.fast_mean,
                s.fast_mean + s.fast_std,
                BLUE.filled(),
                8,
            )
        }))
        .map_err(plot_err)?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

fn line_chart<P: AsRef<Path>>(
    path: P,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    points: &[(f64, f64)],
) -> Result<(), CliError> {
    let root = BitMapBackend::new(path.as_ref(), (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let x_max = points.iter().map(|p| p.0).fold(0.0f64, f64::max) * 1.05 + 1.0;
    let y_max = points.iter().map(|p| p.1).fold(0.0f64, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.2 } else { 1e-12 };

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .map_err(plot_err)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())),
        )
        .map_err(plot_err)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

pub fn save_sweep_runtime_chart<P: AsRef<Path>>(
    points: &[SweepPoint],
    path: P,
) -> Result<(), CliError> {
    let series: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (p.threshold as f64, p.runtime))
        .collect();
    line_chart(
        path,
        "fast transform runtime by recursion threshold",
        "threshold",
        "runtime (s)",
        &series,
    )
}

pub fn save_sweep_rms_chart<P: AsRef<Path>>(
    points: &[SweepPoint],
    path: P,
) -> Result<(), CliError> {
    let series: Vec<(f64, f64)> = points.iter().map(|p| (p.threshold as f64, p.rms)).collect();
    line_chart(
        path,
        "fast transform error by recursion threshold",
        "threshold",
        "rms vs reference",
        &series,
    )
}
