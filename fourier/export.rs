//! Flat CSV export of a coefficient matrix.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use ndarray::Array2;
use num_complex::Complex64;

/// Write one CSV row per matrix row. Cells are `re{+-}im i` so commas only
/// separate cells.
pub fn write_spectrum_csv<W: Write>(
    spectrum: &Array2<Complex64>,
    mut writer: W,
) -> io::Result<()> {
    for row in spectrum.rows() {
        let line = row
            .iter()
            .map(|c| format!("{:e}{:+e}i", c.re, c.im))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

pub fn export_spectrum<P: AsRef<Path>>(spectrum: &Array2<Complex64>, path: P) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_spectrum_csv(spectrum, &mut writer)?;
    writer.flush()
}
