//! Image loading, power-of-two padding and grayscale plane output.

use std::path::Path;

use image::{imageops::FilterType, GrayImage, Luma};
use ndarray::Array2;

use crate::CliError;

/// Open any raster image as a grayscale f64 plane, resized up to the next
/// power-of-two dimensions with cubic (Catmull-Rom) interpolation.
pub fn load_padded_plane<P: AsRef<Path>>(path: P) -> Result<Array2<f64>, CliError> {
    let path = path.as_ref();
    let img = image::open(path)
        .map_err(|_| CliError::ImagePath(path.display().to_string()))?
        .to_luma8();

    let (width, height) = img.dimensions();
    let (padded_width, padded_height) = (width.next_power_of_two(), height.next_power_of_two());

    let padded = if (padded_width, padded_height) != (width, height) {
        image::imageops::resize(&img, padded_width, padded_height, FilterType::CatmullRom)
    } else {
        img
    };

    let mut plane = Array2::zeros((padded_height as usize, padded_width as usize));
    for (x, y, pixel) in padded.enumerate_pixels() {
        plane[[y as usize, x as usize]] = pixel[0] as f64;
    }
    Ok(plane)
}

/// Save a plane as an 8-bit grayscale PNG, normalized to the 0..255 range.
pub fn save_plane<P: AsRef<Path>>(plane: &Array2<f64>, path: P) -> Result<(), CliError> {
    let (height, width) = plane.dim();

    let min = plane.iter().copied().fold(f64::INFINITY, f64::min);
    let max = plane.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = (max - min).max(f64::EPSILON);

    let img = GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let value = (plane[[y as usize, x as usize]] - min) / range * 255.0;
        Luma([value.clamp(0.0, 255.0) as u8])
    });
    img.save(path)?;
    Ok(())
}
