//! Individual enhancement steps

pub mod brightness;
pub mod contrast;

use crate::error::OcrError;
use image::DynamicImage;

/// Validate a CSS-style filter multiplier (finite and non-negative)
fn check_factor(name: &str, factor: f32) -> Result<(), OcrError> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(OcrError::PreprocessingError(format!(
            "{} factor must be a non-negative number, got {}",
            name, factor
        )));
    }
    Ok(())
}

/// Build a per-channel lookup table from a transfer function on [0, 1]
/// Output is clamped to [0, 1] before quantizing back to 8 bits
fn build_lut<F>(transfer: F) -> [u8; 256]
where
    F: Fn(f32) -> f32,
{
    let mut lut = [0u8; 256];
    for (i, out) in lut.iter_mut().enumerate() {
        let value = transfer(i as f32 / 255.0).clamp(0.0, 1.0);
        *out = (value * 255.0).round() as u8;
    }
    lut
}

/// Map the color channels of an image through a lookup table, leaving alpha untouched
fn map_color_channels(image: DynamicImage, lut: &[u8; 256]) -> DynamicImage {
    let mut rgba = image.into_rgba8();
    for pixel in rgba.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        pixel.0 = [lut[r as usize], lut[g as usize], lut[b as usize], a];
    }
    DynamicImage::ImageRgba8(rgba)
}
