use crate::error::OcrError;
use image::DynamicImage;

use super::{build_lut, check_factor, map_color_channels};

/// Multiply each color channel by `factor`, clamping at white
/// Same transfer function as the CSS `brightness()` filter
pub fn apply(image: DynamicImage, factor: f32) -> Result<DynamicImage, OcrError> {
    check_factor("brightness", factor)?;
    let lut = build_lut(|c| c * factor);
    Ok(map_color_channels(image, &lut))
}
