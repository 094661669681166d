use crate::error::OcrError;
use image::DynamicImage;

use super::{build_lut, check_factor, map_color_channels};

/// Scale each channel's distance from mid-gray by `factor`
/// Same transfer function as the CSS `contrast()` filter: c' = (c - 0.5) * k + 0.5
pub fn apply(image: DynamicImage, factor: f32) -> Result<DynamicImage, OcrError> {
    check_factor("contrast", factor)?;
    let lut = build_lut(|c| (c - 0.5) * factor + 0.5);
    Ok(map_color_channels(image, &lut))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_contrast_pushes_values_away_from_mid_gray() {
        let mut img = RgbaImage::new(4, 1);
        img.put_pixel(0, 0, Rgba([50, 50, 50, 255]));
        img.put_pixel(1, 0, Rgba([100, 100, 100, 255]));
        img.put_pixel(2, 0, Rgba([160, 160, 160, 255]));
        img.put_pixel(3, 0, Rgba([200, 200, 200, 255]));

        let result = apply(DynamicImage::ImageRgba8(img), 2.0).unwrap().to_rgba8();

        assert_eq!(result.get_pixel(0, 0).0[0], 0);
        assert!(result.get_pixel(1, 0).0[0] < 100);
        assert!(result.get_pixel(2, 0).0[0] > 160);
        assert_eq!(result.get_pixel(3, 0).0[0], 255);
    }

    #[test]
    fn test_contrast_identity_factor() {
        let img = RgbaImage::from_fn(16, 16, |x, y| Rgba([(x * 16) as u8, (y * 16) as u8, 77, 255]));

        let result = apply(DynamicImage::ImageRgba8(img.clone()), 1.0).unwrap();

        assert_eq!(result.to_rgba8(), img);
    }

    #[test]
    fn test_contrast_preserves_alpha() {
        let img = RgbaImage::from_pixel(3, 3, Rgba([10, 20, 30, 42]));

        let result = apply(DynamicImage::ImageRgba8(img), 2.0).unwrap().to_rgba8();

        assert_eq!(result.get_pixel(1, 1).0[3], 42);
    }

    #[test]
    fn test_contrast_rejects_negative_factor() {
        let img = RgbaImage::new(1, 1);
        assert!(apply(DynamicImage::ImageRgba8(img), -1.0).is_err());
    }
}
