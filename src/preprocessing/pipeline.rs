use crate::error::OcrError;
use crate::selection::SelectedImage;
use image::{DynamicImage, ImageFormat};
use serde::Serialize;
use std::io::Cursor;
use std::time::Instant;

use super::steps;

/// Contrast multiplier applied before recognition
pub const DEFAULT_CONTRAST: f32 = 2.0;
/// Brightness multiplier applied after contrast
pub const DEFAULT_BRIGHTNESS: f32 = 1.5;

/// Filter factors for the enhancement pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterSettings {
    pub contrast: f32,
    pub brightness: f32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            contrast: DEFAULT_CONTRAST,
            brightness: DEFAULT_BRIGHTNESS,
        }
    }
}

/// Timing information for a single enhancement step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Losslessly encoded, enhanced image ready for recognition
#[derive(Debug, Clone)]
pub struct EnhancedImage {
    /// PNG payload
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Total enhancement time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

impl EnhancedImage {
    /// Decode the PNG payload back into pixels
    pub fn decode(&self) -> Result<DynamicImage, OcrError> {
        image::load_from_memory_with_format(&self.png, ImageFormat::Png).map_err(|e| {
            OcrError::ProcessingError(format!("Failed to decode enhanced image: {}", e))
        })
    }
}

/// Enhancement pipeline: contrast, then brightness, then PNG encoding
pub struct Pipeline {
    settings: FilterSettings,
}

impl Pipeline {
    pub fn new(settings: FilterSettings) -> Self {
        Self { settings }
    }

    /// Decode the selected image at its native size, filter it and re-encode as PNG
    pub fn enhance(&self, source: &SelectedImage) -> Result<EnhancedImage, OcrError> {
        let start = Instant::now();
        let mut timings = Vec::new();

        let decoded = self.run_step("decode", (), &mut timings, |_| source.decode())?;
        // Draw onto an RGBA surface of the image's native dimensions
        let surface = DynamicImage::ImageRgba8(decoded.into_rgba8());
        let filtered = self.filter(surface, &mut timings)?;
        let (width, height) = (filtered.width(), filtered.height());
        let png = self.run_step("encode", filtered, &mut timings, encode_png)?;

        let total_time_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            "Enhanced {} ({}x{}) in {}ms: {:?}",
            source.name(),
            width,
            height,
            total_time_ms,
            timings
        );

        Ok(EnhancedImage {
            png,
            width,
            height,
            total_time_ms,
            steps: timings,
        })
    }

    /// Apply the filter chain to already-decoded pixels
    pub fn filter(
        &self,
        image: DynamicImage,
        timings: &mut Vec<StepTiming>,
    ) -> Result<DynamicImage, OcrError> {
        let FilterSettings {
            contrast,
            brightness,
        } = self.settings;

        let img = self.run_step("contrast", image, timings, |img| {
            steps::contrast::apply(img, contrast)
        })?;
        self.run_step("brightness", img, timings, |img| {
            steps::brightness::apply(img, brightness)
        })
    }

    fn run_step<I, O, F>(
        &self,
        name: &str,
        input: I,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> Result<O, OcrError>
    where
        F: FnOnce(I) -> Result<O, OcrError>,
    {
        let step_start = Instant::now();
        let result = step_fn(input)?;
        timings.push(StepTiming {
            name: name.to_string(),
            time_ms: step_start.elapsed().as_millis() as u64,
        });
        Ok(result)
    }
}

fn encode_png(image: DynamicImage) -> Result<Vec<u8>, OcrError> {
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| OcrError::PreprocessingError(format!("Failed to encode PNG: {}", e)))?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn sample_jpeg() -> SelectedImage {
        let img = RgbImage::from_fn(32, 24, |x, y| Rgb([(x * 8) as u8, (y * 10) as u8, 90]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .unwrap();
        SelectedImage::from_bytes("sample.jpg", bytes, usize::MAX).unwrap()
    }

    #[test]
    fn test_enhance_keeps_native_dimensions() {
        let enhanced = Pipeline::new(FilterSettings::default())
            .enhance(&sample_jpeg())
            .unwrap();

        assert_eq!((enhanced.width, enhanced.height), (32, 24));
        let decoded = enhanced.decode().unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 24));
    }

    #[test]
    fn test_enhance_emits_png() {
        let enhanced = Pipeline::new(FilterSettings::default())
            .enhance(&sample_jpeg())
            .unwrap();

        assert_eq!(image::guess_format(&enhanced.png).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_enhance_records_each_step() {
        let enhanced = Pipeline::new(FilterSettings::default())
            .enhance(&sample_jpeg())
            .unwrap();

        let names: Vec<&str> = enhanced.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["decode", "contrast", "brightness", "encode"]);
    }

    #[test]
    fn test_enhance_is_deterministic() {
        let source = sample_jpeg();
        let pipeline = Pipeline::new(FilterSettings::default());

        let first = pipeline.enhance(&source).unwrap();
        let second = pipeline.enhance(&source).unwrap();

        assert_eq!(first.png, second.png);
    }

    #[test]
    fn test_filter_applies_contrast_before_brightness() {
        // 100 -> contrast x2 -> ~73 -> brightness x1.5 -> ~109
        // The reverse order would give 150 -> ~172
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([100, 100, 100])));
        let mut timings = Vec::new();

        let result = Pipeline::new(FilterSettings::default())
            .filter(img, &mut timings)
            .unwrap()
            .to_rgba8();

        let value = result.get_pixel(0, 0).0[0];
        assert!((105..=112).contains(&value), "unexpected value {}", value);
    }
}
