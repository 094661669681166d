//! Leptess/Tesseract engine implementation
//!
//! Tesseract-based OCR engine, the multi-language option. Uses the
//! tesseract-static crate for static linking (no system dependencies).
//! Downloads tessdata for each language on first use unless a tessdata
//! directory is configured.

use super::assets;
use crate::config::Config;
use crate::engine::{OcrEngine, OcrResult};
use crate::error::OcrError;
use crate::preprocessing::EnhancedImage;
use std::path::PathBuf;
use tesseract_static::tesseract::Tesseract;

/// Tesseract OCR Engine
pub struct LeptessEngine {
    /// Directory holding `<lang>.traineddata` files
    tessdata_dir: PathBuf,
    /// Configured directories are used as-is, never downloaded into
    managed: bool,
}

impl LeptessEngine {
    /// Create a new Tesseract-based OCR engine
    pub fn new(config: &Config) -> Result<Self, OcrError> {
        let engine = match &config.tessdata_path {
            Some(path) => Self {
                tessdata_dir: PathBuf::from(path),
                managed: false,
            },
            None => Self {
                tessdata_dir: assets::cache_dir().join("tessdata"),
                managed: true,
            },
        };

        // Validate the default language up front so bad setups fail at startup
        drop(engine.open(&config.default_language)?);

        tracing::info!(
            "Leptess engine initialized (tessdata: {}, language: {})",
            engine.tessdata_dir.display(),
            config.default_language
        );

        Ok(engine)
    }

    /// Create a Tesseract instance for a language, fetching its data if needed
    fn open(&self, language: &str) -> Result<Tesseract, OcrError> {
        if !is_valid_language(language) {
            return Err(OcrError::ProcessingError(format!(
                "Invalid language code: {:?}",
                language
            )));
        }

        // Multi-language codes like "eng+fra" need every component
        if self.managed {
            for lang in language.split('+') {
                assets::ensure_downloaded(
                    &self.tessdata_dir,
                    &format!("{}.traineddata", lang),
                    &tessdata_url(lang),
                )?;
            }
        }

        let dir = self
            .tessdata_dir
            .to_str()
            .ok_or_else(|| OcrError::InitializationError("Invalid tessdata path".to_string()))?;

        Tesseract::new(Some(dir), Some(language)).map_err(|e| {
            OcrError::InitializationError(format!(
                "Failed to initialize Tesseract for '{}': {}",
                language, e
            ))
        })
    }
}

impl OcrEngine for LeptessEngine {
    fn name(&self) -> &'static str {
        "leptess"
    }

    fn description(&self) -> &'static str {
        "Tesseract OCR engine - multi-language, better for noisy photos"
    }

    fn recognize(&self, image: &EnhancedImage, language: &str) -> Result<OcrResult, OcrError> {
        // BMP is always supported by the statically linked leptonica
        let rgb_img = image.decode()?.into_rgb8();
        let mut bmp_data = Vec::new();
        rgb_img
            .write_to(&mut std::io::Cursor::new(&mut bmp_data), image::ImageFormat::Bmp)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to convert to BMP: {}", e)))?;

        tracing::debug!(
            "leptess: {}x{} image, {} bytes BMP, language {}",
            image.width,
            image.height,
            bmp_data.len(),
            language
        );

        let mut tess = self
            .open(language)?
            .set_image_from_mem(&bmp_data)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to set image: {}", e)))?;

        tess = tess
            .recognize()
            .map_err(|e| OcrError::ProcessingError(format!("Failed to recognize text: {}", e)))?;

        let text = tess
            .get_text()
            .map_err(|e| OcrError::ProcessingError(format!("Failed to get text: {}", e)))?;

        // Tesseract reports 0-100, results use 0.0-1.0
        let confidence = tess.mean_text_conf() as f32 / 100.0;

        Ok(OcrResult {
            text,
            confidence,
            warnings: Vec::new(),
        })
    }

    fn supported_languages(&self) -> Vec<String> {
        // Any tessdata_fast language works; these are the common ones
        [
            "eng", "deu", "fra", "spa", "ita", "por", "nld", "jpn", "chi_sim", "chi_tra", "kor",
            "ara", "rus",
        ]
        .iter()
        .map(|l| l.to_string())
        .collect()
    }
}

/// Language codes are used in file names and URLs
fn is_valid_language(language: &str) -> bool {
    !language.is_empty()
        && language.split('+').all(|lang| {
            !lang.is_empty() && lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

/// Get tessdata download URL for a language
fn tessdata_url(language: &str) -> String {
    // tessdata_fast: smaller, faster downloads
    format!(
        "https://github.com/tesseract-ocr/tessdata_fast/raw/main/{}.traineddata",
        language
    )
}
