//! OCRS engine implementation
//!
//! Pure Rust OCR engine using the ocrs library. No system dependencies required.
//! Downloads neural network models automatically on first use.

use super::assets;
use crate::config::Config;
use crate::engine::{OcrEngine, OcrResult};
use crate::error::OcrError;
use crate::preprocessing::EnhancedImage;
use ocrs::{DecodeMethod, ImageSource, OcrEngine as OcrsOcrEngine, OcrEngineParams};
use rten::Model;

/// Default model URLs from the ocrs project
const DETECTION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-detection.rten";
const RECOGNITION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-recognition.rten";

/// The recognition model only covers the Latin alphabet
const LANGUAGE: &str = "eng";

/// OCR Engine wrapping the ocrs library
pub struct OcrsEngine {
    engine: OcrsOcrEngine,
}

impl OcrsEngine {
    /// Load the detection and recognition models, downloading them if needed
    pub fn new(config: &Config) -> Result<Self, OcrError> {
        if config.default_language != LANGUAGE {
            tracing::warn!(
                "ocrs only recognizes '{}', ignoring default language '{}'",
                LANGUAGE,
                config.default_language
            );
        }

        let models = assets::cache_dir().join("ocrs");
        let detection_model = load_model(&models, "text-detection.rten", DETECTION_MODEL_URL)?;
        let recognition_model =
            load_model(&models, "text-recognition.rten", RECOGNITION_MODEL_URL)?;

        let engine = OcrsOcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            decode_method: DecodeMethod::Greedy,
            ..Default::default()
        })
        .map_err(|e| {
            OcrError::InitializationError(format!("Failed to create OCR engine: {}", e))
        })?;

        tracing::info!("ocrs engine initialized successfully");

        Ok(Self { engine })
    }
}

impl OcrEngine for OcrsEngine {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    fn description(&self) -> &'static str {
        "Pure Rust OCR engine - fast, no system dependencies required"
    }

    fn recognize(&self, image: &EnhancedImage, language: &str) -> Result<OcrResult, OcrError> {
        let mut warnings = Vec::new();
        if language != LANGUAGE {
            warnings.push(format!(
                "ocrs does not support language '{}', recognized as '{}'",
                language, LANGUAGE
            ));
        }

        // ImageSource::from_bytes expects packed RGB in HWC order
        let rgb_img = image.decode()?.into_rgb8();
        let dimensions = rgb_img.dimensions();
        let img_source = ImageSource::from_bytes(rgb_img.as_raw(), dimensions).map_err(|e| {
            OcrError::ProcessingError(format!("Failed to create image source: {}", e))
        })?;

        let ocr_input = self
            .engine
            .prepare_input(img_source)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to prepare input: {}", e)))?;

        tracing::debug!("ocrs: detecting words");
        let word_rects = self
            .engine
            .detect_words(&ocr_input)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to detect words: {}", e)))?;

        let line_rects = self.engine.find_text_lines(&ocr_input, &word_rects);
        tracing::debug!(
            "ocrs: recognizing {} lines from {} words",
            line_rects.len(),
            word_rects.len()
        );

        let line_texts = self
            .engine
            .recognize_text(&ocr_input, &line_rects)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to recognize text: {}", e)))?;

        let text = line_texts
            .iter()
            .filter_map(|line| line.as_ref())
            .map(|line| {
                line.words()
                    .map(|word| word.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n");

        let confidence = estimate_confidence(&text);

        Ok(OcrResult {
            text,
            confidence,
            warnings,
        })
    }

    fn supported_languages(&self) -> Vec<String> {
        vec![LANGUAGE.to_string()]
    }
}

fn load_model(dir: &std::path::Path, filename: &str, url: &str) -> Result<Model, OcrError> {
    let path = assets::ensure_downloaded(dir, filename, url)?;
    Model::load_file(&path).map_err(|e| {
        OcrError::InitializationError(format!("Failed to load {}: {}", filename, e))
    })
}

/// Estimate confidence from the shape of the recognized text
///
/// ocrs reports no per-character scores. Garbled output tends to be heavy on
/// symbols, made of one-letter "words", or full of long character runs.
fn estimate_confidence(text: &str) -> f32 {
    let chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return 0.0;
    }
    if chars.len() < 5 {
        return 0.5;
    }

    let plausible = chars
        .iter()
        .filter(|c| c.is_alphanumeric() || c.is_ascii_punctuation())
        .count();
    let symbol_score = plausible as f32 / chars.len() as f32;

    let words: Vec<&str> = text.split_whitespace().collect();
    let single = words.iter().filter(|w| w.chars().count() == 1).count();
    let word_score = 1.0 - (single as f32 / words.len() as f32).min(0.6);

    let run_score = match longest_run(&chars) {
        0..=3 => 1.0,
        4..=5 => 0.8,
        6..=10 => 0.5,
        _ => 0.2,
    };

    // Symbol noise dominates: a line of glyph soup is wrong however it is spaced
    (symbol_score * (0.6 * word_score + 0.4 * run_score)).clamp(0.0, 1.0)
}

fn longest_run(chars: &[char]) -> usize {
    chars
        .chunk_by(|a, b| a == b)
        .map(|run| run.len())
        .max()
        .unwrap_or(0)
}
