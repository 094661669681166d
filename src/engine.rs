use crate::error::OcrError;
use crate::preprocessing::EnhancedImage;

/// OCR processing result
#[derive(Debug, Clone, Default)]
pub struct OcrResult {
    pub text: String,
    pub confidence: f32,
    pub warnings: Vec<String>,
}

/// Trait that all OCR engines must implement
///
/// Engines are blocking; callers run them on tokio's blocking pool.
pub trait OcrEngine: Send + Sync {
    /// Returns the engine identifier (e.g., "ocrs", "leptess")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Recognize the text in an enhanced image using the given language hint
    fn recognize(&self, image: &EnhancedImage, language: &str) -> Result<OcrResult, OcrError>;

    /// Get supported languages
    fn supported_languages(&self) -> Vec<String>;
}
