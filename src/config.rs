use std::path::PathBuf;

use crate::preprocessing::FilterSettings;

/// Default OCR language, matching Tesseract's language codes
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Default maximum image size (50MB)
pub const DEFAULT_MAX_FILE_SIZE: usize = 52_428_800;

/// Extractor configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub default_language: String,
    /// Engine to use; `None` selects the first compiled-in engine
    pub engine: Option<String>,
    pub max_file_size: usize,
    /// Tesseract data directory; downloaded into the cache dir when unset
    pub tessdata_path: Option<String>,
    pub filter: FilterSettings,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            engine: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            tessdata_path: None,
            filter: FilterSettings::default(),
            output_dir: PathBuf::from("."),
        }
    }
}
