use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Failed to initialize OCR engine: {0}")]
    InitializationError(String),

    #[error("Failed to process image: {0}")]
    ProcessingError(String),

    #[error("Preprocessing failed: {0}")]
    PreprocessingError(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Unknown OCR engine: {0}")]
    UnknownEngine(String),

    #[error("Failed to export text: {0}")]
    ExportError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl OcrError {
    /// Stable machine-readable code, attached to log events as the `code` field
    pub fn code(&self) -> &'static str {
        match self {
            OcrError::InitializationError(_) => "INIT_ERROR",
            OcrError::ProcessingError(_) => "PROCESSING_ERROR",
            OcrError::PreprocessingError(_) => "PREPROCESSING_ERROR",
            OcrError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            OcrError::ImageTooLarge { .. } => "IMAGE_TOO_LARGE",
            OcrError::UnknownEngine(_) => "UNKNOWN_ENGINE",
            OcrError::ExportError(_) => "EXPORT_ERROR",
            OcrError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_too_large_message() {
        let err = OcrError::ImageTooLarge { size: 20, max: 10 };
        assert_eq!(err.to_string(), "Image too large: 20 bytes (max: 10 bytes)");
        assert_eq!(err.code(), "IMAGE_TOO_LARGE");
    }
}
