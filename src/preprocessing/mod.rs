//! Image enhancement ahead of OCR
//!
//! Applies a fixed contrast/brightness filter to the selected image and
//! re-encodes it losslessly for the recognition engine.

pub mod pipeline;
pub mod steps;

pub use pipeline::{EnhancedImage, FilterSettings, Pipeline, StepTiming};

use crate::error::OcrError;
use crate::selection::SelectedImage;
use std::sync::Arc;

/// Enhance an image on the blocking pool
///
/// Each call decodes onto its own surface, so concurrent calls never share pixels.
pub async fn enhance(
    source: Arc<SelectedImage>,
    settings: FilterSettings,
) -> Result<EnhancedImage, OcrError> {
    tokio::task::spawn_blocking(move || Pipeline::new(settings).enhance(&source))
        .await
        .map_err(|e| OcrError::Internal(format!("Enhancement task failed: {}", e)))?
}
