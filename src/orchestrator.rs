//! Image-to-text orchestration
//!
//! Ties selection, enhancement, recognition and export together. State lives
//! in a `watch` channel so a display can follow every transition.

use crate::engine::OcrEngine;
use crate::error::OcrError;
use crate::export::{ArtifactSink, TextArtifact};
use crate::preprocessing::{self, FilterSettings, StepTiming};
use crate::selection::SelectedImage;
use crate::session::{reduce, Event, SessionState};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::watch;

/// Outcome of an extraction request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Nothing selected; no engine call made
    NoImage,
    /// Another extraction is in flight; request ignored
    AlreadyRunning,
    /// Text stored in the session
    Completed,
    /// Enhancement or recognition failed; the error was logged
    Failed,
}

/// Details of the last successful extraction
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub source: String,
    pub mime_type: String,
    pub engine: String,
    pub language: String,
    pub text: String,
    pub confidence: f32,
    pub processing_time_ms: u64,
    pub enhancement_steps: Vec<StepTiming>,
    pub warnings: Vec<String>,
}

pub struct Orchestrator {
    engine: Arc<dyn OcrEngine>,
    filter: FilterSettings,
    state: watch::Sender<SessionState>,
    /// Last report, tagged with the selection generation it belongs to
    last_report: Mutex<Option<(u64, ExtractionReport)>>,
}

impl Orchestrator {
    pub fn new(engine: Arc<dyn OcrEngine>, filter: FilterSettings) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            engine,
            filter,
            state,
            last_report: Mutex::new(None),
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Follow state transitions
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Select a new image, clearing any previous result
    ///
    /// An absent image is ignored.
    pub fn select_image(&self, image: Option<SelectedImage>) {
        let Some(image) = image else {
            tracing::debug!("No image selected");
            return;
        };

        tracing::info!(
            "Selected {} ({}, {} bytes)",
            image.name(),
            image.mime_type(),
            image.len()
        );
        self.dispatch(Event::ImageSelected(Arc::new(image)));
        if let Ok(mut last) = self.last_report.lock() {
            *last = None;
        }
    }

    /// Select an image from a load result, treating load failures as "nothing selected"
    pub fn select_loaded(&self, loaded: Result<SelectedImage, OcrError>) {
        match loaded {
            Ok(image) => self.select_image(Some(image)),
            Err(e) => tracing::warn!(code = e.code(), "Ignoring selection: {}", e),
        }
    }

    /// Enhance the selected image and run recognition on it
    ///
    /// Never returns an error: failures are logged and leave the session
    /// without a result and not loading.
    pub async fn extract_text(&self, language: &str) -> ExtractOutcome {
        let mut job = None;
        let mut already_running = false;
        self.state.send_if_modified(|state| {
            if state.loading {
                already_running = true;
                return false;
            }
            let Some(image) = state.image.clone() else {
                return false;
            };
            job = Some((image, state.generation));
            *state = reduce(state, Event::ExtractionStarted);
            true
        });

        if already_running {
            tracing::warn!("Extraction already in progress, ignoring request");
            return ExtractOutcome::AlreadyRunning;
        }
        let Some((image, generation)) = job else {
            tracing::debug!("Extract requested without an image");
            return ExtractOutcome::NoImage;
        };

        match self.run_extraction(image, language).await {
            Ok(report) => {
                tracing::info!(
                    "OCR completed in {}ms with {}, confidence: {:.2}, text length: {}",
                    report.processing_time_ms,
                    report.engine,
                    report.confidence,
                    report.text.len()
                );
                self.dispatch(Event::ExtractionFinished {
                    generation,
                    text: report.text.clone(),
                });
                if let Ok(mut last) = self.last_report.lock() {
                    *last = Some((generation, report));
                }
                ExtractOutcome::Completed
            }
            Err(e) => {
                tracing::error!(code = e.code(), "Text extraction failed: {}", e);
                self.dispatch(Event::ExtractionFailed);
                ExtractOutcome::Failed
            }
        }
    }

    /// Export the current result through the host sink
    ///
    /// Returns `Ok(None)` when there is no text to export.
    pub fn export_text(&self, sink: &dyn ArtifactSink) -> Result<Option<PathBuf>, OcrError> {
        let state = self.state();
        if state.loading || state.text.is_empty() {
            tracing::debug!("Nothing to export");
            return Ok(None);
        }

        let artifact = TextArtifact::from_text(&state.text);
        sink.emit(&artifact).map(Some)
    }

    /// Report for the last successful extraction of the current selection
    pub fn last_report(&self) -> Option<ExtractionReport> {
        let generation = self.state.borrow().generation;
        let last = self.last_report.lock().ok()?;
        match last.as_ref() {
            Some((tag, report)) if *tag == generation => Some(report.clone()),
            _ => None,
        }
    }

    fn dispatch(&self, event: Event) {
        self.state.send_modify(|state| *state = reduce(state, event));
    }

    async fn run_extraction(
        &self,
        image: Arc<SelectedImage>,
        language: &str,
    ) -> Result<ExtractionReport, OcrError> {
        let start = Instant::now();

        let enhanced = preprocessing::enhance(image.clone(), self.filter).await?;

        let engine = self.engine.clone();
        let lang = language.to_string();
        let enhancement_steps = enhanced.steps.clone();
        tracing::info!(
            "Recognizing {}x{} image with {} ({})",
            enhanced.width,
            enhanced.height,
            engine.name(),
            lang
        );
        let result = tokio::task::spawn_blocking(move || engine.recognize(&enhanced, &lang))
            .await
            .map_err(|e| OcrError::Internal(format!("Recognition task failed: {}", e)))??;

        for warning in &result.warnings {
            tracing::warn!("{}", warning);
        }

        Ok(ExtractionReport {
            source: image.name().to_string(),
            mime_type: image.mime_type().to_string(),
            engine: self.engine.name().to_string(),
            language: language.to_string(),
            text: result.text,
            confidence: result.confidence,
            processing_time_ms: start.elapsed().as_millis() as u64,
            enhancement_steps,
            warnings: result.warnings,
        })
    }
}
