//! Enhance an image and extract its text with a local OCR engine.
//!
//! The flow is one linear pipeline driven by [`Orchestrator`]: select an
//! image, enhance it (contrast then brightness, re-encoded as PNG), run an
//! [`OcrEngine`] on it, and export the text as `extractedText.txt`.

pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod export;
pub mod orchestrator;
pub mod preprocessing;
pub mod selection;
pub mod session;

pub use config::Config;
pub use engine::{OcrEngine, OcrResult};
pub use error::OcrError;
pub use export::{ArtifactSink, DirectorySink, TextArtifact};
pub use orchestrator::{ExtractOutcome, ExtractionReport, Orchestrator};
pub use selection::SelectedImage;
pub use session::{SessionState, SessionView};
