//! Session state and its transitions
//!
//! `SessionState` is an immutable snapshot; every change goes through
//! [`reduce`], a pure function from (state, event) to the next state.

use crate::selection::SelectedImage;
use std::sync::Arc;

/// Snapshot of the extractor's UI state
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Currently selected image, if any
    pub image: Option<Arc<SelectedImage>>,
    /// Bumped on every selection, used to drop results for replaced images
    pub generation: u64,
    /// Recognized text; empty when there is no result
    pub text: String,
    /// True while an extraction is in flight
    pub loading: bool,
}

/// State transitions
#[derive(Debug, Clone)]
pub enum Event {
    ImageSelected(Arc<SelectedImage>),
    ExtractionStarted,
    ExtractionFinished { generation: u64, text: String },
    ExtractionFailed,
}

/// What the display shows for a given state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionView<'a> {
    Idle,
    Loading,
    Result(&'a str),
}

impl SessionState {
    /// An extraction can start when an image is selected and none is running
    pub fn can_extract(&self) -> bool {
        self.image.is_some() && !self.loading
    }

    pub fn view(&self) -> SessionView<'_> {
        if self.loading {
            SessionView::Loading
        } else if self.text.is_empty() {
            SessionView::Idle
        } else {
            SessionView::Result(&self.text)
        }
    }
}

/// Compute the next state
pub fn reduce(state: &SessionState, event: Event) -> SessionState {
    match event {
        Event::ImageSelected(image) => SessionState {
            image: Some(image),
            generation: state.generation.wrapping_add(1),
            text: String::new(),
            loading: state.loading,
        },
        Event::ExtractionStarted => {
            if !state.can_extract() {
                return state.clone();
            }
            SessionState {
                loading: true,
                ..state.clone()
            }
        }
        Event::ExtractionFinished { generation, text } => {
            // A newer selection already cleared the text; keep it that way
            let text = if generation == state.generation {
                text
            } else {
                state.text.clone()
            };
            SessionState {
                text,
                loading: false,
                ..state.clone()
            }
        }
        Event::ExtractionFailed => SessionState {
            loading: false,
            ..state.clone()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageFormat};
    use std::io::Cursor;

    fn image() -> Arc<SelectedImage> {
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(GrayImage::new(4, 4))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        Arc::new(SelectedImage::from_bytes("a.png", bytes, usize::MAX).unwrap())
    }

    fn with_result(text: &str) -> SessionState {
        let state = reduce(&SessionState::default(), Event::ImageSelected(image()));
        let state = reduce(&state, Event::ExtractionStarted);
        reduce(
            &state,
            Event::ExtractionFinished {
                generation: state.generation,
                text: text.to_string(),
            },
        )
    }

    #[test]
    fn test_select_clears_previous_result() {
        let state = with_result("old text");
        assert_eq!(state.view(), SessionView::Result("old text"));

        let next = reduce(&state, Event::ImageSelected(image()));

        assert!(next.text.is_empty());
        assert_eq!(next.view(), SessionView::Idle);
        assert_eq!(next.generation, state.generation + 1);
    }

    #[test]
    fn test_start_without_image_is_noop() {
        let state = SessionState::default();
        let next = reduce(&state, Event::ExtractionStarted);
        assert!(!next.loading);
        assert!(next.image.is_none());
    }

    #[test]
    fn test_start_sets_loading() {
        let state = reduce(&SessionState::default(), Event::ImageSelected(image()));
        let next = reduce(&state, Event::ExtractionStarted);
        assert!(next.loading);
        assert!(!next.can_extract());
        assert_eq!(next.view(), SessionView::Loading);
    }

    #[test]
    fn test_loading_hides_result() {
        let state = with_result("visible");
        let next = reduce(&state, Event::ExtractionStarted);
        assert_eq!(next.text, "visible");
        assert_eq!(next.view(), SessionView::Loading);
    }

    #[test]
    fn test_failure_clears_loading_and_keeps_text() {
        let state = reduce(&SessionState::default(), Event::ImageSelected(image()));
        let state = reduce(&state, Event::ExtractionStarted);

        let next = reduce(&state, Event::ExtractionFailed);

        assert!(!next.loading);
        assert_eq!(next.text, "");
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let state = reduce(&SessionState::default(), Event::ImageSelected(image()));
        let state = reduce(&state, Event::ExtractionStarted);
        let stale_generation = state.generation;
        let state = reduce(&state, Event::ImageSelected(image()));

        let next = reduce(
            &state,
            Event::ExtractionFinished {
                generation: stale_generation,
                text: "for the old image".to_string(),
            },
        );

        assert!(!next.loading);
        assert!(next.text.is_empty());
    }
}
