//! Plain-text export of extraction results

use crate::error::OcrError;
use std::io::Write;
use std::path::PathBuf;

/// Suggested file name for exported text
pub const EXPORT_FILE_NAME: &str = "extractedText.txt";
pub const EXPORT_CONTENT_TYPE: &str = "text/plain";

/// A downloadable file built in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl TextArtifact {
    /// Build the artifact for a piece of recognized text, verbatim
    pub fn from_text(text: &str) -> Self {
        Self {
            file_name: EXPORT_FILE_NAME.to_string(),
            content_type: EXPORT_CONTENT_TYPE,
            bytes: text.as_bytes().to_vec(),
        }
    }
}

/// Host capability that delivers an artifact to the user
pub trait ArtifactSink: Send + Sync {
    /// Deliver the artifact, returning where it ended up
    fn emit(&self, artifact: &TextArtifact) -> Result<PathBuf, OcrError>;
}

/// Writes artifacts into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactSink for DirectorySink {
    fn emit(&self, artifact: &TextArtifact) -> Result<PathBuf, OcrError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            OcrError::ExportError(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        // Stage in a temp file next to the target so a partial write never replaces it
        let mut staged = tempfile::Builder::new()
            .prefix(".export")
            .suffix(".txt")
            .tempfile_in(&self.dir)
            .map_err(|e| OcrError::ExportError(format!("Failed to create temp file: {}", e)))?;

        staged
            .write_all(&artifact.bytes)
            .map_err(|e| OcrError::ExportError(format!("Failed to write temp file: {}", e)))?;

        let target = self.dir.join(&artifact.file_name);
        staged.persist(&target).map_err(|e| {
            OcrError::ExportError(format!("Failed to save {}: {}", target.display(), e))
        })?;

        tracing::info!(
            "Exported {} bytes of {} to {}",
            artifact.bytes.len(),
            artifact.content_type,
            target.display()
        );

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_is_verbatim_text() {
        let artifact = TextArtifact::from_text("hello world");
        assert_eq!(artifact.file_name, "extractedText.txt");
        assert_eq!(artifact.content_type, "text/plain");
        assert_eq!(artifact.bytes, b"hello world");
    }

    #[test]
    fn test_artifact_keeps_whitespace_and_unicode() {
        let text = "  ligne 1\n\tligne 2 — é\n";
        let artifact = TextArtifact::from_text(text);
        assert_eq!(String::from_utf8(artifact.bytes).unwrap(), text);
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("out"));

        let path = sink.emit(&TextArtifact::from_text("hello world")).unwrap();

        assert_eq!(path, dir.path().join("out").join("extractedText.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello world");
    }

    #[test]
    fn test_directory_sink_overwrites_previous_export() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());

        sink.emit(&TextArtifact::from_text("first")).unwrap();
        let path = sink.emit(&TextArtifact::from_text("second")).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
