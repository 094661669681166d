//! On-demand download of engine data files (models, traineddata)

use crate::error::OcrError;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Cache directory shared by all engines
pub fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("image-text-extractor")
}

/// Return `dir/filename`, downloading it from `url` first if missing
pub fn ensure_downloaded(dir: &Path, filename: &str, url: &str) -> Result<PathBuf, OcrError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        OcrError::InitializationError(format!(
            "Failed to create cache directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let path = dir.join(filename);
    if path.exists() {
        tracing::debug!("Using cached {} from {:?}", filename, path);
        return Ok(path);
    }

    tracing::info!("Downloading {} (this may take a moment)...", filename);
    download_file(url, dir, &path)?;
    tracing::info!("Downloaded {} to {:?}", filename, path);

    Ok(path)
}

/// Download into a temp file in `dir`, then move it into place
fn download_file(url: &str, dir: &Path, path: &Path) -> Result<(), OcrError> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| OcrError::InitializationError(format!("Failed to download {}: {}", url, e)))?;

    let buffer = response.into_body().read_to_vec().map_err(|e| {
        OcrError::InitializationError(format!("Failed to read response body: {}", e))
    })?;

    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        OcrError::InitializationError(format!("Failed to create download file: {}", e))
    })?;
    staged.write_all(&buffer).map_err(|e| {
        OcrError::InitializationError(format!("Failed to write download file: {}", e))
    })?;
    staged.persist(path).map_err(|e| {
        OcrError::InitializationError(format!("Failed to save {}: {}", path.display(), e))
    })?;

    Ok(())
}
