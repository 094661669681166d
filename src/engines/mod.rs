//! Recognition engine implementations
//!
//! Each backend implements [`OcrEngine`] and is compiled in behind a cargo
//! feature. The registry picks the one the user asked for.

pub mod assets;

#[cfg(feature = "engine-ocrs")]
pub mod ocrs;

#[cfg(feature = "engine-leptess")]
pub mod leptess;

use crate::config::Config;
use crate::engine::OcrEngine;
use crate::error::OcrError;
use serde::Serialize;
use std::sync::Arc;

/// Information about an available engine
#[derive(Debug, Clone, Serialize)]
pub struct EngineInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub supported_languages: Vec<String>,
}

impl EngineInfo {
    fn of(engine: &dyn OcrEngine) -> Self {
        Self {
            name: engine.name(),
            description: engine.description(),
            supported_languages: engine.supported_languages(),
        }
    }
}

/// Registry of available OCR engines
pub struct EngineRegistry {
    engines: Vec<Arc<dyn OcrEngine>>,
}

impl EngineRegistry {
    /// Initialize every compiled-in engine
    pub fn new(config: &Config) -> Result<Self, OcrError> {
        #[allow(unused_mut)]
        let mut engines: Vec<Arc<dyn OcrEngine>> = Vec::new();

        #[cfg(feature = "engine-ocrs")]
        {
            tracing::info!("Initializing ocrs engine...");
            engines.push(Arc::new(ocrs::OcrsEngine::new(config)?));
        }

        #[cfg(feature = "engine-leptess")]
        {
            tracing::info!("Initializing leptess engine...");
            engines.push(Arc::new(leptess::LeptessEngine::new(config)?));
        }

        #[cfg(not(any(feature = "engine-ocrs", feature = "engine-leptess")))]
        let _ = config;

        Self::from_engines(engines)
    }

    /// Build a registry from already-constructed engines; the first is the default
    pub fn from_engines(engines: Vec<Arc<dyn OcrEngine>>) -> Result<Self, OcrError> {
        if engines.is_empty() {
            return Err(OcrError::InitializationError(
                "No OCR engines available. Build with --features engine-ocrs or --features engine-leptess".to_string(),
            ));
        }
        Ok(Self { engines })
    }

    /// Get an engine by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn OcrEngine>> {
        self.engines.iter().find(|e| e.name() == name).cloned()
    }

    /// Get the default engine
    pub fn default_engine(&self) -> Arc<dyn OcrEngine> {
        // from_engines guarantees at least one
        self.engines[0].clone()
    }

    /// Resolve the requested engine, falling back to the default when none is named
    pub fn select(&self, name: Option<&str>) -> Result<Arc<dyn OcrEngine>, OcrError> {
        match name {
            Some(name) => self
                .get(name)
                .ok_or_else(|| OcrError::UnknownEngine(format!("{} (available: {})", name, self.list().join(", ")))),
            None => Ok(self.default_engine()),
        }
    }

    /// List all available engine names
    pub fn list(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    /// Get info about all available engines
    pub fn info(&self) -> Vec<EngineInfo> {
        self.engines.iter().map(|e| EngineInfo::of(e.as_ref())).collect()
    }
}
