//! Session configuration

use crate::error::{FolioError, Result};
use crate::types::{MangaSettings, NovelSettings, ReaderSettings, WorkKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the mock source latency (milliseconds)
pub const LATENCY_ENV: &str = "FOLIO_LATENCY_MS";

/// Tunables for a reader session, loadable from JSON.
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Initial manga reader settings
    pub manga: MangaSettings,

    /// Initial novel reader settings
    pub novel: NovelSettings,

    /// Scroll extent in pixels used when the renderer doesn't report one
    pub scroll_extent_px: f64,

    /// Simulated fetch latency for the mock source; `None` keeps the
    /// source's own defaults
    pub latency_ms: Option<u64>,

    /// Capacity of the session event channel
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            manga: MangaSettings::default(),
            novel: NovelSettings::default(),
            scroll_extent_px: 4000.0,
            latency_ms: None,
            event_capacity: 64,
        }
    }
}

impl SessionConfig {
    /// Load a config file. Setting values are clamped into range; structural
    /// problems are reported as [`FolioError::Config`].
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: SessionConfig = serde_json::from_str(&data)
            .map_err(|e| FolioError::Config(format!("{}: {}", path.display(), e)))?;
        config.validated()
    }

    /// Apply overrides from the environment
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(value) = std::env::var(LATENCY_ENV) {
            let ms = value.trim().parse::<u64>().map_err(|_| {
                FolioError::Config(format!("{} must be milliseconds, got '{}'", LATENCY_ENV, value))
            })?;
            self.latency_ms = Some(ms);
        }
        Ok(self)
    }

    fn validated(mut self) -> Result<Self> {
        if !(self.scroll_extent_px.is_finite() && self.scroll_extent_px > 0.0) {
            return Err(FolioError::Config(format!(
                "scroll_extent_px must be positive, got {}",
                self.scroll_extent_px
            )));
        }
        if self.event_capacity == 0 {
            return Err(FolioError::Config(
                "event_capacity must be at least 1".to_string(),
            ));
        }
        self.manga = self.manga.normalized();
        self.novel = self.novel.normalized();
        Ok(self)
    }

    /// Starting settings for a session over a work of `kind`
    pub fn settings_for(&self, kind: WorkKind) -> ReaderSettings {
        match kind {
            WorkKind::Manga => ReaderSettings::Manga(self.manga),
            WorkKind::Novel => ReaderSettings::Novel(self.novel),
        }
        .normalized()
    }

    pub fn latency(&self) -> Option<Duration> {
        self.latency_ms.map(Duration::from_millis)
    }
}
