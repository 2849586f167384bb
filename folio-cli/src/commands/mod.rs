//! CLI command implementations

mod catalog;
mod display;
mod read;
mod script;

pub use catalog::catalog;
pub use read::{read, ReadOptions};
pub use script::script;

use anyhow::{Context, Result};
use folio_core::{
    Catalog, FolioError, MockSource, NullRenderer, ReaderSession, SessionConfig, WorkKind, WorkRef,
};
use std::path::Path;
use std::sync::Arc;

/// Load the session config (defaults when no file is given), then apply
/// environment overrides
pub fn load_config(path: Option<&str>) -> Result<SessionConfig> {
    let config = match path {
        Some(path) => SessionConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config file: {}", path))?,
        None => SessionConfig::default(),
    };
    config
        .with_env_overrides()
        .context("Invalid environment override")
}

fn parse_kind(kind: &str) -> Result<WorkKind> {
    kind.parse().map_err(anyhow::Error::msg)
}

/// Open a headless session over a catalog work, served by the mock source
fn open_session(catalog: &Catalog, work: WorkRef, config: SessionConfig) -> Result<ReaderSession> {
    if catalog.find(&work).is_none() {
        return Err(FolioError::UnknownWork(format!("{} '{}'", work.kind, work.work_id)).into());
    }

    let mut source = MockSource::new(catalog.clone());
    if let Some(latency) = config.latency() {
        source = source.with_latency(latency);
    }
    tracing::debug!(work = %work.work_id, latency = ?config.latency(), "opening session");

    Ok(ReaderSession::open(
        work,
        Arc::new(source),
        Arc::new(NullRenderer),
        config,
    ))
}
