//! Read command implementation

use super::display::{print_frame, print_snapshot};
use super::{open_session, parse_kind};
use anyhow::{Context, Result};
use clap::Args;
use folio_core::{
    Catalog, Frame, ReaderSession, SessionConfig, SessionEvent, SessionSnapshot, SettingsPatch,
    WorkRef,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

/// Reader settings and output options for `read`
#[derive(Args, Debug, Default)]
pub struct ReadOptions {
    /// Manga image quality (low, medium, high)
    #[arg(long)]
    pub quality: Option<String>,

    /// Manga zoom in percent (50-200)
    #[arg(long)]
    pub zoom: Option<i64>,

    /// Manga layout (single, double)
    #[arg(long)]
    pub layout: Option<String>,

    /// Novel font size in pixels (14-30)
    #[arg(long)]
    pub font_size: Option<i64>,

    /// Novel line height (1.0-3.0)
    #[arg(long)]
    pub line_height: Option<f64>,

    /// Novel font family (serif, sans, mono)
    #[arg(long)]
    pub font: Option<String>,

    /// Novel theme (light, dark, sepia, midnight)
    #[arg(long)]
    pub theme: Option<String>,

    /// Auto-scroll speed (1-10); follows the chapter until scrolling stops
    #[arg(long)]
    pub auto_scroll: Option<i64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ReadOptions {
    fn patch(&self) -> Result<SettingsPatch> {
        let fields = [
            ("quality", self.quality.clone()),
            ("zoom", self.zoom.map(|v| v.to_string())),
            ("layout", self.layout.clone()),
            ("font_size", self.font_size.map(|v| v.to_string())),
            ("line_height", self.line_height.map(|v| v.to_string())),
            ("font_family", self.font.clone()),
            ("theme", self.theme.clone()),
        ];

        let mut patch = SettingsPatch::new();
        for (key, value) in fields {
            if let Some(value) = value {
                patch
                    .set_field(key, &value)
                    .map_err(anyhow::Error::msg)
                    .with_context(|| format!("Invalid --{}", key.replace('_', "-")))?;
            }
        }
        Ok(patch)
    }
}

/// JSON output of `read`
#[derive(Serialize)]
struct ReadOutput {
    frame: Option<Frame>,
    snapshot: SessionSnapshot,
}

/// Open a chapter of a catalog work and print it
pub async fn read(
    kind: &str,
    work_id: &str,
    chapter: u32,
    options: &ReadOptions,
    config: SessionConfig,
) -> Result<()> {
    let work = WorkRef::new(work_id, parse_kind(kind)?);
    let catalog = Catalog::builtin();
    let title = catalog
        .find(&work)
        .map(|entry| entry.title.clone())
        .unwrap_or_default();
    let session = open_session(&catalog, work, config)?;

    let patch = options.patch()?;
    if !patch.is_empty() {
        session.update_settings(&patch);
    }

    let spinner = if options.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_message(format!("Loading chapter {}...", chapter));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let loaded = session.open_chapter(chapter).await;
    spinner.finish_and_clear();
    loaded.with_context(|| format!("Failed to load chapter {} of {}", chapter, work_id))?;

    if !options.json {
        if let Some(frame) = session.frame() {
            print_frame(&title, &frame);
        }
    }

    if let Some(speed) = options.auto_scroll {
        follow_auto_scroll(&session, speed, options.json).await?;
    }

    if options.json {
        let output = ReadOutput {
            frame: session.frame(),
            snapshot: session.snapshot(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_snapshot(&session.snapshot());
    }

    session.close();
    Ok(())
}

/// Start auto-scroll and show its progress until it stops on its own
async fn follow_auto_scroll(session: &ReaderSession, speed: i64, quiet: bool) -> Result<()> {
    let mut events = session.subscribe();
    session.set_auto_scroll(speed);
    if session.auto_scroll_speed() == 0 {
        return Ok(());
    }

    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(100)
    };
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}% {msg}")?
            .progress_chars("##-"),
    );
    bar.set_message(format!("auto-scroll speed {}", session.auto_scroll_speed()));

    loop {
        match events.recv().await {
            Ok(SessionEvent::ProgressChanged { percent }) => bar.set_position(percent as u64),
            Ok(SessionEvent::AutoScrollStopped { reason }) => {
                tracing::debug!(?reason, "auto-scroll stopped");
                bar.finish_with_message("done");
                break;
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "progress bar fell behind");
                bar.set_position(session.progress() as u64);
            }
            Err(RecvError::Closed) => break,
        }
    }

    Ok(())
}
