//! Renderer boundary
//!
//! The session never paints anything itself. It hands [`Frame`]s and scroll
//! commands to a [`Renderer`], and the renderer reports passive scroll
//! movement back through
//! [`ReaderSession::update_progress`](crate::session::ReaderSession::update_progress).

mod recording;
pub mod style;

pub use recording::{RecordingRenderer, RenderEvent};

use crate::error::FetchError;
use crate::types::{ChapterRef, ContentUnit, ReaderSettings};
use serde::Serialize;
use std::sync::Arc;

/// Everything needed to paint the open chapter
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub chapter: ChapterRef,
    pub content: Arc<ContentUnit>,
    pub settings: ReaderSettings,

    /// Scroll position as a percentage of the content extent
    pub progress: f64,
}

/// Consumer of session output.
///
/// Calls are made from the session's thread of control and never while the
/// session holds its own lock, so a renderer may call back into the session.
pub trait Renderer: Send + Sync {
    /// Paint (or repaint) a chapter under the given settings
    fn present(&self, frame: &Frame);

    /// Move the viewport to `percent` of the content extent
    fn scroll_to(&self, percent: f64);

    /// Total scrollable extent in pixels, if known. Auto-scroll advances
    /// one pixel per tick.
    fn scroll_extent(&self) -> Option<f64> {
        None
    }

    /// A chapter started loading
    fn show_loading(&self, _chapter: &ChapterRef) {}

    /// A chapter failed to load
    fn show_error(&self, _chapter: &ChapterRef, _error: &FetchError) {}
}

/// Renderer that discards everything (headless sessions)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn present(&self, _frame: &Frame) {}

    fn scroll_to(&self, _percent: f64) {}
}
