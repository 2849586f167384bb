//! Renderer that records what it was asked to do

use super::{Frame, Renderer};
use crate::error::FetchError;
use crate::types::ChapterRef;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One call made on a [`RecordingRenderer`]
#[derive(Debug, Clone)]
pub enum RenderEvent {
    Loading(ChapterRef),
    Presented(Frame),
    ScrolledTo(f64),
    Failed(ChapterRef, FetchError),
}

/// In-memory renderer (for testing and headless front ends)
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<RenderEvent>>,
    extent: Option<f64>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a fixed scroll extent in pixels
    pub fn with_extent(mut self, extent: f64) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.lock().clone()
    }

    /// The most recently presented frame
    pub fn last_frame(&self) -> Option<Frame> {
        self.lock().iter().rev().find_map(|e| match e {
            RenderEvent::Presented(frame) => Some(frame.clone()),
            _ => None,
        })
    }

    /// The most recent scroll command
    pub fn last_scroll(&self) -> Option<f64> {
        self.lock().iter().rev().find_map(|e| match e {
            RenderEvent::ScrolledTo(percent) => Some(*percent),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RenderEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, event: RenderEvent) {
        self.lock().push(event);
    }
}

impl Renderer for RecordingRenderer {
    fn present(&self, frame: &Frame) {
        self.push(RenderEvent::Presented(frame.clone()));
    }

    fn scroll_to(&self, percent: f64) {
        self.push(RenderEvent::ScrolledTo(percent));
    }

    fn scroll_extent(&self) -> Option<f64> {
        self.extent
    }

    fn show_loading(&self, chapter: &ChapterRef) {
        self.push(RenderEvent::Loading(chapter.clone()));
    }

    fn show_error(&self, chapter: &ChapterRef, error: &FetchError) {
        self.push(RenderEvent::Failed(chapter.clone(), error.clone()));
    }
}
