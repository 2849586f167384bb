//! Folio Core Library
//!
//! This crate provides the reader session engine behind the Folio manga and
//! novel readers. A [`ReaderSession`] drives one open reader view: it loads
//! chapters from a [`ContentSource`], tracks reading progress, owns the
//! auto-scroll and sleep timers, and hands frames to a [`Renderer`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod gesture;
pub mod render;
pub mod session;
pub mod source;
pub mod types;

pub use catalog::{Catalog, WorkEntry, WorkStatus};
pub use config::SessionConfig;
pub use error::{FetchError, FolioError, Result};
pub use render::{Frame, NullRenderer, RecordingRenderer, Renderer};
pub use session::{
    Phase, ReaderSession, SessionEvent, SessionSnapshot, SessionState, SleepDuration, StopReason,
};
pub use source::{ContentSource, MockSource};
pub use types::{
    ChapterRef, ContentUnit, Direction, PageRef, ReaderSettings, SettingsPatch, WorkKind, WorkRef,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_from_work() {
        let work = WorkRef::manga("m1");
        let chapter = work.chapter(3);
        assert_eq!(chapter.work_id, "m1");
        assert_eq!(chapter.chapter_number, 3);
    }
}
