//! Work and chapter identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which reader surface a work is shown in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkKind {
    /// Image pages
    Manga,

    /// Formatted text
    Novel,
}

impl fmt::Display for WorkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkKind::Manga => f.pad("manga"),
            WorkKind::Novel => f.pad("novel"),
        }
    }
}

impl FromStr for WorkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manga" => Ok(WorkKind::Manga),
            "novel" => Ok(WorkKind::Novel),
            other => Err(format!("'{}' is not a work kind (manga, novel)", other)),
        }
    }
}

/// Identifies a content item; fixed for the lifetime of a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WorkRef {
    pub work_id: String,
    pub kind: WorkKind,
}

impl WorkRef {
    pub fn new(work_id: impl Into<String>, kind: WorkKind) -> Self {
        Self {
            work_id: work_id.into(),
            kind,
        }
    }

    pub fn manga(work_id: impl Into<String>) -> Self {
        Self::new(work_id, WorkKind::Manga)
    }

    pub fn novel(work_id: impl Into<String>) -> Self {
        Self::new(work_id, WorkKind::Novel)
    }

    /// Reference to one of this work's chapters
    pub fn chapter(&self, chapter_number: u32) -> ChapterRef {
        ChapterRef::new(self.work_id.clone(), chapter_number)
    }
}

/// A chapter of a work. Chapter numbers start at 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChapterRef {
    pub work_id: String,
    pub chapter_number: u32,
}

impl ChapterRef {
    /// Create a chapter reference; chapter 0 is normalized to 1
    pub fn new(work_id: impl Into<String>, chapter_number: u32) -> Self {
        Self {
            work_id: work_id.into(),
            chapter_number: chapter_number.max(1),
        }
    }

    /// The neighbouring chapter in `direction`.
    ///
    /// `Previous` stops at chapter 1. `Next` is unbounded; whether the
    /// chapter exists is up to the content source.
    pub fn step(&self, direction: Direction) -> ChapterRef {
        let chapter_number = match direction {
            Direction::Next => self.chapter_number.saturating_add(1),
            Direction::Previous => self.chapter_number.saturating_sub(1).max(1),
        };
        ChapterRef {
            work_id: self.work_id.clone(),
            chapter_number,
        }
    }

    pub fn is_first(&self) -> bool {
        self.chapter_number <= 1
    }
}

impl fmt::Display for ChapterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.work_id, self.chapter_number)
    }
}

/// Chapter navigation direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Next,
    Previous,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_zero_normalized() {
        assert_eq!(ChapterRef::new("m1", 0).chapter_number, 1);
    }

    #[test]
    fn test_step_previous_floor() {
        let first = ChapterRef::new("m1", 1);
        assert_eq!(first.step(Direction::Previous), first);
        assert_eq!(ChapterRef::new("m1", 7).step(Direction::Previous).chapter_number, 6);
    }

    #[test]
    fn test_step_next_unbounded() {
        let last = ChapterRef::new("m1", 189);
        assert_eq!(last.step(Direction::Next).chapter_number, 190);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("MANGA".parse::<WorkKind>().unwrap(), WorkKind::Manga);
        assert_eq!("novel".parse::<WorkKind>().unwrap(), WorkKind::Novel);
        assert!("comic".parse::<WorkKind>().is_err());
    }
}
