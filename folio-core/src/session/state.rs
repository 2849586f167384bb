//! Session state, events and snapshots

use super::ambient::AmbientPlayer;
use crate::error::FetchError;
use crate::types::{ChapterRef, ContentUnit, ReaderSettings, WorkRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Lifecycle of the open chapter.
///
/// `Idle → Loading → {Ready, Error}`; any chapter request from `Ready` or
/// `Error` goes back to `Loading`.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Idle,

    /// Waiting on the content source for the request tagged `token`
    Loading { chapter: ChapterRef, token: u64 },

    Ready {
        chapter: ChapterRef,
        content: Arc<ContentUnit>,

        /// Pages or paragraphs, counted once when the chapter commits
        units: usize,
    },

    /// The last request failed; the cause is kept for display
    Error { chapter: ChapterRef, error: FetchError },
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        match self {
            SessionState::Idle => Phase::Idle,
            SessionState::Loading { .. } => Phase::Loading,
            SessionState::Ready { .. } => Phase::Ready,
            SessionState::Error { .. } => Phase::Error,
        }
    }

    /// The chapter this state refers to
    pub fn chapter(&self) -> Option<&ChapterRef> {
        match self {
            SessionState::Idle => None,
            SessionState::Loading { chapter, .. }
            | SessionState::Ready { chapter, .. }
            | SessionState::Error { chapter, .. } => Some(chapter),
        }
    }

    pub fn content(&self) -> Option<&Arc<ContentUnit>> {
        match self {
            SessionState::Ready { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            SessionState::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Pages or paragraphs in the ready chapter
    pub fn units(&self) -> Option<usize> {
        match self {
            SessionState::Ready { units, .. } => Some(*units),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready { .. })
    }

    /// Whether `token` identifies the request currently in flight
    pub(crate) fn is_current_request(&self, token: u64) -> bool {
        matches!(self, SessionState::Loading { token: t, .. } if *t == token)
    }
}

/// Discriminant of [`SessionState`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Sleep timer lengths offered by the reader
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(into = "u32", try_from = "u32")]
pub enum SleepDuration {
    Fifteen,
    Thirty,
    Sixty,
}

impl SleepDuration {
    pub fn minutes(self) -> u32 {
        match self {
            SleepDuration::Fifteen => 15,
            SleepDuration::Thirty => 30,
            SleepDuration::Sixty => 60,
        }
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        match minutes {
            15 => Some(SleepDuration::Fifteen),
            30 => Some(SleepDuration::Thirty),
            60 => Some(SleepDuration::Sixty),
            _ => None,
        }
    }
}

impl From<SleepDuration> for u32 {
    fn from(duration: SleepDuration) -> Self {
        duration.minutes()
    }
}

impl TryFrom<u32> for SleepDuration {
    type Error = String;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        SleepDuration::from_minutes(minutes)
            .ok_or_else(|| format!("sleep timer must be 15, 30 or 60 minutes, got {}", minutes))
    }
}

impl FromStr for SleepDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let minutes = s
            .trim()
            .trim_end_matches('m')
            .parse::<u32>()
            .map_err(|_| format!("'{}' is not a number of minutes", s))?;
        SleepDuration::try_from(minutes)
    }
}

impl fmt::Display for SleepDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.minutes())
    }
}

/// Why auto-scroll stopped on its own
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Progress hit 100%
    ReachedEnd,

    /// The sleep timer elapsed
    SleepTimer,

    /// A different chapter was requested
    ChapterChanged,
}

/// Notifications broadcast by a session
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    ChapterLoading { chapter: ChapterRef },
    ChapterReady { chapter: ChapterRef, units: usize },
    ChapterFailed { chapter: ChapterRef, error: FetchError },

    /// A load finished after a newer request replaced it and was dropped
    StaleResultDiscarded { chapter: ChapterRef },

    ProgressChanged { percent: f64 },
    SettingsChanged { settings: ReaderSettings },
    AutoScrollChanged { speed: u8 },
    AutoScrollStopped { reason: StopReason },
    SleepTimerChanged { minutes_remaining: Option<u32> },
    SleepTimerElapsed,
    PlaybackChanged { playing: bool, track: usize },
    Closed,
}

/// Point-in-time view of a session, for display and diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub opened_at: DateTime<Utc>,
    pub work: WorkRef,
    pub phase: Phase,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<ChapterRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FetchError>,

    /// Pages or paragraphs in the open chapter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<usize>,

    pub progress: f64,
    pub settings: ReaderSettings,
    pub auto_scroll_speed: u8,
    pub sleep_timer: Option<SleepDuration>,
    pub sleep_minutes_remaining: Option<u32>,
    pub player: AmbientPlayer,
    pub closed: bool,
}
