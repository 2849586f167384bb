//! Reader session controller
//!
//! A [`ReaderSession`] owns one open reader view over a single work. It keeps
//! the single source of truth for which chapter is open, how far the reader
//! has got and which display settings apply, and it mediates between user
//! commands, the [`ContentSource`] and the [`Renderer`].
//!
//! All commands take `&self`. Session state lives behind a mutex that is
//! never held across an `.await` or while calling the renderer. Loading is
//! the only operation that suspends. Every load is tagged with a fresh
//! request token and only the response for the current token is committed,
//! so a slow response for an old chapter can never overwrite a newer one.
//!
//! Auto-scroll and the sleep timer run as spawned tasks owned through
//! [`TaskHandle`]s. Closing or dropping the session aborts them.

mod ambient;
mod schedule;
mod state;

pub use ambient::{AmbientPlayer, AmbientTrack, VOLUME_MAX};
pub use schedule::TaskHandle;
pub use state::{Phase, SessionEvent, SessionSnapshot, SessionState, SleepDuration, StopReason};

use crate::config::SessionConfig;
use crate::error::{FolioError, Result};
use crate::render::{style, Frame, Renderer};
use crate::source::{ContentSource, FetchResult};
use crate::types::{
    clamp_auto_scroll, clamp_font_size, ChapterRef, ContentUnit, Direction, ReaderSettings,
    SettingsPatch, WorkRef, FONT_SIZE_STEP,
};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// The sleep timer counts down in whole minutes
pub const SLEEP_TICK: Duration = Duration::from_secs(60);

/// Speed used by the one-tap auto-scroll toggle
pub const QUICK_AUTO_SCROLL_SPEED: u8 = 2;

/// Handle to an open reader session
pub struct ReaderSession {
    shared: Arc<Shared>,
}

struct Shared {
    id: Uuid,
    opened_at: DateTime<Utc>,
    work: WorkRef,
    source: Arc<dyn ContentSource>,
    renderer: Arc<dyn Renderer>,
    config: SessionConfig,
    events: broadcast::Sender<SessionEvent>,
    inner: Mutex<Inner>,
}

struct Inner {
    state: SessionState,
    last_token: u64,
    progress: f64,
    settings: ReaderSettings,
    auto_scroll_speed: u8,
    auto_scroll_task: Option<TaskHandle>,
    auto_scroll_generation: u64,
    sleep_timer: Option<SleepDuration>,
    sleep_remaining: Option<u32>,
    sleep_task: Option<TaskHandle>,
    sleep_generation: u64,
    player: AmbientPlayer,
    closed: bool,
}

impl Inner {
    /// Stop auto-scroll; returns whether it was running
    fn stop_auto_scroll(&mut self) -> bool {
        let was_running = self.auto_scroll_speed > 0;
        self.auto_scroll_task = None;
        self.auto_scroll_generation += 1;
        self.auto_scroll_speed = 0;
        self.settings.set_auto_scroll_speed(0);
        was_running
    }

    fn clear_sleep_timer(&mut self) {
        self.sleep_task = None;
        self.sleep_generation += 1;
        self.sleep_timer = None;
        self.sleep_remaining = None;
    }

    fn playback_event(&self) -> SessionEvent {
        SessionEvent::PlaybackChanged {
            playing: self.player.is_playing(),
            track: self.player.current_index(),
        }
    }
}

impl ReaderSession {
    /// Open a session over `work`. No chapter is loaded yet.
    ///
    /// Initial settings come from `config`. Auto-scroll and the sleep timer
    /// spawn tokio tasks, so those commands need a tokio runtime.
    pub fn open(
        work: WorkRef,
        source: Arc<dyn ContentSource>,
        renderer: Arc<dyn Renderer>,
        config: SessionConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let mut settings = config.settings_for(work.kind);
        // Sessions always start with auto-scroll off
        settings.set_auto_scroll_speed(0);
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, work = %work.work_id, kind = %work.kind, "session opened");

        let inner = Inner {
            state: SessionState::Idle,
            last_token: 0,
            progress: 0.0,
            settings,
            auto_scroll_speed: 0,
            auto_scroll_task: None,
            auto_scroll_generation: 0,
            sleep_timer: None,
            sleep_remaining: None,
            sleep_task: None,
            sleep_generation: 0,
            player: AmbientPlayer::default(),
            closed: false,
        };
        Self {
            shared: Arc::new(Shared {
                id,
                opened_at: Utc::now(),
                work,
                source,
                renderer,
                config,
                events,
                inner: Mutex::new(inner),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn work(&self) -> &WorkRef {
        &self.shared.work
    }

    /// Receive session events from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    // ---------------------------------------------------------------------
    // Chapter lifecycle
    // ---------------------------------------------------------------------

    /// Load a chapter of this session's work.
    ///
    /// The session enters `Loading` immediately. If another chapter is
    /// requested before the source answers, this call's result is discarded
    /// and [`FolioError::Superseded`] is returned. Source failures leave the
    /// session in `Error` and are returned as [`FolioError::Fetch`].
    pub async fn open_chapter(&self, chapter_number: u32) -> Result<Arc<ContentUnit>> {
        let chapter = self.shared.work.chapter(chapter_number);
        let token = self.shared.begin_load(&chapter)?;

        let result = self
            .shared
            .source
            .fetch(&self.shared.work, chapter.chapter_number)
            .await;

        self.shared.finish_load(chapter, token, result)
    }

    /// The chapter `direction` leads to, or `None` when the move is a no-op
    /// (going back from chapter 1). With nothing open, navigation targets
    /// chapter 1.
    pub fn target_chapter(&self, direction: Direction) -> Option<ChapterRef> {
        match self.current_chapter() {
            Some(current) if direction == Direction::Previous && current.is_first() => None,
            Some(current) => Some(current.step(direction)),
            None => Some(self.shared.work.chapter(1)),
        }
    }

    /// Move to the next or previous chapter and load it.
    ///
    /// `Previous` at chapter 1 does nothing and returns chapter 1. `Next` is
    /// never bounded here: a chapter past the end fails with `NotFound` from
    /// the source and leaves the session in `Error`.
    pub async fn advance_chapter(&self, direction: Direction) -> Result<ChapterRef> {
        let Some(target) = self.target_chapter(direction) else {
            tracing::debug!(session = %self.shared.id, "already at the first chapter");
            return Ok(self.shared.work.chapter(1));
        };
        self.open_chapter(target.chapter_number).await?;
        Ok(target)
    }

    /// Load the current chapter again (typically after an error)
    pub async fn retry(&self) -> Result<Arc<ContentUnit>> {
        let chapter_number = self
            .current_chapter()
            .map(|c| c.chapter_number)
            .unwrap_or(1);
        self.open_chapter(chapter_number).await
    }

    /// Close the session: timers are cancelled, playback stops, and every
    /// later command is ignored (loads fail with [`FolioError::Closed`]).
    pub fn close(&self) {
        if self.shared.shutdown() {
            tracing::debug!(session = %self.shared.id, "session closed");
            self.shared.emit(SessionEvent::Closed);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    // ---------------------------------------------------------------------
    // Progress
    // ---------------------------------------------------------------------

    /// Record a passive scroll position reported by the renderer.
    /// Out-of-range input is clamped; NaN counts as 0.
    pub fn update_progress(&self, percent: f64) -> f64 {
        self.shared.set_progress(percent)
    }

    /// Actively move to `percent` (progress scrubber). The renderer is
    /// told to reposition.
    pub fn scrub_to(&self, percent: f64) -> f64 {
        let percent = self.shared.set_progress(percent);
        if !self.is_closed() {
            self.shared.renderer.scroll_to(percent);
        }
        percent
    }

    // ---------------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------------

    /// Merge `patch` into the current settings. Values are clamped, never
    /// rejected. Progress and content are untouched; a ready chapter is
    /// presented again with the new settings.
    pub fn update_settings(&self, patch: &SettingsPatch) -> ReaderSettings {
        if let Some(speed) = patch.auto_scroll_speed {
            self.set_auto_scroll(speed);
        }

        let (settings, frame) = {
            let mut inner = self.shared.lock();
            if inner.closed {
                return inner.settings;
            }
            if !inner.settings.apply(patch) {
                return inner.settings;
            }
            (inner.settings, self.shared.frame(&inner))
        };

        tracing::debug!(session = %self.shared.id, ?patch, "settings updated");
        if let Some(frame) = frame {
            self.shared.renderer.present(&frame);
        }
        self.shared.emit(SessionEvent::SettingsChanged { settings });
        settings
    }

    /// Font size buttons: `Next` is one step larger, `Previous` one step
    /// smaller, clamped to 14..=30. Manga sessions are left unchanged.
    pub fn step_font_size(&self, direction: Direction) -> ReaderSettings {
        let settings = self.settings();
        let Some(novel) = settings.as_novel() else {
            return settings;
        };
        let step = i64::from(FONT_SIZE_STEP);
        let size = match direction {
            Direction::Next => i64::from(novel.font_size) + step,
            Direction::Previous => i64::from(novel.font_size) - step,
        };
        let size = i64::from(clamp_font_size(size));
        self.update_settings(&SettingsPatch::new().with_font_size(size))
    }

    // ---------------------------------------------------------------------
    // Auto-scroll
    // ---------------------------------------------------------------------

    /// Set the auto-scroll speed (clamped to 0..=10). 0 turns it off; any
    /// other speed (re)starts the periodic scroll at that speed.
    pub fn set_auto_scroll(&self, speed: i64) {
        let speed = clamp_auto_scroll(speed);
        {
            let mut inner = self.shared.lock();
            if inner.closed {
                return;
            }
            inner.stop_auto_scroll();
            if let Some(period) = style::auto_scroll_interval(speed) {
                inner.auto_scroll_speed = speed;
                inner.settings.set_auto_scroll_speed(speed);
                let generation = inner.auto_scroll_generation;
                let shared = Arc::downgrade(&self.shared);
                inner.auto_scroll_task = Some(TaskHandle::spawn(
                    "auto-scroll",
                    run_auto_scroll(shared, generation, period),
                ));
            }
        }
        tracing::debug!(session = %self.shared.id, speed, "auto-scroll set");
        self.shared.emit(SessionEvent::AutoScrollChanged { speed });
    }

    /// Floating-button behaviour: off goes to a gentle speed, on goes off
    pub fn toggle_auto_scroll(&self) {
        if self.auto_scroll_speed() > 0 {
            self.set_auto_scroll(0);
        } else {
            self.set_auto_scroll(i64::from(QUICK_AUTO_SCROLL_SPEED));
        }
    }

    // ---------------------------------------------------------------------
    // Sleep timer
    // ---------------------------------------------------------------------

    /// Start, restart or (with `None`) cancel the sleep timer. When it
    /// runs out, auto-scroll and ambient playback stop. The timer carries
    /// over chapter changes.
    pub fn set_sleep_timer(&self, duration: Option<SleepDuration>) {
        let minutes_remaining = {
            let mut inner = self.shared.lock();
            if inner.closed {
                return;
            }
            inner.clear_sleep_timer();
            if let Some(duration) = duration {
                inner.sleep_timer = Some(duration);
                inner.sleep_remaining = Some(duration.minutes());
                let generation = inner.sleep_generation;
                let shared = Arc::downgrade(&self.shared);
                inner.sleep_task = Some(TaskHandle::spawn(
                    "sleep-timer",
                    run_sleep_timer(shared, generation),
                ));
            }
            inner.sleep_remaining
        };
        tracing::debug!(session = %self.shared.id, ?minutes_remaining, "sleep timer set");
        self.shared
            .emit(SessionEvent::SleepTimerChanged { minutes_remaining });
    }

    // ---------------------------------------------------------------------
    // Ambient playback
    // ---------------------------------------------------------------------

    pub fn play(&self) {
        self.shared.with_player(AmbientPlayer::play);
    }

    pub fn pause(&self) {
        self.shared.with_player(|p| {
            p.pause();
        });
    }

    pub fn toggle_playback(&self) {
        self.shared.with_player(AmbientPlayer::toggle);
    }

    pub fn next_track(&self) {
        self.shared.with_player(AmbientPlayer::next_track);
    }

    pub fn previous_track(&self) {
        self.shared.with_player(AmbientPlayer::previous_track);
    }

    /// Set ambient volume, clamped to 0..=100
    pub fn set_volume(&self, volume: i64) {
        self.shared.with_player(|p| p.set_volume(volume));
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn state(&self) -> SessionState {
        self.shared.lock().state.clone()
    }

    pub fn phase(&self) -> Phase {
        self.shared.lock().state.phase()
    }

    pub fn current_chapter(&self) -> Option<ChapterRef> {
        self.shared.lock().state.chapter().cloned()
    }

    pub fn progress(&self) -> f64 {
        self.shared.lock().progress
    }

    pub fn settings(&self) -> ReaderSettings {
        self.shared.lock().settings
    }

    pub fn auto_scroll_speed(&self) -> u8 {
        self.shared.lock().auto_scroll_speed
    }

    pub fn sleep_timer(&self) -> Option<SleepDuration> {
        self.shared.lock().sleep_timer
    }

    pub fn sleep_minutes_remaining(&self) -> Option<u32> {
        self.shared.lock().sleep_remaining
    }

    pub fn player(&self) -> AmbientPlayer {
        self.shared.lock().player.clone()
    }

    /// What the renderer should currently show, if a chapter is ready
    pub fn frame(&self) -> Option<Frame> {
        let inner = self.shared.lock();
        self.shared.frame(&inner)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.shared.lock();
        SessionSnapshot {
            session_id: self.shared.id,
            opened_at: self.shared.opened_at,
            work: self.shared.work.clone(),
            phase: inner.state.phase(),
            chapter: inner.state.chapter().cloned(),
            error: inner.state.error().cloned(),
            units: inner.state.units(),
            progress: inner.progress,
            settings: inner.settings,
            auto_scroll_speed: inner.auto_scroll_speed,
            sleep_timer: inner.sleep_timer,
            sleep_minutes_remaining: inner.sleep_remaining,
            player: inner.player.clone(),
            closed: inner.closed,
        }
    }
}

impl Drop for ReaderSession {
    fn drop(&mut self) {
        self.shared.shutdown();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        // Ignore errors (no subscribers)
        let _ = self.events.send(event);
    }

    fn frame(&self, inner: &Inner) -> Option<Frame> {
        match &inner.state {
            SessionState::Ready {
                chapter, content, ..
            } => Some(Frame {
                chapter: chapter.clone(),
                content: Arc::clone(content),
                settings: inner.settings,
                progress: inner.progress,
            }),
            _ => None,
        }
    }

    /// Enter `Loading` for `chapter` and return the request token
    fn begin_load(&self, chapter: &ChapterRef) -> Result<u64> {
        let (token, stopped) = {
            let mut inner = self.lock();
            if inner.closed {
                return Err(FolioError::Closed);
            }
            inner.last_token += 1;
            let token = inner.last_token;
            inner.state = SessionState::Loading {
                chapter: chapter.clone(),
                token,
            };
            inner.progress = 0.0;
            (token, inner.stop_auto_scroll())
        };

        tracing::debug!(session = %self.id, %chapter, token, "loading chapter");
        if stopped {
            self.emit(SessionEvent::AutoScrollStopped {
                reason: StopReason::ChapterChanged,
            });
        }
        self.renderer.show_loading(chapter);
        self.emit(SessionEvent::ChapterLoading {
            chapter: chapter.clone(),
        });
        Ok(token)
    }

    /// Commit a load result if `token` is still the active request
    fn finish_load(
        &self,
        chapter: ChapterRef,
        token: u64,
        result: FetchResult<ContentUnit>,
    ) -> Result<Arc<ContentUnit>> {
        // Counting paragraphs parses the HTML, so do it before locking
        let units = result.as_ref().map(ContentUnit::len).unwrap_or(0);
        let mut inner = self.lock();
        if inner.closed {
            return Err(FolioError::Closed);
        }
        if !inner.state.is_current_request(token) {
            drop(inner);
            tracing::warn!(session = %self.id, %chapter, token, "discarding stale chapter result");
            self.emit(SessionEvent::StaleResultDiscarded {
                chapter: chapter.clone(),
            });
            return Err(FolioError::Superseded {
                chapter: chapter.chapter_number,
            });
        }

        match result {
            Ok(content) => {
                let content = Arc::new(content);
                inner.state = SessionState::Ready {
                    chapter: chapter.clone(),
                    content: Arc::clone(&content),
                    units,
                };
                inner.progress = 0.0;
                let frame = self.frame(&inner);
                drop(inner);

                tracing::info!(session = %self.id, %chapter, units, "chapter ready");
                if let Some(frame) = frame {
                    self.renderer.present(&frame);
                }
                self.renderer.scroll_to(0.0);
                self.emit(SessionEvent::ChapterReady { chapter, units });
                Ok(content)
            }
            Err(error) => {
                inner.state = SessionState::Error {
                    chapter: chapter.clone(),
                    error: error.clone(),
                };
                drop(inner);

                tracing::warn!(session = %self.id, %chapter, %error, "chapter failed to load");
                self.renderer.show_error(&chapter, &error);
                self.emit(SessionEvent::ChapterFailed {
                    chapter,
                    error: error.clone(),
                });
                Err(FolioError::Fetch(error))
            }
        }
    }

    fn set_progress(&self, percent: f64) -> f64 {
        let percent = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 100.0)
        };
        {
            let mut inner = self.lock();
            if inner.closed {
                return inner.progress;
            }
            inner.progress = percent;
        }
        self.emit(SessionEvent::ProgressChanged { percent });
        percent
    }

    fn with_player(&self, f: impl FnOnce(&mut AmbientPlayer)) {
        let event = {
            let mut inner = self.lock();
            if inner.closed {
                return;
            }
            let before = inner.player.clone();
            f(&mut inner.player);
            if inner.player == before {
                return;
            }
            inner.playback_event()
        };
        self.emit(event);
    }

    /// Cancel everything; returns false if already closed
    fn shutdown(&self) -> bool {
        let mut inner = self.lock();
        if inner.closed {
            return false;
        }
        inner.closed = true;
        inner.stop_auto_scroll();
        inner.clear_sleep_timer();
        inner.player.pause();
        true
    }

    /// One auto-scroll step. Returns whether the task should keep running.
    fn auto_scroll_tick(&self, generation: u64) -> bool {
        let extent = self
            .renderer
            .scroll_extent()
            .filter(|e| e.is_finite() && *e > 0.0)
            .unwrap_or(self.config.scroll_extent_px);
        let step = 100.0 / extent;

        let (percent, finished, _own_handle) = {
            let mut inner = self.lock();
            if inner.closed || inner.auto_scroll_generation != generation {
                return false;
            }
            if !inner.state.is_ready() {
                return true;
            }
            inner.progress = (inner.progress + step).min(100.0);
            let percent = inner.progress;
            if percent >= 100.0 {
                // Take our own handle out so it is dropped after the lock
                let own = inner.auto_scroll_task.take();
                inner.stop_auto_scroll();
                (percent, true, own)
            } else {
                (percent, false, None)
            }
        };

        self.renderer.scroll_to(percent);
        self.emit(SessionEvent::ProgressChanged { percent });
        if finished {
            tracing::debug!(session = %self.id, "auto-scroll reached the end");
            self.emit(SessionEvent::AutoScrollStopped {
                reason: StopReason::ReachedEnd,
            });
            self.emit(SessionEvent::AutoScrollChanged { speed: 0 });
        }
        !finished
    }

    /// One minute of the sleep timer. Returns whether the timer keeps running.
    fn sleep_tick(&self, generation: u64) -> bool {
        let (minutes_remaining, stopped_scroll, playback, _own_handle) = {
            let mut inner = self.lock();
            if inner.closed || inner.sleep_generation != generation {
                return false;
            }
            let remaining = inner.sleep_remaining.unwrap_or(0).saturating_sub(1);
            if remaining > 0 {
                inner.sleep_remaining = Some(remaining);
                (Some(remaining), false, None, None)
            } else {
                let own = inner.sleep_task.take();
                inner.clear_sleep_timer();
                let stopped_scroll = inner.stop_auto_scroll();
                let playback = inner.player.pause().then(|| inner.playback_event());
                (None, stopped_scroll, playback, own)
            }
        };

        if minutes_remaining.is_some() {
            self.emit(SessionEvent::SleepTimerChanged { minutes_remaining });
            return true;
        }

        tracing::info!(session = %self.id, "sleep timer elapsed");
        if stopped_scroll {
            self.emit(SessionEvent::AutoScrollStopped {
                reason: StopReason::SleepTimer,
            });
            self.emit(SessionEvent::AutoScrollChanged { speed: 0 });
        }
        if let Some(event) = playback {
            self.emit(event);
        }
        self.emit(SessionEvent::SleepTimerElapsed);
        false
    }
}

async fn run_auto_scroll(shared: Weak<Shared>, generation: u64, period: Duration) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let Some(shared) = shared.upgrade() else {
            break;
        };
        if !shared.auto_scroll_tick(generation) {
            break;
        }
    }
}

async fn run_sleep_timer(shared: Weak<Shared>, generation: u64) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + SLEEP_TICK, SLEEP_TICK);
    loop {
        ticker.tick().await;
        let Some(shared) = shared.upgrade() else {
            break;
        };
        if !shared.sleep_tick(generation) {
            break;
        }
    }
}
