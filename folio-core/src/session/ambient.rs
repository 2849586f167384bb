//! Ambient soundtrack played alongside the novel reader

use serde::{Deserialize, Serialize};

pub const VOLUME_MAX: u8 = 100;

/// A background track
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AmbientTrack {
    pub title: String,

    /// Accent color shown with the track
    pub color: String,
}

impl AmbientTrack {
    pub fn new(title: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            color: color.into(),
        }
    }
}

/// Playback state of the ambient soundtrack
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AmbientPlayer {
    tracks: Vec<AmbientTrack>,
    current: usize,
    playing: bool,
    volume: u8,
}

impl Default for AmbientPlayer {
    fn default() -> Self {
        Self::new(vec![
            AmbientTrack::new("Rainy Cafe", "#3b82f6"),
            AmbientTrack::new("Crackling Fire", "#f97316"),
            AmbientTrack::new("Deep Space", "#312e81"),
            AmbientTrack::new("Forest Creek", "#059669"),
        ])
    }
}

impl AmbientPlayer {
    /// Create a stopped player at half volume. An empty track list can
    /// never start playing.
    pub fn new(tracks: Vec<AmbientTrack>) -> Self {
        Self {
            tracks,
            current: 0,
            playing: false,
            volume: 50,
        }
    }

    pub fn tracks(&self) -> &[AmbientTrack] {
        &self.tracks
    }

    pub fn current_track(&self) -> Option<&AmbientTrack> {
        self.tracks.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn play(&mut self) {
        self.playing = !self.tracks.is_empty();
    }

    /// Stop playback; returns whether it was playing
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.playing, false)
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Skip forward, wrapping to the first track
    pub fn next_track(&mut self) {
        if !self.tracks.is_empty() {
            self.current = (self.current + 1) % self.tracks.len();
        }
    }

    /// Skip back, wrapping to the last track
    pub fn previous_track(&mut self) {
        if !self.tracks.is_empty() {
            self.current = self
                .current
                .checked_sub(1)
                .unwrap_or(self.tracks.len() - 1);
        }
    }

    /// Set the volume, clamped to 0..=100
    pub fn set_volume(&mut self, volume: i64) {
        self.volume = volume.clamp(0, i64::from(VOLUME_MAX)) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_wraparound() {
        let mut player = AmbientPlayer::default();
        player.previous_track();
        assert_eq!(player.current_track().unwrap().title, "Forest Creek");
        player.next_track();
        assert_eq!(player.current_index(), 0);
        player.next_track();
        assert_eq!(player.current_track().unwrap().title, "Crackling Fire");
    }

    #[test]
    fn test_play_pause() {
        let mut player = AmbientPlayer::default();
        assert!(!player.is_playing());
        player.toggle();
        assert!(player.is_playing());
        assert!(player.pause());
        assert!(!player.pause());
    }

    #[test]
    fn test_volume_clamped() {
        let mut player = AmbientPlayer::default();
        assert_eq!(player.volume(), 50);
        player.set_volume(140);
        assert_eq!(player.volume(), VOLUME_MAX);
        player.set_volume(-1);
        assert_eq!(player.volume(), 0);
    }

    #[test]
    fn test_empty_player_never_plays() {
        let mut player = AmbientPlayer::new(Vec::new());
        player.play();
        player.next_track();
        player.previous_track();
        assert!(!player.is_playing());
        assert!(player.current_track().is_none());
    }
}
