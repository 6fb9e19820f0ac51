//! Core types for playback control

use nothing_core::TrackId;
use serde::{Deserialize, Serialize};

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop after the last track of the queue
    #[default]
    Off,

    /// Loop the entire queue
    All,

    /// Loop the current track only
    One,
}

impl RepeatMode {
    /// Next mode in the `Off -> All -> One -> Off` cycle
    pub fn next(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Transport status, derived from `PlaybackState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// No track selected
    Idle,

    /// Track selected, media not ready yet
    Loading,

    /// Playing audio
    Playing,

    /// Track selected, not playing
    Paused,

    /// Last load/play attempt failed; cleared by `clear_error` or a new track
    Errored,
}

/// Snapshot of everything the presentation layer renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub current_track_id: Option<TrackId>,
    pub is_playing: bool,
    /// Seconds into the current track
    pub current_time: f64,
    /// Seconds, as reported by the media handle (0 until known)
    pub duration: f64,
    /// Output volume in `[0, 1]`, preserved while muted
    pub volume: f32,
    pub is_muted: bool,
    pub shuffle: bool,
    pub repeat_mode: RepeatMode,
    /// User-dismissable error notice
    pub error: Option<String>,
    pub is_loading: bool,
}

impl PlaybackState {
    /// Derive the transport status
    pub fn status(&self) -> PlaybackStatus {
        if self.error.is_some() {
            PlaybackStatus::Errored
        } else if self.current_track_id.is_none() {
            PlaybackStatus::Idle
        } else if self.is_loading {
            PlaybackStatus::Loading
        } else if self.is_playing {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Paused
        }
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    pub volume: f32,

    /// Initial shuffle state (default: off)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Elapsed seconds after which "previous" restarts the current track (default: 3)
    pub restart_threshold_secs: f64,

    /// Seed for shuffle picks; `None` seeds from entropy
    pub shuffle_seed: Option<u64>,

    /// Track selected (not playing) at startup
    pub initial_track: Option<TrackId>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            shuffle: false,
            repeat: RepeatMode::Off,
            restart_threshold_secs: 3.0,
            shuffle_seed: None,
            initial_track: None,
        }
    }
}
