//! Playback Events
//!
//! Event-based communication for UI synchronization. The controller queues
//! events as it changes state; the presentation layer drains them with
//! `PlaybackController::drain_events`.

use crate::types::{PlaybackStatus, RepeatMode};
use nothing_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Transport status changed
    StateChanged {
        /// The new status
        status: PlaybackStatus,
    },

    /// Current track changed
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Track played to its natural end
    TrackFinished {
        /// ID of the finished track
        track_id: TrackId,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        volume: f32,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Shuffle or repeat changed
    ModesChanged { shuffle: bool, repeat: RepeatMode },

    /// Error occurred during loading or playback
    Error {
        /// User-facing message
        message: String,
    },
}
