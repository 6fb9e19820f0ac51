//! Platform-agnostic media handle
//!
//! Abstracts the single native playback element (an HTML audio element, a
//! platform player, a test fake). The controller drives it through
//! `MediaHandle`; the platform adapter reports what happened back through
//! `MediaEvent`s passed to `PlaybackController::handle_media_event`.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Native playback element
///
/// Loading is asynchronous: `load` only starts it, readiness or failure
/// arrives later as `MediaEvent::CanPlay` / `MediaEvent::Error`.
pub trait MediaHandle: Send {
    /// Replace the source and start loading it
    fn load(&mut self, url: &str) -> Result<()>;

    /// Start or resume output
    ///
    /// # Returns
    /// * `Err(_)` - Playback was refused (autoplay policy, decode failure, no source)
    fn play(&mut self) -> Result<()>;

    /// Pause output, keeping the position
    fn pause(&mut self);

    /// Move the playback position
    ///
    /// Returns the position actually applied after the handle clamped it to
    /// its valid range.
    fn seek(&mut self, position: f64) -> f64;

    /// Current position in seconds
    fn position(&self) -> f64;

    /// Set output gain (0.0 = silent, 1.0 = unity)
    fn set_gain(&mut self, gain: f32);
}

/// Notifications from the native playback element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// A new source started loading
    LoadStarted,

    /// Enough data is buffered to start playback
    CanPlay,

    /// Playback position advanced (seconds)
    TimeUpdate(f64),

    /// Duration became known or changed (seconds)
    DurationChanged(f64),

    /// Playback reached the natural end of the track
    Ended,

    /// Loading or decoding failed
    Error(String),
}
