//! Nothing Player - Playback Control
//!
//! Platform-agnostic playback control for Nothing Player.
//!
//! This crate provides:
//! - Track selection over a play queue (sequential with wrap, or shuffle)
//! - Repeat modes (Off, All, One)
//! - "Previous" restart threshold
//! - Volume control (linear, 0.0-1.0, mute/unmute)
//! - Non-fatal load/play errors surfaced as a dismissable notice
//!
//! # Architecture
//!
//! `nothing-playback` never touches audio itself. The platform provides a
//! single native playback element through the `MediaHandle` trait and
//! forwards its notifications as `MediaEvent`s. The controller turns user
//! intents and media notifications into state and `PlaybackEvent`s.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use nothing_core::TrackCatalog;
//! use nothing_playback::{MediaEvent, MediaHandle, PlaybackConfig, PlaybackController, PlaybackStatus};
//! use std::sync::Arc;
//!
//! // Implement MediaHandle for your platform
//! struct Silent(f64);
//!
//! impl MediaHandle for Silent {
//!     fn load(&mut self, _url: &str) -> nothing_playback::Result<()> { self.0 = 0.0; Ok(()) }
//!     fn play(&mut self) -> nothing_playback::Result<()> { Ok(()) }
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, position: f64) -> f64 { self.0 = position.max(0.0); self.0 }
//!     fn position(&self) -> f64 { self.0 }
//!     fn set_gain(&mut self, _gain: f32) {}
//! }
//!
//! let catalog = Arc::new(TrackCatalog::builtin());
//! let mut controller =
//!     PlaybackController::new(catalog, Box::new(Silent(0.0)), PlaybackConfig::default());
//!
//! controller.play(Some("track-2")).unwrap();
//! controller.handle_media_event(MediaEvent::CanPlay);
//! assert_eq!(controller.status(), PlaybackStatus::Playing);
//!
//! controller.play_next();
//! assert_eq!(controller.current_track_id().unwrap(), "track-3");
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust
//! use nothing_core::TrackCatalog;
//! use nothing_playback::{PlaybackConfig, RepeatMode};
//!
//! let config = PlaybackConfig {
//!     shuffle: true,
//!     repeat: RepeatMode::All,
//!     shuffle_seed: Some(7),
//!     ..PlaybackConfig::default()
//! };
//! assert_eq!(config.repeat.next(), RepeatMode::One);
//! ```

mod controller;
mod error;
mod events;
mod media;
mod shuffle;
pub mod types;
mod volume;

// Public exports
pub use controller::{PlaybackController, LOAD_FAILED, PLAY_FAILED};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use media::{MediaEvent, MediaHandle};
pub use shuffle::pick_shuffle_index;
pub use types::{PlaybackConfig, PlaybackState, PlaybackStatus, RepeatMode};
pub use volume::Volume;
