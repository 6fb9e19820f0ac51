//! Nothing Player Library
//!
//! Headless host for the player core: configuration, the application
//! context composing catalog, network monitor, remote client, library
//! view-model and playback controller, and a media element without audio
//! output.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod error;
pub mod media;
pub mod state;

// Re-export commonly used types for convenience
pub use config::PlayerConfig;
pub use error::{PlayerError, Result};
pub use media::HeadlessMedia;
pub use state::AppContext;
