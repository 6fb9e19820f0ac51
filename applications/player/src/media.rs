//! Headless media element
//!
//! Stands in for the native audio element when the player runs without an
//! audio device (CLI, CI). Tracks source, position and gain; produces no
//! sound. Track lengths come from the catalog so seeks clamp like a real
//! element would.

use nothing_core::TrackCatalog;
use nothing_playback::{MediaHandle, PlaybackError, Result};
use std::collections::HashMap;
use tracing::debug;

pub struct HeadlessMedia {
    durations: HashMap<String, f64>,
    source: Option<String>,
    position: f64,
    gain: f32,
    playing: bool,
}

impl HeadlessMedia {
    pub fn new(catalog: &TrackCatalog) -> Self {
        let durations = catalog
            .tracks()
            .iter()
            .map(|t| (t.audio_url.clone(), t.duration))
            .collect();

        Self {
            durations,
            source: None,
            position: 0.0,
            gain: 1.0,
            playing: false,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    fn length(&self) -> f64 {
        self.source
            .as_ref()
            .and_then(|url| self.durations.get(url))
            .copied()
            .unwrap_or(0.0)
    }
}

impl MediaHandle for HeadlessMedia {
    fn load(&mut self, url: &str) -> Result<()> {
        if !self.durations.contains_key(url) {
            return Err(PlaybackError::Media(format!("unknown source {}", url)));
        }
        debug!(url, "Source loaded");
        self.source = Some(url.to_string());
        self.position = 0.0;
        self.playing = false;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.source.is_none() {
            return Err(PlaybackError::Media("no source".into()));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, position: f64) -> f64 {
        let position = if position.is_finite() { position } else { 0.0 };
        self.position = position.clamp(0.0, self.length());
        self.position
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }
}
