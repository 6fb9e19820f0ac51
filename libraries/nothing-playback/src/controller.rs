//! Playback controller - core orchestration
//!
//! Owns the media handle, the current-track selection, transport state,
//! volume and shuffle/repeat modes. Everything is driven from a single
//! control thread: user intents call the public methods, the platform
//! adapter forwards native media notifications to `handle_media_event`.

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    media::{MediaEvent, MediaHandle},
    shuffle::pick_shuffle_index,
    types::{PlaybackConfig, PlaybackState, PlaybackStatus, RepeatMode},
    volume::Volume,
};
use nothing_core::{Track, TrackCatalog, TrackId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, warn};

/// Notice shown when the media handle cannot load a source
pub const LOAD_FAILED: &str = "Failed to load track";

/// Notice shown when the media handle refuses to start playback
pub const PLAY_FAILED: &str = "Failed to play track";

/// Central playback control
///
/// State machine over `Idle`, `Loading`, `Playing`, `Paused` and `Errored`
/// (see `PlaybackStatus`), layered on a single `MediaHandle`:
/// - Track selection and advance (sequential with wrap, or shuffle pick)
/// - Repeat modes (Off, All, One) applied at natural track end
/// - "Previous" restarts the current track once past the restart threshold
/// - Volume and mute
/// - Non-fatal media errors
pub struct PlaybackController {
    catalog: Arc<TrackCatalog>,
    queue: Vec<Track>,
    media: Box<dyn MediaHandle>,

    // State
    current_track_id: Option<TrackId>,
    is_playing: bool,
    current_time: f64,
    duration: f64,
    error: Option<String>,
    is_loading: bool,

    // Settings
    volume: Volume,
    shuffle: bool,
    repeat: RepeatMode,
    restart_threshold: f64,
    rng: StdRng,

    // Event queue for UI synchronization
    last_status: PlaybackStatus,
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackController {
    /// Create a controller over `media`
    ///
    /// The play queue starts as the whole catalog in catalog order.
    pub fn new(
        catalog: Arc<TrackCatalog>,
        media: Box<dyn MediaHandle>,
        config: PlaybackConfig,
    ) -> Self {
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut controller = Self {
            queue: catalog.tracks().to_vec(),
            catalog,
            media,
            current_track_id: None,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            error: None,
            is_loading: false,
            volume: Volume::new(config.volume),
            shuffle: config.shuffle,
            repeat: config.repeat,
            restart_threshold: config.restart_threshold_secs,
            rng,
            last_status: PlaybackStatus::Idle,
            pending_events: Vec::new(),
        };

        controller.media.set_gain(controller.volume.gain());

        if let Some(id) = config.initial_track {
            if controller.catalog.contains(id.as_str()) {
                controller.select_track(id);
            } else {
                warn!(track_id = %id, "Initial track not in catalog, starting idle");
            }
        }

        controller.sync_status();
        controller
    }

    // ===== Playback Control =====

    /// Start playback
    ///
    /// With a track id, switches to that track (reloading the media source if
    /// it differs from the current one) and plays it. Without one, resumes the
    /// current track, or starts the first queued track when nothing is
    /// selected. An empty queue with no selection is a no-op.
    pub fn play(&mut self, track_id: Option<&str>) -> Result<()> {
        match track_id {
            Some(id) => {
                let track = self
                    .catalog
                    .get_track_by_id(id)
                    .ok_or_else(|| PlaybackError::TrackNotFound(id.to_string()))?;
                let id = track.id.clone();

                self.is_playing = true;
                if self.current_track_id.as_ref() == Some(&id) {
                    self.start_media();
                } else {
                    self.select_track(id);
                }
            }
            None => {
                if self.current_track_id.is_some() {
                    self.is_playing = true;
                    self.start_media();
                } else if let Some(first) = self.queue.first() {
                    let id = first.id.clone();
                    self.is_playing = true;
                    self.select_track(id);
                } else {
                    debug!("Play requested with an empty queue");
                }
            }
        }

        self.sync_status();
        Ok(())
    }

    /// Pause playback, keeping the current track and position
    pub fn pause(&mut self) {
        if self.is_playing {
            self.is_playing = false;
            self.media.pause();
        }
        self.sync_status();
    }

    /// Toggle between playing and paused without changing track
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        if self.is_playing {
            self.pause();
            Ok(())
        } else {
            self.play(None)
        }
    }

    /// Skip to next track
    ///
    /// Shuffle picks a random other track; otherwise advances one position,
    /// wrapping from the last track to the first.
    pub fn play_next(&mut self) {
        let len = self.queue.len();
        if len == 0 {
            return;
        }

        let current = self.current_index();
        let next = if self.shuffle {
            pick_shuffle_index(&mut self.rng, len, current)
        } else {
            Some(current.map_or(0, |i| (i + 1) % len))
        };

        if let Some(next) = next {
            let id = self.queue[next].id.clone();
            self.select_track(id);
        }
        self.sync_status();
    }

    /// Go to previous track
    ///
    /// If more than the restart threshold (3 s by default) has elapsed,
    /// restarts the current track instead. Otherwise shuffle picks a random
    /// other track and sequential mode steps back one position, wrapping from
    /// the first track to the last.
    pub fn play_previous(&mut self) {
        let len = self.queue.len();
        if len == 0 {
            return;
        }

        if self.media.position() > self.restart_threshold {
            self.current_time = self.media.seek(0.0);
            self.sync_status();
            return;
        }

        let current = self.current_index();
        let previous = if self.shuffle {
            pick_shuffle_index(&mut self.rng, len, current)
        } else {
            Some(match current {
                Some(i) if i > 0 => i - 1,
                _ => len - 1,
            })
        };

        if let Some(previous) = previous {
            let id = self.queue[previous].id.clone();
            self.select_track(id);
        }
        self.sync_status();
    }

    /// Stop playback and forget the current track
    ///
    /// Volume and modes survive; everything else returns to its initial value.
    pub fn stop(&mut self) {
        self.media.pause();
        self.current_track_id = None;
        self.is_playing = false;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.error = None;
        self.is_loading = false;
        self.sync_status();
    }

    // ===== Seek =====

    /// Seek to a position in the current track (seconds)
    ///
    /// The media handle clamps the position to its own valid range.
    pub fn seek(&mut self, time: f64) -> Result<()> {
        if self.current_track_id.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        self.current_time = self.media.seek(time);
        Ok(())
    }

    // ===== Volume =====

    /// Set volume (0.0-1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume.set_level(volume);
        self.apply_gain();
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_gain();
    }

    // ===== Shuffle & Repeat =====

    /// Toggle shuffle on/off
    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        self.emit_modes_changed();
    }

    /// Cycle repeat mode `Off -> All -> One -> Off`
    pub fn toggle_repeat(&mut self) {
        self.repeat = self.repeat.next();
        self.emit_modes_changed();
    }

    // ===== Errors =====

    /// Dismiss the current error notice
    pub fn clear_error(&mut self) {
        self.error = None;
        self.sync_status();
    }

    // ===== Queue =====

    /// Replace the play queue
    ///
    /// The current track keeps playing even if the new queue does not
    /// contain it; the next advance then starts from the queue's first track.
    pub fn set_queue(&mut self, tracks: Vec<Track>) {
        debug!(length = tracks.len(), "Play queue replaced");
        self.queue = tracks;
    }

    /// Tracks in play order
    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    // ===== Media Events =====

    /// Apply a notification from the native playback element
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::LoadStarted => {
                self.is_loading = true;
            }
            MediaEvent::CanPlay => {
                self.is_loading = false;
                self.error = None;
            }
            MediaEvent::TimeUpdate(time) => {
                self.current_time = time;
            }
            MediaEvent::DurationChanged(duration) => {
                self.duration = duration;
            }
            MediaEvent::Ended => {
                self.handle_track_end();
            }
            MediaEvent::Error(reason) => {
                warn!(track_id = ?self.current_track_id, reason = %reason, "Media failed to load");
                self.is_loading = false;
                self.fail(LOAD_FAILED);
            }
        }
        self.sync_status();
    }

    /// Handle natural end of the current track
    fn handle_track_end(&mut self) {
        if let Some(id) = self.current_track_id.clone() {
            self.pending_events
                .push(PlaybackEvent::TrackFinished { track_id: id });
        }

        let len = self.queue.len();
        let current = self.current_index();

        match self.repeat {
            RepeatMode::One => self.restart_current(),
            RepeatMode::All => match current {
                Some(i) if i + 1 == len => {
                    let first = self.queue[0].id.clone();
                    if self.current_track_id.as_ref() == Some(&first) {
                        // Single-track queue: the "next" track is this one
                        self.restart_current();
                    } else {
                        self.select_track(first);
                    }
                }
                _ => self.play_next(),
            },
            RepeatMode::Off => match current {
                Some(i) if i + 1 >= len => {
                    self.is_playing = false;
                    self.media.pause();
                }
                _ => self.play_next(),
            },
        }
    }

    // ===== State Queries =====

    /// Snapshot of the full playback state
    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            current_track_id: self.current_track_id.clone(),
            is_playing: self.is_playing,
            current_time: self.current_time,
            duration: self.duration,
            volume: self.volume.level(),
            is_muted: self.volume.is_muted(),
            shuffle: self.shuffle,
            repeat_mode: self.repeat,
            error: self.error.clone(),
            is_loading: self.is_loading,
        }
    }

    /// Current transport status
    pub fn status(&self) -> PlaybackStatus {
        self.state().status()
    }

    /// Currently selected track
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track_id
            .as_ref()
            .and_then(|id| self.catalog.get_track_by_id(id.as_str()))
    }

    /// Currently selected track id
    pub fn current_track_id(&self) -> Option<&TrackId> {
        self.current_track_id.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Seconds into the current track
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Drain pending events
    ///
    /// The UI should call this after dispatching intents or media events.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    /// Position of the current track in the queue
    fn current_index(&self) -> Option<usize> {
        let current = self.current_track_id.as_ref()?;
        self.queue.iter().position(|t| &t.id == current)
    }

    /// Make `id` the current track
    ///
    /// Reloads the media source and resumes playback if it was in progress.
    /// Selecting the current track again does nothing.
    fn select_track(&mut self, id: TrackId) {
        if self.current_track_id.as_ref() == Some(&id) {
            return;
        }

        let previous_track_id = self.current_track_id.replace(id.clone());
        self.current_time = 0.0;
        self.error = None;
        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id: id.clone(),
            previous_track_id,
        });

        let Some(url) = self
            .catalog
            .get_track_by_id(id.as_str())
            .map(|t| t.audio_url.clone())
        else {
            return;
        };

        debug!(track_id = %id, url = %url, "Loading track");
        self.is_loading = true;
        if let Err(e) = self.media.load(&url) {
            warn!(track_id = %id, error = %e, "Media refused source");
            self.is_loading = false;
            self.fail(LOAD_FAILED);
            return;
        }

        if self.is_playing {
            self.start_media();
        }
    }

    /// Ask the media handle to play; a refusal becomes the error state
    fn start_media(&mut self) {
        if let Err(e) = self.media.play() {
            warn!(track_id = ?self.current_track_id, error = %e, "Playback refused");
            self.fail(PLAY_FAILED);
        }
    }

    /// Restart the current track from zero and play it
    fn restart_current(&mut self) {
        self.current_time = self.media.seek(0.0);
        self.start_media();
    }

    /// Record a non-fatal failure and stop
    fn fail(&mut self, message: &str) {
        self.is_playing = false;
        self.error = Some(message.to_string());
        self.pending_events.push(PlaybackEvent::Error {
            message: message.to_string(),
        });
    }

    fn apply_gain(&mut self) {
        self.media.set_gain(self.volume.gain());
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            volume: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    fn emit_modes_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::ModesChanged {
            shuffle: self.shuffle,
            repeat: self.repeat,
        });
    }

    /// Emit a state changed event if the derived status moved
    fn sync_status(&mut self) {
        let status = self.status();
        if status != self.last_status {
            self.last_status = status;
            self.pending_events
                .push(PlaybackEvent::StateChanged { status });
        }
    }
}
