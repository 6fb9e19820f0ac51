//! Track catalog
//!
//! The fixed list of playable tracks. Built once at startup and shared
//! read-only (behind an `Arc`) by the playback controller and the library
//! view-model.

use crate::error::{CoreError, Result};
use crate::types::{Track, TrackId};
use std::collections::HashMap;
use std::path::Path;

/// Immutable, id-indexed list of playable tracks
#[derive(Debug, Clone)]
pub struct TrackCatalog {
    tracks: Vec<Track>,
    index: HashMap<String, usize>,
}

impl TrackCatalog {
    /// Build a catalog from tracks in display order
    ///
    /// Fails if an id is empty or appears more than once, or if a duration
    /// is negative or not finite.
    pub fn from_tracks(tracks: Vec<Track>) -> Result<Self> {
        let mut index = HashMap::with_capacity(tracks.len());

        for (position, track) in tracks.iter().enumerate() {
            if track.id.as_str().is_empty() {
                return Err(CoreError::invalid_input(format!(
                    "track at position {} has an empty id",
                    position
                )));
            }
            if !track.duration.is_finite() || track.duration < 0.0 {
                return Err(CoreError::invalid_input(format!(
                    "track {} has an invalid duration",
                    track.id
                )));
            }
            if index.insert(track.id.as_str().to_string(), position).is_some() {
                return Err(CoreError::Duplicate(track.id.to_string()));
            }
        }

        Ok(Self { tracks, index })
    }

    /// Load a catalog from a JSON array of tracks
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let tracks: Vec<Track> = serde_json::from_str(&contents)?;
        Self::from_tracks(tracks)
    }

    /// The sample tracks bundled with the player
    pub fn builtin() -> Self {
        let tracks = vec![
            Track::new(
                "track-1",
                "Ambient Dawn",
                "Digital Soundscapes",
                180.0,
                "/assets/audio/sample-track-1.mp3",
            ),
            Track::new(
                "track-2",
                "Minimal Pulse",
                "Electronic Collective",
                210.0,
                "/assets/audio/sample-track-2.mp3",
            ),
            Track::new(
                "track-3",
                "Urban Echoes",
                "City Frequencies",
                195.0,
                "/assets/audio/sample-track-3.mp3",
            ),
        ];

        let index = tracks
            .iter()
            .enumerate()
            .map(|(position, track)| (track.id.as_str().to_string(), position))
            .collect();

        Self { tracks, index }
    }

    /// All tracks in catalog order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// All track ids in catalog order
    pub fn ids(&self) -> Vec<TrackId> {
        self.tracks.iter().map(|t| t.id.clone()).collect()
    }

    /// Look up a track by id
    pub fn get_track_by_id(&self, id: &str) -> Option<&Track> {
        self.index.get(id).map(|&position| &self.tracks[position])
    }

    /// Whether the catalog contains the given id
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the catalog has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Map ids through the catalog, silently skipping unknown ids
    pub fn resolve<'a, I>(&self, ids: I) -> Vec<Track>
    where
        I: IntoIterator<Item = &'a TrackId>,
    {
        ids.into_iter()
            .filter_map(|id| self.get_track_by_id(id.as_str()).cloned())
            .collect()
    }
}

impl Default for TrackCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Format a position in seconds as `m:ss`
///
/// Fractions are truncated. Negative and non-finite inputs render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    format!("{}:{:02}", total / 60, total % 60)
}
