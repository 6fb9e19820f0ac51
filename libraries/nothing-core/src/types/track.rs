/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};

/// Playable audio track
///
/// Immutable for the lifetime of the process. `audio_url` is opaque to the
/// core: it is handed to the media handle as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Nominal duration in seconds
    pub duration: f64,

    /// Location of the audio asset
    pub audio_url: String,
}

impl Track {
    /// Create a new track
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration: f64,
        audio_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            duration,
            audio_url: audio_url.into(),
        }
    }
}
