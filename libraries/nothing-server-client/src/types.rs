//! Types for the remote persistence API requests.

use nothing_core::{TrackId, UserProfile};
use serde::{Deserialize, Serialize};

/// Configuration for connecting to a persistence server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the server (e.g., "https://music.example.com")
    pub url: String,
    /// Bearer token identifying the caller (if signed in)
    pub access_token: Option<String>,
}

impl ServerConfig {
    /// Create a new server config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: None,
        }
    }

    /// Create a config with an existing token.
    pub fn with_token(url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: Some(access_token.into()),
        }
    }
}

// =============================================================================
// RPC Argument Bodies
// =============================================================================
//
// Every call is `POST /api/rpc/{method}` with the named arguments as a JSON
// object.

/// Body for calls without arguments.
#[derive(Debug, Serialize)]
pub(crate) struct NoArgs {}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileArgs {
    pub profile: UserProfile,
}

#[derive(Debug, Serialize)]
pub(crate) struct FavoritesArgs {
    pub favorites: Vec<TrackId>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PlaylistArgs {
    pub playlist: Vec<TrackId>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NameArgs<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NamedTracksArgs<'a> {
    pub name: &'a str,
    pub tracks: Vec<TrackId>,
}
