/// Core traits for Nothing Player
use crate::error::BackendError;
use crate::types::{TrackId, UserProfile};
use async_trait::async_trait;

/// Result type for backend calls
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Remote persistence contract
///
/// Every call is scoped to the caller's identity; the implementation decides
/// how that identity travels (bearer token, signed request, ...).
///
/// Implementations are transports only. Connectivity gating, caching and
/// error-swallowing policy live in the sync layer on top of this trait.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the caller's profile, `None` if it was never set up
    async fn get_caller_user_profile(&self) -> BackendResult<Option<UserProfile>>;

    /// Create or replace the caller's profile
    async fn save_caller_user_profile(&self, profile: UserProfile) -> BackendResult<()>;

    /// Get the caller's favorite track ids
    async fn get_favorites(&self) -> BackendResult<Vec<TrackId>>;

    /// Replace the caller's favorite track ids
    async fn save_favorites(&self, favorites: Vec<TrackId>) -> BackendResult<()>;

    /// Get the legacy single playlist
    async fn get_playlist(&self) -> BackendResult<Vec<TrackId>>;

    /// Replace the legacy single playlist
    async fn save_playlist(&self, tracks: Vec<TrackId>) -> BackendResult<()>;

    /// List the caller's named playlists
    async fn get_playlist_names(&self) -> BackendResult<Vec<String>>;

    /// Get the tracks of a named playlist
    async fn get_playlist_by_name(&self, name: &str) -> BackendResult<Vec<TrackId>>;

    /// Create or replace a named playlist
    async fn save_playlist_by_name(&self, name: &str, tracks: Vec<TrackId>) -> BackendResult<()>;

    /// Delete a named playlist
    async fn delete_playlist(&self, name: &str) -> BackendResult<()>;

    /// Get the tracks of the active playlist
    async fn get_active_playlist(&self) -> BackendResult<Vec<TrackId>>;

    /// Mark a named playlist as active
    async fn set_active_playlist(&self, name: &str) -> BackendResult<()>;
}
