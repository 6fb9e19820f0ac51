//! Library/playlist view-model
//!
//! Holds the signed-in user's library as last fetched through the
//! `RemoteClient` and derives the play queue from it. Mutations are gated:
//! skipped when signed out, rejected when offline, otherwise exactly one
//! remote write followed by a refresh.

use crate::client::RemoteClient;
use crate::error::{LibraryError, LibraryResult, SyncError};
use nothing_core::{Track, TrackCatalog, TrackId, UserProfile};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name given to the playlist created from the legacy single playlist
pub const MIGRATED_PLAYLIST_NAME: &str = "My Playlist";

/// User-facing library actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LibraryAction {
    SaveProfile,
    ToggleFavorite,
    MoveTrack,
    AddToPlaylist,
    RemoveFromPlaylist,
    CreatePlaylist,
    RenamePlaylist,
    DeletePlaylist,
    SwitchPlaylist,
}

impl fmt::Display for LibraryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::SaveProfile => "save your profile",
            Self::ToggleFavorite => "update favorites",
            Self::MoveTrack => "reorder the playlist",
            Self::AddToPlaylist => "add tracks to the playlist",
            Self::RemoveFromPlaylist => "remove tracks from the playlist",
            Self::CreatePlaylist => "create a playlist",
            Self::RenamePlaylist => "rename a playlist",
            Self::DeletePlaylist => "delete a playlist",
            Self::SwitchPlaylist => "switch playlists",
        };
        f.write_str(text)
    }
}

/// Steps of a rename that reached the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenameStep {
    /// The new playlist exists alongside the old one
    Created,
    /// The new playlist is also the active one
    Activated,
}

impl fmt::Display for RenameStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("creating the new playlist"),
            Self::Activated => f.write_str("activating the new playlist"),
        }
    }
}

/// Reorder direction within the play queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// What a gated mutation did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationOutcome {
    /// The write reached the backend
    Applied,
    /// Nothing to do: signed out, no active playlist, or out of bounds
    Skipped,
}

/// The signed-in user's library
pub struct LibraryViewModel {
    catalog: Arc<TrackCatalog>,
    client: Arc<RemoteClient>,

    authenticated: bool,
    /// `None` until a profile read succeeds
    profile: Option<Option<UserProfile>>,
    favorites: Vec<TrackId>,
    legacy_playlist: Vec<TrackId>,
    playlist_names: Vec<String>,
    active_tracks: Vec<TrackId>,
    active_name: Option<String>,
    /// Once per process; kept across sign-out
    migration_done: bool,
}

impl LibraryViewModel {
    pub fn new(catalog: Arc<TrackCatalog>, client: Arc<RemoteClient>) -> Self {
        Self {
            catalog,
            client,
            authenticated: false,
            profile: None,
            favorites: Vec::new(),
            legacy_playlist: Vec::new(),
            playlist_names: Vec::new(),
            active_tracks: Vec::new(),
            active_name: None,
            migration_done: false,
        }
    }

    // ===== Identity =====

    /// Start a signed-in session and load the user's library
    pub async fn sign_in(&mut self) {
        info!("Signed in");
        self.authenticated = true;
        self.refresh().await;
    }

    /// End the session and forget everything fetched for the user
    pub async fn sign_out(&mut self) {
        info!("Signed out");
        self.authenticated = false;
        self.clear_user_data();
        self.client.clear_cache().await;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    // ===== Reads =====

    /// Refetch the library and reconcile it
    ///
    /// Read failures leave empty lists behind; playback of the catalog is
    /// never blocked by the backend.
    pub async fn refresh(&mut self) {
        if !self.authenticated {
            self.clear_user_data();
            return;
        }

        self.fetch().await;
        self.reconcile().await;
    }

    /// Migration, active-playlist bootstrap and empty-playlist seeding
    ///
    /// Each step writes at most once and refetches what it touched.
    pub async fn reconcile(&mut self) {
        if !self.authenticated || !self.client.network().is_online() {
            return;
        }

        if !self.migration_done
            && self.playlist_names.is_empty()
            && !self.legacy_playlist.is_empty()
        {
            self.migrate().await;
        }

        if self.active_name.is_none() {
            if let Some(first) = self.playlist_names.first().cloned() {
                self.bootstrap_active(first).await;
            }
        }

        if let Some(name) = self.active_name.clone() {
            if self.active_tracks.is_empty() && self.playlist_names.contains(&name) {
                self.seed(&name).await;
            }
        }
    }

    /// Ordered play queue
    ///
    /// Catalog order when signed out or when the active playlist is empty;
    /// otherwise the active playlist mapped through the catalog with unknown
    /// ids dropped.
    pub fn queue(&self) -> Vec<Track> {
        if !self.authenticated || self.active_tracks.is_empty() {
            return self.catalog.tracks().to_vec();
        }
        self.catalog.resolve(&self.active_tracks)
    }

    /// Catalog tracks not in the active playlist
    pub fn available_tracks(&self) -> Vec<Track> {
        self.catalog
            .tracks()
            .iter()
            .filter(|t| !self.active_tracks.contains(&t.id))
            .cloned()
            .collect()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref().and_then(Option::as_ref)
    }

    /// Signed in, profile read succeeded, and no profile exists yet
    pub fn needs_profile_setup(&self) -> bool {
        self.authenticated && matches!(self.profile, Some(None))
    }

    pub fn favorites(&self) -> &[TrackId] {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &TrackId) -> bool {
        self.favorites.contains(id)
    }

    pub fn is_in_playlist(&self, id: &TrackId) -> bool {
        self.active_tracks.contains(id)
    }

    pub fn playlist_names(&self) -> &[String] {
        &self.playlist_names
    }

    pub fn active_playlist_name(&self) -> Option<&str> {
        self.active_name.as_deref()
    }

    pub fn active_tracks(&self) -> &[TrackId] {
        &self.active_tracks
    }

    pub fn migration_done(&self) -> bool {
        self.migration_done
    }

    // ===== Mutations =====

    /// Set up the caller's profile
    pub async fn save_profile(&mut self, name: &str) -> LibraryResult<MutationOutcome> {
        if !self.gate(LibraryAction::SaveProfile)? {
            return Ok(MutationOutcome::Skipped);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::EmptyProfileName);
        }

        self.client
            .save_profile(UserProfile::new(name))
            .await
            .map_err(sync_err(LibraryAction::SaveProfile))?;
        self.refresh().await;
        Ok(MutationOutcome::Applied)
    }

    /// Add `id` to favorites, or remove it if already there
    pub async fn toggle_favorite(&mut self, id: &TrackId) -> LibraryResult<MutationOutcome> {
        if !self.gate(LibraryAction::ToggleFavorite)? {
            return Ok(MutationOutcome::Skipped);
        }

        let favorites: Vec<TrackId> = if self.favorites.contains(id) {
            self.favorites.iter().filter(|f| *f != id).cloned().collect()
        } else {
            let mut next = self.favorites.clone();
            next.push(id.clone());
            next
        };

        self.client
            .save_favorites(favorites)
            .await
            .map_err(sync_err(LibraryAction::ToggleFavorite))?;
        self.refresh().await;
        Ok(MutationOutcome::Applied)
    }

    /// Swap the queue entry at `index` with its neighbour
    pub async fn move_track(
        &mut self,
        index: usize,
        direction: Direction,
    ) -> LibraryResult<MutationOutcome> {
        if !self.gate(LibraryAction::MoveTrack)? {
            return Ok(MutationOutcome::Skipped);
        }
        let Some(name) = self.active_name.clone() else {
            return Ok(MutationOutcome::Skipped);
        };

        let mut order: Vec<TrackId> = self.queue().into_iter().map(|t| t.id).collect();
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => index.checked_add(1),
        };
        let Some(target) = target.filter(|&t| t < order.len() && index < order.len()) else {
            debug!(index, ?direction, "Move out of bounds");
            return Ok(MutationOutcome::Skipped);
        };

        order.swap(index, target);
        self.save_active(&name, order, LibraryAction::MoveTrack)
            .await
    }

    /// Append a track to the active playlist
    pub async fn add_to_playlist(&mut self, id: &TrackId) -> LibraryResult<MutationOutcome> {
        if !self.gate(LibraryAction::AddToPlaylist)? {
            return Ok(MutationOutcome::Skipped);
        }
        let Some(name) = self.active_name.clone() else {
            return Ok(MutationOutcome::Skipped);
        };

        let mut tracks = self.active_tracks.clone();
        tracks.push(id.clone());
        self.save_active(&name, tracks, LibraryAction::AddToPlaylist)
            .await
    }

    /// Remove every occurrence of a track from the active playlist
    pub async fn remove_from_playlist(&mut self, id: &TrackId) -> LibraryResult<MutationOutcome> {
        if !self.gate(LibraryAction::RemoveFromPlaylist)? {
            return Ok(MutationOutcome::Skipped);
        }
        let Some(name) = self.active_name.clone() else {
            return Ok(MutationOutcome::Skipped);
        };

        let tracks = self
            .active_tracks
            .iter()
            .filter(|t| *t != id)
            .cloned()
            .collect();
        self.save_active(&name, tracks, LibraryAction::RemoveFromPlaylist)
            .await
    }

    /// Create an empty named playlist
    pub async fn create_playlist(&mut self, name: &str) -> LibraryResult<MutationOutcome> {
        if !self.gate(LibraryAction::CreatePlaylist)? {
            return Ok(MutationOutcome::Skipped);
        }
        let name = self.validate_new_name(name)?;

        self.client
            .save_playlist_by_name(&name, Vec::new())
            .await
            .map_err(sync_err(LibraryAction::CreatePlaylist))?;
        info!(playlist = %name, "Playlist created");
        self.refresh().await;
        Ok(MutationOutcome::Applied)
    }

    /// Rename a playlist
    ///
    /// Create-with-same-tracks, activate if it was active, delete the old
    /// one. Not atomic: a failure after the first write is reported as
    /// `PartialRename` and nothing is rolled back.
    pub async fn rename_playlist(&mut self, from: &str, to: &str) -> LibraryResult<MutationOutcome> {
        if !self.gate(LibraryAction::RenamePlaylist)? {
            return Ok(MutationOutcome::Skipped);
        }
        if !self.playlist_names.iter().any(|n| n == from) {
            return Err(LibraryError::PlaylistNotFound(from.to_string()));
        }
        let to = to.trim();
        if to == from {
            return Ok(MutationOutcome::Skipped);
        }
        let to = self.validate_new_name(to)?;

        let was_active = self.active_name.as_deref() == Some(from);
        let tracks = if was_active {
            self.active_tracks.clone()
        } else {
            self.client
                .playlist_by_name(from)
                .await
                .map_err(sync_err(LibraryAction::RenamePlaylist))?
        };

        self.client
            .save_playlist_by_name(&to, tracks)
            .await
            .map_err(sync_err(LibraryAction::RenamePlaylist))?;

        let partial = |completed, source| LibraryError::PartialRename {
            from: from.to_string(),
            to: to.clone(),
            completed,
            source,
        };

        let mut completed = RenameStep::Created;
        if was_active {
            if let Err(e) = self.client.set_active_playlist(&to).await {
                warn!(from, to = %to, error = %e, "Rename stopped before activation");
                self.refresh().await;
                return Err(partial(completed, e));
            }
            self.active_name = Some(to.clone());
            completed = RenameStep::Activated;
        }

        if let Err(e) = self.client.delete_playlist(from).await {
            warn!(from, to = %to, error = %e, "Rename left the old playlist behind");
            self.refresh().await;
            return Err(partial(completed, e));
        }

        info!(from, to = %to, "Playlist renamed");
        self.refresh().await;
        Ok(MutationOutcome::Applied)
    }

    /// Delete a named playlist
    pub async fn delete_playlist(&mut self, name: &str) -> LibraryResult<MutationOutcome> {
        if !self.gate(LibraryAction::DeletePlaylist)? {
            return Ok(MutationOutcome::Skipped);
        }

        self.client
            .delete_playlist(name)
            .await
            .map_err(sync_err(LibraryAction::DeletePlaylist))?;
        info!(playlist = %name, "Playlist deleted");

        if self.active_name.as_deref() == Some(name) {
            self.active_name = None;
        }
        self.refresh().await;
        Ok(MutationOutcome::Applied)
    }

    /// Make another playlist the active one
    pub async fn switch_playlist(&mut self, name: &str) -> LibraryResult<MutationOutcome> {
        if !self.gate(LibraryAction::SwitchPlaylist)? {
            return Ok(MutationOutcome::Skipped);
        }
        if self.active_name.as_deref() == Some(name) {
            return Ok(MutationOutcome::Skipped);
        }
        if !self.playlist_names.iter().any(|n| n == name) {
            return Err(LibraryError::PlaylistNotFound(name.to_string()));
        }

        self.client
            .set_active_playlist(name)
            .await
            .map_err(sync_err(LibraryAction::SwitchPlaylist))?;
        self.active_name = Some(name.to_string());
        self.refresh().await;
        Ok(MutationOutcome::Applied)
    }

    // ===== Internals =====

    /// `Ok(false)` when signed out, `Err` when offline
    fn gate(&self, action: LibraryAction) -> LibraryResult<bool> {
        if !self.authenticated {
            debug!(%action, "Skipped while signed out");
            return Ok(false);
        }
        if !self.client.network().is_online() {
            return Err(LibraryError::Offline(action));
        }
        Ok(true)
    }

    fn validate_new_name(&self, name: &str) -> LibraryResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::EmptyPlaylistName);
        }
        if self.playlist_names.iter().any(|n| n == name) {
            return Err(LibraryError::DuplicatePlaylist(name.to_string()));
        }
        Ok(name.to_string())
    }

    async fn save_active(
        &mut self,
        name: &str,
        tracks: Vec<TrackId>,
        action: LibraryAction,
    ) -> LibraryResult<MutationOutcome> {
        self.client
            .save_playlist_by_name(name, tracks)
            .await
            .map_err(sync_err(action))?;
        self.refresh().await;
        Ok(MutationOutcome::Applied)
    }

    async fn fetch(&mut self) {
        match self.client.profile().await {
            Ok(profile) => self.profile = Some(profile),
            Err(e) => debug!(error = %e, "Profile unknown"),
        }
        self.favorites = self.client.favorites().await;
        self.legacy_playlist = self.client.legacy_playlist().await;
        self.playlist_names = self.client.playlist_names().await;
        self.active_tracks = self.client.active_playlist().await;

        if let Some(name) = &self.active_name {
            if !self.playlist_names.contains(name) && !self.playlist_names.is_empty() {
                debug!(playlist = %name, "Active playlist no longer listed");
                self.active_name = None;
            }
        }
    }

    async fn migrate(&mut self) {
        info!(
            tracks = self.legacy_playlist.len(),
            playlist = MIGRATED_PLAYLIST_NAME,
            "Migrating legacy playlist"
        );

        let tracks = self.legacy_playlist.clone();
        if let Err(e) = self
            .client
            .save_playlist_by_name(MIGRATED_PLAYLIST_NAME, tracks)
            .await
        {
            warn!(error = %e, "Legacy playlist migration failed");
            return;
        }
        self.migration_done = true;

        self.playlist_names = self.client.playlist_names().await;
        // Left unselected on failure; bootstrap retries the activation
        self.activate(MIGRATED_PLAYLIST_NAME.to_string()).await;
    }

    async fn bootstrap_active(&mut self, name: String) {
        debug!(playlist = %name, "Selecting first playlist as active");
        self.activate(name).await;
    }

    /// Mark `name` active remotely, then locally
    async fn activate(&mut self, name: String) {
        if let Err(e) = self.client.set_active_playlist(&name).await {
            warn!(playlist = %name, error = %e, "Could not activate playlist");
            return;
        }
        self.active_name = Some(name);
        self.active_tracks = self.client.active_playlist().await;
    }

    /// Fill the active playlist with the catalog if it is really empty
    ///
    /// An empty `active_tracks` may just be a failed read, so emptiness is
    /// confirmed against the named playlist before anything is written.
    async fn seed(&mut self, name: &str) {
        match self.client.playlist_by_name(name).await {
            Ok(tracks) if tracks.is_empty() => {}
            Ok(tracks) => {
                debug!(playlist = %name, tracks = tracks.len(), "Playlist not empty, not seeding");
                return;
            }
            Err(e) => {
                warn!(playlist = %name, error = %e, "Could not confirm playlist is empty, not seeding");
                return;
            }
        }

        info!(playlist = %name, tracks = self.catalog.len(), "Seeding empty playlist with catalog");
        if let Err(e) = self
            .client
            .save_playlist_by_name(name, self.catalog.ids())
            .await
        {
            warn!(playlist = %name, error = %e, "Seeding failed");
            return;
        }
        self.playlist_names = self.client.playlist_names().await;
        self.active_tracks = self.client.active_playlist().await;
    }

    fn clear_user_data(&mut self) {
        self.profile = None;
        self.favorites.clear();
        self.legacy_playlist.clear();
        self.playlist_names.clear();
        self.active_tracks.clear();
        self.active_name = None;
    }
}

fn sync_err(action: LibraryAction) -> impl FnOnce(SyncError) -> LibraryError {
    move |source| LibraryError::Sync { action, source }
}
