//! Remote persistence client.
//!
//! Wraps a `Backend` with the connectivity guard and a read-through cache:
//! - Writes fail fast with `NotConnected` / `Offline` before any I/O and
//!   invalidate the cached reads they affect on success.
//! - List reads never fail; a missing handle or a remote error reads as
//!   empty.
//! - While the platform reports offline, any cached entry is served and a
//!   miss costs no I/O. While online, only entries fetched since the last
//!   reconnect are served.
//! - After a call failed to reach the backend, reads still go out (falling
//!   back to the cache) so that the first success restores connectivity.

use crate::error::{Result, SyncError};
use crate::network::NetworkMonitor;
use nothing_core::{Backend, BackendResult, TrackId, UserProfile};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Remote operations, as named in user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadProfile,
    SaveProfile,
    LoadFavorites,
    SaveFavorites,
    LoadLegacyPlaylist,
    SaveLegacyPlaylist,
    LoadPlaylistNames,
    LoadPlaylist,
    SavePlaylist,
    DeletePlaylist,
    LoadActivePlaylist,
    SetActivePlaylist,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::LoadProfile => "load profile",
            Self::SaveProfile => "save profile",
            Self::LoadFavorites => "load favorites",
            Self::SaveFavorites => "save favorites",
            Self::LoadLegacyPlaylist => "load legacy playlist",
            Self::SaveLegacyPlaylist => "save legacy playlist",
            Self::LoadPlaylistNames => "load playlist names",
            Self::LoadPlaylist => "load playlist",
            Self::SavePlaylist => "save playlist",
            Self::DeletePlaylist => "delete playlist",
            Self::LoadActivePlaylist => "load active playlist",
            Self::SetActivePlaylist => "set active playlist",
        };
        f.write_str(text)
    }
}

/// Cached read queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Profile,
    Favorites,
    LegacyPlaylist,
    PlaylistNames,
    ActivePlaylist,
}

#[derive(Debug, Clone)]
struct Cached<T> {
    value: T,
    epoch: u64,
}

#[derive(Debug, Default)]
struct QueryCache {
    profile: Option<Cached<Option<UserProfile>>>,
    favorites: Option<Cached<Vec<TrackId>>>,
    legacy_playlist: Option<Cached<Vec<TrackId>>>,
    playlist_names: Option<Cached<Vec<String>>>,
    active_playlist: Option<Cached<Vec<TrackId>>>,
}

impl QueryCache {
    fn evict(&mut self, key: QueryKey) {
        match key {
            QueryKey::Profile => self.profile = None,
            QueryKey::Favorites => self.favorites = None,
            QueryKey::LegacyPlaylist => self.legacy_playlist = None,
            QueryKey::PlaylistNames => self.playlist_names = None,
            QueryKey::ActivePlaylist => self.active_playlist = None,
        }
    }

    fn contains(&self, key: QueryKey) -> bool {
        match key {
            QueryKey::Profile => self.profile.is_some(),
            QueryKey::Favorites => self.favorites.is_some(),
            QueryKey::LegacyPlaylist => self.legacy_playlist.is_some(),
            QueryKey::PlaylistNames => self.playlist_names.is_some(),
            QueryKey::ActivePlaylist => self.active_playlist.is_some(),
        }
    }
}

type Slot<T> = fn(&mut QueryCache) -> &mut Option<Cached<T>>;

/// Guarded, cached access to the remote backend
pub struct RemoteClient {
    network: Arc<NetworkMonitor>,
    backend: RwLock<Option<Arc<dyn Backend>>>,
    cache: RwLock<QueryCache>,
}

impl RemoteClient {
    /// Create a client with no connection handle
    pub fn new(network: Arc<NetworkMonitor>) -> Self {
        Self {
            network,
            backend: RwLock::new(None),
            cache: RwLock::new(QueryCache::default()),
        }
    }

    pub fn network(&self) -> &Arc<NetworkMonitor> {
        &self.network
    }

    // ===== Connection lifecycle =====

    /// Install the connection handle
    pub async fn attach(&self, backend: Arc<dyn Backend>) {
        *self.backend.write().await = Some(backend);
        info!("Backend connection attached");
    }

    /// Drop the connection handle and everything cached through it
    pub async fn detach(&self) {
        *self.backend.write().await = None;
        self.clear_cache().await;
        info!("Backend connection detached");
    }

    pub async fn is_attached(&self) -> bool {
        self.backend.read().await.is_some()
    }

    pub async fn clear_cache(&self) {
        *self.cache.write().await = QueryCache::default();
    }

    /// Whether a value for `key` is cached, fresh or not
    pub async fn is_cached(&self, key: QueryKey) -> bool {
        self.cache.read().await.contains(key)
    }

    // ===== Profile =====

    /// The caller's profile
    ///
    /// `Ok(None)` means the profile was never set up; an error means it is
    /// unknown (no handle, offline with nothing cached, or the call failed).
    pub async fn profile(&self) -> Result<Option<UserProfile>> {
        self.read_through(Operation::LoadProfile, |c| &mut c.profile, |b| async move {
            b.get_caller_user_profile().await
        })
        .await
    }

    pub async fn save_profile(&self, profile: UserProfile) -> Result<()> {
        self.write(Operation::SaveProfile, &[QueryKey::Profile], |b| async move {
            b.save_caller_user_profile(profile).await
        })
        .await
    }

    // ===== Favorites =====

    pub async fn favorites(&self) -> Vec<TrackId> {
        let result = self
            .read_through(
                Operation::LoadFavorites,
                |c| &mut c.favorites,
                |b| async move { b.get_favorites().await },
            )
            .await;
        Self::or_empty(Operation::LoadFavorites, result)
    }

    pub async fn save_favorites(&self, favorites: Vec<TrackId>) -> Result<()> {
        self.write(Operation::SaveFavorites, &[QueryKey::Favorites], |b| async move {
            b.save_favorites(favorites).await
        })
        .await
    }

    // ===== Legacy playlist =====

    /// The single unnamed playlist of the previous data model
    pub async fn legacy_playlist(&self) -> Vec<TrackId> {
        let result = self
            .read_through(
                Operation::LoadLegacyPlaylist,
                |c| &mut c.legacy_playlist,
                |b| async move { b.get_playlist().await },
            )
            .await;
        Self::or_empty(Operation::LoadLegacyPlaylist, result)
    }

    pub async fn save_legacy_playlist(&self, tracks: Vec<TrackId>) -> Result<()> {
        self.write(
            Operation::SaveLegacyPlaylist,
            &[QueryKey::LegacyPlaylist],
            |b| async move { b.save_playlist(tracks).await },
        )
        .await
    }

    // ===== Named playlists =====

    pub async fn playlist_names(&self) -> Vec<String> {
        let result = self
            .read_through(
                Operation::LoadPlaylistNames,
                |c| &mut c.playlist_names,
                |b| async move { b.get_playlist_names().await },
            )
            .await;
        Self::or_empty(Operation::LoadPlaylistNames, result)
    }

    /// Tracks of a named playlist, fetched on demand
    ///
    /// Not cached, and errors propagate: multi-step actions need to know the
    /// read failed rather than act on an empty list.
    pub async fn playlist_by_name(&self, name: &str) -> Result<Vec<TrackId>> {
        let backend = self.read_guard(Operation::LoadPlaylist).await?;
        let name = name.to_string();
        self.call(Operation::LoadPlaylist, async move {
            backend.get_playlist_by_name(&name).await
        })
        .await
    }

    /// Create or replace a named playlist
    pub async fn save_playlist_by_name(&self, name: &str, tracks: Vec<TrackId>) -> Result<()> {
        let name = name.to_string();
        self.write(
            Operation::SavePlaylist,
            &[QueryKey::PlaylistNames, QueryKey::ActivePlaylist],
            |b| async move { b.save_playlist_by_name(&name, tracks).await },
        )
        .await
    }

    pub async fn delete_playlist(&self, name: &str) -> Result<()> {
        let name = name.to_string();
        self.write(
            Operation::DeletePlaylist,
            &[QueryKey::PlaylistNames, QueryKey::ActivePlaylist],
            |b| async move { b.delete_playlist(&name).await },
        )
        .await
    }

    // ===== Active playlist =====

    pub async fn active_playlist(&self) -> Vec<TrackId> {
        let result = self
            .read_through(
                Operation::LoadActivePlaylist,
                |c| &mut c.active_playlist,
                |b| async move { b.get_active_playlist().await },
            )
            .await;
        Self::or_empty(Operation::LoadActivePlaylist, result)
    }

    pub async fn set_active_playlist(&self, name: &str) -> Result<()> {
        let name = name.to_string();
        self.write(
            Operation::SetActivePlaylist,
            &[QueryKey::ActivePlaylist],
            |b| async move { b.set_active_playlist(&name).await },
        )
        .await
    }

    // ===== Internals =====

    async fn backend(&self) -> Result<Arc<dyn Backend>> {
        self.backend
            .read()
            .await
            .clone()
            .ok_or(SyncError::NotConnected)
    }

    /// Connectivity guard for writes: handle first, then network
    async fn guard(&self, op: Operation) -> Result<Arc<dyn Backend>> {
        let backend = self.backend().await?;
        if !self.network.is_online() {
            debug!(op = %op, "Rejected while offline");
            return Err(SyncError::Offline(op));
        }
        Ok(backend)
    }

    /// Connectivity guard for reads; lets probes through a provisional outage
    async fn read_guard(&self, op: Operation) -> Result<Arc<dyn Backend>> {
        let backend = self.backend().await?;
        if !self.network.status().allows_probe() {
            debug!(op = %op, "Rejected while offline");
            return Err(SyncError::Offline(op));
        }
        Ok(backend)
    }

    /// Await a backend call and report its outcome to the network monitor
    async fn call<T, Fut>(&self, op: Operation, fut: Fut) -> Result<T>
    where
        Fut: Future<Output = BackendResult<T>>,
    {
        match fut.await {
            Ok(value) => {
                self.network.report_success();
                Ok(value)
            }
            Err(source) => {
                if source.is_connectivity() {
                    self.network.report_failure();
                }
                warn!(op = %op, error = %source, "Remote call failed");
                Err(SyncError::Remote { op, source })
            }
        }
    }

    async fn read_through<T, F, Fut>(&self, op: Operation, slot: Slot<T>, fetch: F) -> Result<T>
    where
        T: Clone,
        F: FnOnce(Arc<dyn Backend>) -> Fut,
        Fut: Future<Output = BackendResult<T>>,
    {
        let status = self.network.status();
        let cached = slot(&mut *self.cache.write().await).clone();

        if let Some(entry) = &cached {
            let fresh = status.online && entry.epoch == status.epoch;
            if fresh || !status.allows_probe() {
                return Ok(entry.value.clone());
            }
        }

        let backend = self.read_guard(op).await?;
        let value = match self.call(op, fetch(backend)).await {
            Ok(value) => value,
            Err(e) => {
                return match cached {
                    Some(entry) if !self.network.is_online() => {
                        debug!(op = %op, "Backend unreachable, serving cached value");
                        Ok(entry.value)
                    }
                    _ => Err(e),
                };
            }
        };

        // A probe that succeeded opened a new epoch; otherwise tag with the
        // epoch we fetched under, in case a reconnect raced the call
        let epoch = if status.online {
            status.epoch
        } else {
            self.network.status().epoch
        };
        *slot(&mut *self.cache.write().await) = Some(Cached {
            value: value.clone(),
            epoch,
        });
        Ok(value)
    }

    async fn write<F, Fut>(&self, op: Operation, invalidates: &[QueryKey], run: F) -> Result<()>
    where
        F: FnOnce(Arc<dyn Backend>) -> Fut,
        Fut: Future<Output = BackendResult<()>>,
    {
        let backend = self.guard(op).await?;
        self.call(op, run(backend)).await?;

        let mut cache = self.cache.write().await;
        for key in invalidates {
            cache.evict(*key);
        }
        debug!(op = %op, invalidated = ?invalidates, "Write applied");
        Ok(())
    }

    fn or_empty<T: Default>(op: Operation, result: Result<T>) -> T {
        match result {
            Ok(value) => value,
            Err(e) if e.is_guard() => {
                debug!(op = %op, reason = %e, "Read skipped");
                T::default()
            }
            Err(e) => {
                warn!(op = %op, error = %e, "Read failed, using empty result");
                T::default()
            }
        }
    }
}
