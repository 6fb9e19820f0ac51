//! In-memory backend shared by the sync integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use nothing_core::{Backend, BackendError, BackendResult, TrackId, UserProfile};
use nothing_sync::{NetworkMonitor, RemoteClient};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Server-side data for one user
#[derive(Debug, Default)]
pub struct FakeState {
    pub profile: Option<UserProfile>,
    pub favorites: Vec<TrackId>,
    pub legacy: Vec<TrackId>,
    pub playlists: Vec<(String, Vec<TrackId>)>,
    pub active: Option<String>,

    /// Every call, by backend method name
    pub calls: Vec<&'static str>,
    /// Methods that answer with a server error
    pub failing: HashSet<&'static str>,
    /// Every call fails as unreachable
    pub unreachable: bool,
}

impl FakeState {
    pub fn playlist(&self, name: &str) -> Option<&Vec<TrackId>> {
        self.playlists
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, tracks)| tracks)
    }

    pub fn names(&self) -> Vec<String> {
        self.playlists.iter().map(|(n, _)| n.clone()).collect()
    }
}

/// Backend that keeps its data in memory and records every call
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with(setup: impl FnOnce(&mut FakeState)) -> Arc<Self> {
        let backend = Self::default();
        setup(&mut backend.state.lock().unwrap());
        Arc::new(backend)
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state().calls.clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.state().calls.iter().filter(|c| **c == method).count()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn fail(&self, method: &'static str) {
        self.state().failing.insert(method);
    }

    fn enter(&self, method: &'static str) -> BackendResult<MutexGuard<'_, FakeState>> {
        let mut state = self.state();
        state.calls.push(method);
        if state.unreachable {
            return Err(BackendError::Unreachable("connection refused".into()));
        }
        if state.failing.contains(method) {
            return Err(BackendError::Server {
                status: 500,
                message: format!("{} failed", method),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn get_caller_user_profile(&self) -> BackendResult<Option<UserProfile>> {
        Ok(self.enter("getCallerUserProfile")?.profile.clone())
    }

    async fn save_caller_user_profile(&self, profile: UserProfile) -> BackendResult<()> {
        self.enter("saveCallerUserProfile")?.profile = Some(profile);
        Ok(())
    }

    async fn get_favorites(&self) -> BackendResult<Vec<TrackId>> {
        Ok(self.enter("getFavorites")?.favorites.clone())
    }

    async fn save_favorites(&self, favorites: Vec<TrackId>) -> BackendResult<()> {
        self.enter("saveFavorites")?.favorites = favorites;
        Ok(())
    }

    async fn get_playlist(&self) -> BackendResult<Vec<TrackId>> {
        Ok(self.enter("getPlaylist")?.legacy.clone())
    }

    async fn save_playlist(&self, tracks: Vec<TrackId>) -> BackendResult<()> {
        self.enter("savePlaylist")?.legacy = tracks;
        Ok(())
    }

    async fn get_playlist_names(&self) -> BackendResult<Vec<String>> {
        Ok(self.enter("getPlaylistNames")?.names())
    }

    async fn get_playlist_by_name(&self, name: &str) -> BackendResult<Vec<TrackId>> {
        let state = self.enter("getPlaylistByName")?;
        state.playlist(name).cloned().ok_or(BackendError::Server {
            status: 404,
            message: format!("no playlist {}", name),
        })
    }

    async fn save_playlist_by_name(&self, name: &str, tracks: Vec<TrackId>) -> BackendResult<()> {
        let mut state = self.enter("savePlaylistByName")?;
        match state.playlists.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = tracks,
            None => state.playlists.push((name.to_string(), tracks)),
        }
        Ok(())
    }

    async fn delete_playlist(&self, name: &str) -> BackendResult<()> {
        let mut state = self.enter("deletePlaylist")?;
        state.playlists.retain(|(n, _)| n != name);
        if state.active.as_deref() == Some(name) {
            state.active = None;
        }
        Ok(())
    }

    async fn get_active_playlist(&self) -> BackendResult<Vec<TrackId>> {
        let state = self.enter("getActivePlaylist")?;
        Ok(state
            .active
            .as_deref()
            .and_then(|name| state.playlist(name))
            .cloned()
            .unwrap_or_default())
    }

    async fn set_active_playlist(&self, name: &str) -> BackendResult<()> {
        let mut state = self.enter("setActivePlaylist")?;
        if state.playlist(name).is_none() {
            return Err(BackendError::Server {
                status: 404,
                message: format!("no playlist {}", name),
            });
        }
        state.active = Some(name.to_string());
        Ok(())
    }
}

pub fn ids(raw: &[&str]) -> Vec<TrackId> {
    raw.iter().map(|id| TrackId::new(*id)).collect()
}

/// Online client attached to `backend`
pub async fn attached_client(backend: &Arc<FakeBackend>) -> (Arc<RemoteClient>, Arc<NetworkMonitor>) {
    let network = Arc::new(NetworkMonitor::new(true));
    let client = Arc::new(RemoteClient::new(network.clone()));
    client.attach(backend.clone()).await;
    (client, network)
}
