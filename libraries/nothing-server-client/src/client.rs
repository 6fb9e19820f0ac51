//! HTTP implementation of the remote persistence contract.

use crate::error::{Result, ServerClientError};
use crate::types::{
    FavoritesArgs, NameArgs, NamedTracksArgs, NoArgs, PlaylistArgs, ProfileArgs, ServerConfig,
};
use async_trait::async_trait;
use nothing_core::{Backend, BackendError, BackendResult, TrackId, UserProfile};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Remote persistence over JSON/HTTP.
///
/// Each contract method becomes `POST {url}/api/rpc/{method}` with the
/// method's arguments as a JSON object and the bearer token, when set, in the
/// `Authorization` header. The response body is the JSON-encoded result.
///
/// # Example
///
/// ```ignore
/// use nothing_core::Backend;
/// use nothing_server_client::{HttpBackend, ServerConfig};
///
/// let backend = HttpBackend::new(ServerConfig::with_token("https://music.example.com", "token"))?;
/// let names = backend.get_playlist_names().await?;
/// println!("{} playlists", names.len());
/// ```
pub struct HttpBackend {
    http: Client,
    config: Arc<RwLock<ServerConfig>>,
}

impl HttpBackend {
    /// Create a new client with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        // Validate URL
        if config.url.trim().is_empty() {
            return Err(ServerClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let url = config.url.trim().trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ServerClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let normalized_config = ServerConfig {
            url,
            access_token: config.access_token,
        };

        // Create HTTP client with reasonable defaults
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("NothingPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(normalized_config)),
        })
    }

    /// Get the server URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Check if the client has an access token.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.access_token.is_some()
    }

    /// Replace the caller's token.
    pub async fn set_token(&self, access_token: impl Into<String>) {
        self.config.write().await.access_token = Some(access_token.into());
    }

    /// Clear the stored token (sign out).
    pub async fn clear_token(&self) {
        self.config.write().await.access_token = None;
        info!("Access token cleared");
    }

    /// Invoke one remote method.
    async fn rpc<A, T>(&self, method: &str, args: &A) -> BackendResult<T>
    where
        A: Serialize + Sync,
        T: DeserializeOwned,
    {
        let config = self.config.read().await;
        let url = format!("{}/api/rpc/{}", config.url, method);
        let token = config.access_token.clone();
        drop(config);

        debug!(url = %url, method, "Calling backend");

        let mut request = self.http.post(&url).json(args);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| match e.status() {
            Some(status) => BackendError::Server {
                status: status.as_u16(),
                message: e.to_string(),
            },
            // Refused, reset or timed out: no response reached us
            None => {
                warn!(method, error = %e, "Backend unreachable");
                BackendError::Unreachable(e.to_string())
            }
        })?;

        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| BackendError::Unreachable(e.to_string()))?;
            // Unit results may come back as an empty body
            let body = if body.trim().is_empty() { "null" } else { &body };
            serde_json::from_str(body).map_err(|e| {
                BackendError::Parse(format!("Failed to parse {} response: {}", method, e))
            })
        } else if status == StatusCode::UNAUTHORIZED {
            Err(BackendError::Unauthorized)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(BackendError::Server {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get_caller_user_profile(&self) -> BackendResult<Option<UserProfile>> {
        self.rpc("getCallerUserProfile", &NoArgs {}).await
    }

    async fn save_caller_user_profile(&self, profile: UserProfile) -> BackendResult<()> {
        self.rpc("saveCallerUserProfile", &ProfileArgs { profile })
            .await
    }

    async fn get_favorites(&self) -> BackendResult<Vec<TrackId>> {
        self.rpc("getFavorites", &NoArgs {}).await
    }

    async fn save_favorites(&self, favorites: Vec<TrackId>) -> BackendResult<()> {
        self.rpc("saveFavorites", &FavoritesArgs { favorites })
            .await
    }

    async fn get_playlist(&self) -> BackendResult<Vec<TrackId>> {
        self.rpc("getPlaylist", &NoArgs {}).await
    }

    async fn save_playlist(&self, tracks: Vec<TrackId>) -> BackendResult<()> {
        self.rpc("savePlaylist", &PlaylistArgs { playlist: tracks })
            .await
    }

    async fn get_playlist_names(&self) -> BackendResult<Vec<String>> {
        self.rpc("getPlaylistNames", &NoArgs {}).await
    }

    async fn get_playlist_by_name(&self, name: &str) -> BackendResult<Vec<TrackId>> {
        self.rpc("getPlaylistByName", &NameArgs { name }).await
    }

    async fn save_playlist_by_name(&self, name: &str, tracks: Vec<TrackId>) -> BackendResult<()> {
        self.rpc("savePlaylistByName", &NamedTracksArgs { name, tracks })
            .await
    }

    async fn delete_playlist(&self, name: &str) -> BackendResult<()> {
        self.rpc("deletePlaylist", &NameArgs { name }).await
    }

    async fn get_active_playlist(&self) -> BackendResult<Vec<TrackId>> {
        self.rpc("getActivePlaylist", &NoArgs {}).await
    }

    async fn set_active_playlist(&self, name: &str) -> BackendResult<()> {
        self.rpc("setActivePlaylist", &NameArgs { name }).await
    }
}
