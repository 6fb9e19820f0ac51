/// Application context
use crate::config::PlayerConfig;
use crate::error::Result;
use crate::media::HeadlessMedia;
use nothing_core::{Backend, TrackCatalog};
use nothing_playback::{MediaEvent, PlaybackController};
use nothing_server_client::{HttpBackend, ServerConfig};
use nothing_sync::{LibraryViewModel, NetworkMonitor, RemoteClient};
use std::sync::Arc;
use tracing::info;

/// Everything the player runs on, wired together
///
/// Owns the connection lifecycle (attach/detach of the backend) and keeps
/// the controller's play queue in step with the library.
pub struct AppContext {
    pub catalog: Arc<TrackCatalog>,
    pub network: Arc<NetworkMonitor>,
    pub client: Arc<RemoteClient>,
    library: LibraryViewModel,
    pub controller: PlaybackController,
}

impl AppContext {
    pub fn new(config: &PlayerConfig) -> Result<Self> {
        let catalog = match &config.library.catalog_path {
            Some(path) => TrackCatalog::from_json_file(path)?,
            None => TrackCatalog::builtin(),
        };
        let catalog = Arc::new(catalog);
        info!(tracks = catalog.len(), "Catalog loaded");

        let network = Arc::new(NetworkMonitor::new(config.network.start_online));
        let client = Arc::new(RemoteClient::new(Arc::clone(&network)));
        let library = LibraryViewModel::new(Arc::clone(&catalog), Arc::clone(&client));
        let controller = PlaybackController::new(
            Arc::clone(&catalog),
            Box::new(HeadlessMedia::new(&catalog)),
            config.playback_config(),
        );

        Ok(Self {
            catalog,
            network,
            client,
            library,
            controller,
        })
    }

    /// Open a signed-in session from the configured credentials
    ///
    /// Returns `false` (local-only) when no credentials are configured.
    pub async fn connect(&mut self, config: &PlayerConfig) -> Result<bool> {
        let (Some(url), Some(token)) = (&config.server.url, &config.server.access_token) else {
            info!("No server credentials, running local-only");
            return Ok(false);
        };

        let backend = HttpBackend::new(ServerConfig::with_token(url.as_str(), token.as_str()))?;
        self.sign_in(Arc::new(backend)).await;
        Ok(true)
    }

    /// Attach a backend and load the user's library
    pub async fn sign_in(&mut self, backend: Arc<dyn Backend>) {
        self.client.attach(backend).await;
        self.library.sign_in().await;
        self.sync_queue();
    }

    /// Close the session; playback continues on the catalog
    pub async fn sign_out(&mut self) {
        self.library.sign_out().await;
        self.client.detach().await;
        self.sync_queue();
    }

    /// Native connectivity change
    ///
    /// Coming back online refetches everything, since cached reads from the
    /// previous epoch are no longer served.
    pub async fn set_online(&mut self, online: bool) {
        let was_online = self.network.is_online();
        self.network.set_online(online);
        if online && !was_online {
            self.refresh().await;
        }
    }

    pub async fn refresh(&mut self) {
        self.library.refresh().await;
        self.sync_queue();
    }

    /// Push the library's play queue into the controller
    pub fn sync_queue(&mut self) {
        self.controller.set_queue(self.library.queue());
    }

    /// Report the headless source as ready
    ///
    /// `HeadlessMedia` loads synchronously and has no event stream, so the
    /// readiness notifications a native element would send are delivered here.
    pub fn settle_media(&mut self) {
        if !self.controller.state().is_loading {
            return;
        }
        if let Some(duration) = self.controller.current_track().map(|t| t.duration) {
            self.controller
                .handle_media_event(MediaEvent::DurationChanged(duration));
        }
        self.controller.handle_media_event(MediaEvent::CanPlay);
    }

    pub fn library(&self) -> &LibraryViewModel {
        &self.library
    }

    /// Mutable library access; call `sync_queue` after a mutation
    pub fn library_mut(&mut self) -> &mut LibraryViewModel {
        &mut self.library
    }
}
