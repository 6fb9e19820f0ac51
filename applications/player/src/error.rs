/// Player error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlayerError>;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] nothing_core::CoreError),

    #[error("Server client error: {0}")]
    Client(#[from] nothing_server_client::ServerClientError),

    #[error("Playback error: {0}")]
    Playback(#[from] nothing_playback::PlaybackError),

    #[error("{0}")]
    Library(#[from] nothing_sync::LibraryError),
}
