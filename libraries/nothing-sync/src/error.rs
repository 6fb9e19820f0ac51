use crate::client::Operation;
use crate::library::{LibraryAction, RenameStep};
use nothing_core::BackendError;
use thiserror::Error;

/// Errors raised by the remote persistence client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// No connection handle is attached
    #[error("Actor not available")]
    NotConnected,

    /// The network monitor reports offline; no I/O was attempted
    #[error("Cannot {0} while offline")]
    Offline(Operation),

    /// The backend rejected or failed the call
    #[error("Failed to {op}: {source}")]
    Remote {
        op: Operation,
        #[source]
        source: BackendError,
    },
}

impl SyncError {
    /// Whether the error was raised locally by the connectivity guard
    pub fn is_guard(&self) -> bool {
        matches!(self, Self::NotConnected | Self::Offline(_))
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors surfaced to the user by library mutations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LibraryError {
    #[error("You're offline. Connect to the internet to {0}.")]
    Offline(LibraryAction),

    #[error("Playlist name cannot be empty")]
    EmptyPlaylistName,

    #[error("A playlist named \"{0}\" already exists")]
    DuplicatePlaylist(String),

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    #[error("Profile name cannot be empty")]
    EmptyProfileName,

    #[error("Could not {action}: {source}")]
    Sync {
        action: LibraryAction,
        #[source]
        source: SyncError,
    },

    /// Rename is a create/activate/delete sequence with no rollback. Steps up
    /// to `completed` are persisted; the backend may now hold both names.
    #[error("Renaming \"{from}\" to \"{to}\" stopped after {completed}: {source}")]
    PartialRename {
        from: String,
        to: String,
        completed: RenameStep,
        #[source]
        source: SyncError,
    },
}

pub type LibraryResult<T> = std::result::Result<T, LibraryError>;
