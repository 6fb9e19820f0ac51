//! Nothing Player - Remote Sync
//!
//! Everything between the UI and the remote backend:
//! - `NetworkMonitor`: event-driven online/offline signal
//! - `RemoteClient`: connectivity guard and read-through cache over a `Backend`
//! - `LibraryViewModel`: profile, favorites and playlists, with legacy
//!   migration, active-playlist bootstrap and empty-playlist seeding

mod client;
mod error;
mod library;
mod network;

// Public exports
pub use client::{Operation, QueryKey, RemoteClient};
pub use error::{LibraryError, LibraryResult, Result, SyncError};
pub use library::{
    Direction, LibraryAction, LibraryViewModel, MutationOutcome, RenameStep,
    MIGRATED_PLAYLIST_NAME,
};
pub use network::{NetworkMonitor, NetworkStatus, OfflineCause};
