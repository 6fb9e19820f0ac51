//! Nothing Player Server Client
//!
//! HTTP transport for the remote persistence contract (`nothing_core::Backend`).
//!
//! # Features
//!
//! - **Profile**: caller profile read/write
//! - **Favorites**: ordered favorite track ids
//! - **Playlists**: legacy single playlist, named playlists, active playlist
//!
//! Connectivity gating and caching are not done here; wrap the backend in
//! `nothing_sync::RemoteClient`.
//!
//! # Example
//!
//! ```ignore
//! use nothing_server_client::{HttpBackend, ServerConfig};
//! use nothing_sync::{NetworkMonitor, RemoteClient};
//! use std::sync::Arc;
//!
//! let backend = HttpBackend::new(ServerConfig::with_token("https://music.example.com", token))?;
//! let client = RemoteClient::new(Arc::new(NetworkMonitor::new(true)));
//! client.attach(Arc::new(backend)).await;
//! ```

mod client;
mod error;
mod types;

// Re-export main types
pub use client::HttpBackend;
pub use error::{Result, ServerClientError};
pub use types::ServerConfig;
