//! Nothing Player Core
//!
//! Platform-agnostic core types, the bundled track catalog and the remote
//! persistence contract for Nothing Player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, `UserProfile`
//! - **Track Catalog**: the fixed, build-time list of playable tracks
//! - **Core Traits**: `Backend`, the identity-scoped remote contract
//! - **Error Handling**: `CoreError` for local failures, `BackendError` for the remote side
//!
//! # Example
//!
//! ```rust
//! use nothing_core::{format_time, TrackCatalog};
//!
//! let catalog = TrackCatalog::builtin();
//! let first = &catalog.tracks()[0];
//!
//! assert!(catalog.get_track_by_id(first.id.as_str()).is_some());
//! assert_eq!(format_time(75.0), "1:15");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use catalog::{format_time, TrackCatalog};
pub use error::{BackendError, CoreError, Result};
pub use traits::{Backend, BackendResult};
pub use types::{Track, TrackId, UserProfile};
