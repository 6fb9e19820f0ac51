//! Network status monitor
//!
//! Single source of truth for "can we reach the backend". Fed by native
//! connectivity notifications (`set_online`) and by the outcome of remote
//! calls (`report_success` / `report_failure`). Consumers subscribe to a
//! watch channel and re-evaluate gated logic when it changes; nothing polls.
//!
//! Offline caused by a failed call is provisional: reads keep reaching the
//! backend, and the first one that succeeds brings the monitor back online.
//! Offline reported by the platform blocks all I/O until the platform says
//! otherwise.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

/// Why the monitor went offline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfflineCause {
    /// Native connectivity notification
    Platform,
    /// A remote call could not reach the backend
    Unreachable,
}

/// Current connectivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStatus {
    pub online: bool,

    /// Set while offline
    pub cause: Option<OfflineCause>,

    /// Number of offline -> online transitions so far
    ///
    /// Cached reads remember the epoch they were fetched in; a new epoch
    /// means everything cached before the outage is stale.
    pub epoch: u64,
}

impl NetworkStatus {
    /// Whether reads may still try the backend
    pub fn allows_probe(&self) -> bool {
        self.online || self.cause == Some(OfflineCause::Unreachable)
    }
}

/// Event-driven online/offline signal
#[derive(Debug)]
pub struct NetworkMonitor {
    tx: watch::Sender<NetworkStatus>,
}

impl NetworkMonitor {
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(NetworkStatus {
            online: initially_online,
            cause: (!initially_online).then_some(OfflineCause::Platform),
            epoch: 0,
        });
        Self { tx }
    }

    pub fn is_online(&self) -> bool {
        self.tx.borrow().online
    }

    pub fn status(&self) -> NetworkStatus {
        *self.tx.borrow()
    }

    /// Receive every status change
    pub fn subscribe(&self) -> watch::Receiver<NetworkStatus> {
        self.tx.subscribe()
    }

    /// Native connectivity-change notification
    pub fn set_online(&self, online: bool) {
        if online {
            self.go_online();
        } else {
            self.go_offline(OfflineCause::Platform);
        }
    }

    /// A remote call completed, so the backend is reachable
    pub fn report_success(&self) {
        self.go_online();
    }

    /// A remote call failed at the transport level
    ///
    /// Does not override an offline state reported by the platform.
    pub fn report_failure(&self) {
        self.go_offline(OfflineCause::Unreachable);
    }

    fn go_online(&self) {
        let changed = self.tx.send_if_modified(|status| {
            if status.online {
                return false;
            }
            status.online = true;
            status.cause = None;
            status.epoch += 1;
            true
        });

        if changed {
            let epoch = self.tx.borrow().epoch;
            info!(epoch, "Network back online");
        }
    }

    fn go_offline(&self, cause: OfflineCause) {
        let changed = self.tx.send_if_modified(|status| {
            match (status.online, status.cause) {
                (true, _) => {}
                // A platform report upgrades a provisional outage
                (false, Some(OfflineCause::Unreachable)) if cause == OfflineCause::Platform => {}
                _ => return false,
            }
            status.online = false;
            status.cause = Some(cause);
            true
        });

        if changed {
            info!(?cause, "Network offline");
        }
    }
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}
