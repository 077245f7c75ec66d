//! Device directory fed by asynchronous discovery notifications
//!
//! This module handles:
//! - Applying add/remove notifications from the discovery collaborator
//! - Producing sorted point-in-time snapshots for listing and resolution
//! - Resolving user-supplied device tokens (`#N` ordinal or name prefix)

mod resolve;

pub use resolve::{resolve, ResolveError};

use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

/// A device known to the directory. The id is an opaque handle owned by the
/// discovery collaborator; the display name may be empty for devices that
/// have not advertised one yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: String,
    pub name: String,
}

impl DeviceInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Notifications emitted by the discovery collaborator
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    /// A device appeared in range
    Added(DeviceInfo),
    /// The device with this id went away
    Removed(String),
}

/// Ordered, mutable set of known devices, keyed by opaque id.
///
/// Mutations come in over a channel from the discovery flow and are applied
/// behind a lock, so interpreter snapshots never observe a half-applied
/// notification.
#[derive(Clone, Default)]
pub struct DeviceDirectory {
    devices: Arc<RwLock<Vec<DeviceInfo>>>,
}

impl DeviceDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the task that applies discovery notifications
    pub fn attach(&self, mut events: mpsc::Receiver<DeviceEvent>) -> tokio::task::JoinHandle<()> {
        let directory = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                directory.apply(event).await;
            }
            debug!("[DIR] discovery feed closed");
        })
    }

    /// Apply a single notification
    pub async fn apply(&self, event: DeviceEvent) {
        let mut devices = self.devices.write().await;
        match event {
            DeviceEvent::Added(info) => {
                if !devices.iter().any(|d| d.id == info.id) {
                    debug!("[DIR] device added: {} ({})", info.name, info.id);
                    devices.push(info);
                }
            }
            DeviceEvent::Removed(id) => {
                debug!("[DIR] device removed: {}", id);
                devices.retain(|d| d.id != id);
            }
        }
    }

    /// Point-in-time copy of the directory, sorted by display name ascending.
    ///
    /// Unnamed devices are kept so that `#N` ordinals stay aligned with the
    /// full sorted set; name-based listings filter them out afterwards.
    pub async fn snapshot(&self) -> Vec<DeviceInfo> {
        let mut devices = self.devices.read().await.clone();
        devices.sort_by(|a, b| a.name.cmp(&b.name));
        devices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_sorted_by_name() {
        let dir = DeviceDirectory::new();
        dir.apply(DeviceEvent::Added(DeviceInfo::new("id-2", "Beta"))).await;
        dir.apply(DeviceEvent::Added(DeviceInfo::new("id-1", "Alpha"))).await;
        dir.apply(DeviceEvent::Added(DeviceInfo::new("id-3", "Bravo"))).await;

        let names: Vec<_> = dir.snapshot().await.into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Bravo"]);
    }

    #[tokio::test]
    async fn test_duplicate_add_ignored() {
        let dir = DeviceDirectory::new();
        dir.apply(DeviceEvent::Added(DeviceInfo::new("id-1", "Alpha"))).await;
        dir.apply(DeviceEvent::Added(DeviceInfo::new("id-1", "Alpha"))).await;
        assert_eq!(dir.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_by_id() {
        let dir = DeviceDirectory::new();
        dir.apply(DeviceEvent::Added(DeviceInfo::new("id-1", "Alpha"))).await;
        dir.apply(DeviceEvent::Added(DeviceInfo::new("id-2", "Beta"))).await;
        dir.apply(DeviceEvent::Removed("id-1".into())).await;

        let snapshot = dir.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].name, "Beta");
    }

    #[tokio::test]
    async fn test_unnamed_devices_keep_ordinal_positions() {
        let dir = DeviceDirectory::new();
        dir.apply(DeviceEvent::Added(DeviceInfo::new("id-1", "Alpha"))).await;
        dir.apply(DeviceEvent::Added(DeviceInfo::new("id-2", ""))).await;

        // Empty names sort first, so the unnamed device takes ordinal 0.
        let snapshot = dir.snapshot().await;
        assert_eq!(snapshot[0].name, "");
        assert_eq!(snapshot[1].name, "Alpha");
    }

    #[tokio::test]
    async fn test_attach_applies_events_from_channel() {
        let dir = DeviceDirectory::new();
        let (tx, rx) = mpsc::channel(4);
        let handle = dir.attach(rx);

        tx.send(DeviceEvent::Added(DeviceInfo::new("id-1", "Alpha")))
            .await
            .unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(dir.snapshot().await.len(), 1);
    }
}
