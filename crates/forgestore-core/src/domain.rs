//! Domain types consumed and produced by the installation engine.

use serde::{Deserialize, Serialize};

/// A single downloadable file attached to a forge release.
///
/// Produced by the release-metadata collaborator and consumed read-only by
/// the engine; identity is `id`, and `name` is the only field architecture
/// matching looks at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    /// Forge-assigned asset ID.
    pub id: i64,
    /// File name of the asset.
    pub name: String,
    /// MIME content type reported by the forge.
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Direct download URL.
    pub download_url: String,
    /// Login of the user who uploaded the asset.
    pub uploader: String,
}

/// Connection state of the privileged broker's binder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinderStatus {
    /// No binder event observed yet.
    #[default]
    Unknown,
    /// Binder handle received, availability check pending.
    Received,
    /// Binder pinged successfully.
    Alive,
    /// Binder gone or ping failed.
    Dead,
    /// Availability check itself failed.
    Error,
}

/// Instantaneous snapshot of whether the privileged install path is usable.
///
/// Written only by the broker client (its notification listener and its
/// explicit availability checks); every reader takes a snapshot and must
/// never block waiting for it to settle.
/// Invariant: `has_permission` is only ever `true` while `is_broker_running`
/// is `true`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerAvailability {
    /// The broker process is reachable.
    pub is_broker_running: bool,
    /// The user has granted this app the broker permission.
    pub has_permission: bool,
    /// Last observed binder state.
    pub binder_status: BinderStatus,
}

impl BrokerAvailability {
    /// Whether the privileged install path can be used right now.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.is_broker_running && self.has_permission
    }

    /// Snapshot for a dead or unreachable broker. Zeroes both flags in one
    /// value so no reader can observe permission without liveness.
    #[must_use]
    pub const fn dead() -> Self {
        Self {
            is_broker_running: false,
            has_permission: false,
            binder_status: BinderStatus::Dead,
        }
    }

    /// Snapshot for a failed availability check.
    #[must_use]
    pub const fn errored() -> Self {
        Self {
            is_broker_running: false,
            has_permission: false,
            binder_status: BinderStatus::Error,
        }
    }

    /// Snapshot for a live broker with the given permission state.
    #[must_use]
    pub const fn alive(has_permission: bool) -> Self {
        Self {
            is_broker_running: true,
            has_permission,
            binder_status: BinderStatus::Alive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_requires_both_flags() {
        assert!(BrokerAvailability::alive(true).is_available());
        assert!(!BrokerAvailability::alive(false).is_available());
        assert!(!BrokerAvailability::dead().is_available());
        assert!(!BrokerAvailability::errored().is_available());
    }

    #[test]
    fn dead_snapshot_zeroes_permission() {
        let dead = BrokerAvailability::dead();
        assert!(!dead.is_broker_running);
        assert!(!dead.has_permission);
        assert_eq!(dead.binder_status, BinderStatus::Dead);
    }
}
