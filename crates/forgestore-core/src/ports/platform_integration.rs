//! Platform integration trait definition.
//!
//! Covers the platform-specific permission surface the preflight check
//! needs: whether this process may trigger package installs, and opening
//! the settings screen where the user can grant it.

use async_trait::async_trait;

use super::LaunchError;

/// Permission surface of the embedding platform.
#[async_trait]
pub trait PlatformIntegration: Send + Sync {
    /// Whether this process is allowed to trigger package installs
    /// (e.g. the unknown-sources grant on mobile platforms).
    async fn can_request_package_installs(&self) -> bool;

    /// Open the settings surface where the user can grant the install
    /// permission. Called at most once per failed preflight.
    async fn open_install_settings(&self) -> Result<(), LaunchError>;
}
