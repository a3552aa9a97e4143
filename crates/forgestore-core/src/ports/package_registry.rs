//! Installed-package registry trait definition.

use async_trait::async_trait;

/// Query for locally installed applications by identity.
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Whether a package with this identity is installed.
    async fn is_package_installed(&self, identity: &str) -> bool;
}
