//! Desktop launcher, package registry, and platform integration defaults.

use async_trait::async_trait;

use forgestore_core::ports::{
    AppLauncher, LaunchError, LaunchPayload, PackageRegistry, PlatformIntegration, SpawnError,
};

use super::TokioCommandSpawner;
use forgestore_core::ports::CommandSpawner;

/// The platform's URL/file opener command.
const fn opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}

/// Launcher backed by the platform opener command.
///
/// Desktop OSes have no notion of launching a target by package identity,
/// so [`AppLauncher::open_in_package`] and [`AppLauncher::launch_app`]
/// report `NoHandler`; mobile shells provide the real implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopLauncher;

impl DesktopLauncher {
    async fn open(&self, target: &str) -> Result<(), LaunchError> {
        match TokioCommandSpawner
            .spawn_detached(opener(), &[target.to_string()])
            .await
        {
            Ok(()) => Ok(()),
            Err(SpawnError::ToolNotFound { .. }) => Err(LaunchError::NoHandler),
            Err(SpawnError::Failed { detail, .. }) => Err(LaunchError::Failed(detail)),
        }
    }
}

#[async_trait]
impl AppLauncher for DesktopLauncher {
    async fn open_in_package(
        &self,
        _package: &str,
        _payload: &LaunchPayload,
    ) -> Result<(), LaunchError> {
        Err(LaunchError::NoHandler)
    }

    async fn open_default(&self, payload: &LaunchPayload) -> Result<(), LaunchError> {
        match payload {
            LaunchPayload::File(path) => self.open(&path.display().to_string()).await,
            LaunchPayload::Url(url) => self.open(url).await,
        }
    }

    async fn launch_app(&self, _package: &str) -> Result<(), LaunchError> {
        Err(LaunchError::NoHandler)
    }
}

/// Registry for platforms without a package identity database.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopPackageRegistry;

#[async_trait]
impl PackageRegistry for NoopPackageRegistry {
    async fn is_package_installed(&self, _identity: &str) -> bool {
        false
    }
}

/// Integration for platforms without an unknown-sources gate: installs may
/// always be requested, and there is no settings surface to open.
#[derive(Clone, Copy, Debug, Default)]
pub struct PermissiveIntegration;

#[async_trait]
impl PlatformIntegration for PermissiveIntegration {
    async fn can_request_package_installs(&self) -> bool {
        true
    }

    async fn open_install_settings(&self) -> Result<(), LaunchError> {
        Err(LaunchError::NoHandler)
    }
}
