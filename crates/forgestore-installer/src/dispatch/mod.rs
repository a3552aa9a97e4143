//! Installer dispatcher - strategy selection and per-OS standard installs.
//!
//! One install call runs `SelectStrategy → {Privileged | Standard} →
//! Result`: if the broker's privileged path is usable the call delegates to
//! the broker session and returns its progress stream; otherwise the
//! platform's standard install action runs. Standard actions launch
//! external processes fire-and-forget; the engine never waits for the
//! spawned installer to exit.

mod appimage;
mod platform;
mod standard;

pub use platform::{Mechanism, Platform, TERMINALS};

use std::fmt;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use futures_core::Stream;
use tracing::debug;

use forgestore_core::domain::ReleaseAsset;
use forgestore_core::ports::{
    AppLauncher, CommandSpawner, DropLocationProvider, PlatformIntegration, SystemProbe,
};
use forgestore_core::{Architecture, InstallError, InstallEvent, selection};

use crate::broker::BrokerClient;

/// Boxed progress stream from a privileged install session.
pub type InstallStream = Pin<Box<dyn Stream<Item = InstallEvent> + Send>>;

/// How an accepted install call was started.
pub enum InstallStart {
    /// Delegated to the broker; consume the stream for progress and the
    /// terminal result.
    Privileged(InstallStream),
    /// A standard OS action was launched; named mechanism accepted the
    /// file. Completion is in the hands of the launched installer.
    Standard {
        /// Mechanism that accepted the file.
        mechanism: String,
    },
    /// The file was placed into the user-visible drop location (AppImage).
    Placed {
        /// Final path of the placed file.
        path: PathBuf,
    },
}

// Manual impl: the boxed stream has no Debug, so it is elided.
impl fmt::Debug for InstallStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Privileged(_) => f.debug_tuple("Privileged").field(&"..").finish(),
            Self::Standard { mechanism } => f
                .debug_struct("Standard")
                .field("mechanism", mechanism)
                .finish(),
            Self::Placed { path } => f.debug_struct("Placed").field("path", path).finish(),
        }
    }
}

/// Platform collaborators injected into the dispatcher.
pub struct InstallerDeps {
    /// Host architecture accessor.
    pub probe: Arc<dyn SystemProbe>,
    /// Fire-and-forget process launcher.
    pub spawner: Arc<dyn CommandSpawner>,
    /// Default-handler / targeted app launcher.
    pub launcher: Arc<dyn AppLauncher>,
    /// Platform permission surface.
    pub integration: Arc<dyn PlatformIntegration>,
    /// Drop directory for portable installables.
    pub locations: Arc<dyn DropLocationProvider>,
}

/// Architecture-aware installer for one platform.
pub struct Installer {
    pub(crate) platform: Platform,
    pub(crate) broker: Arc<BrokerClient>,
    pub(crate) deps: InstallerDeps,
}

impl Installer {
    /// Create an installer for the given platform.
    #[must_use]
    pub fn new(platform: Platform, broker: Arc<BrokerClient>, deps: InstallerDeps) -> Self {
        Self {
            platform,
            broker,
            deps,
        }
    }

    /// Create an installer for the platform this binary was built for.
    #[must_use]
    pub fn for_current_platform(broker: Arc<BrokerClient>, deps: InstallerDeps) -> Self {
        Self::new(Platform::current(), broker, deps)
    }

    /// The broker client backing the privileged path.
    #[must_use]
    pub fn broker(&self) -> &BrokerClient {
        &self.broker
    }

    /// Classified architecture of the running system.
    #[must_use]
    pub fn detect_system_architecture(&self) -> Architecture {
        self.deps.probe.system_architecture()
    }

    /// Whether this platform can handle the asset kind at all.
    #[must_use]
    pub fn is_kind_supported(&self, kind: &str) -> bool {
        self.platform
            .supported_extensions()
            .contains(&normalize_kind(kind).as_str())
    }

    /// Whether an asset is installable here: accepted extension and
    /// architecture-compatible name.
    #[must_use]
    pub fn is_asset_installable(&self, asset_name: &str) -> bool {
        selection::is_asset_installable(
            asset_name,
            self.detect_system_architecture(),
            self.platform.supported_extensions(),
        )
    }

    /// Choose the asset to offer for install, if any.
    ///
    /// Ranking heuristic from [`selection::choose_primary_asset`]; the
    /// result is an offer, not a guarantee of correctness.
    #[must_use]
    pub fn choose_primary_asset<'a>(&self, assets: &'a [ReleaseAsset]) -> Option<&'a ReleaseAsset> {
        selection::choose_primary_asset(assets, self.detect_system_architecture())
    }

    /// Install a downloaded file.
    ///
    /// Fails fast with [`InstallError::FileNotFound`] before any broker or
    /// mechanism work, and with [`InstallError::UnsupportedAssetKind`] for
    /// kinds this platform cannot handle. Strategy selection reads the
    /// instantaneous broker snapshot.
    pub async fn install(&self, file_path: &Path, kind: &str) -> Result<InstallStart, InstallError> {
        let kind = normalize_kind(kind);

        if !tokio::fs::try_exists(file_path).await.unwrap_or(false) {
            return Err(InstallError::FileNotFound {
                path: file_path.to_path_buf(),
            });
        }

        if !self.is_kind_supported(&kind) {
            return Err(InstallError::UnsupportedAssetKind {
                kind,
                platform: self.platform.name(),
            });
        }

        if self.broker.is_available() {
            debug!(file = %file_path.display(), "using privileged broker install");
            let stream = self.broker.install_package(file_path);
            return Ok(InstallStart::Privileged(Box::pin(stream)));
        }

        debug!(file = %file_path.display(), kind, "using standard install");
        if self.platform == Platform::Linux && kind == "appimage" {
            let path = appimage::place(
                self.deps.locations.as_ref(),
                self.deps.launcher.as_ref(),
                file_path,
            )
            .await?;
            return Ok(InstallStart::Placed { path });
        }

        // mechanisms() is total for supported non-appimage kinds
        let mechanisms = self.platform.mechanisms(&kind).ok_or_else(|| {
            InstallError::UnsupportedAssetKind {
                kind: kind.clone(),
                platform: self.platform.name(),
            }
        })?;
        let mechanism = standard::run_mechanisms(
            self.deps.spawner.as_ref(),
            self.deps.launcher.as_ref(),
            file_path,
            &mechanisms,
        )
        .await?;
        Ok(InstallStart::Standard { mechanism })
    }
}

/// Lowercase an extension-or-MIME suffix and strip a leading dot.
fn normalize_kind(kind: &str) -> String {
    kind.to_ascii_lowercase()
        .trim_start_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_normalization() {
        assert_eq!(normalize_kind(".AppImage"), "appimage");
        assert_eq!(normalize_kind("DEB"), "deb");
        assert_eq!(normalize_kind("apk"), "apk");
    }

    #[test]
    fn install_start_debug_elides_the_stream() {
        let privileged = InstallStart::Privileged(Box::pin(futures_util::stream::empty()));
        assert_eq!(format!("{privileged:?}"), "Privileged(\"..\")");

        let standard = InstallStart::Standard {
            mechanism: "default-handler".to_string(),
        };
        assert_eq!(
            format!("{standard:?}"),
            "Standard { mechanism: \"default-handler\" }"
        );

        let placed = InstallStart::Placed {
            path: PathBuf::from("/tmp/tool.AppImage"),
        };
        assert_eq!(
            format!("{placed:?}"),
            "Placed { path: \"/tmp/tool.AppImage\" }"
        );
    }
}
