//! External handoff - delegating installs to companion applications.
//!
//! Some users prefer a dedicated installer app (a release tracker that
//! keeps the install updated, or a package inspector that shows what the
//! payload contains). Handoff launches the companion with the payload and
//! is always recoverable: a failed launch invokes the caller-supplied
//! fallback instead of surfacing an error.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use forgestore_core::ports::{AppLauncher, LaunchPayload, PackageRegistry};

/// A companion application reachable under up to two distribution
/// identities (e.g. the direct build and the store-repackaged build of the
/// same app).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompanionApp {
    /// Primary package identity.
    pub identity: &'static str,
    /// Alternate distribution identity, if the app ships under two.
    pub alternate_identity: Option<&'static str>,
}

/// Release tracker companion: hands off a forge repository URL and keeps
/// the installed app updated.
pub const RELEASE_TRACKER: CompanionApp = CompanionApp {
    identity: "dev.imranr.obtainium.fdroid",
    alternate_identity: Some("dev.imranr.obtainium"),
};

/// Package inspector companion: opens the downloaded payload for
/// inspection before installing.
pub const PACKAGE_INSPECTOR: CompanionApp = CompanionApp {
    identity: "io.github.muntashirakon.AppManager",
    alternate_identity: None,
};

/// Manager app for the privileged install broker.
pub const BROKER_MANAGER: CompanionApp = CompanionApp {
    identity: "moe.shizuku.privileged.api",
    alternate_identity: None,
};

const BROKER_STORE_URL: &str =
    "https://play.google.com/store/apps/details?id=moe.shizuku.privileged.api";
const BROKER_RELEASES_URL: &str = "https://github.com/RikkaApps/Shizuku/releases";

/// Detects companion apps and hands payloads off to them.
pub struct Handoff {
    registry: Arc<dyn PackageRegistry>,
    launcher: Arc<dyn AppLauncher>,
}

impl Handoff {
    /// Create a handoff helper over the platform's package registry and
    /// launcher.
    #[must_use]
    pub fn new(registry: Arc<dyn PackageRegistry>, launcher: Arc<dyn AppLauncher>) -> Self {
        Self { registry, launcher }
    }

    /// Whether the companion app is installed under either of its
    /// identities.
    pub async fn is_app_installed(&self, app: CompanionApp) -> bool {
        if self.registry.is_package_installed(app.identity).await {
            return true;
        }
        match app.alternate_identity {
            Some(alternate) => self.registry.is_package_installed(alternate).await,
            None => false,
        }
    }

    /// Hand a forge repository off to the release tracker as a deep link.
    ///
    /// On launch failure `on_fallback` runs instead; handoff failure is
    /// never an error, the caller just offers the standard path.
    pub async fn open_repo_in_tracker<F>(&self, repo_owner: &str, repo_name: &str, on_fallback: F)
    where
        F: FnOnce() + Send,
    {
        let url = format!("obtainium://add/https://github.com/{repo_owner}/{repo_name}");
        self.open_in_app(RELEASE_TRACKER, LaunchPayload::Url(url), on_fallback)
            .await;
    }

    /// Hand a downloaded payload off to the package inspector.
    pub async fn open_file_in_inspector<F>(&self, file: &Path, on_fallback: F)
    where
        F: FnOnce() + Send,
    {
        self.open_in_app(
            PACKAGE_INSPECTOR,
            LaunchPayload::File(file.to_path_buf()),
            on_fallback,
        )
        .await;
    }

    /// Open the broker manager app so the user can start the broker or
    /// grant its permission. Falls back to the manager's store listing,
    /// then to its releases page, when the app is not installed.
    pub async fn open_broker_manager(&self) {
        if self.launcher.launch_app(BROKER_MANAGER.identity).await.is_ok() {
            return;
        }
        debug!("broker manager not launchable, opening its store listing");
        if self
            .launcher
            .open_default(&LaunchPayload::Url(BROKER_STORE_URL.to_string()))
            .await
            .is_ok()
        {
            return;
        }
        if let Err(err) = self
            .launcher
            .open_default(&LaunchPayload::Url(BROKER_RELEASES_URL.to_string()))
            .await
        {
            warn!(%err, "could not open broker manager releases page");
        }
    }

    /// Launch a companion app with the payload, explicitly targeted.
    ///
    /// Tries the primary identity, then the alternate; if no launch
    /// succeeds the fallback runs.
    pub async fn open_in_app<F>(&self, app: CompanionApp, payload: LaunchPayload, on_fallback: F)
    where
        F: FnOnce() + Send,
    {
        let identities = std::iter::once(app.identity).chain(app.alternate_identity);
        for identity in identities {
            match self.launcher.open_in_package(identity, &payload).await {
                Ok(()) => {
                    debug!(package = identity, "handoff launched");
                    return;
                }
                Err(err) => {
                    debug!(package = identity, %err, "handoff launch failed");
                }
            }
        }
        warn!(package = app.identity, "handoff failed, running fallback");
        on_fallback();
    }
}
