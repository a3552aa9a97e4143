//! Install pipeline for forgestore.
//!
//! Orchestrates one install attempt end to end: permission preflight, a
//! privileged broker session with a typed progress stream when the broker
//! is usable, per-OS standard install dispatch otherwise, and handoff to
//! companion installer apps as a caller-invoked alternative.
//!
//! Release-asset selection and the port traits live in `forgestore-core`;
//! this crate supplies the protocol client, the dispatch state machine,
//! and desktop default implementations of the ports.

pub mod broker;
pub mod dispatch;
pub mod handoff;
pub mod ports_impl;
mod preflight;

pub use broker::{BrokerClient, CHUNK_SIZE};
pub use dispatch::{InstallStart, InstallStream, Installer, InstallerDeps, Mechanism, Platform};
pub use handoff::{
    BROKER_MANAGER, CompanionApp, Handoff, PACKAGE_INSPECTOR, RELEASE_TRACKER,
};
pub use ports_impl::{
    DefaultSystemProbe, DesktopDropLocation, DesktopLauncher, NoopPackageRegistry,
    PermissiveIntegration, TokioCommandSpawner,
};

/// Installer wired with the desktop default ports for the current
/// platform.
#[must_use]
pub fn desktop_installer(broker: std::sync::Arc<BrokerClient>) -> Installer {
    use std::sync::Arc;

    Installer::for_current_platform(
        broker,
        InstallerDeps {
            probe: Arc::new(DefaultSystemProbe),
            spawner: Arc::new(TokioCommandSpawner),
            launcher: Arc::new(DesktopLauncher),
            integration: Arc::new(PermissiveIntegration),
            locations: Arc::new(DesktopDropLocation),
        },
    )
}
