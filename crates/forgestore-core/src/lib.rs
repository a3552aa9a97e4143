//! Core domain types and port definitions for the forgestore installation
//! engine.
//!
//! This crate is dependency-light on purpose: it holds the pure
//! classification logic (architecture matching, asset selection), the typed
//! install progress events, the error taxonomy, and the trait seams every
//! platform collaborator plugs into. All OS-touching behavior lives in
//! `forgestore-installer`.

pub mod arch;
pub mod domain;
pub mod error;
pub mod events;
pub mod ports;
pub mod selection;

// Re-export commonly used types for convenience
pub use arch::{Architecture, architecture_label, detect_architecture, is_compatible, is_exact_match};
pub use domain::{BinderStatus, BrokerAvailability, ReleaseAsset};
pub use error::InstallError;
pub use events::InstallEvent;
pub use ports::{
    AppLauncher, BrokerNotification, BrokerTransport, CommandSpawner, DropLocationProvider,
    LaunchError, LaunchPayload, PackageRegistry, PlatformIntegration, SessionId, SpawnError,
    SystemProbe, TransportError,
};
pub use selection::{ARCH_BOOST, choose_primary_asset, is_asset_installable};
