//! Port definitions - trait seams between the engine and its collaborators.
//!
//! Every OS- or transport-touching dependency of the installation engine is
//! expressed as a trait here so the engine itself stays testable with
//! scripted fakes. Implementations live in `forgestore-installer` (desktop
//! defaults) or in the embedding platform shell.

mod broker;
mod drop_location;
mod launcher;
mod package_registry;
mod platform_integration;
mod spawner;
mod system_probe;

pub use broker::{BrokerNotification, BrokerTransport, SessionId, TransportError};
pub use drop_location::DropLocationProvider;
pub use launcher::{AppLauncher, LaunchError, LaunchPayload};
pub use package_registry::PackageRegistry;
pub use platform_integration::PlatformIntegration;
pub use spawner::{CommandSpawner, SpawnError};
pub use system_probe::SystemProbe;
