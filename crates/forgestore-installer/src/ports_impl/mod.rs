//! Default desktop implementations of the core ports.
//!
//! Mobile shells replace these with platform-native implementations; the
//! set here is enough to run the engine on a plain desktop OS.

mod launcher;
mod locations;
mod probe;
mod spawner;

pub use launcher::{DesktopLauncher, NoopPackageRegistry, PermissiveIntegration};
pub use locations::DesktopDropLocation;
pub use probe::DefaultSystemProbe;
pub use spawner::TokioCommandSpawner;
