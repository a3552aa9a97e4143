//! Command spawner trait definition.
//!
//! Standard install mechanisms launch external tools (package installers,
//! terminal emulators, file openers) fire-and-forget: the engine never waits
//! for the spawned process to exit. The error split matters for dispatch:
//! a missing tool triggers fallthrough to the next mechanism, any other
//! failure is surfaced immediately.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from launching an external tool.
#[derive(Debug, Error)]
pub enum SpawnError {
    /// The tool is not present on this system. Internal routing signal:
    /// dispatch falls through to the next mechanism.
    #[error("tool not found: {program}")]
    ToolNotFound {
        /// Name of the missing program.
        program: String,
    },

    /// The tool exists but could not be launched.
    #[error("failed to launch {program}: {detail}")]
    Failed {
        /// Name of the program.
        program: String,
        /// Launch failure detail.
        detail: String,
    },
}

/// Fire-and-forget launcher for external processes.
#[async_trait]
pub trait CommandSpawner: Send + Sync {
    /// Launch `program` with `args`, detached. Returns as soon as the
    /// process has been handed to the OS; the exit status is never observed.
    async fn spawn_detached(&self, program: &str, args: &[String]) -> Result<(), SpawnError>;
}
