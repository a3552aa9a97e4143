//! System probe trait definition.

use crate::arch::Architecture;

/// Accessor for the host's CPU architecture.
pub trait SystemProbe: Send + Sync {
    /// Raw ABI string as reported by the OS (e.g. `x86_64`, `arm64-v8a`).
    fn raw_abi(&self) -> String;

    /// Classified architecture of the running system.
    fn system_architecture(&self) -> Architecture {
        Architecture::from_abi(&self.raw_abi())
    }
}
