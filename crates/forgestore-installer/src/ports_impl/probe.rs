//! Host architecture probe.

use forgestore_core::ports::SystemProbe;

/// Probe backed by the compile-time target architecture.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultSystemProbe;

impl SystemProbe for DefaultSystemProbe {
    fn raw_abi(&self) -> String {
        std::env::consts::ARCH.to_string()
    }
}
