//! Drop location provider trait definition.
//!
//! Some install formats (AppImage) are not installed through a package
//! manager at all; they are placed into a stable, user-visible,
//! executable-bit-capable directory and launched from there. This port
//! supplies that directory.

use std::io;
use std::path::PathBuf;

/// Provider of the platform's canonical user-visible drop directory.
pub trait DropLocationProvider: Send + Sync {
    /// The directory where portable installables should be placed.
    /// Implementations must return an existing, writable directory.
    fn drop_dir(&self) -> io::Result<PathBuf>;
}
