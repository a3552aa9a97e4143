//! Drop location resolution for portable installables.

use std::io;
use std::path::PathBuf;

use forgestore_core::ports::DropLocationProvider;

/// Resolves the user's desktop directory as the drop location.
///
/// Resolution order: the XDG/user-dirs desktop directory, then
/// `~/Desktop` (created if absent), then the home directory as a last
/// resort.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopDropLocation;

impl DropLocationProvider for DesktopDropLocation {
    fn drop_dir(&self) -> io::Result<PathBuf> {
        if let Some(desktop) = dirs::desktop_dir() {
            if desktop.is_dir() {
                return Ok(desktop);
            }
        }

        let home = dirs::home_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "home directory not found"))?;

        let desktop = home.join("Desktop");
        if desktop.is_dir() {
            return Ok(desktop);
        }
        match std::fs::create_dir_all(&desktop) {
            Ok(()) => Ok(desktop),
            // Fall back to home when the desktop folder cannot be created.
            Err(_) => Ok(home),
        }
    }
}
