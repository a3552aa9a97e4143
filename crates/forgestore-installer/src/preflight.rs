//! Permission preflight - per-platform checks run before an install attempt.

use std::path::Path;

use tracing::{debug, warn};

use forgestore_core::InstallError;

use crate::dispatch::Installer;

impl Installer {
    /// Ensure the permissions needed for an install attempt are in place.
    ///
    /// Idempotent and safe to call before every attempt. A usable
    /// privileged path makes this a no-op: broker installs need no OS
    /// permission. Otherwise the platform-specific check runs and, when
    /// unmet, the corrective action is triggered once (opening the settings
    /// surface) before failing with `PermissionRequired`. This never loops
    /// or retries internally; the caller decides whether to re-invoke after
    /// the user completes the remediation.
    pub async fn ensure_permissions(&self, kind: &str) -> Result<(), InstallError> {
        if self.broker.is_available() {
            debug!("privileged path usable, skipping permission preflight");
            return Ok(());
        }

        let kind = kind.to_ascii_lowercase();
        let kind = kind.trim_start_matches('.');

        if self.platform.needs_install_grant(kind) {
            if self.deps.integration.can_request_package_installs().await {
                return Ok(());
            }
            if let Err(err) = self.deps.integration.open_install_settings().await {
                warn!(%err, "could not open install settings");
            }
            return Err(InstallError::permission_required(
                "Enable 'install unknown apps' for this app in system settings and try again.",
            ));
        }

        if kind == "appimage" {
            let drop_dir = self.deps.locations.drop_dir()?;
            return verify_executable_bit_capability(&drop_dir);
        }

        Ok(())
    }
}

/// Probe whether the executable bit can be set in the given directory.
///
/// AppImage installation is impossible on filesystems that ignore the
/// executable bit (noexec mounts, some FAT variants), so this is checked up
/// front with a throwaway file rather than after placement.
#[cfg(unix)]
fn verify_executable_bit_capability(dir: &Path) -> Result<(), InstallError> {
    use std::os::unix::fs::PermissionsExt;

    let probe = tempfile::Builder::new()
        .prefix(".forgestore-perm-probe")
        .tempfile_in(dir)
        .map_err(|err| probe_failure(dir, &err))?;

    let mut perms = probe
        .as_file()
        .metadata()
        .map_err(|err| probe_failure(dir, &err))?
        .permissions();
    perms.set_mode(0o755);
    probe
        .as_file()
        .set_permissions(perms)
        .map_err(|err| probe_failure(dir, &err))?;

    let mode = probe
        .as_file()
        .metadata()
        .map_err(|err| probe_failure(dir, &err))?
        .permissions()
        .mode();
    if mode & 0o111 == 0 {
        return Err(InstallError::permission_required(format!(
            "Files in {} cannot be made executable; AppImage installation requires \
             an executable-bit-capable location.",
            dir.display()
        )));
    }
    Ok(())
}

#[cfg(not(unix))]
fn verify_executable_bit_capability(_dir: &Path) -> Result<(), InstallError> {
    Ok(())
}

#[cfg(unix)]
fn probe_failure(dir: &Path, err: &std::io::Error) -> InstallError {
    InstallError::permission_required(format!(
        "Could not verify permission capabilities in {}: {err}",
        dir.display()
    ))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn executable_bit_probe_passes_on_a_normal_tmpdir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(verify_executable_bit_capability(dir.path()).is_ok());
    }

    #[test]
    fn probe_fails_cleanly_on_a_missing_directory() {
        let err = verify_executable_bit_capability(Path::new("/nonexistent/forgestore"))
            .unwrap_err();
        assert!(matches!(err, InstallError::PermissionRequired { .. }));
    }
}
