//! AppImage placement - the one install path that mutates the filesystem.
//!
//! AppImages are not installed through a package manager; they expect to be
//! launched from a stable, executable-bit-capable location rather than a
//! transient download path. Placement copies the file into the platform's
//! user-visible drop directory, never overwrites an existing file, and
//! verifies the executable bit actually stuck before reporting success.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use forgestore_core::InstallError;
use forgestore_core::ports::{AppLauncher, DropLocationProvider, LaunchError, LaunchPayload};

const MECHANISM: &str = "appimage-placement";
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Place an AppImage into the drop directory and reveal it.
///
/// Returns the final path of the placed file.
pub(super) async fn place(
    locations: &dyn DropLocationProvider,
    launcher: &dyn AppLauncher,
    file: &Path,
) -> Result<PathBuf, InstallError> {
    let drop_dir = locations.drop_dir()?;
    let name = file
        .file_name()
        .ok_or_else(|| InstallError::install_failed(MECHANISM, "payload has no file name"))?;

    let destination = copy_without_overwrite(file, &drop_dir, Path::new(name)).await?;
    mark_executable(&destination)?;
    debug!(destination = %destination.display(), "appimage placed");

    // Best-effort reveal of the drop folder; not part of success.
    if let Err(err) = launcher
        .open_default(&LaunchPayload::File(drop_dir.clone()))
        .await
    {
        match err {
            LaunchError::NoHandler => {}
            LaunchError::Failed(detail) => {
                warn!(%detail, "could not reveal drop folder");
            }
        }
    }

    Ok(destination)
}

/// Copy `source` into `dir`, probing `name`, `name_1`, `name_2`, ... until a
/// free slot is claimed. The destination is created with `create_new`, so a
/// concurrent claim of the same name loses the race instead of overwriting.
/// The payload is streamed, never buffered whole; AppImages run to hundreds
/// of megabytes.
async fn copy_without_overwrite(
    source: &Path,
    dir: &Path,
    name: &Path,
) -> Result<PathBuf, InstallError> {
    let mut payload = tokio::fs::File::open(source).await?;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let candidate = dir.join(candidate_name(name, attempt));
        let open = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await;
        match open {
            Ok(mut dest) => {
                tokio::io::copy(&mut payload, &mut dest).await?;
                dest.flush().await?;
                return Ok(candidate);
            }
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(err) => return Err(err.into()),
        }
    }

    Err(InstallError::install_failed(
        MECHANISM,
        "could not find a free file name in the drop directory",
    ))
}

fn candidate_name(name: &Path, attempt: u32) -> PathBuf {
    if attempt == 0 {
        return name.to_path_buf();
    }
    let stem = name.file_stem().unwrap_or_default().to_string_lossy();
    name.extension().map_or_else(
        || PathBuf::from(format!("{stem}_{attempt}")),
        |ext| PathBuf::from(format!("{stem}_{attempt}.{}", ext.to_string_lossy())),
    )
}

/// Set the executable bit and verify it was actually applied.
#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<(), InstallError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o755);
    std::fs::set_permissions(path, perms)?;

    let mode = std::fs::metadata(path)?.permissions().mode();
    if mode & 0o111 == 0 {
        return Err(InstallError::install_failed(
            MECHANISM,
            format!(
                "executable bit could not be set on {} (filesystem may be noexec)",
                path.display()
            ),
        ));
    }
    Ok(())
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<(), InstallError> {
    Ok(())
}
