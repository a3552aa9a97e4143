//! Standard-install mechanism fallthrough.
//!
//! Walks a platform's ordered mechanism list. A mechanism whose tool is
//! absent falls through to the next one; any other failure surfaces
//! immediately as `InstallFailed` naming the mechanism. Exhausting the list
//! yields `InstallFailed` naming the last-attempted mechanism.

use std::path::Path;

use tracing::{debug, warn};

use forgestore_core::InstallError;
use forgestore_core::ports::{AppLauncher, CommandSpawner, LaunchError, LaunchPayload, SpawnError};

use super::platform::{Mechanism, TERMINALS};

/// Attempt the mechanisms in order; returns the name of the mechanism that
/// accepted the file.
pub(super) async fn run_mechanisms(
    spawner: &dyn CommandSpawner,
    launcher: &dyn AppLauncher,
    file: &Path,
    mechanisms: &[Mechanism],
) -> Result<String, InstallError> {
    debug_assert!(!mechanisms.is_empty());
    let mut last_name = String::new();

    for mechanism in mechanisms {
        let name = mechanism.name();
        match attempt(spawner, launcher, file, mechanism).await {
            Ok(()) => {
                debug!(mechanism = %name, file = %file.display(), "standard install launched");
                return Ok(name);
            }
            Err(Attempt::NotFound) => {
                debug!(mechanism = %name, "mechanism unavailable, falling through");
                last_name = name;
            }
            Err(Attempt::Failed(detail)) => {
                warn!(mechanism = %name, %detail, "standard install failed");
                return Err(InstallError::install_failed(name, detail));
            }
        }
    }

    Err(InstallError::install_failed(
        last_name,
        "no install mechanism available on this system",
    ))
}

enum Attempt {
    /// The mechanism's tool is absent: fall through.
    NotFound,
    /// The mechanism exists but failed: surface immediately.
    Failed(String),
}

async fn attempt(
    spawner: &dyn CommandSpawner,
    launcher: &dyn AppLauncher,
    file: &Path,
    mechanism: &Mechanism,
) -> Result<(), Attempt> {
    match mechanism {
        Mechanism::Tool { program, args } => {
            let mut argv: Vec<String> = args.iter().map(ToString::to_string).collect();
            argv.push(file.display().to_string());
            spawn(spawner, program, &argv).await
        }
        Mechanism::OpenDefault => {
            match launcher
                .open_default(&LaunchPayload::File(file.to_path_buf()))
                .await
            {
                Ok(()) => Ok(()),
                Err(LaunchError::NoHandler) => Err(Attempt::NotFound),
                Err(LaunchError::Failed(detail)) => Err(Attempt::Failed(detail)),
            }
        }
        Mechanism::RunFile => {
            let program = file.display().to_string();
            spawn(spawner, &program, &[]).await
        }
        Mechanism::TerminalPrompt { package_tool } => {
            let command = Mechanism::terminal_command(package_tool, file);
            for (terminal, flag) in TERMINALS {
                let argv = vec![
                    (*flag).to_string(),
                    "bash".to_string(),
                    "-c".to_string(),
                    command.clone(),
                ];
                match spawn(spawner, terminal, &argv).await {
                    Ok(()) => return Ok(()),
                    Err(Attempt::NotFound) => {}
                    Err(failed @ Attempt::Failed(_)) => return Err(failed),
                }
            }
            // No terminal emulator on this system.
            Err(Attempt::NotFound)
        }
    }
}

async fn spawn(
    spawner: &dyn CommandSpawner,
    program: &str,
    args: &[String],
) -> Result<(), Attempt> {
    match spawner.spawn_detached(program, args).await {
        Ok(()) => Ok(()),
        Err(SpawnError::ToolNotFound { .. }) => Err(Attempt::NotFound),
        Err(SpawnError::Failed { detail, .. }) => Err(Attempt::Failed(detail)),
    }
}
