//! Fire-and-forget process launcher over `tokio::process`.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use forgestore_core::ports::{CommandSpawner, SpawnError};

/// Spawns detached processes with stdio disconnected.
///
/// Tool presence is resolved up front (via `which`) so a missing program
/// maps to [`SpawnError::ToolNotFound`] and dispatch can fall through;
/// absolute paths skip the lookup.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioCommandSpawner;

#[async_trait]
impl CommandSpawner for TokioCommandSpawner {
    async fn spawn_detached(&self, program: &str, args: &[String]) -> Result<(), SpawnError> {
        if !Path::new(program).is_absolute() && which::which(program).is_err() {
            return Err(SpawnError::ToolNotFound {
                program: program.to_string(),
            });
        }

        let spawned = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(_child) => {
                // Detached on purpose: the exit status is never observed.
                debug!(program, "process launched");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(SpawnError::ToolNotFound {
                    program: program.to_string(),
                })
            }
            Err(err) => Err(SpawnError::Failed {
                program: program.to_string(),
                detail: err.to_string(),
            }),
        }
    }
}
