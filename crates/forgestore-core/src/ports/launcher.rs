//! Application launcher trait definition.
//!
//! Used by the standard install path ("open with default handler") and by
//! external handoff (launch a companion app with a file or deep link).

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// What gets handed to an application on launch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LaunchPayload {
    /// A local file.
    File(PathBuf),
    /// A URL or deep link.
    Url(String),
}

/// Errors from launching an application.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// No application can handle the payload. Routing signal for dispatch
    /// fallthrough and handoff fallback.
    #[error("no application available to handle the payload")]
    NoHandler,

    /// The launch itself failed.
    #[error("launch failed: {0}")]
    Failed(String),
}

/// Launcher for opening payloads in applications.
#[async_trait]
pub trait AppLauncher: Send + Sync {
    /// Open the payload in an explicitly targeted application.
    async fn open_in_package(
        &self,
        package: &str,
        payload: &LaunchPayload,
    ) -> Result<(), LaunchError>;

    /// Open the payload with the system default handler.
    async fn open_default(&self, payload: &LaunchPayload) -> Result<(), LaunchError>;

    /// Launch an application by identity, without a payload.
    async fn launch_app(&self, package: &str) -> Result<(), LaunchError>;
}
