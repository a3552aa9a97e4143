//! Error taxonomy for install attempts.
//!
//! Broker unavailability is deliberately not represented here: it is a
//! routing signal (use the standard path), never an error. Likewise a
//! missing tool during standard dispatch is internal fallthrough
//! ([`crate::ports::SpawnError::ToolNotFound`]) and only surfaces as
//! [`InstallError::InstallFailed`] once every mechanism is exhausted.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to callers of the installation engine.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The installable file does not exist. Fatal, never retried.
    #[error("installable file not found: {path}")]
    FileNotFound {
        /// The path that was checked.
        path: PathBuf,
    },

    /// A platform permission is missing. Recoverable: the corrective action
    /// has already been triggered once; the caller decides whether to
    /// re-invoke after the user completes it.
    #[error("permission required: {remediation}")]
    PermissionRequired {
        /// User-facing remediation text.
        remediation: String,
    },

    /// This platform cannot install assets of this kind. Fatal for the
    /// asset, not the session.
    #[error("unsupported asset kind '.{kind}' on {platform}")]
    UnsupportedAssetKind {
        /// Extension or MIME suffix of the asset.
        kind: String,
        /// Name of the current platform.
        platform: &'static str,
    },

    /// A standard install mechanism failed for a reason other than the tool
    /// being absent. Terminal; the failing mechanism is named for
    /// diagnostics.
    #[error("install via {mechanism} failed: {detail}")]
    InstallFailed {
        /// Name of the mechanism that failed.
        mechanism: String,
        /// Failure detail from the mechanism.
        detail: String,
    },

    /// Filesystem operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl InstallError {
    /// Create an `InstallFailed` error naming the failing mechanism.
    pub fn install_failed(mechanism: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InstallFailed {
            mechanism: mechanism.into(),
            detail: detail.into(),
        }
    }

    /// Create a `PermissionRequired` error with remediation text.
    pub fn permission_required(remediation: impl Into<String>) -> Self {
        Self::PermissionRequired {
            remediation: remediation.into(),
        }
    }
}
