//! Install progress events - discriminated union for one install attempt.

use serde::{Deserialize, Serialize};

/// Single discriminated union for the phases of one install attempt.
///
/// A privileged broker session advances strictly forward through
/// `Preparing → CreatingSession → WritingPayload → Committing` and ends with
/// exactly one terminal event (`Success` or `Failed`). Progress percentages
/// are monotonically non-decreasing within a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InstallEvent {
    /// Validating the payload and the broker's liveness.
    Preparing,

    /// Requesting a session handle from the broker.
    CreatingSession,

    /// Streaming payload bytes to the broker.
    WritingPayload {
        /// Percent of the payload written so far (0-100).
        percent: u8,
    },

    /// Asking the broker to finalize and apply the session.
    Committing,

    /// The package was installed.
    Success {
        /// Identity of the installed package.
        package: String,
    },

    /// The install attempt failed.
    Failed {
        /// Human-readable failure detail.
        reason: String,
    },
}

impl InstallEvent {
    /// Create a payload-writing progress event, clamped to 100.
    #[must_use]
    pub fn writing(percent: u8) -> Self {
        Self::WritingPayload {
            percent: percent.min(100),
        }
    }

    /// Create a success event.
    pub fn success(package: impl Into<String>) -> Self {
        Self::Success {
            package: package.into(),
        }
    }

    /// Create a failure event.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Whether this event ends the stream.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Failed { .. })
    }

    /// Get the event name for wire protocols.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Preparing => "install:preparing",
            Self::CreatingSession => "install:creating_session",
            Self::WritingPayload { .. } => "install:progress",
            Self::Committing => "install:committing",
            Self::Success { .. } => "install:success",
            Self::Failed { .. } => "install:failed",
        }
    }
}
