//! Privileged install broker transport trait definition.
//!
//! The broker is a privileged helper/service that can install packages
//! without per-install user prompts, reached through a session-oriented
//! protocol. This port models the raw transport: liveness ping, permission
//! query/request, binder lifecycle notifications, and the
//! create/write/commit session exchange. Protocol/state-machine logic lives
//! in the engine's broker client, not here.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Opaque handle to one broker install session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

/// Asynchronous notifications pushed by the broker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrokerNotification {
    /// The broker process became reachable.
    BinderReceived,
    /// The broker process disappeared.
    BinderDead,
    /// The user answered a pending permission prompt.
    PermissionResult {
        /// Whether the permission was granted.
        granted: bool,
    },
}

/// Errors raised by the broker transport.
///
/// These never leak past the broker client boundary; the client converts
/// every transport failure into a `Failed` event or a `false` result.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The broker connection is gone.
    #[error("broker transport disconnected")]
    Disconnected,

    /// The broker rejected or could not complete the request.
    #[error("broker protocol error: {0}")]
    Protocol(String),

    /// Transport-level IO failure.
    #[error("broker io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw transport to the privileged install broker.
///
/// Implementations handle all wire details internally and must be safe to
/// share across concurrent install attempts.
#[async_trait]
pub trait BrokerTransport: Send + Sync {
    /// Take the notification channel for binder lifecycle and permission
    /// events. Called exactly once, by the broker client at construction.
    fn subscribe(&self) -> mpsc::Receiver<BrokerNotification>;

    /// Liveness ping. `false` means the broker is not reachable.
    async fn ping(&self) -> bool;

    /// Query whether the broker permission is currently granted.
    async fn check_permission(&self) -> Result<bool, TransportError>;

    /// Ask the broker to show the permission prompt. Fire-and-forget: the
    /// answer arrives later as [`BrokerNotification::PermissionResult`].
    async fn request_permission(&self) -> Result<(), TransportError>;

    /// Open an install session sized for `total_bytes` of payload.
    async fn create_session(&self, total_bytes: u64) -> Result<SessionId, TransportError>;

    /// Append a chunk of payload bytes to the session.
    async fn write_chunk(&self, session: SessionId, chunk: &[u8]) -> Result<(), TransportError>;

    /// Finalize and apply the session. Returns the installed package
    /// identity. The broker owns cleanup once a session is committed.
    async fn commit_session(&self, session: SessionId) -> Result<String, TransportError>;

    /// Abort an uncommitted session, releasing broker-side resources.
    async fn abandon_session(&self, session: SessionId) -> Result<(), TransportError>;

    /// Remove an installed package. Returns whether the broker reported
    /// success.
    async fn uninstall(&self, package: &str) -> Result<bool, TransportError>;

    /// Broker protocol version, negative when unknown.
    async fn version(&self) -> Result<i32, TransportError>;
}
