//! Broker availability tracking and single round-trip operations.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use forgestore_core::domain::{BinderStatus, BrokerAvailability};
use forgestore_core::ports::{BrokerNotification, BrokerTransport};

/// Session-oriented client for the privileged install broker.
///
/// One client per engine instance. Construction subscribes to the
/// transport's notification channel and spawns a listener task; the
/// subscription is owned by this instance and torn down by [`shutdown`]
/// (or on drop), never registered globally.
///
/// [`shutdown`]: BrokerClient::shutdown
pub struct BrokerClient {
    transport: Arc<dyn BrokerTransport>,
    state_tx: watch::Sender<BrokerAvailability>,
    shutdown: CancellationToken,
    listener: JoinHandle<()>,
}

impl BrokerClient {
    /// Connect to the broker: perform the initial availability check and
    /// start listening for lifecycle notifications.
    pub async fn connect(transport: Arc<dyn BrokerTransport>) -> Self {
        let notifications = transport.subscribe();
        let (state_tx, _) = watch::channel(BrokerAvailability::default());

        let initial = check_availability(transport.as_ref()).await;
        state_tx.send_replace(initial);
        debug!(?initial, "broker client connected");

        let shutdown = CancellationToken::new();
        let listener = tokio::spawn(listen(
            Arc::clone(&transport),
            state_tx.clone(),
            notifications,
            shutdown.clone(),
        ));

        Self {
            transport,
            state_tx,
            shutdown,
            listener,
        }
    }

    /// Whether the privileged install path is usable right now.
    ///
    /// Evaluated against the instantaneous snapshot; never blocks waiting
    /// for in-flight rechecks to settle.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.state_tx.borrow().is_available()
    }

    /// Current availability snapshot.
    #[must_use]
    pub fn availability(&self) -> BrokerAvailability {
        *self.state_tx.borrow()
    }

    /// Observe availability changes (for "silent install available" UI
    /// affordances).
    #[must_use]
    pub fn watch_availability(&self) -> watch::Receiver<BrokerAvailability> {
        self.state_tx.subscribe()
    }

    /// Request the broker permission.
    ///
    /// Returns `true` if the permission is already granted. Otherwise the
    /// prompt request is fire-and-forget and this returns `false`; the
    /// grant (or denial) arrives later through the permission-result
    /// notification. Callers must not assume a synchronous grant.
    pub async fn request_permission(&self) -> bool {
        match self.transport.check_permission().await {
            Ok(true) => {
                self.state_tx.send_modify(|state| {
                    if state.is_broker_running {
                        state.has_permission = true;
                    }
                });
                return true;
            }
            Ok(false) => {}
            Err(err) => {
                warn!(%err, "permission check failed");
                return false;
            }
        }

        debug!("requesting broker permission");
        if let Err(err) = self.transport.request_permission().await {
            warn!(%err, "permission request failed");
        }
        false
    }

    /// Remove an installed package through the broker.
    ///
    /// Returns `false` both when the broker is unavailable and when the
    /// broker reports failure; transport errors are logged and swallowed.
    pub async fn uninstall_package(&self, identity: &str) -> bool {
        if !self.is_available() {
            return false;
        }
        match self.transport.uninstall(identity).await {
            Ok(result) => result,
            Err(err) => {
                warn!(package = identity, %err, "broker uninstall failed");
                false
            }
        }
    }

    /// Broker protocol version, if it can be queried.
    pub async fn broker_version(&self) -> Option<i32> {
        match self.transport.version().await {
            Ok(v) if v >= 0 => Some(v),
            Ok(_) => None,
            Err(err) => {
                debug!(%err, "broker version query failed");
                None
            }
        }
    }

    /// Re-run the availability check against the live transport and
    /// publish the result.
    pub async fn refresh_availability(&self) -> BrokerAvailability {
        let state = check_availability(self.transport.as_ref()).await;
        self.state_tx.send_replace(state);
        state
    }

    /// Stop the notification listener. Idempotent.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub(crate) fn transport(&self) -> Arc<dyn BrokerTransport> {
        Arc::clone(&self.transport)
    }

    pub(crate) fn state_rx(&self) -> watch::Receiver<BrokerAvailability> {
        self.state_tx.subscribe()
    }
}

impl Drop for BrokerClient {
    fn drop(&mut self) {
        self.shutdown.cancel();
        self.listener.abort();
    }
}

/// Ping the broker and, if alive, query the permission state.
///
/// Errors during the permission query degrade to `Error` status with both
/// flags cleared (fail-safe, not fail-open).
async fn check_availability(transport: &dyn BrokerTransport) -> BrokerAvailability {
    if !transport.ping().await {
        debug!("broker not running");
        return BrokerAvailability::dead();
    }

    match transport.check_permission().await {
        Ok(has_permission) => {
            debug!(has_permission, "broker alive");
            BrokerAvailability::alive(has_permission)
        }
        Err(err) => {
            warn!(%err, "broker availability check failed");
            BrokerAvailability::errored()
        }
    }
}

/// Notification listener. Primary writer of the availability state;
/// `request_permission` and `refresh_availability` also publish, but only
/// results of live transport checks, so a stale grant can never outlive a
/// dead broker.
async fn listen(
    transport: Arc<dyn BrokerTransport>,
    state_tx: watch::Sender<BrokerAvailability>,
    mut notifications: mpsc::Receiver<BrokerNotification>,
    shutdown: CancellationToken,
) {
    loop {
        let notification = tokio::select! {
            () = shutdown.cancelled() => break,
            notification = notifications.recv() => match notification {
                Some(n) => n,
                // Transport dropped its sender: treat as broker death.
                None => {
                    state_tx.send_replace(BrokerAvailability::dead());
                    break;
                }
            },
        };

        match notification {
            BrokerNotification::BinderReceived => {
                debug!("broker binder received");
                state_tx.send_modify(|state| state.binder_status = BinderStatus::Received);
                let state = check_availability(transport.as_ref()).await;
                state_tx.send_replace(state);
            }
            BrokerNotification::BinderDead => {
                // Dead wins: both flags drop in one write, without waiting
                // for any confirmation round-trip.
                warn!("broker binder dead");
                state_tx.send_replace(BrokerAvailability::dead());
            }
            BrokerNotification::PermissionResult { granted } => {
                debug!(granted, "broker permission result");
                state_tx.send_modify(|state| {
                    state.has_permission = granted && state.is_broker_running;
                });
            }
        }
    }
}
