//! Broker install session - the progress-streaming install protocol.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_stream::stream;
use futures_core::Stream;
use tokio::io::AsyncReadExt;
use tokio::sync::watch;
use tracing::{debug, warn};

use forgestore_core::InstallEvent;
use forgestore_core::domain::BrokerAvailability;
use forgestore_core::ports::{BrokerTransport, SessionId, TransportError};

use super::BrokerClient;

/// Payload chunk size for session writes.
pub const CHUNK_SIZE: usize = 64 * 1024;

impl BrokerClient {
    /// Install a package file through a broker session, emitting typed
    /// progress events.
    ///
    /// The stream is cold: the session is opened only once the stream is
    /// polled. Phases advance strictly forward (`Preparing` →
    /// `CreatingSession` → `WritingPayload` → `Committing`) and exactly one
    /// terminal event (`Success` or `Failed`) ends the stream. Progress
    /// percentages are monotonically non-decreasing.
    ///
    /// A broker-dead notification observed mid-session aborts the session
    /// and terminates the stream with `Failed`; the stream never stalls
    /// silently. Dropping the stream cancels the exchange; an uncommitted
    /// session is abandoned best-effort, while cleanup of a committed
    /// session is the broker's responsibility.
    pub fn install_package(&self, file: &Path) -> impl Stream<Item = InstallEvent> + Send + 'static {
        run_session(self.transport(), self.state_rx(), file.to_path_buf())
    }
}

fn run_session(
    transport: Arc<dyn BrokerTransport>,
    mut availability: watch::Receiver<BrokerAvailability>,
    file: PathBuf,
) -> impl Stream<Item = InstallEvent> + Send + 'static {
    stream! {
        yield InstallEvent::Preparing;

        let total = match tokio::fs::metadata(&file).await {
            Ok(meta) if meta.is_file() => meta.len(),
            Ok(_) => {
                yield InstallEvent::failed(format!("not a file: {}", file.display()));
                return;
            }
            Err(err) => {
                yield InstallEvent::failed(format!(
                    "cannot read {}: {err}",
                    file.display()
                ));
                return;
            }
        };

        if !availability.borrow().is_available() {
            yield InstallEvent::failed("broker is not available");
            return;
        }

        yield InstallEvent::CreatingSession;
        let session = match transport.create_session(total).await {
            Ok(session) => session,
            Err(err) => {
                yield InstallEvent::failed(format!("failed to create session: {err}"));
                return;
            }
        };
        debug!(session = session.0, total, "broker session created");
        let mut guard = SessionGuard::armed(Arc::clone(&transport), session);

        let mut payload = match tokio::fs::File::open(&file).await {
            Ok(f) => f,
            Err(err) => {
                guard.disarm();
                abandon(transport.as_ref(), session).await;
                yield InstallEvent::failed(format!("cannot open {}: {err}", file.display()));
                return;
            }
        };

        let mut written: u64 = 0;
        let mut last_percent: u8 = 0;
        let mut buf = vec![0u8; CHUNK_SIZE];
        yield InstallEvent::writing(0);

        loop {
            // Broker death preempts the next read/write round-trip.
            let read = tokio::select! {
                biased;

                () = broker_died(&mut availability) => {
                    guard.disarm();
                    abandon(transport.as_ref(), session).await;
                    yield InstallEvent::failed("broker died during install");
                    return;
                }

                read = payload.read(&mut buf) => read,
            };

            let n = match read {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) => {
                    guard.disarm();
                    abandon(transport.as_ref(), session).await;
                    yield InstallEvent::failed(format!("payload read failed: {err}"));
                    return;
                }
            };

            if let Err(err) = transport.write_chunk(session, &buf[..n]).await {
                guard.disarm();
                abandon(transport.as_ref(), session).await;
                yield InstallEvent::failed(format!("payload write failed: {err}"));
                return;
            }

            written += n as u64;
            let percent = percent_of(written, total);
            if percent > last_percent {
                last_percent = percent;
                yield InstallEvent::writing(percent);
            }
        }

        if !availability.borrow().is_broker_running {
            guard.disarm();
            abandon(transport.as_ref(), session).await;
            yield InstallEvent::failed("broker died during install");
            return;
        }

        // From here the broker owns cleanup; the guard must not abandon a
        // session that is about to be committed.
        guard.disarm();
        yield InstallEvent::Committing;
        match transport.commit_session(session).await {
            Ok(package) => {
                debug!(package, "broker session committed");
                yield InstallEvent::success(package);
            }
            Err(err) => {
                yield InstallEvent::failed(format!("commit failed: {err}"));
            }
        }
    }
}

/// Abandons the session if the stream is dropped mid-exchange.
///
/// Armed right after `create_session` and disarmed on every path that
/// abandons explicitly or hands cleanup to the broker (commit). The abandon
/// runs on a spawned task since `Drop` cannot await; without a runtime the
/// broker-side timeout is the fallback.
struct SessionGuard {
    transport: Arc<dyn BrokerTransport>,
    session: Option<SessionId>,
}

impl SessionGuard {
    fn armed(transport: Arc<dyn BrokerTransport>, session: SessionId) -> Self {
        Self {
            transport,
            session: Some(session),
        }
    }

    fn disarm(&mut self) {
        self.session = None;
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        debug!(session = session.0, "install stream dropped, abandoning session");
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let transport = Arc::clone(&self.transport);
            handle.spawn(async move {
                abandon(transport.as_ref(), session).await;
            });
        }
    }
}

/// Resolve once the availability snapshot reports the broker gone.
async fn broker_died(availability: &mut watch::Receiver<BrokerAvailability>) {
    loop {
        if !availability.borrow().is_broker_running {
            return;
        }
        if availability.changed().await.is_err() {
            // Client dropped; treat as death so the session aborts.
            return;
        }
    }
}

async fn abandon(transport: &dyn BrokerTransport, session: SessionId) {
    if let Err(err) = transport.abandon_session(session).await {
        match err {
            TransportError::Disconnected => {}
            other => warn!(session = session.0, err = %other, "failed to abandon session"),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn percent_of(written: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    ((written.saturating_mul(100)) / total).min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_clamped_and_total_zero_is_complete() {
        assert_eq!(percent_of(0, 1000), 0);
        assert_eq!(percent_of(500, 1000), 50);
        assert_eq!(percent_of(1000, 1000), 100);
        assert_eq!(percent_of(2000, 1000), 100);
        assert_eq!(percent_of(0, 0), 100);
    }
}
