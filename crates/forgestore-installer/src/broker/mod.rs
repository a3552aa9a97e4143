//! Privileged install broker client.
//!
//! This is the protocol core of the engine: it owns the process-wide
//! broker availability state, reacts to broker-pushed lifecycle
//! notifications, and runs the session-oriented install protocol with a
//! typed progress stream.
//!
//! # Failure semantics
//!
//! Transport errors never leak out of this module. Session calls convert
//! them into a terminal `Failed` event; single round-trips
//! (`uninstall_package`, `broker_version`) convert them into `false`/`None`
//! with the detail logged. A `false` from `uninstall_package` therefore
//! means "no privileged capability", which is a routing signal, not an
//! operation failure.

mod client;
mod session;

pub use client::BrokerClient;
pub use session::CHUNK_SIZE;
