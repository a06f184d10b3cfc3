//! Error types for the pool and the bounded executor.

use thiserror::Error;

use crate::worker::WorkerId;

/// Errors that can surface from [`crate::pool::Pool`] operations.
///
/// `InvalidArgument` (empty `worker_id`) and a missing membership subscription in the liveness
/// callback are not represented here: both are programmer/configuration bugs and are raised as
/// panics at the call site, per the pool's failure model.
#[derive(Error, Debug)]
pub enum PoolError<E> {
    /// The injected client factory failed to build a client for the given peer.
    #[error("client factory failed for worker {worker_id}: {source}")]
    ClientFactory {
        worker_id: WorkerId,
        #[source]
        source: E,
    },
}

/// Errors surfaced by the liveness-timeout callback's raylet probe.
///
/// These never reach the pool's caller: they are logged and either leave the peer connected
/// (transport error) or trigger a disconnect (confirmed dead), per §4.1's failure model.
#[derive(Error, Debug)]
pub enum RayletProbeError {
    #[error("raylet probe transport error for {node_manager_address}:{node_manager_port}: {message}")]
    Transport {
        node_manager_address: String,
        node_manager_port: u16,
        message: String,
    },
}
