//! The raylet-level liveness probe used when cluster membership alone cannot answer whether a
//! specific worker (as opposed to its whole node) is dead.

use std::future::Future;

use crate::{error::RayletProbeError, worker::WorkerId};

/// Reply to an `is_local_worker_dead` probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IsLocalWorkerDeadReply {
    pub is_dead: bool,
}

/// A client for the raylet (node-manager) of a single node. Constructed on demand by a
/// [`RayletClientFactory`] once the liveness callback has resolved a live `NodeInfo`.
pub trait RayletClient: Send + Sync + 'static {
    fn is_local_worker_dead(
        &self,
        worker_id: &WorkerId,
    ) -> impl Future<Output = Result<IsLocalWorkerDeadReply, RayletProbeError>> + Send;
}

/// Builds a [`RayletClient`] targeting a node-manager address. Kept separate from
/// [`crate::client::ClientFactory`] because it dials the *node*, not a worker.
pub trait RayletClientFactory: Send + Sync + 'static {
    type Client: RayletClient;

    fn connect(&self, node_manager_address: &str, node_manager_port: u16) -> Self::Client;
}

impl<F, R> RayletClientFactory for F
where
    R: RayletClient,
    F: Fn(&str, u16) -> R + Send + Sync + 'static,
{
    type Client = R;

    fn connect(&self, node_manager_address: &str, node_manager_port: u16) -> Self::Client {
        self(node_manager_address, node_manager_port)
    }
}
