//! The liveness-timeout callback: invoked by a client when one of its own RPCs times out with
//! "unavailable", to decide whether the peer should be evicted from the pool.
//!
//! This never runs on a schedule (see SPEC_FULL.md's Open Questions): it is purely reactive, and
//! it only disconnects on a *confirmed* dead node or worker, never on a transient probe failure.

use std::sync::Arc;

use crate::{
    client::{ClientFactory, PooledClient},
    membership::MembershipClient,
    pool::Pool,
    raylet::{RayletClient, RayletClientFactory},
    worker::PeerAddress,
};

/// Constructed once per pool and handed to clients so they can report suspected-dead peers.
///
/// Captures a strong reference to the pool (not a `Weak`): the callback must still be able to
/// call [`Pool::disconnect`] even if the only other referent (the outer scheduler) has already
/// dropped its handle but an RPC completion is still in flight. See DESIGN.md.
pub struct LivenessProbe<C, F, M, RF> {
    pool: Arc<Pool<C, F>>,
    membership: Arc<M>,
    raylet_factory: Arc<RF>,
}

impl<C, F, M, RF> Clone for LivenessProbe<C, F, M, RF> {
    fn clone(&self) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
            membership: Arc::clone(&self.membership),
            raylet_factory: Arc::clone(&self.raylet_factory),
        }
    }
}

impl<C, F, M, RF> LivenessProbe<C, F, M, RF>
where
    C: PooledClient,
    F: ClientFactory<C>,
    M: MembershipClient,
    RF: RayletClientFactory,
{
    pub fn new(pool: Arc<Pool<C, F>>, membership: Arc<M>, raylet_factory: Arc<RF>) -> Self {
        Self {
            pool,
            membership,
            raylet_factory,
        }
    }

    /// Runs the probe for `address`. Called from the RPC completion thread that observed
    /// "unavailable"; may run concurrently with other pool operations.
    ///
    /// # Panics
    ///
    /// Panics if the membership client is not subscribed to node-change notifications: running
    /// the probe without a live subscription is a configuration bug, not a recoverable error.
    pub async fn on_unavailable(&self, address: &PeerAddress) {
        assert!(
            self.membership.is_subscribed_to_node_change(),
            "peerlink: liveness probe invoked without an active membership subscription"
        );

        let Some(node_info) = self.membership.get_node(&address.node_id).await else {
            tracing::info!(
                worker_id = %address.worker_id,
                node_id = %address.node_id,
                "node unknown to membership layer, disconnecting peer"
            );
            self.pool.disconnect(&address.worker_id);
            return;
        };

        let raylet = self
            .raylet_factory
            .connect(&node_info.node_manager_address, node_info.node_manager_port);

        match raylet.is_local_worker_dead(&address.worker_id).await {
            Err(err) => {
                tracing::info!(
                    worker_id = %address.worker_id,
                    error = %err,
                    "raylet liveness probe transport error, leaving peer connected"
                );
            }
            Ok(reply) if reply.is_dead => {
                tracing::info!(
                    worker_id = %address.worker_id,
                    "raylet confirmed worker dead, disconnecting peer"
                );
                self.pool.disconnect(&address.worker_id);
            }
            Ok(_) => {
                tracing::trace!(
                    worker_id = %address.worker_id,
                    "raylet reports worker alive, leaving peer connected"
                );
            }
        }
    }
}
