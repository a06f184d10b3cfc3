//! Read-only cluster-membership interface consumed by the liveness-timeout callback.
//!
//! Modeled after `volo::discovery::Discover`: an async query keyed by identity, plus a signal
//! that a change subscription exists. The pool only asserts the latter; it never drives control
//! flow off a membership-change event itself (it is a reactive probe, not a periodic sweep; see
//! the Open Questions note in SPEC_FULL.md).

use std::future::Future;

use crate::worker::NodeId;

/// Information about a live node, as reported by the membership layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    pub node_manager_address: String,
    pub node_manager_port: u16,
}

/// Read-only view onto cluster membership.
pub trait MembershipClient: Send + Sync + 'static {
    /// Whether this client is subscribed to node-change notifications. The liveness callback
    /// asserts this is `true` before doing anything else: running without a subscription is a
    /// configuration bug, not a recoverable condition.
    fn is_subscribed_to_node_change(&self) -> bool;

    /// Look up a node, filtering out nodes already known to be dead. Returns `None` if the node
    /// is unknown or dead -- the membership layer is authoritative, so the caller treats this as
    /// definitive rather than inconclusive.
    fn get_node(&self, node_id: &NodeId) -> impl Future<Output = Option<NodeInfo>> + Send;
}
