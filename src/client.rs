//! The narrow client capability the pool depends on.

/// The single oracle the pool consults to decide whether a cached client may be evicted.
///
/// This mirrors `volo_thrift`'s `Poolable` trait: the pool never inspects a client's internals,
/// it only asks whether the client currently has no RPC in flight and none dispatched since the
/// last time it was deemed idle.
pub trait PooledClient: Send + Sync + 'static {
    /// True iff no RPCs have been dispatched through this handle since the last time it was
    /// deemed idle, and no RPC is presently in flight.
    fn is_idle_after_rpcs(&self) -> bool;
}

/// Builds a new client for a peer. Invoked by [`crate::pool::Pool::get_or_connect`] while the
/// pool's internal lock is held, so implementations must be non-blocking: construct a stub, do
/// not connect synchronously.
pub trait ClientFactory<C>: Send + Sync + 'static
where
    C: PooledClient,
{
    type Error: std::error::Error + Send + Sync + 'static;

    fn connect(&self, address: &crate::worker::PeerAddress) -> Result<C, Self::Error>;
}

impl<C, E, F> ClientFactory<C> for F
where
    C: PooledClient,
    E: std::error::Error + Send + Sync + 'static,
    F: Fn(&crate::worker::PeerAddress) -> Result<C, E> + Send + Sync + 'static,
{
    type Error = E;

    fn connect(&self, address: &crate::worker::PeerAddress) -> Result<C, Self::Error> {
        self(address)
    }
}
