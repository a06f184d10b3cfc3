//! Per-process cache of RPC client handles, keyed by worker identity.
//!
//! These semantics are adapted from `volo_thrift`'s `transport::pool`, which itself started as a
//! port of `hyper`'s connection pool: an idle list plus waiters, here simplified to the shape the
//! spec actually needs (no waiters -- client construction is assumed non-blocking and happens
//! under the lock; no per-key idle timeout -- eviction is driven purely by the client's own idle
//! oracle).

pub mod liveness;

use std::sync::Arc;

use linked_hash_map::LinkedHashMap;
use parking_lot::Mutex;

use crate::{
    client::{ClientFactory, PooledClient},
    error::PoolError,
    worker::{PeerAddress, WorkerId},
};

struct Inner<C> {
    // Front = least-recently-used, back = most-recently-used (`linked_hash_map`'s own
    // convention). `get_refresh` and `insert` both move an entry to the back; `pop_front`
    // removes the least-recently-used entry.
    clients: LinkedHashMap<WorkerId, Arc<C>>,
}

/// A cache of RPC clients keyed by [`WorkerId`], with LRU idle eviction.
///
/// `C` is the client type, which must implement [`PooledClient`] so the pool can ask whether an
/// entry is safe to evict. `F` is the factory used to build a new client the first time a worker
/// is requested.
pub struct Pool<C, F> {
    inner: Mutex<Inner<C>>,
    factory: F,
}

impl<C, F> Pool<C, F>
where
    C: PooledClient,
    F: ClientFactory<C>,
{
    pub fn new(factory: F) -> Self {
        Self {
            inner: Mutex::new(Inner {
                clients: LinkedHashMap::new(),
            }),
            factory,
        }
    }

    /// Returns the cached client for `address.worker_id`, promoting it to most-recently-used, or
    /// builds one via the injected factory and inserts it.
    ///
    /// # Panics
    ///
    /// Panics if `address.worker_id` is empty: an empty worker id is never valid and indicates a
    /// programmer error upstream, not a recoverable condition.
    pub fn get_or_connect(
        &self,
        address: &PeerAddress,
    ) -> Result<Arc<C>, PoolError<F::Error>> {
        assert!(
            !address.worker_id.is_empty(),
            "peerlink: empty worker_id passed to get_or_connect"
        );

        let mut inner = self.inner.lock();
        inner.evict_idle();

        if let Some(client) = inner.clients.get_refresh(&address.worker_id) {
            tracing::debug!(worker_id = %address.worker_id, "reusing pooled client");
            return Ok(Arc::clone(client));
        }

        tracing::debug!(worker_id = %address.worker_id, "building new pooled client");
        let client = Arc::new(self.factory.connect(address).map_err(|source| {
            PoolError::ClientFactory {
                worker_id: address.worker_id.clone(),
                source,
            }
        })?);
        inner.clients.insert(address.worker_id.clone(), Arc::clone(&client));
        Ok(client)
    }

    /// Idempotently removes any cached entry for `worker_id`. Outstanding caller-held clones of
    /// the client remain valid; the pool simply stops serving them.
    pub fn disconnect(&self, worker_id: &WorkerId) {
        let mut inner = self.inner.lock();
        if inner.clients.remove(worker_id).is_some() {
            tracing::info!(worker_id = %worker_id, "disconnected pooled client");
        }
    }

    /// Current number of cached entries. Advisory only: callers must not race on it for
    /// correctness.
    pub fn size(&self) -> usize {
        self.inner.lock().clients.len()
    }
}

impl<C> Inner<C>
where
    C: PooledClient,
{
    /// Walks the LRU sequence from least- to most-recently-used, evicting idle entries, and
    /// stops at the first busy entry (after promoting it), so eviction work per call is bounded
    /// by the number of entries actually removed, plus one.
    fn evict_idle(&mut self) {
        loop {
            let Some(key) = self.clients.front().map(|(k, _)| k.clone()) else {
                break;
            };
            let idle = self
                .clients
                .get(&key)
                .map(|c| c.is_idle_after_rpcs())
                .unwrap_or(false);

            if idle {
                self.clients.pop_front();
                tracing::trace!(worker_id = %key, "evicted idle pool entry");
                continue;
            }

            // Busy: promote past it so it doesn't repeatedly block eviction of entries that
            // were idle-eligible before it, then stop scanning.
            self.clients.get_refresh(&key);
            tracing::trace!(worker_id = %key, "pool entry busy, stopping eviction scan");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;
    use crate::worker::NodeId;

    struct MockClient {
        idle: AtomicBool,
    }

    impl MockClient {
        fn new(idle: bool) -> Self {
            Self {
                idle: AtomicBool::new(idle),
            }
        }

        fn set_idle(&self, idle: bool) {
            self.idle.store(idle, Ordering::SeqCst);
        }
    }

    impl PooledClient for MockClient {
        fn is_idle_after_rpcs(&self) -> bool {
            self.idle.load(Ordering::SeqCst)
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock factory error")]
    struct MockFactoryError;

    fn addr(id: u8) -> PeerAddress {
        PeerAddress::new(WorkerId::new([id]), NodeId::new([id]), "127.0.0.1", 10000 + id as u16)
    }

    fn counting_factory() -> (impl Fn(&PeerAddress) -> Result<MockClient, MockFactoryError>, Arc<AtomicUsize>) {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);
        let factory = move |_: &PeerAddress| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            // A client that has dispatched zero RPCs is not "idle after RPCs" -- there is no
            // prior idle baseline for it to have stayed idle since. Starting busy means a
            // just-connected client survives the opportunistic eviction run at the start of the
            // very next `get_or_connect`, instead of being popped before it can ever be reused.
            Ok(MockClient::new(false))
        };
        (factory, counter)
    }

    #[test]
    fn get_or_connect_reuses_and_invokes_factory_once() {
        let (factory, calls) = counting_factory();
        let pool = Pool::new(factory);

        let a = addr(1);
        let c1 = pool.get_or_connect(&a).unwrap();
        let c2 = pool.get_or_connect(&a).unwrap();

        assert!(Arc::ptr_eq(&c1, &c2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(pool.size(), 1);
    }

    #[test]
    fn disconnect_is_idempotent_and_forces_reconnect() {
        let (factory, calls) = counting_factory();
        let pool = Pool::new(factory);
        let a = addr(1);

        pool.get_or_connect(&a).unwrap();
        pool.disconnect(&a.worker_id);
        pool.disconnect(&a.worker_id);
        assert_eq!(pool.size(), 0);

        pool.get_or_connect(&a).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[should_panic(expected = "empty worker_id")]
    fn empty_worker_id_panics() {
        let (factory, _) = counting_factory();
        let pool = Pool::new(factory);
        let bad = PeerAddress::new(WorkerId::new([]), NodeId::new([1]), "127.0.0.1", 1);
        let _ = pool.get_or_connect(&bad);
    }

    // Scenario S1: eviction walks past a busy entry, promoting it, and continues past it to
    // evict an older idle entry.
    #[test]
    fn eviction_walks_past_busy_entry() {
        let pool: Pool<MockClient, _> = Pool::new(|_: &PeerAddress| Ok(MockClient::new(false)));

        // Every client starts busy (see `counting_factory`), so each of these construction calls
        // also runs `evict_idle` against whatever is currently least-recently-used, finds it
        // busy, and promotes it one step -- that promotion is itself an observable side effect of
        // the real algorithm, not test noise. Connecting w2 before w1 looks backwards, but it is
        // what makes the *post-setup* LRU order come out to the naively-expected
        // oldest-to-newest `[w1, w2, w3]`: connecting w1 first would make it the first thing
        // promoted out of the least-recently-used slot, pushing w2 there instead.
        let w2 = pool.get_or_connect(&addr(2)).unwrap();
        let w1 = pool.get_or_connect(&addr(1)).unwrap();
        let w3 = pool.get_or_connect(&addr(3)).unwrap();

        w1.set_idle(true);
        w2.set_idle(false);
        w3.set_idle(true);

        let _w4 = pool.get_or_connect(&addr(4)).unwrap();

        // w1 evicted (idle, least-recently-used), w2 promoted and retained (busy), w3 retained
        // (the scan stops at the first busy entry, so idle w3 -- beyond w2 -- is never reached),
        // w4 inserted at most-recently-used.
        assert_eq!(pool.size(), 3);
        {
            let inner = pool.inner.lock();
            assert!(!inner.clients.contains_key(&WorkerId::new([1])));
            assert!(inner.clients.contains_key(&WorkerId::new([2])));
            assert!(inner.clients.contains_key(&WorkerId::new([3])));
            assert!(inner.clients.contains_key(&WorkerId::new([4])));

            // Order, not just membership: least-recently-used (front) to most-recently-used
            // (back) is `[w3, w2, w4]` -- i.e. most-recently-used to least-recently-used,
            // matching the spec's own convention, is `[w4, w2, w3]`.
            let order: Vec<WorkerId> = inner.clients.keys().cloned().collect();
            assert_eq!(
                order,
                vec![WorkerId::new([3]), WorkerId::new([2]), WorkerId::new([4])]
            );
        }
    }

    #[test]
    fn client_factory_error_propagates_without_partial_state() {
        let pool: Pool<MockClient, _> =
            Pool::new(|_: &PeerAddress| Err::<MockClient, _>(MockFactoryError));

        let err = pool.get_or_connect(&addr(1));
        assert!(err.is_err());
        assert_eq!(pool.size(), 0);
    }
}
