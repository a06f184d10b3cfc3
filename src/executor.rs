//! A fixed-width work-dispatch pool with submit-side backpressure.
//!
//! Realizes the spec's "counting semaphore wrapping the underlying pool's post call" as a
//! `tokio::sync::Semaphore` gating spawns onto the ambient runtime: acquiring a permit blocks
//! the submitter until a slot frees, and the permit is held by the spawned task so it is released
//! (FIFO to the next waiter) exactly when the closure finishes, panic or not.

use std::{
    panic::AssertUnwindSafe,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use tokio::{sync::Semaphore, task::JoinSet};

type BoxedClosure = Box<dyn FnOnce() + Send + 'static>;

/// A fixed-width dispatcher. Submission blocks the caller when all `max_concurrency` slots are
/// occupied; after [`BoundedExecutor::stop`], submission is a programmer error.
pub struct BoundedExecutor {
    semaphore: Arc<Semaphore>,
    max_concurrency: usize,
    stopped: AtomicBool,
    tasks: std::sync::Mutex<JoinSet<()>>,
}

impl BoundedExecutor {
    /// Builds an executor backed by exactly `max_concurrency` concurrently-executing slots.
    ///
    /// # Panics
    ///
    /// Panics if `max_concurrency == 0`. A caller that wants "no executor" should not construct
    /// one at all -- see [`needs_default_executor`].
    pub fn new(max_concurrency: usize) -> Self {
        assert!(
            max_concurrency >= 1,
            "peerlink: BoundedExecutor requires max_concurrency >= 1"
        );
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
            stopped: AtomicBool::new(false),
            tasks: std::sync::Mutex::new(JoinSet::new()),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Schedules `f` for execution, blocking the caller until a slot is free.
    ///
    /// A panic inside `f` is caught, logged, and swallowed: it frees the slot for the next
    /// submission and never tears down the executor.
    ///
    /// # Panics
    ///
    /// Panics (debug assertion) if called after [`BoundedExecutor::stop`]; this mirrors the
    /// spec's "subsequent `Post` is undefined (typically: caller-programmer error)."
    pub async fn post<Fn_>(&self, f: Fn_)
    where
        Fn_: FnOnce() + Send + 'static,
    {
        debug_assert!(
            !self.stopped.load(Ordering::SeqCst),
            "peerlink: post called on a stopped BoundedExecutor"
        );

        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("peerlink: executor semaphore closed unexpectedly");

        let boxed: BoxedClosure = Box::new(f);
        self.tasks.lock().unwrap().spawn_blocking(move || {
            let result = std::panic::catch_unwind(AssertUnwindSafe(boxed));
            if let Err(payload) = result {
                let message = panic_message(&payload);
                tracing::error!(panic = %message, "submitted closure panicked, swallowing");
            }
            drop(permit);
        });
    }

    /// Marks the executor as no longer accepting submissions. Already-accepted closures keep
    /// running; call [`BoundedExecutor::join`] to wait for them.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Blocks until every previously-accepted closure has completed. Must be called after
    /// [`BoundedExecutor::stop`].
    pub async fn join(&self) {
        debug_assert!(
            self.stopped.load(Ordering::SeqCst),
            "peerlink: join called before stop"
        );

        let mut tasks = {
            let mut guard = self.tasks.lock().unwrap();
            std::mem::replace(&mut *guard, JoinSet::new())
        };
        while tasks.join_next().await.is_some() {}
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Whether the outer scheduler needs a separate [`BoundedExecutor`] for its default concurrency
/// group.
///
/// Returns `false` iff `max_concurrency_in_default_group == 0`. Otherwise returns `true` iff
/// either the default group allows more than one concurrent task, or at least one other
/// concurrency group exists (in which case a default executor is still needed to host the
/// default group's own work, even if that group itself is a singleton).
pub fn needs_default_executor(
    max_concurrency_in_default_group: usize,
    has_other_concurrency_groups: bool,
) -> bool {
    if max_concurrency_in_default_group == 0 {
        return false;
    }
    max_concurrency_in_default_group > 1 || has_other_concurrency_groups
}
