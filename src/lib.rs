//! Peerlink: the inter-worker RPC connection layer of a distributed task-execution runtime.
//!
//! Two independent pieces live here:
//!
//! - [`pool`]: a per-process cache of RPC client handles keyed by worker identity, with
//!   least-recently-used idle eviction, explicit disconnect, and a liveness-timeout callback that
//!   invalidates a cached client once the remote worker (or its node) is confirmed dead.
//! - [`executor`]: a fixed-width work-dispatch pool whose `post` blocks the submitter once
//!   saturated, providing the backpressure a scheduling queue needs when issuing RPCs through the
//!   pool above.
//!
//! Neither component depends on the other at runtime; both are meant to be held by an outer
//! scheduling layer, which this crate does not itself implement.

pub mod client;
pub mod error;
pub mod executor;
pub mod membership;
pub mod pool;
pub mod raylet;
pub mod runtime_env;
pub mod worker;

pub use client::{ClientFactory, PooledClient};
pub use error::{PoolError, RayletProbeError};
pub use executor::{needs_default_executor, BoundedExecutor};
pub use pool::{liveness::LivenessProbe, Pool};
pub use worker::{NodeId, PeerAddress, WorkerId};
