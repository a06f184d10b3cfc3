//! Identity and addressing types shared by the pool and the liveness probe.

use std::fmt;

/// Opaque, fixed-width identity of a worker process, unique for the lifetime of the cluster.
///
/// Equality and hashing are by byte content. The empty id is never valid and is rejected by
/// [`crate::pool::Pool::get_or_connect`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(Box<[u8]>);

impl WorkerId {
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WorkerId({})", hex_preview(&self.0))
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex_preview(&self.0))
    }
}

impl<T: Into<Box<[u8]>>> From<T> for WorkerId {
    fn from(bytes: T) -> Self {
        Self::new(bytes)
    }
}

/// Opaque, fixed-width identity of a node (raylet) hosting zero or more workers.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Box<[u8]>);

impl NodeId {
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", hex_preview(&self.0))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex_preview(&self.0))
    }
}

impl<T: Into<Box<[u8]>>> From<T> for NodeId {
    fn from(bytes: T) -> Self {
        Self::new(bytes)
    }
}

fn hex_preview(bytes: &[u8]) -> String {
    const MAX: usize = 8;
    let mut s = String::with_capacity(MAX * 2);
    for b in bytes.iter().take(MAX) {
        s.push_str(&format!("{b:02x}"));
    }
    if bytes.len() > MAX {
        s.push('\u{2026}');
    }
    s
}

/// A peer's dial information. Two addresses with the same `worker_id` are the same peer; `ip`
/// and `port` are advisory and only consulted the first time a client is built for that worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeerAddress {
    pub worker_id: WorkerId,
    pub node_id: NodeId,
    pub ip: String,
    pub port: u16,
}

impl PeerAddress {
    pub fn new(worker_id: WorkerId, node_id: NodeId, ip: impl Into<String>, port: u16) -> Self {
        Self {
            worker_id,
            node_id,
            ip: ip.into(),
            port,
        }
    }
}
