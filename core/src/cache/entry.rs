use bytes::Bytes;
use serde::Serialize;

use crate::pool::JobHandle;
use crate::types::Result;

/// A tracked index: either a job still owned by the pool, or its outcome.
#[derive(Debug)]
pub enum CacheEntry {
    Prefetching(JobHandle),
    Ready(Result<Bytes>),
}

impl CacheEntry {
    pub fn state(&self) -> EntryState {
        match self {
            CacheEntry::Prefetching(_) => EntryState::Prefetching,
            CacheEntry::Ready(Ok(_)) => EntryState::Ready,
            CacheEntry::Ready(Err(_)) => EntryState::Failed,
        }
    }

    /// Decrypted bytes held by this entry.
    pub fn resident_bytes(&self) -> usize {
        match self {
            CacheEntry::Ready(Ok(bytes)) => bytes.len(),
            _ => 0,
        }
    }
}

/// Observable lifecycle of one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryState {
    /// Never requested.
    Unrequested,
    /// Job submitted, result not collected yet.
    Prefetching,
    /// Bytes available.
    Ready,
    /// Ready with a terminal error.
    Failed,
    /// Dropped by eviction; the next access starts over.
    Evicted,
}

impl EntryState {
    /// True when the cache currently holds an entry for the index.
    pub fn is_tracked(self) -> bool {
        matches!(self, EntryState::Prefetching | EntryState::Ready | EntryState::Failed)
    }
}
