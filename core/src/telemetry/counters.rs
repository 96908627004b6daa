// ### `src/telemetry/counters.rs`

//! telemetry/counters.rs
//! Mutable counters collected while jobs run and entries move through the cache.

use std::ops::AddAssign;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Shared by every worker of one pool.
#[derive(Debug, Default)]
pub struct PoolCounters {
    jobs_submitted: AtomicU64,
    jobs_completed: AtomicU64,
    jobs_failed: AtomicU64,
    jobs_skipped: AtomicU64,
    bytes_read: AtomicU64,
    bytes_produced: AtomicU64,
    read_nanos: AtomicU64,
    codec_nanos: AtomicU64,
}

impl PoolCounters {
    pub fn record_submit(&self) {
        self.jobs_submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// A queued job whose handle was dropped before a worker reached it.
    pub fn record_skip(&self) {
        self.jobs_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self, bytes_read: usize, bytes_produced: usize) {
        self.jobs_completed.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes_read as u64, Ordering::Relaxed);
        self.bytes_produced.fetch_add(bytes_produced as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.jobs_completed.fetch_add(1, Ordering::Relaxed);
        self.jobs_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_times(&self, read: Duration, codec: Duration) {
        self.read_nanos.fetch_add(read.as_nanos() as u64, Ordering::Relaxed);
        self.codec_nanos.fetch_add(codec.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PoolStats {
        PoolStats {
            jobs_submitted: self.jobs_submitted.load(Ordering::Relaxed),
            jobs_completed: self.jobs_completed.load(Ordering::Relaxed),
            jobs_failed: self.jobs_failed.load(Ordering::Relaxed),
            jobs_skipped: self.jobs_skipped.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            bytes_produced: self.bytes_produced.load(Ordering::Relaxed),
            read_time: Duration::from_nanos(self.read_nanos.load(Ordering::Relaxed)),
            codec_time: Duration::from_nanos(self.codec_nanos.load(Ordering::Relaxed)),
        }
    }
}

/// Point-in-time copy of [`PoolCounters`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolStats {
    pub jobs_submitted: u64,
    pub jobs_completed: u64,
    pub jobs_failed: u64,
    pub jobs_skipped: u64,
    pub bytes_read: u64,
    pub bytes_produced: u64,
    pub read_time: Duration,
    pub codec_time: Duration,
}

impl PoolStats {
    /// Submitted jobs not yet completed or skipped.
    pub fn in_flight(&self) -> u64 {
        self.jobs_submitted
            .saturating_sub(self.jobs_completed)
            .saturating_sub(self.jobs_skipped)
    }
}

/// Cache-side counters. Owned by one `PrefetchCache`.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheCounters {
    /// `get` served from a Ready entry.
    pub hits: u64,
    /// `get` had to wait on a Prefetching entry.
    pub waits: u64,
    /// `get` found nothing and materialized on the spot.
    pub misses: u64,
    /// Jobs submitted by `prefetch`.
    pub prefetches: u64,
    pub evictions: u64,
    /// Entries that ended in an error.
    pub failures: u64,
    /// Total time `get` spent suspended on handles.
    pub wait_time: Duration,
}

impl CacheCounters {
    pub fn merge(&mut self, other: &CacheCounters) {
        self.hits += other.hits;
        self.waits += other.waits;
        self.misses += other.misses;
        self.prefetches += other.prefetches;
        self.evictions += other.evictions;
        self.failures += other.failures;
        self.wait_time += other.wait_time;
    }
}

impl AddAssign for CacheCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
