// ## 📂 File: `src/cache/prefetch.rs`

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use log::{debug, trace};

use crate::cache::entry::{CacheEntry, EntryState};
use crate::dataset::{DatasetIndex, Item};
use crate::pool::{Job, WorkerPool};
use crate::telemetry::CacheCounters;
use crate::types::Result;

/// Sliding-window cache of decrypted items.
///
/// The consumer drives it from one thread: `advance_cursor` moves the window,
/// `get` returns bytes, blocking only when the entry is not Ready yet.
///
/// Dropping the cache abandons every pending entry before the pool handle is
/// released, so workers skip queued prefetches instead of decrypting them.
#[derive(Debug)]
pub struct PrefetchCache {
    // Declared ahead of `pool`: handles must be gone before a last-owner
    // pool drop joins the workers.
    entries: BTreeMap<usize, CacheEntry>,
    /// Recent evictions only; anything below `cursor - window - 1` is forgotten.
    evicted: HashSet<usize>,
    index: DatasetIndex,
    pool: Arc<WorkerPool>,
    window: usize,
    cursor: usize,
    counters: CacheCounters,
}

impl PrefetchCache {
    /// An empty cache; nothing is submitted until the first prefetch.
    pub fn new(index: DatasetIndex, pool: Arc<WorkerPool>, window: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            evicted: HashSet::new(),
            index,
            pool,
            window,
            cursor: 0,
            counters: CacheCounters::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn index(&self) -> &DatasetIndex {
        &self.index
    }

    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    pub fn item(&self, i: usize) -> Result<&Item> {
        self.index.item(i)
    }

    pub fn stats(&self) -> CacheCounters {
        self.counters.clone()
    }

    /// Number of indices with an entry (Prefetching, Ready or Failed).
    pub fn tracked(&self) -> usize {
        self.entries.len()
    }

    /// Tracked indices in ascending order.
    pub fn tracked_indices(&self) -> Vec<usize> {
        self.entries.keys().copied().collect()
    }

    /// Total decrypted bytes currently held.
    pub fn resident_bytes(&self) -> usize {
        self.entries.values().map(CacheEntry::resident_bytes).sum()
    }

    /// Number of indices still remembered as Evicted.
    pub fn remembered_evictions(&self) -> usize {
        self.evicted.len()
    }

    pub fn state(&self, i: usize) -> EntryState {
        match self.entries.get(&i) {
            Some(entry) => entry.state(),
            None if self.evicted.contains(&i) => EntryState::Evicted,
            None => EntryState::Unrequested,
        }
    }

    /// Submit a job for `i` unless one is already tracked.
    pub fn prefetch(&mut self, i: usize) -> Result<()> {
        let item = self.index.item(i)?;
        if self.entries.contains_key(&i) {
            return Ok(());
        }

        let handle = self.pool.submit(Job::fetch(item.clone()))?;
        trace!("[CACHE] prefetching {} ({})", i, item.file_name());
        self.entries.insert(i, CacheEntry::Prefetching(handle));
        self.evicted.remove(&i);
        self.counters.prefetches += 1;
        Ok(())
    }

    /// Drop whatever is held for `i`. Returns whether anything was held.
    ///
    /// A pending job is abandoned; its result is discarded when it lands.
    pub fn evict(&mut self, i: usize) -> bool {
        if self.entries.remove(&i).is_some() {
            self.evicted.insert(i);
            self.counters.evictions += 1;
            trace!("[CACHE] evicted {}", i);
            true
        } else {
            false
        }
    }

    /// Abandon every entry and forget past evictions.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.evicted.clear();
    }

    /// Move the cursor forward to `i` and re-fit the window around it.
    ///
    /// The cursor never moves backward. Everything outside
    /// `[cursor, cursor + window]` is evicted and every untracked index
    /// inside it is prefetched. Evictions far behind the cursor drop back to
    /// Unrequested, which keeps the bookkeeping O(window).
    pub fn advance_cursor(&mut self, i: usize) -> Result<()> {
        self.index.item(i)?;
        self.cursor = self.cursor.max(i);

        let (lo, hi) = self.window_bounds();
        let stale: Vec<usize> = self
            .entries
            .keys()
            .copied()
            .filter(|&j| j < lo || j > hi)
            .collect();
        for j in stale {
            self.evict(j);
        }
        let horizon = lo.saturating_sub(self.window + 1);
        self.evicted.retain(|&j| j >= horizon);

        self.fill_window()
    }

    /// Prefetch every untracked index in the current window.
    pub fn fill_window(&mut self) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        let (lo, hi) = self.window_bounds();
        for j in lo..=hi {
            self.prefetch(j)?;
        }
        Ok(())
    }

    /// Bytes for `i`, waiting on the owning job if needed.
    pub async fn fetch(&mut self, i: usize) -> Result<Bytes> {
        let item = self.index.item(i)?.clone();

        if let Some(CacheEntry::Ready(result)) = self.entries.get(&i) {
            self.counters.hits += 1;
            return result.clone();
        }

        let handle = match self.entries.remove(&i) {
            Some(CacheEntry::Prefetching(handle)) => {
                self.counters.waits += 1;
                handle
            }
            _ => {
                self.counters.misses += 1;
                debug!("[CACHE] miss on {} ({}), loading now", i, item.file_name());
                self.pool.submit(Job::fetch(item))?
            }
        };

        let started = Instant::now();
        let result = handle.await;
        self.counters.wait_time += started.elapsed();

        if result.is_err() {
            self.counters.failures += 1;
        }
        self.entries.insert(i, CacheEntry::Ready(result.clone()));
        self.evicted.remove(&i);
        result
    }

    /// Blocking form of [`PrefetchCache::fetch`].
    pub fn get(&mut self, i: usize) -> Result<Bytes> {
        pollster::block_on(self.fetch(i))
    }

    /// Abandon every entry, permute the index, and restart at position 0.
    ///
    /// Returns the permutation: `perm[new] == old`.
    pub fn shuffle(&mut self, seed: u64) -> Result<Vec<usize>> {
        self.clear();
        let perm = self.index.shuffle(seed);
        self.cursor = 0;
        debug!("[CACHE] shuffled {} items with seed {}", perm.len(), seed);
        self.fill_window()?;
        Ok(perm)
    }

    fn window_bounds(&self) -> (usize, usize) {
        let last = self.len().saturating_sub(1);
        (self.cursor, self.cursor.saturating_add(self.window).min(last))
    }
}

impl Drop for PrefetchCache {
    fn drop(&mut self) {
        self.entries.clear();
    }
}
