use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_POOL_SIZE, MAX_AUTO_POOL_SIZE};
use crate::types::{DatasetError, Result};

/// Worker pool sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub workers: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { workers: DEFAULT_POOL_SIZE }
    }
}

impl PoolConfig {
    pub fn with_workers(workers: usize) -> Self {
        Self { workers }
    }

    /// One worker per core, leaving one core for the presentation thread.
    pub fn auto() -> Self {
        let workers = num_cpus::get().saturating_sub(1).clamp(1, MAX_AUTO_POOL_SIZE);
        Self { workers }
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(DatasetError::Validation("pool needs at least one worker".into()));
        }
        Ok(())
    }
}

/// Machine-derived worker count and prefetch horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelismProfile {
    pub worker_count: usize,
    pub prefetch_window: usize,
}

impl ParallelismProfile {
    pub fn single_threaded() -> Self {
        Self { worker_count: 1, prefetch_window: 1 }
    }

    /// Size the pool from core count and the window from available memory.
    ///
    /// `avg_item_bytes` is the expected plaintext size of one item; the window
    /// is how many of those fit in `mem_fraction` of free memory, capped at
    /// `hard_cap`.
    pub fn dynamic(avg_item_bytes: u64, mem_fraction: f64, hard_cap: usize) -> Self {
        let worker_count = PoolConfig::auto().workers;

        let mut sys = sysinfo::System::new();
        sys.refresh_memory();
        let avail_bytes = sys.available_memory();

        let budget = (avail_bytes as f64 * mem_fraction) as u64;
        let max_items = budget / avg_item_bytes.max(1);
        let prefetch_window = (max_items.min(hard_cap as u64) as usize).max(1);

        debug!(
            "[PROFILE] workers={}, prefetch_window={} (available={} bytes)",
            worker_count, prefetch_window, avail_bytes
        );
        Self { worker_count, prefetch_window }
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::with_workers(self.worker_count)
    }
}
