// ## 📂 File: `src/session/dataset.rs`

use std::fs;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use log::{debug, info};

use crate::cache::{EntryState, PrefetchCache};
use crate::config::DatasetConfig;
use crate::crypto::{CryptoCodec, Key};
use crate::dataset::{DatasetIndex, Item};
use crate::pool::WorkerPool;
use crate::session::decode::DecodedImage;
use crate::telemetry::{CacheCounters, PoolStats, Stage, TelemetrySnapshot, TelemetryTimer};
use crate::types::{DatasetError, Result};

/// An opened encrypted dataset, ready for sequential viewing.
///
/// Indexing follows the viewer's access pattern: [`Dataset::get_bytes`]
/// moves the window to the requested index and then returns its bytes.
#[derive(Debug)]
pub struct Dataset {
    cache: PrefetchCache,
    timer: TelemetryTimer,
}

impl Dataset {
    /// Discover, filter, probe the password, then start prefetching.
    ///
    /// A wrong password fails here, before any worker exists or any item past
    /// the first encrypted one is read.
    pub fn open(directory: impl AsRef<Path>, password: &str, config: &DatasetConfig) -> Result<Self> {
        let directory = directory.as_ref();
        config.validate()?;
        let mut timer = TelemetryTimer::new();

        let index = timer.time(Stage::Discover, || open_index(directory, config))?;

        let codec = CryptoCodec::new(config.codec.clone())
            .map_err(|e| DatasetError::Config(e.to_string()))?;
        let key = Key::from_password(password);

        timer.time(Stage::Probe, || probe_first(&index, &codec, &key))?;

        let pool = Arc::new(WorkerPool::new(&config.pool, codec, key)?);
        let mut cache = PrefetchCache::new(index, pool, config.window());

        if let Some(seed) = config.shuffle_seed {
            cache.shuffle(seed)?;
        } else {
            cache.fill_window()?;
        }

        info!(
            "[SESSION] opened {} ({} items, {} workers, window {})",
            directory.display(),
            cache.len(),
            cache.pool().size(),
            cache.window()
        );
        Ok(Self { cache, timer })
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn item(&self, i: usize) -> Result<&Item> {
        self.cache.item(i)
    }

    pub fn file_name(&self, i: usize) -> Result<String> {
        self.cache.index().file_name(i)
    }

    pub fn state(&self, i: usize) -> EntryState {
        self.cache.state(i)
    }

    pub fn cursor(&self) -> usize {
        self.cache.cursor()
    }

    pub fn advance(&mut self, i: usize) -> Result<()> {
        self.cache.advance_cursor(i)
    }

    /// Move the window to `i` and return the item's bytes.
    pub fn get_bytes(&mut self, i: usize) -> Result<Bytes> {
        self.cache.advance_cursor(i)?;
        self.cache.get(i)
    }

    pub async fn fetch_bytes(&mut self, i: usize) -> Result<Bytes> {
        self.cache.advance_cursor(i)?;
        self.cache.fetch(i).await
    }

    /// Like [`Dataset::get_bytes`], and the bytes must be a JPEG or PNG.
    pub fn get_image(&mut self, i: usize) -> Result<DecodedImage> {
        let bytes = self.get_bytes(i)?;
        let path = self.cache.item(i)?.path.clone();
        DecodedImage::from_bytes(&path, bytes)
    }

    pub fn shuffle(&mut self, seed: u64) -> Result<Vec<usize>> {
        self.cache.shuffle(seed)
    }

    pub fn cache_stats(&self) -> CacheCounters {
        self.cache.stats()
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.cache.pool().stats()
    }

    pub fn timer(&self) -> &TelemetryTimer {
        &self.timer
    }

    /// Session totals so far: worker counters plus open-time stages.
    pub fn stats(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.pool_stats(), &self.timer, Stage::Decrypt)
    }

    /// Tear down the pool. Pending prefetches are discarded.
    pub fn close(mut self) {
        debug!("[SESSION] closing");
        self.cache.clear();
        self.cache.pool().shutdown();
    }
}

/// Check `password` against the first encrypted item without opening a session.
pub fn probe_password(directory: impl AsRef<Path>, password: &str, config: &DatasetConfig) -> Result<()> {
    let index = open_index(directory.as_ref(), config)?;
    let codec = CryptoCodec::new(config.codec.clone())
        .map_err(|e| DatasetError::Config(e.to_string()))?;
    probe_first(&index, &codec, &Key::from_password(password))
}

fn open_index(directory: &Path, config: &DatasetConfig) -> Result<DatasetIndex> {
    let mut index = DatasetIndex::discover(directory, config.allowed_suffixes.as_slice())?;
    let dropped = index.exclude(&config.blacklist_set());
    if dropped > 0 {
        debug!("[SESSION] blacklist removed {} items", dropped);
    }
    Ok(index)
}

/// Decrypt the first encrypted item on the calling thread.
///
/// An index with no encrypted items has nothing to probe.
fn probe_first(index: &DatasetIndex, codec: &CryptoCodec, key: &Key) -> Result<()> {
    let Some(item) = index.first_encrypted() else {
        return Ok(());
    };
    let bytes = fs::read(&item.path).map_err(|e| DatasetError::io(&item.path, e))?;
    codec
        .decrypt(key, &bytes)
        .map_err(|e| DatasetError::from_crypto(&item.path, e))?;
    debug!("[SESSION] password accepted by {}", item.file_name());
    Ok(())
}
