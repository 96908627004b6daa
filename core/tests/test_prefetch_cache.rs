// Prefetch cache: state machine, window bound, lazy loads, and failures.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use tempfile::TempDir;
    use encdata_core::{
        cache::{EntryState, PrefetchCache},
        constants::DEFAULT_ALLOWED_SUFFIXES,
        crypto::{CodecConfig, CryptoCodec, Key},
        dataset::DatasetIndex,
        pool::{PoolConfig, WorkerPool},
        types::DatasetError,
    };

    const PASSWORD: &str = "cache-password";

    fn codec() -> CryptoCodec {
        CryptoCodec::new(CodecConfig::fast()).unwrap()
    }

    fn payload(i: usize) -> Vec<u8> {
        format!("item-{i:03}").into_bytes()
    }

    /// `n` encrypted items named `000.enc`, `001.enc`, ...
    fn dataset_dir(n: usize) -> TempDir {
        let dir = TempDir::new().unwrap();
        let key = Key::from_password(PASSWORD);
        for i in 0..n {
            let ct = codec().encrypt(&key, &payload(i)).unwrap();
            fs::write(dir.path().join(format!("{i:03}.enc")), ct).unwrap();
        }
        dir
    }

    fn cache(dir: &Path, window: usize) -> PrefetchCache {
        let index = DatasetIndex::discover(dir, DEFAULT_ALLOWED_SUFFIXES).unwrap();
        let pool = WorkerPool::new(&PoolConfig::with_workers(2), codec(), Key::from_password(PASSWORD)).unwrap();
        PrefetchCache::new(index, Arc::new(pool), window)
    }

    #[test]
    fn new_cache_tracks_nothing() {
        let dir = dataset_dir(3);
        let cache = cache(dir.path(), 1);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.tracked(), 0);
        assert_eq!(cache.state(0), EntryState::Unrequested);
        assert_eq!(cache.pool().stats().jobs_submitted, 0);
    }

    #[test]
    fn prefetch_is_idempotent() {
        let dir = dataset_dir(2);
        let mut cache = cache(dir.path(), 1);

        cache.prefetch(1).unwrap();
        cache.prefetch(1).unwrap();
        assert_eq!(cache.state(1), EntryState::Prefetching);
        assert_eq!(cache.stats().prefetches, 1);
        assert_eq!(cache.pool().stats().jobs_submitted, 1);

        assert_eq!(cache.get(1).unwrap(), payload(1));
        cache.prefetch(1).unwrap();
        assert_eq!(cache.pool().stats().jobs_submitted, 1);
        assert_eq!(cache.state(1), EntryState::Ready);
    }

    #[test]
    fn get_without_prefetch_loads_lazily() {
        let dir = dataset_dir(4);
        let mut cache = cache(dir.path(), 1);

        assert_eq!(cache.get(3).unwrap(), payload(3));
        assert_eq!(cache.state(3), EntryState::Ready);
        assert_eq!(cache.stats().misses, 1);

        assert_eq!(cache.get(3).unwrap(), payload(3));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.pool().stats().jobs_submitted, 1);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let dir = dataset_dir(2);
        let mut cache = cache(dir.path(), 1);
        assert!(matches!(cache.get(2), Err(DatasetError::IndexOutOfRange { index: 2, len: 2 })));
        assert!(matches!(cache.prefetch(9), Err(DatasetError::IndexOutOfRange { .. })));
        assert!(matches!(cache.advance_cursor(2), Err(DatasetError::IndexOutOfRange { .. })));
    }

    #[test]
    fn three_items_window_one_walkthrough() {
        let dir = dataset_dir(3);
        let mut cache = cache(dir.path(), 1);

        cache.advance_cursor(0).unwrap();
        assert_eq!(cache.tracked_indices(), [0, 1]);
        assert_eq!(cache.get(0).unwrap(), payload(0));
        assert_eq!(cache.state(0), EntryState::Ready);
        assert_eq!(cache.state(2), EntryState::Unrequested);

        cache.advance_cursor(1).unwrap();
        assert_eq!(cache.state(0), EntryState::Evicted);
        assert_eq!(cache.tracked_indices(), [1, 2]);
        assert_eq!(cache.get(1).unwrap(), payload(1));

        cache.advance_cursor(2).unwrap();
        assert_eq!(cache.tracked_indices(), [2]);
        assert_eq!(cache.get(2).unwrap(), payload(2));
        assert_eq!(cache.state(1), EntryState::Evicted);
    }

    #[test]
    fn window_bounds_tracked_entries() {
        let dir = dataset_dir(20);
        let mut cache = cache(dir.path(), 3);

        for i in [0, 2, 5, 6, 11, 17, 19] {
            cache.advance_cursor(i).unwrap();
            let hi = (i + 3).min(19);
            assert_eq!(cache.tracked_indices(), (i..=hi).collect::<Vec<_>>());
            assert_eq!(cache.get(i).unwrap(), payload(i));
            assert!(cache.tracked() <= 4);
        }
    }

    #[test]
    fn cursor_never_moves_backward() {
        let dir = dataset_dir(10);
        let mut cache = cache(dir.path(), 2);

        cache.advance_cursor(6).unwrap();
        cache.advance_cursor(2).unwrap();
        assert_eq!(cache.cursor(), 6);
        assert_eq!(cache.tracked_indices(), [6, 7, 8]);

        // Going back is a plain cache miss.
        assert_eq!(cache.get(2).unwrap(), payload(2));
        assert_eq!(cache.state(2), EntryState::Ready);
    }

    #[test]
    fn evict_then_access_fetches_again() {
        let dir = dataset_dir(2);
        let mut cache = cache(dir.path(), 0);

        assert_eq!(cache.get(0).unwrap(), payload(0));
        assert!(cache.evict(0));
        assert!(!cache.evict(0));
        assert_eq!(cache.state(0), EntryState::Evicted);
        assert_eq!(cache.resident_bytes(), 0);

        assert_eq!(cache.get(0).unwrap(), payload(0));
        assert_eq!(cache.stats().misses, 2);
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(cache.pool().stats().jobs_submitted, 2);
    }

    #[test]
    fn evicting_a_pending_job_abandons_it() {
        let dir = dataset_dir(1);
        let mut cache = cache(dir.path(), 0);

        cache.prefetch(0).unwrap();
        assert!(cache.evict(0));
        assert_eq!(cache.state(0), EntryState::Evicted);

        assert_eq!(cache.get(0).unwrap(), payload(0));
        assert_eq!(cache.pool().stats().jobs_submitted, 2);
    }

    #[test]
    fn failed_entry_is_terminal_until_evicted() {
        let dir = dataset_dir(2);
        fs::write(dir.path().join("001.enc"), b"garbage, not an envelope").unwrap();
        let mut cache = cache(dir.path(), 1);

        cache.advance_cursor(0).unwrap();
        assert_eq!(cache.get(0).unwrap(), payload(0));

        let first = cache.get(1).unwrap_err();
        assert!(matches!(first, DatasetError::Format { .. }), "{first}");
        assert_eq!(cache.state(1), EntryState::Failed);

        let again = cache.get(1).unwrap_err();
        assert_eq!(first.to_string(), again.to_string());
        assert_eq!(cache.pool().stats().jobs_submitted, 2);
        assert_eq!(cache.stats().failures, 1);

        cache.evict(1);
        assert!(cache.get(1).is_err());
        assert_eq!(cache.pool().stats().jobs_submitted, 3);
    }

    #[test]
    fn ready_entries_survive_pool_shutdown() {
        let dir = dataset_dir(3);
        let mut cache = cache(dir.path(), 0);

        assert_eq!(cache.get(0).unwrap(), payload(0));
        cache.pool().shutdown();

        assert_eq!(cache.get(0).unwrap(), payload(0));
        assert!(matches!(cache.get(1), Err(DatasetError::PoolShutdown)));
        assert!(matches!(cache.prefetch(2), Err(DatasetError::PoolShutdown)));
        assert_eq!(cache.state(1), EntryState::Unrequested);
    }

    #[test]
    fn shuffle_resets_cursor_and_refills() {
        let dir = dataset_dir(8);
        let mut cache = cache(dir.path(), 2);

        cache.advance_cursor(5).unwrap();
        let perm = cache.shuffle(1729).unwrap();
        assert_eq!(cache.cursor(), 0);
        assert_eq!(cache.tracked_indices(), [0, 1, 2]);

        for (new, &old) in perm.iter().enumerate() {
            assert_eq!(cache.get(new).unwrap(), payload(old));
        }
    }

    #[test]
    fn fetch_is_async() {
        let dir = dataset_dir(2);
        let mut cache = cache(dir.path(), 1);
        cache.fill_window().unwrap();

        let bytes = futures::executor::block_on(cache.fetch(1)).unwrap();
        assert_eq!(bytes, payload(1));
        assert_eq!(cache.stats().waits, 1);
    }

    #[test]
    fn dropping_the_last_owner_skips_pending_prefetches() {
        let dir = TempDir::new().unwrap();
        let key = Key::from_password(PASSWORD);
        let big = vec![0x5A; 1 << 20];
        for i in 0..16 {
            let ct = codec().encrypt(&key, &big).unwrap();
            fs::write(dir.path().join(format!("{i:03}.enc")), ct).unwrap();
        }
        let index = DatasetIndex::discover(dir.path(), DEFAULT_ALLOWED_SUFFIXES).unwrap();
        let pool = WorkerPool::new(&PoolConfig::with_workers(1), codec(), key).unwrap();
        let counters = pool.counters();
        let mut cache = PrefetchCache::new(index, Arc::new(pool), 15);

        cache.fill_window().unwrap();
        assert_eq!(cache.tracked(), 16);
        drop(cache);

        // The pool went down with the cache; nothing may still be queued.
        let stats = counters.snapshot();
        assert_eq!(stats.jobs_submitted, 16);
        assert!(stats.jobs_skipped > 0, "{stats:?}");
        assert_eq!(stats.jobs_completed + stats.jobs_skipped, 16);
    }

    #[test]
    fn eviction_history_stays_bounded_on_a_long_walk() {
        let dir = dataset_dir(60);
        let mut cache = cache(dir.path(), 2);

        for i in 0..60 {
            cache.advance_cursor(i).unwrap();
            if i > 0 {
                assert_eq!(cache.state(i - 1), EntryState::Evicted);
            }
            assert!(cache.remembered_evictions() <= cache.window() + 1);
        }
        assert_eq!(cache.state(0), EntryState::Unrequested);
        assert_eq!(cache.stats().evictions, 59);
    }
}
