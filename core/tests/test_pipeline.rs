#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;

    use futures::StreamExt;
    use tempfile::TempDir;
    use encdata_core::{
        constants::DEFAULT_ALLOWED_SUFFIXES,
        crypto::{CodecConfig, CryptoCodec, Key},
        dataset::DatasetIndex,
        pipeline::{BoundedPipeline, CompletionOrder, PipelineConfig},
        pool::{Job, PoolConfig, WorkerPool},
        types::DatasetError,
    };

    const PASSWORD: &str = "pipeline-password";

    fn codec() -> CryptoCodec {
        CryptoCodec::new(CodecConfig::fast()).unwrap()
    }

    fn dataset_dir(n: usize) -> TempDir {
        let dir = TempDir::new().unwrap();
        let key = Key::from_password(PASSWORD);
        for i in 0..n {
            let ct = codec().encrypt(&key, format!("item-{i}").as_bytes()).unwrap();
            fs::write(dir.path().join(format!("{i:03}.enc")), ct).unwrap();
        }
        dir
    }

    fn jobs(dir: &Path) -> Vec<Job> {
        let index = DatasetIndex::discover(dir, DEFAULT_ALLOWED_SUFFIXES).unwrap();
        index.iter().cloned().map(Job::fetch).collect()
    }

    fn pool(workers: usize) -> WorkerPool {
        WorkerPool::new(&PoolConfig::with_workers(workers), codec(), Key::from_password(PASSWORD)).unwrap()
    }

    #[test]
    fn zero_credits_rejected() {
        let pool = pool(1);
        let err = BoundedPipeline::new(&pool, Vec::new(), &PipelineConfig::with_credits(0)).unwrap_err();
        assert!(matches!(err, DatasetError::Validation(_)));
    }

    #[test]
    fn empty_input_ends_immediately() {
        let pool = pool(1);
        let pipeline = BoundedPipeline::new(&pool, Vec::new(), &PipelineConfig::default()).unwrap();
        assert_eq!(pipeline.blocking().count(), 0);
    }

    #[test]
    fn every_item_yielded_exactly_once() {
        let dir = dataset_dir(25);
        let pool = pool(3);
        let pipeline = BoundedPipeline::new(&pool, jobs(dir.path()), &PipelineConfig::with_credits(4)).unwrap();

        let mut seen = HashSet::new();
        for (item, result) in pipeline.blocking() {
            assert_eq!(result.unwrap(), format!("item-{}", item.index).into_bytes());
            assert!(seen.insert(item.index), "item {} yielded twice", item.index);
        }
        assert_eq!(seen.len(), 25);
        assert_eq!(pool.stats().jobs_submitted, 25);
    }

    #[test]
    fn input_order_is_preserved_when_requested() {
        let dir = dataset_dir(12);
        let pool = pool(4);
        let config = PipelineConfig { credits: 5, order: CompletionOrder::Input };
        let pipeline = BoundedPipeline::new(&pool, jobs(dir.path()), &config).unwrap();

        let order: Vec<usize> = pipeline.blocking().map(|(item, _)| item.index).collect();
        assert_eq!(order, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn submission_is_bounded_by_credits() {
        let dir = dataset_dir(10);
        let pool = pool(2);
        let mut pipeline = BoundedPipeline::new(&pool, jobs(dir.path()), &PipelineConfig::with_credits(3))
            .unwrap()
            .blocking();

        assert_eq!(pool.stats().jobs_submitted, 0);
        pipeline.next().unwrap();
        assert!(pool.stats().jobs_submitted <= 3);
        assert_eq!(pipeline.count(), 9);
    }

    #[test]
    fn failures_are_yielded_and_do_not_abort() {
        let dir = dataset_dir(6);
        fs::write(dir.path().join("002.enc"), b"not an envelope").unwrap();
        let wrong = CryptoCodec::new(CodecConfig::fast()).unwrap()
            .encrypt(&Key::from_password("other"), b"x")
            .unwrap();
        fs::write(dir.path().join("004.enc"), wrong).unwrap();

        let pool = pool(2);
        let pipeline = BoundedPipeline::new(&pool, jobs(dir.path()), &PipelineConfig::default()).unwrap();

        let mut ok = 0;
        let mut failed = Vec::new();
        for (item, result) in pipeline.blocking() {
            match result {
                Ok(_) => ok += 1,
                Err(e) => failed.push((item.index, e)),
            }
        }
        failed.sort_by_key(|(i, _)| *i);

        assert_eq!(ok, 4);
        assert_eq!(failed.len(), 2);
        assert!(matches!(failed[0], (2, DatasetError::Format { .. })));
        assert!(matches!(failed[1], (4, DatasetError::Authentication { .. })));
    }

    #[test]
    fn submit_failures_are_yielded_per_item() {
        let dir = dataset_dir(3);
        let pool = pool(1);
        pool.shutdown();

        let pipeline = BoundedPipeline::new(&pool, jobs(dir.path()), &PipelineConfig::default()).unwrap();
        let results: Vec<_> = pipeline.blocking().collect();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|(_, r)| matches!(r, Err(DatasetError::PoolShutdown))));
    }

    #[test]
    fn usable_as_a_stream() {
        let dir = dataset_dir(5);
        let pool = pool(2);
        let pipeline = BoundedPipeline::new(&pool, jobs(dir.path()), &PipelineConfig::with_credits(2)).unwrap();

        let results: Vec<_> = futures::executor::block_on(pipeline.collect::<Vec<_>>());
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|(_, r)| r.is_ok()));
    }
}
