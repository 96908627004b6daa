// # 📂 `src/pool/worker.rs`

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use bytes::Bytes;
use crossbeam::channel::{unbounded, Receiver, Sender};
use futures::channel::oneshot;
use log::{debug, trace, warn};

use crate::crypto::{CryptoCodec, Key};
use crate::pool::handle::JobHandle;
use crate::pool::job::Job;
use crate::pool::parallelism::PoolConfig;
use crate::telemetry::{PoolCounters, PoolStats};
use crate::types::{DatasetError, Result};

/// A queued job together with the slot its result goes to.
struct Task {
    job: Job,
    reply: oneshot::Sender<Result<Bytes>>,
}

/// Fixed set of decrypt workers consuming one FIFO queue.
///
/// - `submit` never blocks; jobs queue until a worker is free.
/// - `shutdown` closes the queue, lets workers drain it, and joins them.
///   It is idempotent and also runs on drop.
pub struct WorkerPool {
    sender: Mutex<Option<Sender<Task>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    counters: Arc<PoolCounters>,
    size: usize,
}

impl WorkerPool {
    pub fn new(config: &PoolConfig, codec: CryptoCodec, key: Key) -> Result<Self> {
        config.validate()?;

        let (tx, rx) = unbounded::<Task>();
        let counters = Arc::new(PoolCounters::default());
        let codec = Arc::new(codec);

        let mut workers = Vec::with_capacity(config.workers);
        for worker_id in 0..config.workers {
            let rx = rx.clone();
            let codec = Arc::clone(&codec);
            let key = key.clone();
            let counters = Arc::clone(&counters);

            let handle = thread::Builder::new()
                .name(format!("encdata-worker-{worker_id}"))
                .spawn(move || run_worker(worker_id, rx, &codec, &key, &counters))
                .map_err(|e| DatasetError::Validation(format!("failed to spawn worker: {e}")))?;
            workers.push(handle);
        }
        drop(rx);

        debug!("[POOL] started {} workers", config.workers);
        Ok(Self {
            sender: Mutex::new(Some(tx)),
            workers: Mutex::new(workers),
            counters,
            size: config.workers,
        })
    }

    /// Queue a job and return the handle to its result.
    pub fn submit(&self, job: Job) -> Result<JobHandle> {
        let guard = lock(&self.sender);
        let sender = guard.as_ref().ok_or(DatasetError::PoolShutdown)?;

        let (reply, rx) = oneshot::channel();
        let item = job.item.clone();
        sender
            .send(Task { job, reply })
            .map_err(|_| DatasetError::PoolShutdown)?;
        self.counters.record_submit();
        trace!("[POOL] queued item {} ({})", item.index, item.file_name());

        Ok(JobHandle::new(item, rx))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_shut_down(&self) -> bool {
        lock(&self.sender).is_none()
    }

    pub fn stats(&self) -> PoolStats {
        self.counters.snapshot()
    }

    /// Live counters. They stay readable after the pool itself is dropped.
    pub fn counters(&self) -> Arc<PoolCounters> {
        Arc::clone(&self.counters)
    }

    /// Close the queue and join every worker. Later calls do nothing.
    pub fn shutdown(&self) {
        let sender = lock(&self.sender).take();
        if sender.is_none() {
            return;
        }
        drop(sender);

        let workers = std::mem::take(&mut *lock(&self.workers));
        for handle in workers {
            if handle.join().is_err() {
                warn!("[POOL] a worker panicked before shutdown");
            }
        }
        debug!("[POOL] shut down");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.size)
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn run_worker(
    worker_id: usize,
    rx: Receiver<Task>,
    codec: &CryptoCodec,
    key: &Key,
    counters: &PoolCounters,
) {
    while let Ok(Task { job, reply }) = rx.recv() {
        if reply.is_canceled() {
            trace!("[WORKER-{}] skipping abandoned item {}", worker_id, job.item.index);
            counters.record_skip();
            continue;
        }

        let result = match job.execute(codec, key) {
            Ok((bytes, read_len, read_time, codec_time)) => {
                counters.record_times(read_time, codec_time);
                counters.record_success(read_len, bytes.len());
                Ok(bytes)
            }
            Err(e) => {
                debug!("[WORKER-{}] item {} failed: {}", worker_id, job.item.index, e);
                counters.record_failure();
                Err(e)
            }
        };

        // The handle may have been dropped while the job ran.
        if reply.send(result).is_err() {
            trace!("[WORKER-{}] result for item {} discarded", worker_id, job.item.index);
        }
    }
    trace!("[WORKER-{}] queue closed, exiting", worker_id);
}
