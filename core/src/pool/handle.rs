use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::channel::oneshot;

use crate::dataset::Item;
use crate::types::{DatasetError, Result};

/// Future result of one submitted job.
///
/// - Owned by exactly one caller; not `Clone`.
/// - `.await` is the suspension point; [`JobHandle::wait`] blocks instead.
/// - Dropping the handle abandons the job. A worker that has not started it
///   skips it; a late result is discarded.
#[derive(Debug)]
pub struct JobHandle {
    item: Item,
    rx: oneshot::Receiver<Result<Bytes>>,
    early: Option<Result<Bytes>>,
}

impl JobHandle {
    pub(crate) fn new(item: Item, rx: oneshot::Receiver<Result<Bytes>>) -> Self {
        Self { item, rx, early: None }
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Non-blocking: has the worker delivered a result yet?
    pub fn is_finished(&mut self) -> bool {
        if self.early.is_some() {
            return true;
        }
        match self.rx.try_recv() {
            Ok(Some(result)) => {
                self.early = Some(result);
                true
            }
            Ok(None) => false,
            Err(oneshot::Canceled) => {
                self.early = Some(Err(DatasetError::PoolShutdown));
                true
            }
        }
    }

    /// Block the calling thread until this job completes.
    pub fn wait(self) -> Result<Bytes> {
        pollster::block_on(self)
    }
}

impl Future for JobHandle {
    type Output = Result<Bytes>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(result) = this.early.take() {
            return Poll::Ready(result);
        }
        // A dropped sender means the worker went away without answering.
        Pin::new(&mut this.rx)
            .poll(cx)
            .map(|r| r.unwrap_or(Err(DatasetError::PoolShutdown)))
    }
}
