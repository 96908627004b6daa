// # 📂 `src/pipeline/bounded.rs`

//! Streams every job through the pool with at most `credits` in flight.
//!
//! - Submission is lazy: job `k + credits` is submitted only after one of the
//!   earlier jobs has been yielded.
//! - A failed item is yielded with its error; the pipeline keeps going.
//! - Every job is yielded exactly once, then the stream ends.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::executor::{block_on_stream, BlockingStream};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PIPELINE_CREDITS;
use crate::dataset::Item;
use crate::pool::{Job, WorkerPool};
use crate::types::{DatasetError, Result};

/// One yielded result, paired with the item it belongs to.
pub type Outcome = (Item, Result<Bytes>);

/// Order in which results leave the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionOrder {
    /// Whichever job finishes first.
    #[default]
    Completion,
    /// Same order as the input; a slow head job holds back later results.
    Input,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub credits: usize,
    pub order: CompletionOrder,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { credits: DEFAULT_PIPELINE_CREDITS, order: CompletionOrder::default() }
    }
}

impl PipelineConfig {
    pub fn with_credits(credits: usize) -> Self {
        Self { credits, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.credits == 0 {
            return Err(DatasetError::Validation("pipeline needs at least one credit".into()));
        }
        Ok(())
    }
}

pub struct BoundedPipeline<'a> {
    inner: BoxStream<'a, Outcome>,
}

impl<'a> BoundedPipeline<'a> {
    pub fn new<I>(pool: &'a WorkerPool, jobs: I, config: &PipelineConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Job>,
        I::IntoIter: Send + 'a,
    {
        config.validate()?;

        let submitted = stream::iter(jobs).map(move |job| {
            let item = job.item.clone();
            trace!("[PIPELINE] submitting item {}", item.index);
            let handle = pool.submit(job);
            async move {
                match handle {
                    Ok(handle) => (item, handle.await),
                    Err(e) => (item, Err(e)),
                }
            }
        });

        let inner = match config.order {
            CompletionOrder::Completion => submitted.buffer_unordered(config.credits).boxed(),
            CompletionOrder::Input => submitted.buffered(config.credits).boxed(),
        };
        Ok(Self { inner })
    }

    /// Drive the pipeline from synchronous code.
    pub fn blocking(self) -> BlockingStream<Self> {
        block_on_stream(self)
    }
}

impl Stream for BoundedPipeline<'_> {
    type Item = Outcome;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl std::fmt::Debug for BoundedPipeline<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedPipeline").finish_non_exhaustive()
    }
}
