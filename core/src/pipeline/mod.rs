//! Credit-limited bulk processing over the worker pool.

pub mod bounded;

pub use bounded::{BoundedPipeline, CompletionOrder, Outcome, PipelineConfig};
