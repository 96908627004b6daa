//! Fixed-size decrypt worker pool.
//!
//! Workers are plain OS threads fed from one FIFO channel. They share only
//! the codec and the read-only key. Each submission returns a [`JobHandle`],
//! a future resolving to that job's bytes; dropping the handle abandons the
//! job.

pub mod job;
pub mod handle;
pub mod worker;
pub mod parallelism;

pub use job::{Job, JobOp};
pub use handle::JobHandle;
pub use worker::WorkerPool;
pub use parallelism::{ParallelismProfile, PoolConfig};
