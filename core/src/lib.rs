//! encdata-core
//!
//! Encrypted image datasets with a windowed prefetch cache.
//! No Python, no PyO3, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;

// Envelope and codec
pub mod headers;
pub mod crypto;
pub mod telemetry;
pub mod normalize;

// Dataset layers
pub mod dataset;
pub mod pool;
pub mod cache;
pub mod pipeline;
pub mod session;
pub mod sweep;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::DatasetConfig;
    pub use crate::normalize::{NormalizeConfig, OutputFormat};
    pub use crate::crypto::{CodecConfig, CryptoCodec, Key};
    pub use crate::dataset::{DatasetIndex, Item, ItemKind};
    pub use crate::pool::{Job, JobHandle, JobOp, PoolConfig, WorkerPool};
    pub use crate::cache::{EntryState, PrefetchCache};
    pub use crate::pipeline::{BoundedPipeline, CompletionOrder, PipelineConfig};
    pub use crate::session::{probe_password, Dataset, DecodedImage, ImageFormat};
    pub use crate::sweep::{decrypt_directory, encrypt_directory, verify_directory, SweepReport};
    pub use crate::types::{DatasetError, Result};
}
