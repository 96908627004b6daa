//! telemetry/mod.rs
//! Counters, stage timers and immutable snapshots for pool, cache and sweeps.
//!
//! - Pool counters are atomics: every worker thread updates them.
//! - Cache counters are plain integers: the cache has a single owner.
//! - Snapshots are `Serialize` so the CLI can emit them as JSON.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
