//! Windowed prefetch cache over a dataset index.
//!
//! Design notes:
//! - Entries live in a `BTreeMap<usize, CacheEntry>`; at most one job per index.
//! - The window `[cursor, cursor + W]` bounds decrypted memory to `O(W)`.
//! - A failed item is terminal until evicted; every `get` returns the same error.

pub mod entry;
pub mod prefetch;

pub use entry::{CacheEntry, EntryState};
pub use prefetch::PrefetchCache;
