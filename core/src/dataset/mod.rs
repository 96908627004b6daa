//! Dataset indexing: which files are items, and in what order.
//!
//! An index is built once per session. Ordinals are dense (`0..len`) and are
//! re-assigned after `exclude` and `shuffle`, so cache indices always match
//! presentation order.

pub mod item;
pub mod index;

pub use item::{Item, ItemKind};
pub use index::DatasetIndex;
