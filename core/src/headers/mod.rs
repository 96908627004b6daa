//! headers/mod.rs
//! Item envelope header: layout, registries, encode/decode.
//!
//! Every encrypted item on disk is `header (44 bytes) || AEAD ciphertext || tag`.
//! No other container exists; the header carries everything needed to
//! re-derive the item key from the password.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
