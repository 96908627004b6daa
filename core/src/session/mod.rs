//! Interactive session: one dataset, one pool, one cache.

pub mod dataset;
pub mod decode;

pub use dataset::{probe_password, Dataset};
pub use decode::{DecodedImage, ImageFormat};
