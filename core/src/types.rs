use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::crypto::CryptoError;
use crate::headers::HeaderError;

/// Unified error for everything above the codec: index, pool, cache, pipeline.
///
/// - `Clone` so a failed cache entry can hand the same error to every reader.
/// - Authentication and format failures are separate variants: the first means
///   "ask for another password", the second "this file is not ours".
#[derive(Debug, Clone, Error)]
pub enum DatasetError {
    /// Wrong key, or ciphertext altered after it was written.
    #[error("authentication failed for {}: wrong password or tampered file", path.display())]
    Authentication { path: PathBuf },

    /// Bytes do not carry a readable envelope.
    #[error("{} is not an encrypted item: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// File missing or unreadable.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    /// Decrypted bytes are not a recognised image encoding.
    #[error("{} does not decode as an image: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// Submission after the worker pool was torn down.
    #[error("worker pool has been shut down")]
    PoolShutdown,

    #[error("index {index} out of range for dataset of {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),
}

impl DatasetError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DatasetError::Io { path: path.into(), source: Arc::new(source) }
    }

    /// Attach a path to a codec failure.
    pub fn from_crypto(path: &Path, e: CryptoError) -> Self {
        match e {
            CryptoError::TagMismatch => DatasetError::Authentication { path: path.to_path_buf() },
            CryptoError::Header(h) => DatasetError::Format {
                path: path.to_path_buf(),
                reason: h.to_string(),
            },
            other => DatasetError::Validation(format!("{}: {}", path.display(), other)),
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, DatasetError::Authentication { .. })
    }

    /// Path of the item the error belongs to, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DatasetError::Authentication { path }
            | DatasetError::Format { path, .. }
            | DatasetError::Io { path, .. }
            | DatasetError::Decode { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<HeaderError> for DatasetError {
    fn from(e: HeaderError) -> Self {
        DatasetError::Format { path: PathBuf::new(), reason: e.to_string() }
    }
}

pub type Result<T, E = DatasetError> = std::result::Result<T, E>;
