use std::fs;
use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::crypto::{CryptoCodec, Key};
use crate::dataset::Item;
use crate::normalize::{normalize_image, NormalizeConfig};
use crate::types::{DatasetError, Result};

/// What a worker does with the file behind an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOp {
    /// Read an envelope and return its plaintext.
    Decrypt,
    /// Read a plain file, optionally normalize it, and return its envelope.
    Encrypt { normalize: Option<NormalizeConfig> },
    /// Read a plain file as-is.
    Load,
}

/// One unit of pool work.
#[derive(Debug, Clone)]
pub struct Job {
    pub item: Item,
    pub op: JobOp,
}

impl Job {
    /// The job that yields presentation bytes for `item`.
    pub fn fetch(item: Item) -> Self {
        let op = if item.is_encrypted() { JobOp::Decrypt } else { JobOp::Load };
        Self { item, op }
    }

    /// Encrypt the source bytes as they are.
    pub fn encrypt(item: Item) -> Self {
        Self { item, op: JobOp::Encrypt { normalize: None } }
    }

    /// Decode, cover-resize and re-encode the image, then encrypt it.
    pub fn encrypt_normalized(item: Item, normalize: NormalizeConfig) -> Self {
        Self { item, op: JobOp::Encrypt { normalize: Some(normalize) } }
    }

    /// Run the job on the current thread.
    ///
    /// Returns the output bytes, the number of bytes read, and the time spent
    /// reading and in the codec.
    pub(crate) fn execute(
        &self,
        codec: &CryptoCodec,
        key: &Key,
    ) -> Result<(Bytes, usize, Duration, Duration)> {
        let path = &self.item.path;

        let t_read = Instant::now();
        let input = fs::read(path).map_err(|e| DatasetError::io(path, e))?;
        let read_time = t_read.elapsed();
        let read_len = input.len();

        let t_codec = Instant::now();
        let output = match self.op {
            JobOp::Decrypt => codec
                .decrypt(key, &input)
                .map_err(|e| DatasetError::from_crypto(path, e))?,
            JobOp::Encrypt { normalize } => {
                let plaintext = match normalize {
                    Some(cfg) => normalize_image(path, &input, &cfg)?,
                    None => input,
                };
                codec
                    .encrypt(key, &plaintext)
                    .map_err(|e| DatasetError::from_crypto(path, e))?
            }
            JobOp::Load => input,
        };

        Ok((Bytes::from(output), read_len, read_time, t_codec.elapsed()))
    }
}
