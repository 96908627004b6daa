// ## 📂 File: `src/config.rs`

//! config.rs
//! Session configuration, loadable from TOML.
//!
//! ```toml
//! prefetch_distance = 4
//! blacklist = ["broken.jpg.enc"]
//!
//! [pool]
//! workers = 3
//!
//! [codec]
//! cipher = "chacha20-poly1305"
//! kdf = "pbkdf2-sha256"
//! iterations = 200000
//!
//! [pipeline]
//! credits = 8
//! order = "input"
//!
//! [normalize]
//! width = 512
//! height = 512
//! format = "jpeg"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ALLOWED_SUFFIXES;
use crate::crypto::CodecConfig;
use crate::normalize::NormalizeConfig;
use crate::pipeline::PipelineConfig;
use crate::pool::PoolConfig;
use crate::types::{DatasetError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub pool: PoolConfig,
    /// Items prefetched ahead of the cursor. Defaults to the pool size.
    pub prefetch_distance: Option<usize>,
    /// Lowercase suffixes (without the dot) accepted by discovery.
    pub allowed_suffixes: Vec<String>,
    /// File names dropped from the index before anything else happens.
    pub blacklist: Vec<String>,
    /// Shuffle once right after opening.
    pub shuffle_seed: Option<u64>,
    pub codec: CodecConfig,
    pub pipeline: PipelineConfig,
    /// Applied by encrypt sweeps before sealing each image.
    pub normalize: NormalizeConfig,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            prefetch_distance: None,
            allowed_suffixes: DEFAULT_ALLOWED_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            blacklist: Vec::new(),
            shuffle_seed: None,
            codec: CodecConfig::default(),
            pipeline: PipelineConfig::default(),
            normalize: NormalizeConfig::default(),
        }
    }
}

impl DatasetConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| DatasetError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| DatasetError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.pool.validate()?;
        self.pipeline.validate()?;
        self.normalize.validate()?;
        self.codec
            .validate()
            .map_err(|e| DatasetError::Config(e.to_string()))?;
        if self.allowed_suffixes.is_empty() {
            return Err(DatasetError::Config("allowed_suffixes must not be empty".into()));
        }
        Ok(())
    }

    /// Effective prefetch window `W`.
    pub fn window(&self) -> usize {
        self.prefetch_distance.unwrap_or(self.pool.workers)
    }

    pub fn blacklist_set(&self) -> HashSet<String> {
        self.blacklist.iter().cloned().collect()
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.pool.workers = workers;
        self
    }

    pub fn with_prefetch_distance(mut self, distance: usize) -> Self {
        self.prefetch_distance = Some(distance);
        self
    }

    pub fn with_codec(mut self, codec: CodecConfig) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_normalize(mut self, normalize: NormalizeConfig) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_blacklist<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist = names.into_iter().map(Into::into).collect();
        self
    }
}
