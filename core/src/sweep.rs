// ## 📂 File: `src/sweep.rs`

//! sweep.rs
//! Whole-directory encrypt / decrypt / verify passes over a [`BoundedPipeline`].
//!
//! Failures are collected per file; a sweep only errors out when it cannot
//! start (unreadable source, bad config, output directory not creatable).

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use crate::config::DatasetConfig;
use crate::constants::ENCRYPTED_SUFFIX;
use crate::crypto::{CryptoCodec, Key};
use crate::dataset::{DatasetIndex, Item};
use crate::normalize::NormalizeConfig;
use crate::pipeline::BoundedPipeline;
use crate::pool::{Job, WorkerPool};
use crate::telemetry::{Stage, TelemetrySnapshot, TelemetryTimer};
use crate::types::{DatasetError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    /// Files whose job succeeded and whose output, if any, was written.
    pub processed: usize,
    #[serde(serialize_with = "serialize_failures")]
    pub failed: Vec<(Item, DatasetError)>,
    pub telemetry: TelemetrySnapshot,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.processed + self.failed.len()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DatasetError::Validation(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SweepKind {
    Encrypt(Option<NormalizeConfig>),
    Decrypt,
    Verify,
}

impl SweepKind {
    fn label(self) -> &'static str {
        match self {
            SweepKind::Encrypt(Some(_)) => "encrypt (normalized)",
            SweepKind::Encrypt(None) => "encrypt",
            SweepKind::Decrypt => "decrypt",
            SweepKind::Verify => "verify",
        }
    }

    fn codec_stage(self) -> Stage {
        match self {
            SweepKind::Encrypt(_) => Stage::Encrypt,
            SweepKind::Decrypt | SweepKind::Verify => Stage::Decrypt,
        }
    }

    fn job(self, item: Item) -> Job {
        match self {
            SweepKind::Encrypt(Some(cfg)) => Job::encrypt_normalized(item, cfg),
            SweepKind::Encrypt(None) => Job::encrypt(item),
            SweepKind::Decrypt | SweepKind::Verify => Job::fetch(item),
        }
    }

    fn output_name(self, item: &Item) -> String {
        let name = item.file_name();
        match self {
            SweepKind::Encrypt(Some(cfg)) => cfg.output_name(&name, ENCRYPTED_SUFFIX),
            SweepKind::Encrypt(None) => format!("{name}.{ENCRYPTED_SUFFIX}"),
            SweepKind::Decrypt | SweepKind::Verify => Path::new(&name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or(name),
        }
    }
}

/// Encrypt every image in `src` into `out`.
///
/// With normalization on (the default) each image is cover-resized and
/// re-encoded, and lands as `<stem>.<format>.enc`; files that do not decode
/// as images are reported as `Decode` failures. With it off the source bytes
/// are sealed as-is into `<file name>.enc`.
///
/// The `_with` variants call `progress(item, total)` once per finished item.
pub fn encrypt_directory(src: &Path, out: &Path, key: &Key, config: &DatasetConfig) -> Result<SweepReport> {
    encrypt_directory_with(src, out, key, config, |_, _| {})
}

pub fn encrypt_directory_with(
    src: &Path,
    out: &Path,
    key: &Key,
    config: &DatasetConfig,
    progress: impl FnMut(&Item, usize),
) -> Result<SweepReport> {
    let suffixes: Vec<&str> = config
        .allowed_suffixes
        .iter()
        .map(String::as_str)
        .filter(|s| *s != ENCRYPTED_SUFFIX)
        .collect();
    let index = DatasetIndex::discover(src, suffixes.as_slice())?;
    let kind = SweepKind::Encrypt(config.normalize.active());
    run_sweep(kind, index, Some(out), key, config, progress)
}

/// Decrypt every `.enc` file in `src` into `out`, dropping the suffix.
///
/// This is the only path that writes plaintext to disk.
pub fn decrypt_directory(src: &Path, out: &Path, key: &Key, config: &DatasetConfig) -> Result<SweepReport> {
    decrypt_directory_with(src, out, key, config, |_, _| {})
}

pub fn decrypt_directory_with(
    src: &Path,
    out: &Path,
    key: &Key,
    config: &DatasetConfig,
    progress: impl FnMut(&Item, usize),
) -> Result<SweepReport> {
    let index = DatasetIndex::discover(src, &[ENCRYPTED_SUFFIX])?;
    run_sweep(SweepKind::Decrypt, index, Some(out), key, config, progress)
}

/// Decrypt every `.enc` file in `src` and discard the plaintext.
pub fn verify_directory(src: &Path, key: &Key, config: &DatasetConfig) -> Result<SweepReport> {
    verify_directory_with(src, key, config, |_, _| {})
}

pub fn verify_directory_with(
    src: &Path,
    key: &Key,
    config: &DatasetConfig,
    progress: impl FnMut(&Item, usize),
) -> Result<SweepReport> {
    let index = DatasetIndex::discover(src, &[ENCRYPTED_SUFFIX])?;
    run_sweep(SweepKind::Verify, index, None, key, config, progress)
}

fn run_sweep(
    kind: SweepKind,
    mut index: DatasetIndex,
    out: Option<&Path>,
    key: &Key,
    config: &DatasetConfig,
    mut progress: impl FnMut(&Item, usize),
) -> Result<SweepReport> {
    config.validate()?;
    let mut timer = TelemetryTimer::new();

    let dropped = index.exclude(&config.blacklist_set());
    if dropped > 0 {
        debug!("[SWEEP] blacklist removed {} items", dropped);
    }
    if let Some(out) = out {
        fs::create_dir_all(out).map_err(|e| DatasetError::io(out, e))?;
    }

    let codec = CryptoCodec::new(config.codec.clone())
        .map_err(|e| DatasetError::Config(e.to_string()))?;
    let pool = WorkerPool::new(&config.pool, codec, key.clone())?;
    info!("[SWEEP] {}: {} items from {}", kind.label(), index.len(), index.root().display());

    let total = index.len();
    let jobs: Vec<Job> = index.iter().cloned().map(|item| kind.job(item)).collect();
    let pipeline = BoundedPipeline::new(&pool, jobs, &config.pipeline)?;

    let mut processed = 0usize;
    let mut failed = Vec::new();
    for (item, result) in pipeline.blocking() {
        let written = result.and_then(|bytes| match out {
            Some(out) => {
                let target: PathBuf = out.join(kind.output_name(&item));
                timer.time(Stage::Write, || fs::write(&target, &bytes))
                    .map_err(|e| DatasetError::io(&target, e))
            }
            None => Ok(()),
        });

        match written {
            Ok(()) => processed += 1,
            Err(e) => {
                warn!("[SWEEP] {}: {}", item.file_name(), e);
                failed.push((item.clone(), e));
            }
        }
        progress(&item, total);
    }

    pool.shutdown();
    timer.finish();
    let telemetry = TelemetrySnapshot::from(&pool.stats(), &timer, kind.codec_stage());

    info!("[SWEEP] {} done: {} ok, {} failed", kind.label(), processed, failed.len());
    Ok(SweepReport { processed, failed, telemetry })
}

fn serialize_failures<S>(failed: &[(Item, DatasetError)], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    let mut seq = serializer.serialize_seq(Some(failed.len()))?;
    for (item, error) in failed {
        seq.serialize_element(&(item.file_name(), error.to_string()))?;
    }
    seq.end()
}
