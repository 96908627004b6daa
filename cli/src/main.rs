//! encdata CLI: bulk encrypt, decrypt and verify dataset directories.

mod args;
mod logger;
mod passphrase;
mod progress;

use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};

use encdata_core::config::DatasetConfig;
use encdata_core::crypto::Key;
use encdata_core::normalize::NormalizeConfig;
use encdata_core::sweep::{self, SweepReport};

use args::{Cli, Command, CommonArgs};
use progress::SweepBar;

fn load_config(common: &CommonArgs) -> Result<DatasetConfig> {
    let mut config = match &common.config {
        Some(path) => DatasetConfig::from_path(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => DatasetConfig::default(),
    };
    if let Some(workers) = common.workers {
        config.pool.workers = workers;
    }
    if let Some(credits) = common.credits {
        config.pipeline.credits = credits;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<SweepReport> {
    let config = load_config(&cli.common)?;
    let password = passphrase::get_password(cli.command.source(), cli.command.writes_new_archive())?;
    let key = Key::from_password(&password);

    let report = match &cli.command {
        Command::Encrypt { source_dir, output_directory, raw } => {
            let config = if *raw { config.clone().with_normalize(NormalizeConfig::disabled()) } else { config.clone() };
            let mut bar = SweepBar::new("Encrypting files");
            let report = sweep::encrypt_directory_with(source_dir, output_directory, &key, &config, |_, total| bar.tick(total))
                .with_context(|| format!("encrypt {}", source_dir.display()))?;
            bar.finish();
            report
        }
        Command::Decrypt { encrypted_dir, decryption_dir } => {
            let mut bar = SweepBar::new("Decrypting files");
            let report = sweep::decrypt_directory_with(encrypted_dir, decryption_dir, &key, &config, |_, total| bar.tick(total))
                .with_context(|| format!("decrypt {}", encrypted_dir.display()))?;
            bar.finish();
            report
        }
        Command::Verify { dir } => {
            let mut bar = SweepBar::new("Verifying files");
            let report = sweep::verify_directory_with(dir, &key, &config, |_, total| bar.tick(total))
                .with_context(|| format!("verify {}", dir.display()))?;
            bar.finish();
            report
        }
    };
    Ok(report)
}

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    logger::setup_logging(cli.common.verbose);

    let report = run(&cli)?;
    info!(
        "{} ok, {} failed, {:.1} MB/s",
        report.processed,
        report.failed.len(),
        report.telemetry.throughput_bytes_per_sec / 1_000_000.0
    );
    if cli.common.json {
        println!("{}", report.to_json()?);
    }
    log::debug!("Total time: {:?}", start_time.elapsed());

    if !report.is_clean() {
        for (item, error) in &report.failed {
            warn!("{}: {}", item.file_name(), error);
        }
        bail!("{} of {} files failed", report.failed.len(), report.total());
    }
    Ok(())
}
