//! Password loading: env var → .env in the source dir → secure prompt.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use log::{info, warn};
use std::path::Path;

const ENV_KEY: &str = "ENCDATA_PASSWORD";

fn try_env_then_dotenv(dir: &Path) -> Option<String> {
    if let Ok(s) = std::env::var(ENV_KEY) {
        if !s.is_empty() {
            return Some(s);
        }
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
        if let Ok(s) = std::env::var(ENV_KEY) {
            if !s.is_empty() {
                return Some(s);
            }
        }
    }
    None
}

/// Read the dataset password. `is_new`: a fresh archive is being written, so
/// the prompt asks twice.
pub fn get_password(dir: &Path, is_new: bool) -> Result<String> {
    if let Some(s) = try_env_then_dotenv(dir) {
        info!("Password found in environment");
        return Ok(s);
    }
    let label = "[encdata]".cyan().bold();
    let prompt = if is_new { "Please enter encryption key: " } else { "Please enter decryption key: " };
    let pass = rpassword::prompt_password(format!("{} {}", label, prompt)).context("read password")?;

    if is_new {
        let again = rpassword::prompt_password(format!("{} Repeat encryption key: ", label))
            .context("read password")?;
        if again != pass {
            bail!("passwords do not match");
        }
        warn!("Lost password = lost data");
    }
    Ok(pass)
}
