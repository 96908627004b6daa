use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

struct DefaultArgs;

impl DefaultArgs {
    pub const OUTPUT_DIR: &'static str = "encrypted_data";
}

/// Encrypt, decrypt and verify image dataset directories.
#[derive(Clone, Parser)]
#[command(name = "encdata", version)]
#[command(about = "Bulk operations on encrypted image datasets. Password from ENCDATA_PASSWORD, .env, or prompt.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Clone, Args)]
pub struct CommonArgs {
    /// TOML config file (pool, codec, pipeline, blacklist).
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Number of worker threads. Overrides the config file.
    #[arg(long, short = 'w', global = true)]
    pub workers: Option<usize>,

    /// Maximum files in flight. Overrides the config file.
    #[arg(long, global = true)]
    pub credits: Option<usize>,

    /// Print the sweep report as JSON when done.
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Clone, Subcommand)]
pub enum Command {
    /// Encrypt every image in SOURCE_DIR.
    Encrypt {
        #[arg(value_name = "SOURCE_DIR")]
        source_dir: PathBuf,

        /// Where `<stem>.jpeg.enc` files are written.
        #[arg(long, short = 'o', default_value = DefaultArgs::OUTPUT_DIR)]
        output_directory: PathBuf,

        /// Seal the source bytes as-is instead of resizing and re-encoding.
        #[arg(long)]
        raw: bool,
    },

    /// Decrypt every `.enc` file in ENCRYPTED_DIR into DECRYPTION_DIR.
    Decrypt {
        #[arg(value_name = "ENCRYPTED_DIR")]
        encrypted_dir: PathBuf,

        #[arg(value_name = "DECRYPTION_DIR")]
        decryption_dir: PathBuf,
    },

    /// Check that every `.enc` file in DIR opens with the password. Writes nothing.
    Verify {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
}

impl Command {
    /// Directory whose `.env` may hold the password.
    pub fn source(&self) -> &PathBuf {
        match self {
            Command::Encrypt { source_dir, .. } => source_dir,
            Command::Decrypt { encrypted_dir, .. } => encrypted_dir,
            Command::Verify { dir } => dir,
        }
    }

    pub fn writes_new_archive(&self) -> bool {
        matches!(self, Command::Encrypt { .. })
    }
}
