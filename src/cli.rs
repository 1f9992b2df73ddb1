use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "smbpix", version)]
#[command(about = "Batch image conversion and dimension renaming on a remote file share", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON) instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert every image in the source directory and upload the results
    Convert(ConvertArgs),
    /// Append pixel dimensions to every image name below the rename root
    Rename(RenameArgs),
    /// Print the effective configuration, with the password redacted
    Config,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Output format: jpg, png, gif or tif
    #[arg(short, long)]
    pub format: Option<String>,
    /// Encode quality, 0 to 100
    #[arg(short, long)]
    pub quality: Option<String>,
    #[command(flatten)]
    pub batch: BatchArgs,
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    #[command(flatten)]
    pub batch: BatchArgs,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
    /// Read from the share but never upload or rename
    #[arg(long)]
    pub dry_run: bool,
}
