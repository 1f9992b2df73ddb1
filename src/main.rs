mod cli;
mod commands;
mod error;
mod logging;
mod progress;
mod prompt;

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use indicatif::MultiProgress;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let progress = logging::init(cli.verbose);
    match run(cli, &progress).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(retryable = err.is_retryable(), "{err:?}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli, progress: &MultiProgress) -> Result<ExitCode> {
    let config = smbpix_config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    match cli.command {
        Command::Convert(args) => commands::convert(&config, args, progress).await,
        Command::Rename(args) => commands::rename(&config, args, progress).await,
        Command::Config => {
            commands::print_config(&config);
            Ok(ExitCode::SUCCESS)
        },
    }
}
