use crate::cli::{BatchArgs, ConvertArgs, RenameArgs};
use crate::error::{ErrorKind, Result};
use crate::progress::BatchProgress;
use crate::prompt;
use exn::{OptionExt, ResultExt};
use futures::{StreamExt, pin_mut};
use indicatif::MultiProgress;
use smbpix_config::{Config, ShareBackend, ShareConfig};
use smbpix_inspect::{InspectorHandle, StandardInspector};
use smbpix_pipeline::convert::{self, ConvertEvent};
use smbpix_pipeline::rename::{self, RenameEvent};
use smbpix_pipeline::{Exclusions, Staging, Summary};
use smbpix_share::ShareHandle;
use smbpix_share::backend::{Credentials, MountedShare, ReadOnlyShare, SmbClientShare};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

pub async fn convert(config: &Config, args: ConvertArgs, multi: &MultiProgress) -> Result<ExitCode> {
    let defaults = &config.convert;
    let format = args.format.as_deref().unwrap_or(&defaults.format);
    let quality = args.quality.unwrap_or_else(|| defaults.quality.to_string());
    let settings = convert::Settings::new(
        &defaults.source,
        &defaults.destination,
        Exclusions::new(&defaults.skip),
        format,
        &quality,
        defaults.force_max_quality,
    )
    .or_raise(|| ErrorKind::Settings)?;
    let staging = staging(&config.staging.conversion)?;

    let question = format!(
        "Convert every file in {} to {} (quality {}) into {}?",
        settings.source.display(),
        settings.format,
        settings.effective_quality(),
        settings.destination.display(),
    );
    if !confirmed(&args.batch, &question)? {
        return Ok(ExitCode::SUCCESS);
    }

    let ctx = convert::Context {
        share: open_share(&config.share, args.batch.dry_run).await?,
        inspector: inspector(),
        staging,
        settings,
    };
    let progress = BatchProgress::new(multi, "Conversion");
    let events = convert::convert(&ctx);
    pin_mut!(events);
    while let Some(event) = events.next().await {
        match event {
            Ok(ConvertEvent::Started) => {},
            Ok(ConvertEvent::DiscoveryComplete(total)) => progress.set_length(total),
            Ok(ConvertEvent::Processed(report)) => progress.advance(&report.entry.path),
            Ok(ConvertEvent::Complete(summary)) => {
                progress.finish(&summary);
                return Ok(exit_code(&summary));
            },
            Err(err) => {
                progress.abandon();
                return Err(err).or_raise(|| ErrorKind::Aborted("conversion"));
            },
        }
    }
    progress.abandon();
    exn::bail!(ErrorKind::Aborted("conversion"))
}

pub async fn rename(config: &Config, args: RenameArgs, multi: &MultiProgress) -> Result<ExitCode> {
    let defaults = &config.rename;
    let settings = rename::Settings {
        root: defaults.root.clone(),
        exclusions: Exclusions::new(&defaults.exclusions),
        destination: defaults.destination.parse::<rename::Destination>().or_raise(|| ErrorKind::Settings)?,
        skip_already_named: defaults.skip_already_named,
    };
    let staging = staging(&config.staging.renaming)?;

    let question = format!(
        "Append pixel dimensions to every image name below {} (destination: {})?",
        settings.root.display(),
        settings.destination,
    );
    if !confirmed(&args.batch, &question)? {
        return Ok(ExitCode::SUCCESS);
    }

    let ctx = rename::Context {
        share: open_share(&config.share, args.batch.dry_run).await?,
        inspector: inspector(),
        staging,
        settings,
    };
    let progress = BatchProgress::new(multi, "Rename");
    let events = rename::rename(&ctx);
    pin_mut!(events);
    while let Some(event) = events.next().await {
        match event {
            Ok(RenameEvent::Started) => {},
            Ok(RenameEvent::Descended(directory)) => progress.descend(&directory),
            Ok(RenameEvent::Processed(report)) => progress.advance(&report.entry.path),
            Ok(RenameEvent::Complete(summary)) => {
                progress.finish(&summary);
                return Ok(exit_code(&summary));
            },
            Err(err) => {
                progress.abandon();
                return Err(err).or_raise(|| ErrorKind::Aborted("rename"));
            },
        }
    }
    progress.abandon();
    exn::bail!(ErrorKind::Aborted("rename"))
}

pub fn print_config(config: &Config) {
    println!("{:#?}", config.redacted());
}

/// A batch that got through every entry but had failures exits non-zero.
fn exit_code(summary: &Summary) -> ExitCode {
    if summary.failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn confirmed(batch: &BatchArgs, question: &str) -> Result<bool> {
    if batch.yes {
        return Ok(true);
    }
    let question = if batch.dry_run { format!("[dry run] {question}") } else { question.to_string() };
    let confirmed = prompt::confirm(&question, Some(false)).or_raise(|| ErrorKind::Prompt)?;
    if !confirmed {
        tracing::info!("Cancelled; nothing was touched");
    }
    Ok(confirmed)
}

/// Create the staging root if needed.
fn staging(root: &Path) -> Result<Staging> {
    std::fs::create_dir_all(root).or_raise(|| ErrorKind::Staging(root.to_path_buf()))?;
    Staging::new(root).or_raise(|| ErrorKind::Staging(root.to_path_buf()))
}

fn inspector() -> InspectorHandle {
    Arc::new(StandardInspector)
}

async fn open_share(config: &ShareConfig, dry_run: bool) -> Result<ShareHandle> {
    let share: ShareHandle = match config.backend {
        ShareBackend::SmbClient => {
            let credentials = Credentials {
                host: config.host.clone(),
                share: config.share.clone(),
                domain: config.domain.clone(),
                user: config.user.clone(),
                password: config.password.clone(),
            };
            let share = SmbClientShare::new(credentials, config.smbclient.clone()).or_raise(|| ErrorKind::Share)?;
            share.connect().await.or_raise(|| ErrorKind::Share)?;
            Arc::new(share)
        },
        ShareBackend::Mounted => {
            let root = config.mount.as_deref().ok_or_raise(|| ErrorKind::Share)?;
            Arc::new(MountedShare::new(root.display().to_string(), root).or_raise(|| ErrorKind::Share)?)
        },
    };
    if dry_run {
        tracing::info!(share = share.name(), "Dry run: uploads and renames are skipped");
        return Ok(Arc::new(ReadOnlyShare::new(share)));
    }
    Ok(share)
}
